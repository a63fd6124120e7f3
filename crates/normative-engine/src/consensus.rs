//! Majority-Vote Consensus over the Normative Methods

use crate::{dornenburg, duval_pentagon, duval_triangle, iec_60599, ieee_c57_104, rogers};
use dga_domain::{round_to, FaultType, GasReading, MethodResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Diagnostic method: name plus its pure classification function
type Method = (&'static str, fn(&GasReading) -> MethodResult);

/// The six methods in invocation order. Ties in the consensus vote are broken
/// by this order (first seen wins), so it is part of the contract.
const METHODS: [Method; 6] = [
    (ieee_c57_104::IEEE_C57_104, ieee_c57_104::diagnose),
    (iec_60599::IEC_60599, iec_60599::diagnose),
    (rogers::ROGERS, rogers::diagnose),
    (dornenburg::DORNENBURG, dornenburg::diagnose),
    (duval_triangle::DUVAL_TRIANGLE, duval_triangle::diagnose),
    (duval_pentagon::DUVAL_PENTAGON, duval_pentagon::diagnose),
];

/// Complete result of running all six normative methods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormativeDiagnosisResult {
    /// Individual method results, in invocation order
    pub results: Vec<MethodResult>,
    /// Majority-vote fault type
    pub consensus_fault: FaultType,
    /// Vote count per fault-type name
    pub vote_counts: BTreeMap<String, usize>,
    /// Share of methods agreeing with the consensus, in percent (1 decimal)
    pub agreement_pct: f64,
}

/// Stateless service running the six normative methods and their consensus.
///
/// Operates purely on [`GasReading`] values; no repositories or I/O.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormativeDiagnosisService;

impl NormativeDiagnosisService {
    pub fn new() -> Self {
        Self
    }

    /// Run all six methods and compute the majority vote
    pub fn diagnose_all(&self, reading: &GasReading) -> NormativeDiagnosisResult {
        let results: Vec<MethodResult> = METHODS
            .iter()
            .map(|(_, diagnose)| diagnose(reading))
            .collect();

        let (consensus_fault, vote_counts, agreement_pct) = Self::compute_consensus(&results);
        debug!(
            consensus = consensus_fault.name(),
            agreement_pct, "normative consensus computed"
        );

        NormativeDiagnosisResult {
            results,
            consensus_fault,
            vote_counts,
            agreement_pct,
        }
    }

    /// Run one method selected by case-insensitive name.
    ///
    /// Returns `None` for an unknown name; an absent method is an expected,
    /// checkable outcome rather than an error.
    pub fn diagnose_single(&self, reading: &GasReading, method_name: &str) -> Option<MethodResult> {
        METHODS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(method_name))
            .map(|(_, diagnose)| diagnose(reading))
    }

    /// Names of the implemented methods, in invocation order
    pub fn available_methods() -> [&'static str; 6] {
        [
            METHODS[0].0,
            METHODS[1].0,
            METHODS[2].0,
            METHODS[3].0,
            METHODS[4].0,
            METHODS[5].0,
        ]
    }

    fn compute_consensus(results: &[MethodResult]) -> (FaultType, BTreeMap<String, usize>, f64) {
        let total = results.len();

        // First-seen-wins tie-break: scan votes in invocation order and keep
        // the first fault that reaches the running maximum.
        let mut counts: BTreeMap<FaultType, usize> = BTreeMap::new();
        for result in results {
            *counts.entry(result.fault_type).or_insert(0) += 1;
        }

        let mut winner = results[0].fault_type;
        let mut winner_count = 0usize;
        for result in results {
            let count = counts[&result.fault_type];
            if count > winner_count {
                winner = result.fault_type;
                winner_count = count;
            }
        }

        let vote_counts: BTreeMap<String, usize> = counts
            .iter()
            .map(|(fault, count)| (fault.name().to_string(), *count))
            .collect();

        let agreement = round_to(winner_count as f64 / total as f64 * 100.0, 1);
        (winner, vote_counts, agreement)
    }
}
