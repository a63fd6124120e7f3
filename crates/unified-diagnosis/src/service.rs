//! Consensus / Model Reconciliation

use crate::DiagnosisError;
use dga_domain::{round_to, FaultType, Sample};
use model_engine::{FaultClassifier, ModelError};
use normative_engine::{NormativeDiagnosisResult, NormativeDiagnosisService};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// One sample's normative consensus next to the statistical prediction.
///
/// The model-side fields are `None` when no trained model exists; `agree`
/// is only set when a prediction was actually made.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnifiedDiagnosisResult {
    pub sample: Sample,
    pub normative: NormativeDiagnosisResult,
    pub predicted_fault: Option<FaultType>,
    pub probabilities: Option<BTreeMap<FaultType, f64>>,
    pub agree: Option<bool>,
}

/// Agreement statistics across a batch of unified diagnoses
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonSummary {
    pub total: usize,
    /// Samples where consensus and prediction matched
    pub agreements: usize,
    /// Samples where both existed but differed
    pub disagreements: usize,
    /// agreements / comparable, in percent (1 decimal); 0.0 when nothing
    /// was comparable
    pub agreement_pct: f64,
    pub details: Vec<UnifiedDiagnosisResult>,
}

/// Runs the normative consensus and the statistical classifier side by side.
///
/// Collaborators are injected; the service holds no state of its own beyond
/// the classifier's internal snapshot cache.
#[derive(Debug, Clone)]
pub struct UnifiedDiagnosisService {
    normative: NormativeDiagnosisService,
    classifier: Arc<FaultClassifier>,
}

impl UnifiedDiagnosisService {
    pub fn new(normative: NormativeDiagnosisService, classifier: Arc<FaultClassifier>) -> Self {
        Self {
            normative,
            classifier,
        }
    }

    /// Diagnose one sample with both engines.
    ///
    /// The consensus always runs. The classifier runs when a trained model
    /// exists, taking the probability path only when the fitted algorithm
    /// exposes it. A missing model yields `None` prediction fields rather
    /// than an error.
    pub fn diagnose(&self, sample: &Sample) -> Result<UnifiedDiagnosisResult, DiagnosisError> {
        let normative = self.normative.diagnose_all(&sample.gas_reading);

        let (predicted_fault, probabilities) = if self.classifier.has_model() {
            match self.classify(&sample.gas_reading) {
                Ok(outcome) => outcome,
                // The artifact disappeared between the check and the load
                Err(ModelError::ModelNotFound { .. }) => (None, None),
                Err(e) => return Err(e.into()),
            }
        } else {
            (None, None)
        };

        let agree = predicted_fault.map(|fault| fault == normative.consensus_fault);
        debug!(
            sample = %sample.sample_code,
            consensus = normative.consensus_fault.name(),
            predicted = predicted_fault.map(|fault| fault.name()),
            "unified diagnosis"
        );

        Ok(UnifiedDiagnosisResult {
            sample: sample.clone(),
            normative,
            predicted_fault,
            probabilities,
            agree,
        })
    }

    /// Diagnose a batch and aggregate agreement statistics.
    ///
    /// Only samples that produced both a consensus and a prediction count
    /// toward the percentage.
    pub fn compare(&self, samples: &[Sample]) -> Result<ComparisonSummary, DiagnosisError> {
        let details: Vec<UnifiedDiagnosisResult> = samples
            .iter()
            .map(|sample| self.diagnose(sample))
            .collect::<Result<_, _>>()?;

        let agreements = details.iter().filter(|d| d.agree == Some(true)).count();
        let disagreements = details.iter().filter(|d| d.agree == Some(false)).count();
        let comparable = agreements + disagreements;
        let agreement_pct = if comparable > 0 {
            round_to(agreements as f64 / comparable as f64 * 100.0, 1)
        } else {
            0.0
        };

        Ok(ComparisonSummary {
            total: details.len(),
            agreements,
            disagreements,
            agreement_pct,
            details,
        })
    }

    fn classify(
        &self,
        reading: &dga_domain::GasReading,
    ) -> Result<(Option<FaultType>, Option<BTreeMap<FaultType, f64>>), ModelError> {
        if self.classifier.supports_probabilities()? {
            let (fault, probs) = self.classifier.classify_with_probabilities(reading)?;
            Ok((Some(fault), Some(probs)))
        } else {
            let fault = self.classifier.classify(reading)?;
            Ok((Some(fault), None))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use dga_domain::GasReading;
    use feature_prep::prepare_dataset;
    use model_engine::{ModelTrainer, TrainerConfig};
    use tempfile::tempdir;

    fn sample(code: &str, h2: f64, c2h2: f64) -> Sample {
        let reading =
            GasReading::new(h2, 5.0, 3.0, 2.0, c2h2, 200.0, 1500.0, 20000.0, 55000.0).unwrap();
        Sample::new(
            code,
            1,
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            reading,
        )
        .unwrap()
    }

    fn training_samples() -> Vec<Sample> {
        let mut samples = Vec::new();
        for i in 0..8 {
            samples.push(sample(&format!("N-{i}"), 10.0 + i as f64, 0.0));
            samples.push(sample(&format!("F-{i}"), 2000.0 + i as f64, 500.0));
        }
        samples
    }

    #[test]
    fn test_without_model_prediction_fields_are_none() {
        let dir = tempdir().unwrap();
        let classifier = Arc::new(FaultClassifier::new(dir.path().join("absent.bin")));
        let service = UnifiedDiagnosisService::new(NormativeDiagnosisService::new(), classifier);

        let result = service.diagnose(&sample("S1", 15.0, 0.0)).unwrap();
        assert_eq!(result.normative.consensus_fault, FaultType::N);
        assert_eq!(result.predicted_fault, None);
        assert_eq!(result.probabilities, None);
        assert_eq!(result.agree, None);
    }

    #[test]
    fn test_with_model_agreement_is_flagged() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fault.bin");
        let dataset = prepare_dataset(&training_samples(), Some(&NormativeDiagnosisService::new()));
        ModelTrainer::new(TrainerConfig { n_folds: 3, seed: 42 })
            .train_and_save(&dataset, &path)
            .unwrap();

        let classifier = Arc::new(FaultClassifier::new(path));
        let service = UnifiedDiagnosisService::new(NormativeDiagnosisService::new(), classifier);

        let result = service.diagnose(&sample("S1", 12.0, 0.0)).unwrap();
        assert!(result.predicted_fault.is_some());
        assert!(result.agree.is_some());
        if let Some(probs) = &result.probabilities {
            let total: f64 = probs.values().sum();
            assert!((total - 1.0).abs() < 1e-2);
        }
    }

    #[test]
    fn test_compare_counts_only_comparable_samples() {
        let dir = tempdir().unwrap();
        let classifier = Arc::new(FaultClassifier::new(dir.path().join("absent.bin")));
        let service = UnifiedDiagnosisService::new(NormativeDiagnosisService::new(), classifier);

        // No model: nothing is comparable, percentage stays 0
        let summary = service
            .compare(&[sample("S1", 15.0, 0.0), sample("S2", 2000.0, 500.0)])
            .unwrap();
        assert_eq!(summary.total, 2);
        assert_eq!(summary.agreements, 0);
        assert_eq!(summary.disagreements, 0);
        assert_eq!(summary.agreement_pct, 0.0);
        assert_eq!(summary.details.len(), 2);
    }

    #[test]
    fn test_compare_with_model_aggregates_agreement() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fault.bin");
        let samples = training_samples();
        let dataset = prepare_dataset(&samples, Some(&NormativeDiagnosisService::new()));
        ModelTrainer::new(TrainerConfig { n_folds: 3, seed: 42 })
            .train_and_save(&dataset, &path)
            .unwrap();

        let classifier = Arc::new(FaultClassifier::new(path));
        let service = UnifiedDiagnosisService::new(NormativeDiagnosisService::new(), classifier);

        let summary = service.compare(&samples).unwrap();
        assert_eq!(summary.total, samples.len());
        assert_eq!(
            summary.agreements + summary.disagreements,
            samples.len()
        );
        assert!((0.0..=100.0).contains(&summary.agreement_pct));
    }
}
