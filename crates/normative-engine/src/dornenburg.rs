//! Dornenburg Ratio Method
//!
//! Applies an applicability gate first: at least one key gas must exceed its
//! L1 significance limit. If the gate passes, four ratios feed a nested set
//! of threshold checks (not a flat code table).
//!
//! Ratios: R1 = CH4/H2, R2 = C2H2/C2H4, R3 = C2H2/CH4, R4 = C2H6/C2H2.

use crate::ratios::{ratio_c2h2_c2h4, ratio_c2h2_ch4, ratio_c2h6_c2h2, ratio_ch4_h2};
use dga_domain::{round_to, FaultType, GasReading, MethodResult};
use serde_json::json;

/// Method identifier
pub const DORNENBURG: &str = "Dornenburg";

/// L1 significance limits (ppm); the method applies only if at least one
/// key gas exceeds its limit.
const L1_LIMITS: [(&str, f64); 6] = [
    ("h2", 100.0),
    ("ch4", 120.0),
    ("c2h2", 1.0),
    ("c2h4", 50.0),
    ("c2h6", 65.0),
    ("co", 350.0),
];

fn exceeds_l1(reading: &GasReading) -> bool {
    let values = [
        reading.h2,
        reading.ch4,
        reading.c2h2,
        reading.c2h4,
        reading.c2h6,
        reading.co,
    ];
    values
        .iter()
        .zip(L1_LIMITS.iter())
        .any(|(value, (_, limit))| value > limit)
}

/// Nested decision rules of the original method. The check order matters:
/// thermal first, then partial discharges, then arcing, with an explicit
/// thermal fallback.
fn classify(r1: f64, r2: f64, r3: f64, r4: f64) -> (FaultType, &'static str) {
    // Thermal fault: heavy hydrocarbons dominate
    if r1 > 1.0 && r2 < 0.1 {
        if r4 > 0.4 {
            return (FaultType::T2, "Thermal fault (oil decomposition)");
        }
        return (FaultType::T1, "Low-temperature thermal fault");
    }

    // Partial discharges (corona): hydrogen dominates
    if r1 < 0.1 && r2 < 0.1 {
        return (FaultType::PD, "Partial discharges (corona)");
    }

    // High-energy discharges: acetylene present
    if r2 > 0.1 && r3 > 0.3 {
        return (FaultType::D2, "High-energy discharges (arcing)");
    }

    // Low-energy discharges
    if r2 > 0.1 {
        return (FaultType::D1, "Low-energy discharges");
    }

    // Thermal fallback when gases are present but no pattern fits
    if r1 > 1.0 {
        return (FaultType::T1, "Possible thermal fault");
    }

    (FaultType::N, "No fault pattern defined by Dornenburg")
}

/// Run the Dornenburg diagnosis
pub fn diagnose(reading: &GasReading) -> MethodResult {
    if !exceeds_l1(reading) {
        let limits: serde_json::Map<String, serde_json::Value> = L1_LIMITS
            .iter()
            .map(|(gas, limit)| ((*gas).to_string(), json!(limit)))
            .collect();
        return MethodResult::new(DORNENBURG, FaultType::N)
            .with_description("Gases below L1 limits; method not applicable")
            .with_detail("applicable", json!(false))
            .with_detail("l1_limits", serde_json::Value::Object(limits));
    }

    let r1 = ratio_ch4_h2(reading);
    let r2 = ratio_c2h2_c2h4(reading);
    let r3 = ratio_c2h2_ch4(reading);
    let r4 = ratio_c2h6_c2h2(reading);

    let (fault, description) = classify(r1, r2, r3, r4);

    MethodResult::new(DORNENBURG, fault)
        .with_description(description)
        .with_detail("applicable", json!(true))
        .with_detail("R1_CH4_H2", json!(round_to(r1, 4)))
        .with_detail("R2_C2H2_C2H4", json!(round_to(r2, 4)))
        .with_detail("R3_C2H2_CH4", json!(round_to(r3, 4)))
        .with_detail("R4_C2H6_C2H2", json!(round_to(r4, 4)))
}
