//! Rogers Ratio Method
//!
//! The modified four-gas Rogers table. Uses the same ratio-code-table shape
//! as IEC 60599 but with different cut-points, a fifth discrete code (5) for
//! a very low CH4/H2 ratio, and its own decision table.
//!
//! Ratios: R1 = CH4/H2, R2 = C2H2/C2H4, R5 = C2H4/C2H6.

use crate::ratios::{ratio_c2h2_c2h4, ratio_c2h4_c2h6, ratio_ch4_h2};
use dga_domain::{round_to, FaultType, GasReading, MethodResult};
use serde_json::json;

/// Method identifier
pub const ROGERS: &str = "Rogers";

/// R1 = CH4/H2: <0.1 -> 5, 0.1..=1 -> 0, 1..=3 -> 1, >3 -> 2
fn code_r1(ratio: f64) -> u8 {
    if ratio < 0.1 {
        5
    } else if ratio <= 1.0 {
        0
    } else if ratio <= 3.0 {
        1
    } else {
        2
    }
}

/// R2 = C2H2/C2H4: <0.1 -> 0, 0.1..=3 -> 1, >3 -> 2
fn code_r2(ratio: f64) -> u8 {
    if ratio < 0.1 {
        0
    } else if ratio <= 3.0 {
        1
    } else {
        2
    }
}

/// R5 = C2H4/C2H6: <1 -> 0, 1..=3 -> 1, >3 -> 2
fn code_r5(ratio: f64) -> u8 {
    if ratio < 1.0 {
        0
    } else if ratio <= 3.0 {
        1
    } else {
        2
    }
}

/// Rogers decision table, keyed by (code R1, code R2, code R5)
fn lookup(codes: (u8, u8, u8)) -> Option<(FaultType, &'static str)> {
    let entry = match codes {
        (0, 0, 0) => (FaultType::N, "Normal aging deterioration"),
        (5, 0, 0) => (FaultType::PD, "Low-energy partial discharges"),
        (0, 1, 0) | (1, 1, 0) => (FaultType::D1, "Low-energy discharges"),
        (0, 2, 0) => (FaultType::D2, "High-energy discharges (arcing)"),
        (0, 1, 1) => (FaultType::D2, "High-energy discharges"),
        (0, 1, 2) => (FaultType::D2, "High-energy discharges with heating"),
        (0, 2, 1) | (0, 2, 2) => (FaultType::D2, "High-energy discharges"),
        (1, 0, 0) => (FaultType::T1, "Thermal fault below 300 C"),
        (2, 0, 0) => (FaultType::T1, "Thermal fault below 300 C (high CH4)"),
        (2, 0, 1) | (1, 0, 1) => (FaultType::T2, "Thermal fault between 300 and 700 C"),
        (2, 0, 2) | (1, 0, 2) => (FaultType::T3, "Thermal fault above 700 C"),
        _ => return None,
    };
    Some(entry)
}

/// Run the Rogers diagnosis
pub fn diagnose(reading: &GasReading) -> MethodResult {
    let r1 = ratio_ch4_h2(reading);
    let r2 = ratio_c2h2_c2h4(reading);
    let r5 = ratio_c2h4_c2h6(reading);

    let c1 = code_r1(r1);
    let c2 = code_r2(r2);
    let c5 = code_r5(r5);

    let (fault, description) = match lookup((c1, c2, c5)) {
        Some((fault, description)) => (fault, description.to_string()),
        None => (
            FaultType::N,
            "Code combination without a defined diagnosis".to_string(),
        ),
    };

    MethodResult::new(ROGERS, fault)
        .with_description(description)
        .with_detail("R1_CH4_H2", json!(round_to(r1, 4)))
        .with_detail("R2_C2H2_C2H4", json!(round_to(r2, 4)))
        .with_detail("R5_C2H4_C2H6", json!(round_to(r5, 4)))
        .with_detail("code_R1", json!(c1))
        .with_detail("code_R2", json!(c2))
        .with_detail("code_R5", json!(c5))
        .with_detail("pattern", json!(format!("({c1}, {c2}, {c5})")))
}
