//! IEC 60599:2022 Ratio Method
//!
//! Encodes three gas ratios into 3-valued codes and looks the triple up in
//! the Table 2 decision table.
//!
//! Ratios: R1 = C2H2/C2H4, R2 = CH4/H2, R5 = C2H4/C2H6.

use crate::ratios::{ratio_c2h2_c2h4, ratio_c2h4_c2h6, ratio_ch4_h2};
use dga_domain::{round_to, FaultType, GasReading, MethodResult};
use serde_json::json;

/// Method identifier
pub const IEC_60599: &str = "IEC 60599:2022";

/// R1 = C2H2/C2H4: <0.1 -> 0, 0.1..=1 -> 1, >1 -> 2
fn code_r1(ratio: f64) -> u8 {
    if ratio < 0.1 {
        0
    } else if ratio <= 1.0 {
        1
    } else {
        2
    }
}

/// R2 = CH4/H2: <0.1 -> 0 (hydrogen dominant), 0.1..=1 -> 1, >1 -> 2
fn code_r2(ratio: f64) -> u8 {
    if ratio < 0.1 {
        0
    } else if ratio <= 1.0 {
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

/// Typical entries of IEC 60599 Table 2, keyed by (code R1, code R2, code R5)
fn lookup(codes: (u8, u8, u8)) -> Option<(FaultType, &'static str)> {
    let entry = match codes {
        (0, 0, 0) => (FaultType::PD, "Low-energy partial discharges"),
        (1, 0, 0) => (FaultType::D1, "Low-energy discharges (sparking)"),
        (2, 0, 0) => (FaultType::D1, "Low-energy discharges with elevated C2H2"),
        (1, 0, 1) => (FaultType::D2, "High-energy discharges"),
        (1, 0, 2) => (FaultType::D2, "Severe high-energy discharges"),
        (2, 0, 1) => (FaultType::D2, "High-energy discharges with arcing"),
        (2, 0, 2) => (FaultType::D2, "High-energy discharges with severe arcing"),
        (0, 1, 0) => (FaultType::T1, "Low-temperature thermal fault (< 300 C)"),
        (0, 2, 0) => (FaultType::T1, "Low-temperature thermal fault (< 300 C)"),
        (0, 2, 1) => (FaultType::T2, "Medium-temperature thermal fault (300-700 C)"),
        (0, 1, 1) => (FaultType::T2, "Medium-temperature thermal fault (300-700 C)"),
        (0, 2, 2) => (FaultType::T3, "High-temperature thermal fault (> 700 C)"),
        (0, 1, 2) => (FaultType::T3, "High-temperature thermal fault (> 700 C)"),
        (1 | 2, 1 | 2, 0 | 1 | 2) => (FaultType::DT, "Mixed discharge and thermal fault"),
        _ => return None,
    };
    Some(entry)
}

/// Run the IEC 60599:2022 diagnosis
pub fn diagnose(reading: &GasReading) -> MethodResult {
    let r1 = ratio_c2h2_c2h4(reading);
    let r2 = ratio_ch4_h2(reading);
    let r5 = ratio_c2h4_c2h6(reading);

    let c1 = code_r1(r1);
    let c2 = code_r2(r2);
    let c5 = code_r5(r5);

    let (fault, description) = match lookup((c1, c2, c5)) {
        Some((fault, description)) => (fault, description.to_string()),
        None => (
            FaultType::N,
            "No defined fault pattern identified".to_string(),
        ),
    };

    MethodResult::new(IEC_60599, fault)
        .with_description(description)
        .with_detail("R1_C2H2_C2H4", json!(round_to(r1, 4)))
        .with_detail("R2_CH4_H2", json!(round_to(r2, 4)))
        .with_detail("R5_C2H4_C2H6", json!(round_to(r5, 4)))
        .with_detail("code_R1", json!(c1))
        .with_detail("code_R2", json!(c2))
        .with_detail("code_R5", json!(c5))
        .with_detail("pattern", json!(format!("({c1}, {c2}, {c5})")))
}
