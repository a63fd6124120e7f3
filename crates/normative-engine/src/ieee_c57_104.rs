//! IEEE C57.104-2019 Condition Method
//!
//! Compares each gas concentration and the TDCG against the typical limits of
//! IEEE C57.104-2019 Table 1 to grade the transformer into conditions 1-4,
//! then suggests a fault type from the basic IEC ratios when the overall
//! condition is 3 or worse.

use crate::ratios::{ratio_c2h2_c2h4, ratio_c2h4_c2h6, ratio_ch4_h2, total_combustible_gases};
use dga_domain::{round_to, FaultType, GasReading, MethodResult};
use serde_json::{json, Map, Value};

/// Method identifier
pub const IEEE_C57_104: &str = "IEEE C57.104-2019";

/// Per-gas condition limits (ppm): thresholds separating conditions 1|2, 2|3, 3|4
const GAS_LIMITS: [(&str, [f64; 3]); 7] = [
    ("h2", [100.0, 200.0, 500.0]),
    ("ch4", [75.0, 125.0, 200.0]),
    ("c2h6", [65.0, 100.0, 150.0]),
    ("c2h4", [50.0, 100.0, 200.0]),
    ("c2h2", [2.0, 10.0, 35.0]),
    ("co", [350.0, 570.0, 1400.0]),
    ("co2", [2500.0, 4000.0, 10000.0]),
];

/// TDCG condition limits (ppm)
const TDCG_LIMITS: [f64; 3] = [720.0, 1920.0, 4630.0];

fn condition_for(value: f64, limits: &[f64; 3]) -> u8 {
    if value <= limits[0] {
        1
    } else if value <= limits[1] {
        2
    } else if value <= limits[2] {
        3
    } else {
        4
    }
}

fn condition_label(condition: u8) -> &'static str {
    match condition {
        1 => "Condition 1: normal operation",
        2 => "Condition 2: normal, gases above typical values",
        3 => "Condition 3: abnormal, investigation required",
        _ => "Condition 4: dangerous, immediate action required",
    }
}

/// Suggest a fault type from the basic gas ratios; applied when the overall
/// condition is >= 3.
fn suggest_fault_type(reading: &GasReading) -> FaultType {
    let r1 = ratio_ch4_h2(reading);
    let r2 = ratio_c2h2_c2h4(reading);
    let r3 = ratio_c2h4_c2h6(reading);

    // Acetylene dominance points to discharges
    if reading.c2h2 > 10.0 {
        if r2 > 2.0 {
            return FaultType::D1;
        }
        return FaultType::D2;
    }

    // Thermal ratio bands
    if r3 > 4.0 {
        return FaultType::T3;
    }
    if r3 > 1.0 {
        return FaultType::T2;
    }
    if r1 > 1.0 && r3 <= 1.0 {
        return FaultType::T1;
    }

    // Hydrogen-dominant with little methane: partial discharges
    if reading.h2 > 100.0 && r1 < 0.1 {
        return FaultType::PD;
    }

    FaultType::S
}

/// Run the IEEE C57.104-2019 diagnosis
pub fn diagnose(reading: &GasReading) -> MethodResult {
    let gas_values = [
        ("h2", reading.h2),
        ("ch4", reading.ch4),
        ("c2h6", reading.c2h6),
        ("c2h4", reading.c2h4),
        ("c2h2", reading.c2h2),
        ("co", reading.co),
        ("co2", reading.co2),
    ];

    let mut individual = Map::new();
    let mut max_gas_condition = 1u8;
    for ((gas, value), (_, limits)) in gas_values.iter().zip(GAS_LIMITS.iter()) {
        let condition = condition_for(*value, limits);
        max_gas_condition = max_gas_condition.max(condition);
        individual.insert((*gas).to_string(), json!(condition));
    }

    let tdcg = total_combustible_gases(reading);
    let tdcg_condition = condition_for(tdcg, &TDCG_LIMITS);
    let overall = max_gas_condition.max(tdcg_condition);

    let fault = if overall <= 2 {
        FaultType::N
    } else {
        suggest_fault_type(reading)
    };

    MethodResult::new(IEEE_C57_104, fault)
        .with_description(condition_label(overall))
        .with_detail("overall_condition", json!(overall))
        .with_detail("tdcg_ppm", json!(round_to(tdcg, 2)))
        .with_detail("tdcg_condition", json!(tdcg_condition))
        .with_detail("individual_conditions", Value::Object(individual))
}
