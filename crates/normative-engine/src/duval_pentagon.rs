//! Duval Pentagon 1 Method
//!
//! Classifies the five-gas composition (H2, CH4, C2H6, C2H4, C2H2) into the
//! pentagon's zones. As with the triangle, the zones are sequential threshold
//! approximations of the published polygons and the check order is part of
//! the behavior.

use crate::ratios::duval_pentagon_percentages;
use dga_domain::{round_to, FaultType, GasReading, MethodResult};
use serde_json::json;

/// Method identifier
pub const DUVAL_PENTAGON: &str = "Duval Pentagon 1";

fn classify_zone(
    pct_h2: f64,
    pct_ch4: f64,
    pct_c2h6: f64,
    pct_c2h4: f64,
    pct_c2h2: f64,
) -> (FaultType, &'static str) {
    // Hydrogen-dominant corner
    if pct_h2 > 60.0 && pct_c2h2 < 5.0 && pct_c2h4 < 10.0 {
        return (FaultType::PD, "Partial discharges (hydrogen dominant)");
    }

    // Significant acetylene
    if pct_c2h2 > 15.0 {
        if pct_c2h4 > 25.0 {
            return (FaultType::D2, "High-energy discharges");
        }
        return (FaultType::D1, "Low-energy discharges");
    }

    if pct_c2h2 > 5.0 {
        if pct_c2h4 > 30.0 {
            return (FaultType::D2, "High-energy discharges (arcing)");
        }
        if pct_h2 > 30.0 {
            return (FaultType::D1, "Low-energy discharges");
        }
        return (FaultType::DT, "Mixed discharge and thermal fault");
    }

    // No significant acetylene (< 5%): ethylene grades the temperature
    if pct_c2h4 > 50.0 {
        return (FaultType::T3, "Thermal fault > 700 C");
    }

    if pct_c2h4 > 25.0 {
        if pct_c2h6 > 20.0 {
            return (FaultType::T2, "Thermal fault 300-700 C");
        }
        return (FaultType::T3, "Thermal fault > 700 C");
    }

    if pct_c2h4 > 10.0 {
        if pct_c2h6 > 30.0 {
            return (FaultType::S, "Overheating");
        }
        return (FaultType::T2, "Thermal fault 300-700 C");
    }

    // Methane / ethane dominant
    if pct_ch4 > 40.0 {
        if pct_c2h6 > 20.0 {
            return (FaultType::S, "Overheating (oil/cellulose)");
        }
        return (FaultType::T1, "Thermal fault < 300 C");
    }

    if pct_c2h6 > 40.0 {
        return (FaultType::S, "Overheating");
    }

    if pct_h2 > 40.0 {
        return (FaultType::PD, "Partial discharges");
    }

    (FaultType::T1, "Low-temperature thermal fault")
}

/// Run the Duval Pentagon 1 diagnosis
pub fn diagnose(reading: &GasReading) -> MethodResult {
    let (pct_h2, pct_ch4, pct_c2h6, pct_c2h4, pct_c2h2) = duval_pentagon_percentages(reading);

    if pct_h2 == 0.0 && pct_ch4 == 0.0 && pct_c2h6 == 0.0 && pct_c2h4 == 0.0 && pct_c2h2 == 0.0 {
        return MethodResult::new(DUVAL_PENTAGON, FaultType::N)
            .with_description("Insufficient gases to apply the pentagon")
            .with_detail("applicable", json!(false))
            .with_detail("pct_H2", json!(0.0))
            .with_detail("pct_CH4", json!(0.0))
            .with_detail("pct_C2H6", json!(0.0))
            .with_detail("pct_C2H4", json!(0.0))
            .with_detail("pct_C2H2", json!(0.0));
    }

    let (fault, description) = classify_zone(pct_h2, pct_ch4, pct_c2h6, pct_c2h4, pct_c2h2);

    MethodResult::new(DUVAL_PENTAGON, fault)
        .with_description(description)
        .with_detail("applicable", json!(true))
        .with_detail("pct_H2", json!(round_to(pct_h2, 2)))
        .with_detail("pct_CH4", json!(round_to(pct_ch4, 2)))
        .with_detail("pct_C2H6", json!(round_to(pct_c2h6, 2)))
        .with_detail("pct_C2H4", json!(round_to(pct_c2h4, 2)))
        .with_detail("pct_C2H2", json!(round_to(pct_c2h2, 2)))
}
