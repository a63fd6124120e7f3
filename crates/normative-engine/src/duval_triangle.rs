//! Duval Triangle 1 Method
//!
//! Places the ternary composition of CH4, C2H4 and C2H2 inside the Duval
//! triangle and classifies by zone. Zone boundaries are sequential threshold
//! approximations of the published polygonal regions; the check order is part
//! of the behavior and must not be rearranged.

use crate::ratios::duval_triangle_percentages;
use dga_domain::{round_to, FaultType, GasReading, MethodResult};
use serde_json::json;

/// Method identifier
pub const DUVAL_TRIANGLE: &str = "Duval Triangle 1";

fn classify_zone(pct_ch4: f64, pct_c2h4: f64, pct_c2h2: f64) -> (FaultType, &'static str) {
    // Significant acetylene: discharge zones
    if pct_c2h2 > 13.0 {
        if pct_c2h4 < 23.0 {
            return (FaultType::D1, "Low-energy discharges");
        }
        if pct_c2h2 > 29.0 {
            return (FaultType::D2, "High-energy discharges");
        }
        return (FaultType::D2, "High-energy discharges");
    }

    // No significant acetylene: PD / thermal zones
    if pct_c2h2 <= 4.0 {
        if pct_c2h4 < 20.0 {
            if pct_ch4 > 98.0 {
                return (FaultType::PD, "Partial discharges");
            }
            return (FaultType::T1, "Thermal fault < 300 C");
        }
        if pct_c2h4 < 50.0 {
            return (FaultType::T2, "Thermal fault 300-700 C");
        }
        return (FaultType::T3, "Thermal fault > 700 C");
    }

    // Low-to-medium acetylene (4-13%)
    if pct_c2h4 < 23.0 {
        return (FaultType::D1, "Low-energy discharges");
    }

    (FaultType::DT, "Mixed thermal and electrical fault")
}

/// Run the Duval Triangle 1 diagnosis
pub fn diagnose(reading: &GasReading) -> MethodResult {
    let (pct_ch4, pct_c2h4, pct_c2h2) = duval_triangle_percentages(reading);

    if pct_ch4 == 0.0 && pct_c2h4 == 0.0 && pct_c2h2 == 0.0 {
        return MethodResult::new(DUVAL_TRIANGLE, FaultType::N)
            .with_description("Insufficient gases to apply the triangle")
            .with_detail("applicable", json!(false))
            .with_detail("pct_CH4", json!(0.0))
            .with_detail("pct_C2H4", json!(0.0))
            .with_detail("pct_C2H2", json!(0.0));
    }

    let (fault, description) = classify_zone(pct_ch4, pct_c2h4, pct_c2h2);

    MethodResult::new(DUVAL_TRIANGLE, fault)
        .with_description(description)
        .with_detail("applicable", json!(true))
        .with_detail("pct_CH4", json!(round_to(pct_ch4, 2)))
        .with_detail("pct_C2H4", json!(round_to(pct_c2h4, 2)))
        .with_detail("pct_C2H2", json!(round_to(pct_c2h2, 2)))
}
