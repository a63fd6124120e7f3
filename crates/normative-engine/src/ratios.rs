//! Gas Ratio and Percentage Utilities
//!
//! Pure numeric helpers shared by the normative methods. All operate on a
//! [`GasReading`] and return `f64`.

use dga_domain::GasReading;

/// Sentinel returned by [`safe_ratio`] for a positive numerator over a
/// non-positive denominator. Classifiers compare it against their thresholds
/// to represent "infinite" ratios, so the exact value matters.
pub const RATIO_SENTINEL: f64 = 999.0;

/// Division guarded against non-positive denominators.
///
/// Returns [`RATIO_SENTINEL`] when the denominator is <= 0 and the numerator
/// is positive, and 0.0 when both are non-positive.
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator <= 0.0 {
        if numerator > 0.0 {
            RATIO_SENTINEL
        } else {
            0.0
        }
    } else {
        numerator / denominator
    }
}

/// CH4 / H2, sensitive to fault temperature
pub fn ratio_ch4_h2(reading: &GasReading) -> f64 {
    safe_ratio(reading.ch4, reading.h2)
}

/// C2H2 / C2H4, discriminates discharges from thermal faults
pub fn ratio_c2h2_c2h4(reading: &GasReading) -> f64 {
    safe_ratio(reading.c2h2, reading.c2h4)
}

/// C2H4 / C2H6, indicates thermal severity
pub fn ratio_c2h4_c2h6(reading: &GasReading) -> f64 {
    safe_ratio(reading.c2h4, reading.c2h6)
}

/// C2H6 / CH4
pub fn ratio_c2h6_ch4(reading: &GasReading) -> f64 {
    safe_ratio(reading.c2h6, reading.ch4)
}

/// C2H6 / C2H2, Dornenburg's R4
pub fn ratio_c2h6_c2h2(reading: &GasReading) -> f64 {
    safe_ratio(reading.c2h6, reading.c2h2)
}

/// C2H2 / CH4, Dornenburg's R3
pub fn ratio_c2h2_ch4(reading: &GasReading) -> f64 {
    safe_ratio(reading.c2h2, reading.ch4)
}

/// CO2 / CO, indicates cellulose degradation
pub fn ratio_co2_co(reading: &GasReading) -> f64 {
    safe_ratio(reading.co2, reading.co)
}

/// Total Dissolved Combustible Gas per IEEE C57.104-2019:
/// H2 + CH4 + C2H6 + C2H4 + C2H2 + CO.
pub fn total_combustible_gases(reading: &GasReading) -> f64 {
    reading.h2 + reading.ch4 + reading.c2h6 + reading.c2h4 + reading.c2h2 + reading.co
}

/// Sum of the hydrocarbon gases: CH4 + C2H6 + C2H4 + C2H2
pub fn total_hydrocarbons(reading: &GasReading) -> f64 {
    reading.ch4 + reading.c2h6 + reading.c2h4 + reading.c2h2
}

/// Ternary composition (%CH4, %C2H4, %C2H2) for Duval Triangle 1.
///
/// All-zero when the three gases sum to zero; otherwise the percentages sum
/// to 100.
pub fn duval_triangle_percentages(reading: &GasReading) -> (f64, f64, f64) {
    let total = reading.ch4 + reading.c2h4 + reading.c2h2;
    if total <= 0.0 {
        return (0.0, 0.0, 0.0);
    }
    (
        reading.ch4 / total * 100.0,
        reading.c2h4 / total * 100.0,
        reading.c2h2 / total * 100.0,
    )
}

/// Pentagonal composition (%H2, %CH4, %C2H6, %C2H4, %C2H2) for Duval
/// Pentagon 1. All-zero when the five gases sum to zero.
pub fn duval_pentagon_percentages(reading: &GasReading) -> (f64, f64, f64, f64, f64) {
    let total = reading.h2 + reading.ch4 + reading.c2h6 + reading.c2h4 + reading.c2h2;
    if total <= 0.0 {
        return (0.0, 0.0, 0.0, 0.0, 0.0);
    }
    (
        reading.h2 / total * 100.0,
        reading.ch4 / total * 100.0,
        reading.c2h6 / total * 100.0,
        reading.c2h4 / total * 100.0,
        reading.c2h2 / total * 100.0,
    )
}
