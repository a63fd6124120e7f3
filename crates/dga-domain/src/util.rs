//! Shared Numeric Helpers

/// Round to a fixed number of decimal places.
///
/// Percentages and scores are rounded at the point of computation, not at
/// presentation time, so downstream consumers see reproducible values.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
