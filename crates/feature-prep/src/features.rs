//! Feature Vector Assembly

use dga_domain::{FaultType, GasReading};
use normative_engine::NormativeDiagnosisService;

/// Number of features per reading (the nine gases)
pub const FEATURE_DIMENSION: usize = 9;

/// Feature column names, identical to the reading's canonical field order.
///
/// This ordering is a contract shared with the trainer and the inference
/// classifier and must never change independently.
pub fn feature_names() -> [&'static str; FEATURE_DIMENSION] {
    GasReading::field_names()
}

/// The nine gas concentrations in canonical field order
pub fn extract_features(reading: &GasReading) -> [f64; FEATURE_DIMENSION] {
    reading.values()
}

/// Training label from the normative consensus.
///
/// Runs all six methods and returns the majority fault type.
pub fn auto_label(reading: &GasReading, service: &NormativeDiagnosisService) -> FaultType {
    service.diagnose_all(reading).consensus_fault
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_order_matches_reading() {
        let reading =
            GasReading::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0).unwrap();
        assert_eq!(
            extract_features(&reading),
            [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]
        );
        assert_eq!(feature_names(), GasReading::field_names());
    }

    #[test]
    fn test_auto_label_normal_reading() {
        let reading =
            GasReading::new(15.0, 5.0, 3.0, 2.0, 0.0, 200.0, 1500.0, 20000.0, 55000.0).unwrap();
        let service = NormativeDiagnosisService::new();
        assert_eq!(auto_label(&reading, &service), FaultType::N);
    }
}
