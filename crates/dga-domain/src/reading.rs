//! Gas Reading Value Object

use crate::error::DomainError;
use serde::{Deserialize, Serialize};

/// Number of gas concentrations in a reading
pub const GAS_COUNT: usize = 9;

/// Immutable chromatography reading of the nine dissolved gases, in ppm.
///
/// Two readings with identical concentrations compare equal; the type has no
/// identity of its own. The field order (h2, ch4, c2h6, c2h4, c2h2, co, co2,
/// o2, n2) is canonical and shared with the feature pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GasReading {
    /// Hydrogen (ppm)
    pub h2: f64,
    /// Methane (ppm)
    pub ch4: f64,
    /// Ethane (ppm)
    pub c2h6: f64,
    /// Ethylene (ppm)
    pub c2h4: f64,
    /// Acetylene (ppm)
    pub c2h2: f64,
    /// Carbon monoxide (ppm)
    pub co: f64,
    /// Carbon dioxide (ppm)
    pub co2: f64,
    /// Oxygen (ppm)
    pub o2: f64,
    /// Nitrogen (ppm)
    pub n2: f64,
}

impl GasReading {
    /// Build a validated reading; every concentration must be finite and non-negative.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        h2: f64,
        ch4: f64,
        c2h6: f64,
        c2h4: f64,
        c2h2: f64,
        co: f64,
        co2: f64,
        o2: f64,
        n2: f64,
    ) -> Result<Self, DomainError> {
        let reading = Self {
            h2,
            ch4,
            c2h6,
            c2h4,
            c2h2,
            co,
            co2,
            o2,
            n2,
        };
        for (gas, value) in reading.iter_gases() {
            if !value.is_finite() || value < 0.0 {
                return Err(DomainError::InvalidGasValue { gas, value });
            }
        }
        Ok(reading)
    }

    /// Field names in canonical order
    pub const fn field_names() -> [&'static str; GAS_COUNT] {
        ["h2", "ch4", "c2h6", "c2h4", "c2h2", "co", "co2", "o2", "n2"]
    }

    /// Descriptive label for a gas field name
    pub fn descriptive_label(field: &str) -> Option<&'static str> {
        match field {
            "h2" => Some("Hydrogen (H2)"),
            "ch4" => Some("Methane (CH4)"),
            "c2h6" => Some("Ethane (C2H6)"),
            "c2h4" => Some("Ethylene (C2H4)"),
            "c2h2" => Some("Acetylene (C2H2)"),
            "co" => Some("Carbon Monoxide (CO)"),
            "co2" => Some("Carbon Dioxide (CO2)"),
            "o2" => Some("Oxygen (O2)"),
            "n2" => Some("Nitrogen (N2)"),
            _ => None,
        }
    }

    /// Concentrations in canonical field order
    pub fn values(&self) -> [f64; GAS_COUNT] {
        [
            self.h2, self.ch4, self.c2h6, self.c2h4, self.c2h2, self.co, self.co2, self.o2,
            self.n2,
        ]
    }

    /// (field name, concentration) pairs in canonical order
    pub fn iter_gases(&self) -> impl Iterator<Item = (&'static str, f64)> {
        Self::field_names().into_iter().zip(self.values())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(h2: f64) -> Result<GasReading, DomainError> {
        GasReading::new(h2, 5.0, 3.0, 2.0, 0.0, 200.0, 1500.0, 20000.0, 55000.0)
    }

    #[test]
    fn test_valid_reading() {
        let r = reading(15.0).unwrap();
        assert_eq!(r.h2, 15.0);
        assert_eq!(r.n2, 55000.0);
    }

    #[test]
    fn test_negative_gas_rejected() {
        let err = reading(-1.0).unwrap_err();
        assert!(matches!(
            err,
            DomainError::InvalidGasValue { gas: "h2", .. }
        ));
    }

    #[test]
    fn test_non_finite_gas_rejected() {
        assert!(reading(f64::NAN).is_err());
        assert!(reading(f64::INFINITY).is_err());
    }

    #[test]
    fn test_value_equality() {
        let a = reading(15.0).unwrap();
        let b = reading(15.0).unwrap();
        let c = reading(16.0).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_canonical_order() {
        let r = GasReading::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0).unwrap();
        assert_eq!(r.values(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
        assert_eq!(GasReading::field_names()[0], "h2");
        assert_eq!(GasReading::field_names()[8], "n2");
    }

    #[test]
    fn test_descriptive_labels() {
        assert_eq!(
            GasReading::descriptive_label("c2h2"),
            Some("Acetylene (C2H2)")
        );
        assert_eq!(GasReading::descriptive_label("xe"), None);
    }

    proptest::proptest! {
        #[test]
        fn prop_non_negative_finite_values_always_construct(
            h2 in 0.0f64..1e6, ch4 in 0.0f64..1e6, c2h6 in 0.0f64..1e6,
            c2h4 in 0.0f64..1e6, c2h2 in 0.0f64..1e6, co in 0.0f64..1e6,
            co2 in 0.0f64..1e6, o2 in 0.0f64..1e6, n2 in 0.0f64..1e6,
        ) {
            let r = GasReading::new(h2, ch4, c2h6, c2h4, c2h2, co, co2, o2, n2).unwrap();
            proptest::prop_assert!(r.values().iter().all(|v| *v >= 0.0));
        }
    }
}
