//! Per-Method Diagnostic Result

use crate::fault::FaultType;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Immutable result produced by one normative diagnostic method.
///
/// `details` carries the method's intermediates (ratios, percentages, codes,
/// applicability flags) for traceability; keys and rounding match what each
/// method documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodResult {
    /// Standardized method identifier, e.g. "IEEE C57.104-2019"
    pub method_name: String,
    /// Fault condition identified by the method
    pub fault_type: FaultType,
    /// Human-readable diagnosis description
    pub description: String,
    /// Diagnostic intermediates keyed by name
    pub details: BTreeMap<String, Value>,
}

impl MethodResult {
    /// Build a result with an empty detail map
    pub fn new(method_name: impl Into<String>, fault_type: FaultType) -> Self {
        Self {
            method_name: method_name.into(),
            fault_type,
            description: String::new(),
            details: BTreeMap::new(),
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add a diagnostic detail
    pub fn with_detail(mut self, key: impl Into<String>, value: Value) -> Self {
        self.details.insert(key.into(), value);
        self
    }
}

impl fmt::Display for MethodResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.method_name,
            self.fault_type.name(),
            self.description
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder() {
        let result = MethodResult::new("Rogers", FaultType::T2)
            .with_description("Thermal fault between 300 and 700 C")
            .with_detail("R1_CH4_H2", json!(2.5))
            .with_detail("applicable", json!(true));

        assert_eq!(result.method_name, "Rogers");
        assert_eq!(result.fault_type, FaultType::T2);
        assert_eq!(result.details["R1_CH4_H2"], json!(2.5));
        assert_eq!(result.to_string(), "[Rogers] T2: Thermal fault between 300 and 700 C");
    }
}
