//! Fault Taxonomy
//!
//! Closed set of nine diagnosable fault categories per IEEE C57.104-2019 and
//! IEC 60599:2022. The declaration order fixes each variant's ordinal, which
//! is the label index used by the statistical model; it is a serialization
//! contract between training and inference and must not be reordered.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fault condition identified through dissolved-gas analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FaultType {
    /// Normal operation, no fault
    N,
    /// Partial discharges (low energy, corona)
    PD,
    /// Low-energy discharges (sparking)
    D1,
    /// High-energy discharges (arcing)
    D2,
    /// Thermal fault < 300 C
    T1,
    /// Thermal fault 300-700 C
    T2,
    /// Thermal fault > 700 C
    T3,
    /// Mixed discharge and thermal fault
    DT,
    /// Overheating of oil/cellulose
    S,
}

impl FaultType {
    /// All variants in ordinal order
    pub const ALL: [FaultType; 9] = [
        FaultType::N,
        FaultType::PD,
        FaultType::D1,
        FaultType::D2,
        FaultType::T1,
        FaultType::T2,
        FaultType::T3,
        FaultType::DT,
        FaultType::S,
    ];

    /// Number of fault categories
    pub const COUNT: usize = 9;

    /// Stable label index used by the statistical model
    pub fn ordinal(self) -> usize {
        match self {
            FaultType::N => 0,
            FaultType::PD => 1,
            FaultType::D1 => 2,
            FaultType::D2 => 3,
            FaultType::T1 => 4,
            FaultType::T2 => 5,
            FaultType::T3 => 6,
            FaultType::DT => 7,
            FaultType::S => 8,
        }
    }

    /// Decode a label index back to its fault type
    pub fn from_ordinal(ordinal: usize) -> Result<Self, DomainError> {
        Self::ALL
            .get(ordinal)
            .copied()
            .ok_or(DomainError::UnknownFaultOrdinal(ordinal))
    }

    /// Short code, e.g. "D1"
    pub fn name(self) -> &'static str {
        match self {
            FaultType::N => "N",
            FaultType::PD => "PD",
            FaultType::D1 => "D1",
            FaultType::D2 => "D2",
            FaultType::T1 => "T1",
            FaultType::T2 => "T2",
            FaultType::T3 => "T3",
            FaultType::DT => "DT",
            FaultType::S => "S",
        }
    }

    /// Human-readable description of the fault condition
    pub fn description(self) -> &'static str {
        match self {
            FaultType::N => "Normal operation",
            FaultType::PD => "Partial discharges",
            FaultType::D1 => "Low-energy discharges",
            FaultType::D2 => "High-energy discharges",
            FaultType::T1 => "Thermal fault < 300 C",
            FaultType::T2 => "Thermal fault 300-700 C",
            FaultType::T3 => "Thermal fault > 700 C",
            FaultType::DT => "Mixed thermal and electrical fault",
            FaultType::S => "Overheating",
        }
    }
}

impl fmt::Display for FaultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.name(), self.description())
    }
}
