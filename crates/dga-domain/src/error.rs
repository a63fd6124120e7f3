//! Domain Error Types

use thiserror::Error;

/// Errors raised when constructing domain values
#[derive(Debug, Clone, Error)]
pub enum DomainError {
    /// Gas concentration is negative or not a finite number
    #[error("gas '{gas}' has invalid concentration {value} ppm (must be finite and non-negative)")]
    InvalidGasValue { gas: &'static str, value: f64 },

    /// Sample code is empty after trimming
    #[error("sample code must not be empty")]
    EmptySampleCode,

    /// Transformer id must be a positive integer
    #[error("transformer id {0} is invalid (must be >= 1)")]
    InvalidTransformerId(i64),

    /// Extraction date lies in the future
    #[error("extraction date {0} is in the future")]
    FutureExtractionDate(chrono::NaiveDate),

    /// No fault type exists for the given label ordinal
    #[error("unknown fault ordinal {0} (valid range 0..=8)")]
    UnknownFaultOrdinal(usize),
}
