//! Oil Sample Entity

use crate::error::DomainError;
use crate::reading::GasReading;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

/// Oil sample taken from a transformer, with its dissolved-gas reading.
///
/// `id` is `None` until the sample has been persisted by the repository
/// collaborator; the core never assigns ids itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Human-readable sample code
    pub sample_code: String,
    /// Owning transformer id (>= 1)
    pub transformer_id: i64,
    /// Date the oil was extracted
    pub extraction_date: NaiveDate,
    /// Chromatography reading for this sample
    pub gas_reading: GasReading,
    /// Date the diagnosis was performed
    pub diagnosis_date: NaiveDate,
    /// Persistent id, assigned by the repository
    pub id: Option<i64>,
}

impl Sample {
    /// Build a validated sample; the diagnosis date defaults to today.
    pub fn new(
        sample_code: impl Into<String>,
        transformer_id: i64,
        extraction_date: NaiveDate,
        gas_reading: GasReading,
    ) -> Result<Self, DomainError> {
        let sample_code = sample_code.into().trim().to_string();
        if sample_code.is_empty() {
            return Err(DomainError::EmptySampleCode);
        }
        if transformer_id < 1 {
            return Err(DomainError::InvalidTransformerId(transformer_id));
        }
        let today = Local::now().date_naive();
        if extraction_date > today {
            return Err(DomainError::FutureExtractionDate(extraction_date));
        }
        Ok(Self {
            sample_code,
            transformer_id,
            extraction_date,
            gas_reading,
            diagnosis_date: today,
            id: None,
        })
    }

    /// Attach a persistent id
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }
}
