//! Unified DGA Diagnosis
//!
//! Reconciles the rule-based normative consensus with the statistical
//! classifier's prediction per sample, aggregates agreement statistics across
//! batches, and exposes the engine facade that ties the repository port,
//! trainer, evaluator and classifier together.

mod engine;
mod service;

pub use engine::{AiEngine, EngineConfig};
pub use service::{ComparisonSummary, UnifiedDiagnosisResult, UnifiedDiagnosisService};

use thiserror::Error;

/// Errors surfaced by the unified layer
#[derive(Debug, Error)]
pub enum DiagnosisError {
    /// Training, persistence or inference failure from the model engine
    #[error(transparent)]
    Model(#[from] model_engine::ModelError),

    /// Sample or reading construction failure
    #[error(transparent)]
    Domain(#[from] dga_domain::DomainError),
}
