//! DGA Model Engine
//!
//! Trains, cross-validates, evaluates, persists and applies the statistical
//! fault classifier. Four candidate pipelines (standard scaling + one
//! algorithm each) are compared by stratified cross-validation; the winner is
//! refit on all data and serialized as a single artifact consumed by the
//! inference classifier.
//!
//! All randomness is seeded, so training runs are reproducible.

pub mod algorithms;
mod classifier;
mod cross_validation;
mod evaluator;
mod metrics;
mod pipeline;
mod scaler;
mod trainer;

pub use classifier::FaultClassifier;
pub use cross_validation::{cross_val_predict, cross_val_scores, effective_folds, stratified_folds};
pub use evaluator::{ClassMetrics, EvaluationResult, ModelEvaluator};
pub use pipeline::{candidate_pipelines, FittedPipeline, PipelineSpec};
pub use scaler::StandardScaler;
pub use trainer::{ModelTrainer, TrainedModel, TrainerConfig, TrainingResult};

use std::path::PathBuf;
use thiserror::Error;

/// Number of classification labels (the fault taxonomy size)
pub const N_CLASSES: usize = dga_domain::FaultType::COUNT;

/// Errors from training, persistence and inference
#[derive(Debug, Error)]
pub enum ModelError {
    /// Fewer samples than cross-validation folds
    #[error("{required} samples required for {required}-fold cross-validation, got {available}")]
    TooFewSamples { available: usize, required: usize },

    /// Training data contains fewer than two distinct labels
    #[error("at least 2 distinct classes required for training, found {found}")]
    TooFewClasses { found: usize },

    /// No model artifact at the expected location
    #[error("no trained model found at {path}")]
    ModelNotFound { path: PathBuf },

    /// Probability output requested from an algorithm that does not expose it
    #[error("algorithm '{algorithm}' does not support probability output")]
    ProbabilitiesNotSupported { algorithm: String },

    /// Artifact encoding/decoding failure
    #[error("model serialization failed: {0}")]
    Serialization(String),

    /// Artifact I/O failure
    #[error("model artifact I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
