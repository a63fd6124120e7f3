//! Feature and Label Preparation
//!
//! Converts domain samples into the numeric matrices consumed by the model
//! engine. Labels are generated by the normative consensus when no ground
//! truth exists: the statistical model is deliberately trained to approximate
//! the rule-based consensus (closed-loop labeling), not externally verified
//! diagnoses.

mod dataset;
mod features;

pub use dataset::{prepare_dataset, PreparedDataset};
pub use features::{auto_label, extract_features, feature_names, FEATURE_DIMENSION};
