//! Dataset Preparation

use crate::features::{auto_label, extract_features, feature_names, FEATURE_DIMENSION};
use dga_domain::{FaultType, Sample};
use ndarray::Array2;
use normative_engine::NormativeDiagnosisService;
use tracing::debug;

/// Numeric dataset ready for training or prediction
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedDataset {
    /// Feature matrix, one row per sample, columns in canonical gas order
    pub x: Array2<f64>,
    /// Label vector: `FaultType` ordinals, aligned with the rows of `x`
    pub y: Vec<usize>,
    /// Textual labels corresponding to `y`
    pub fault_labels: Vec<&'static str>,
    /// Feature column names
    pub feature_names: [&'static str; FEATURE_DIMENSION],
    /// Persistent ids of the source samples, for traceability
    pub sample_ids: Vec<Option<i64>>,
}

impl PreparedDataset {
    /// Number of rows
    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }
}

/// Build a feature matrix and label vector from samples.
///
/// With a consensus service the labels come from the majority vote of the six
/// normative methods, so the trained model approximates the rule-based
/// consensus rather than external ground truth. Without one, every row is
/// labeled `N`; used in prediction-only contexts where labels are irrelevant.
pub fn prepare_dataset(
    samples: &[Sample],
    service: Option<&NormativeDiagnosisService>,
) -> PreparedDataset {
    if samples.is_empty() {
        return PreparedDataset {
            x: Array2::zeros((0, FEATURE_DIMENSION)),
            y: Vec::new(),
            fault_labels: Vec::new(),
            feature_names: feature_names(),
            sample_ids: Vec::new(),
        };
    }

    let mut values = Vec::with_capacity(samples.len() * FEATURE_DIMENSION);
    let mut y = Vec::with_capacity(samples.len());
    let mut fault_labels = Vec::with_capacity(samples.len());
    let mut sample_ids = Vec::with_capacity(samples.len());

    for sample in samples {
        values.extend_from_slice(&extract_features(&sample.gas_reading));
        sample_ids.push(sample.id);

        let fault = match service {
            Some(service) => auto_label(&sample.gas_reading, service),
            None => FaultType::N,
        };
        y.push(fault.ordinal());
        fault_labels.push(fault.name());
    }

    let x = Array2::from_shape_vec((samples.len(), FEATURE_DIMENSION), values)
        .expect("row-major gas values match the matrix shape");
    debug!(rows = samples.len(), "prepared dataset");

    PreparedDataset {
        x,
        y,
        fault_labels,
        feature_names: feature_names(),
        sample_ids,
    }
}
