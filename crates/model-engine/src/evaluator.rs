//! Out-of-Fold Evaluation

use crate::cross_validation::{cross_val_predict, effective_folds, stratified_folds};
use crate::metrics;
use crate::pipeline::candidate_pipelines;
use crate::trainer::TrainerConfig;
use crate::ModelError;
use dga_domain::{round_to, FaultType};
use feature_prep::PreparedDataset;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Precision, recall and f1 for one fault label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub fault_type: FaultType,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub support: usize,
}

/// Full evaluation of one candidate from its out-of-fold predictions.
///
/// Every sample is predicted by a model that never saw it in training, so the
/// metrics estimate generalization rather than memorization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub name: String,
    pub accuracy: f64,
    pub n_samples: usize,
    pub per_class: Vec<ClassMetrics>,
    pub macro_precision: f64,
    pub macro_recall: f64,
    pub macro_f1: f64,
    pub weighted_precision: f64,
    pub weighted_recall: f64,
    pub weighted_f1: f64,
    /// Labels present in the data, ascending by ordinal; indexes the matrix
    pub labels: Vec<FaultType>,
    /// Rows are truth, columns are predictions, both ordered as `labels`
    pub confusion_matrix: Vec<Vec<usize>>,
}

/// Evaluates every candidate pipeline by stratified out-of-fold prediction
#[derive(Debug, Clone, Default)]
pub struct ModelEvaluator {
    config: TrainerConfig,
}

impl ModelEvaluator {
    pub fn new(config: TrainerConfig) -> Self {
        Self { config }
    }

    /// Evaluate all candidates, sorted by accuracy descending.
    /// All reported metrics are rounded to 4 decimals.
    pub fn evaluate_all(
        &self,
        dataset: &PreparedDataset,
    ) -> Result<Vec<EvaluationResult>, ModelError> {
        let n = dataset.len();
        if n < self.config.n_folds {
            return Err(ModelError::TooFewSamples {
                available: n,
                required: self.config.n_folds,
            });
        }
        let distinct = dataset
            .y
            .iter()
            .collect::<std::collections::BTreeSet<_>>()
            .len();
        if distinct < 2 {
            return Err(ModelError::TooFewClasses { found: distinct });
        }

        let n_folds = effective_folds(&dataset.y, self.config.n_folds);
        let folds = stratified_folds(&dataset.y, n_folds, self.config.seed);

        let mut results: Vec<EvaluationResult> = candidate_pipelines()
            .iter()
            .map(|spec| {
                let preds = cross_val_predict(&spec.algorithm, dataset.x.view(), &dataset.y, &folds);
                let result = summarize(spec.name, &dataset.y, &preds);
                info!(candidate = spec.name, accuracy = result.accuracy, "candidate evaluated");
                result
            })
            .collect();

        results.sort_by(|a, b| b.accuracy.total_cmp(&a.accuracy));
        Ok(results)
    }
}

fn summarize(name: &str, truth: &[usize], preds: &[usize]) -> EvaluationResult {
    let ordinals = metrics::present_labels(truth, preds);
    let labels: Vec<FaultType> = ordinals
        .iter()
        .filter_map(|&o| FaultType::from_ordinal(o).ok())
        .collect();

    let mut per_class = Vec::with_capacity(labels.len());
    let mut precisions = Vec::with_capacity(labels.len());
    let mut recalls = Vec::with_capacity(labels.len());
    let mut f1s = Vec::with_capacity(labels.len());
    let mut supports = Vec::with_capacity(labels.len());
    for (&ordinal, &fault_type) in ordinals.iter().zip(&labels) {
        let (precision, recall, f1, support) = metrics::per_class(truth, preds, ordinal);
        precisions.push(precision);
        recalls.push(recall);
        f1s.push(f1);
        supports.push(support);
        per_class.push(ClassMetrics {
            fault_type,
            precision: round_to(precision, 4),
            recall: round_to(recall, 4),
            f1_score: round_to(f1, 4),
            support,
        });
    }

    EvaluationResult {
        name: name.to_string(),
        accuracy: round_to(metrics::accuracy(truth, preds), 4),
        n_samples: truth.len(),
        macro_precision: round_to(metrics::macro_average(&precisions), 4),
        macro_recall: round_to(metrics::macro_average(&recalls), 4),
        macro_f1: round_to(metrics::macro_average(&f1s), 4),
        weighted_precision: round_to(metrics::weighted_average(&precisions, &supports), 4),
        weighted_recall: round_to(metrics::weighted_average(&recalls, &supports), 4),
        weighted_f1: round_to(metrics::weighted_average(&f1s, &supports), 4),
        confusion_matrix: metrics::confusion_matrix(truth, preds, &ordinals),
        per_class,
        labels,
    }
}
