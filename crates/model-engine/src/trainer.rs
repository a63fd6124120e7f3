//! Candidate Training and Selection

use crate::cross_validation::{cross_val_scores, effective_folds, stratified_folds};
use crate::pipeline::{candidate_pipelines, FittedPipeline};
use crate::ModelError;
use dga_domain::round_to;
use feature_prep::PreparedDataset;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Training run configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainerConfig {
    /// Requested cross-validation folds; capped by the smallest class
    pub n_folds: usize,
    /// Seed for fold shuffling
    pub seed: u64,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self { n_folds: 5, seed: 42 }
    }
}

/// One candidate after cross-validation and a full-data refit
#[derive(Debug, Clone, PartialEq)]
pub struct TrainedModel {
    pub name: String,
    pub pipeline: FittedPipeline,
    /// Mean fold accuracy, rounded to 4 decimals
    pub cv_accuracy: f64,
    /// Fold accuracy standard deviation, rounded to 4 decimals
    pub cv_std: f64,
    pub cv_scores: Vec<f64>,
}

/// All candidates from one training run, best first
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingResult {
    pub models: Vec<TrainedModel>,
    /// Folds actually used after capping
    pub n_folds: usize,
}

impl TrainingResult {
    /// The winning candidate (highest cross-validated accuracy)
    pub fn best(&self) -> Option<&TrainedModel> {
        self.models.first()
    }
}

/// Compares the candidate pipelines by stratified cross-validation, then
/// refits every candidate on the full dataset
#[derive(Debug, Clone, Default)]
pub struct ModelTrainer {
    config: TrainerConfig,
}

impl ModelTrainer {
    pub fn new(config: TrainerConfig) -> Self {
        Self { config }
    }

    /// Cross-validate and refit all candidates, best first.
    ///
    /// Ties in rounded accuracy keep evaluation order, so the earlier
    /// candidate wins.
    pub fn train_all(&self, dataset: &PreparedDataset) -> Result<TrainingResult, ModelError> {
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
        info!(samples = n, classes = distinct, n_folds, "training candidates");

        let mut models: Vec<TrainedModel> = candidate_pipelines()
            .iter()
            .map(|spec| {
                let scores = cross_val_scores(&spec.algorithm, dataset.x.view(), &dataset.y, &folds);
                let mean = scores.iter().sum::<f64>() / scores.len().max(1) as f64;
                let var = scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>()
                    / scores.len().max(1) as f64;
                let pipeline = FittedPipeline::fit(spec, dataset.x.view(), &dataset.y);
                info!(candidate = spec.name, cv_accuracy = mean, "candidate scored");
                TrainedModel {
                    name: spec.name.to_string(),
                    pipeline,
                    cv_accuracy: round_to(mean, 4),
                    cv_std: round_to(var.sqrt(), 4),
                    cv_scores: scores,
                }
            })
            .collect();

        models.sort_by(|a, b| b.cv_accuracy.total_cmp(&a.cv_accuracy));

        Ok(TrainingResult { models, n_folds })
    }

    /// Train, pick the winner and persist it in one step
    pub fn train_and_save(
        &self,
        dataset: &PreparedDataset,
        path: &Path,
    ) -> Result<TrainingResult, ModelError> {
        let result = self.train_all(dataset)?;
        if let Some(best) = result.best() {
            best.pipeline.save(path)?;
            info!(winner = %best.name, cv_accuracy = best.cv_accuracy, "best model persisted");
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feature_prep::PreparedDataset;
    use ndarray::Array2;
    use tempfile::tempdir;

    fn dataset(samples_per_class: usize) -> PreparedDataset {
        // Three tight gas-like clusters, one per fault ordinal 0/2/5
        let mut rows = Vec::new();
        let mut y = Vec::new();
        for i in 0..samples_per_class {
            let jitter = (i % 5) as f64 * 0.1;
            for (center, label) in [(10.0, 0usize), (300.0, 2), (900.0, 5)] {
                let mut row = vec![center + jitter; 9];
                row[0] += label as f64;
                rows.extend_from_slice(&row);
                y.push(label);
            }
        }
        let n = y.len();
        PreparedDataset {
            x: Array2::from_shape_vec((n, 9), rows).unwrap(),
            y,
            fault_labels: Vec::new(),
            feature_names: feature_prep::feature_names(),
            sample_ids: vec![None; n],
        }
    }

    #[test]
    fn test_train_all_ranks_candidates() {
        let trainer = ModelTrainer::new(TrainerConfig { n_folds: 3, seed: 42 });
        let result = trainer.train_all(&dataset(6)).unwrap();
        assert_eq!(result.models.len(), 4);
        assert_eq!(result.n_folds, 3);
        for pair in result.models.windows(2) {
            assert!(pair[0].cv_accuracy >= pair[1].cv_accuracy);
        }
        // Clusters are trivially separable, so the winner scores perfectly
        let best = result.best().unwrap();
        assert_eq!(best.cv_accuracy, 1.0);
    }

    #[test]
    fn test_too_few_samples() {
        let mut data = dataset(1);
        data.x = data.x.slice(ndarray::s![..2, ..]).to_owned();
        data.y.truncate(2);
        data.sample_ids.truncate(2);
        let trainer = ModelTrainer::default();
        let err = trainer.train_all(&data).unwrap_err();
        assert!(matches!(
            err,
            ModelError::TooFewSamples { available: 2, required: 5 }
        ));
    }

    #[test]
    fn test_single_class_is_rejected() {
        let mut data = dataset(3);
        for label in &mut data.y {
            *label = 0;
        }
        let trainer = ModelTrainer::new(TrainerConfig { n_folds: 3, seed: 42 });
        let err = trainer.train_all(&data).unwrap_err();
        assert!(matches!(err, ModelError::TooFewClasses { found: 1 }));
    }

    #[test]
    fn test_train_and_save_persists_winner() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fault.bin");
        let trainer = ModelTrainer::new(TrainerConfig { n_folds: 3, seed: 42 });
        let result = trainer.train_and_save(&dataset(6), &path).unwrap();

        let loaded = FittedPipeline::load(&path).unwrap();
        assert_eq!(loaded, result.best().unwrap().pipeline);
    }
}
