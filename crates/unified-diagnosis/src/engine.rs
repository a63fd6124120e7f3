//! AI Engine Facade

use crate::DiagnosisError;
use dga_domain::{FaultType, GasReading, SampleRepository};
use feature_prep::{prepare_dataset, PreparedDataset};
use model_engine::{
    EvaluationResult, FaultClassifier, ModelEvaluator, ModelTrainer, TrainerConfig, TrainingResult,
};
use normative_engine::NormativeDiagnosisService;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Engine configuration
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Directory holding the model artifact
    pub model_dir: PathBuf,
    /// Artifact file name within `model_dir`
    pub model_file: String,
    /// Requested cross-validation folds
    pub n_folds: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            model_file: "fault_classifier.bin".to_string(),
            n_folds: 5,
        }
    }
}

impl EngineConfig {
    fn model_path(&self) -> PathBuf {
        self.model_dir.join(&self.model_file)
    }
}

/// Facade over the repository port, trainer, evaluator and inference
/// classifier.
///
/// Owns the single artifact location: training writes it, classification
/// reads it, and a successful training run refreshes the classifier's cached
/// snapshot so subsequent predictions use the new winner.
pub struct AiEngine {
    repository: Arc<dyn SampleRepository>,
    normative: NormativeDiagnosisService,
    trainer: ModelTrainer,
    evaluator: ModelEvaluator,
    classifier: Arc<FaultClassifier>,
    model_path: PathBuf,
}

impl AiEngine {
    pub fn new(repository: Arc<dyn SampleRepository>, config: EngineConfig) -> Self {
        let model_path = config.model_path();
        let trainer_config = TrainerConfig {
            n_folds: config.n_folds,
            ..TrainerConfig::default()
        };
        Self {
            repository,
            normative: NormativeDiagnosisService::new(),
            trainer: ModelTrainer::new(trainer_config.clone()),
            evaluator: ModelEvaluator::new(trainer_config),
            classifier: Arc::new(FaultClassifier::new(model_path.clone())),
            model_path,
        }
    }

    /// All repository samples as a consensus-labeled dataset
    pub fn prepare_data(&self) -> PreparedDataset {
        let samples = self.repository.get_all();
        prepare_dataset(&samples, Some(&self.normative))
    }

    /// Train all candidates on the repository data, persist the winner and
    /// refresh the inference cache
    pub fn train(&self) -> Result<TrainingResult, DiagnosisError> {
        let dataset = self.prepare_data();
        let result = self.trainer.train_and_save(&dataset, &self.model_path)?;
        self.classifier.refresh();
        if let Some(best) = result.best() {
            info!(winner = %best.name, cv_accuracy = best.cv_accuracy, "engine retrained");
        }
        Ok(result)
    }

    /// Out-of-fold evaluation of every candidate, best first
    pub fn evaluate_all(&self) -> Result<Vec<EvaluationResult>, DiagnosisError> {
        let dataset = self.prepare_data();
        Ok(self.evaluator.evaluate_all(&dataset)?)
    }

    /// Predicted fault for one reading
    pub fn classify(&self, reading: &GasReading) -> Result<FaultType, DiagnosisError> {
        Ok(self.classifier.classify(reading)?)
    }

    /// Predicted fault plus the full probability distribution
    pub fn classify_with_probabilities(
        &self,
        reading: &GasReading,
    ) -> Result<(FaultType, BTreeMap<FaultType, f64>), DiagnosisError> {
        Ok(self.classifier.classify_with_probabilities(reading)?)
    }

    /// Predicted faults for a batch of readings
    pub fn classify_batch(&self, readings: &[GasReading]) -> Result<Vec<FaultType>, DiagnosisError> {
        Ok(self.classifier.classify_batch(readings)?)
    }

    /// Whether a trained artifact is available
    pub fn has_model(&self) -> bool {
        self.classifier.has_model()
    }

    /// Location of the model artifact
    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    /// The shared inference classifier, for wiring a
    /// [`UnifiedDiagnosisService`](crate::UnifiedDiagnosisService)
    pub fn classifier(&self) -> Arc<FaultClassifier> {
        Arc::clone(&self.classifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UnifiedDiagnosisService;
    use chrono::NaiveDate;
    use dga_domain::Sample;
    use model_engine::ModelError;
    use tempfile::tempdir;

    /// In-memory repository double
    struct InMemoryRepository {
        samples: Vec<Sample>,
    }

    impl SampleRepository for InMemoryRepository {
        fn get_all(&self) -> Vec<Sample> {
            self.samples.clone()
        }

        fn get_by_id(&self, id: i64) -> Option<Sample> {
            self.samples.iter().find(|s| s.id == Some(id)).cloned()
        }

        fn get_by_transformer(&self, transformer_id: i64) -> Vec<Sample> {
            self.samples
                .iter()
                .filter(|s| s.transformer_id == transformer_id)
                .cloned()
                .collect()
        }
    }

    fn sample(id: i64, code: &str, h2: f64, c2h2: f64) -> Sample {
        let reading =
            GasReading::new(h2, 5.0, 3.0, 2.0, c2h2, 200.0, 1500.0, 20000.0, 55000.0).unwrap();
        Sample::new(
            code,
            1 + id % 2,
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            reading,
        )
        .unwrap()
        .with_id(id)
    }

    fn repository() -> Arc<InMemoryRepository> {
        let mut samples = Vec::new();
        for i in 0..8 {
            samples.push(sample(i * 2 + 1, &format!("N-{i}"), 10.0 + i as f64, 0.0));
            samples.push(sample(i * 2 + 2, &format!("F-{i}"), 2000.0 + i as f64, 500.0));
        }
        Arc::new(InMemoryRepository { samples })
    }

    fn engine_in(dir: &Path) -> AiEngine {
        let config = EngineConfig {
            model_dir: dir.to_path_buf(),
            n_folds: 3,
            ..EngineConfig::default()
        };
        AiEngine::new(repository(), config)
    }

    #[test]
    fn test_prepare_data_labels_from_consensus() {
        let dir = tempdir().unwrap();
        let engine = engine_in(dir.path());
        let dataset = engine.prepare_data();
        assert_eq!(dataset.len(), 16);
        // The two gas signatures land on different consensus labels
        let distinct: std::collections::BTreeSet<_> = dataset.y.iter().collect();
        assert!(distinct.len() >= 2);
    }

    #[test]
    fn test_classify_before_training_is_availability_error() {
        let dir = tempdir().unwrap();
        let engine = engine_in(dir.path());
        assert!(!engine.has_model());
        let reading =
            GasReading::new(15.0, 5.0, 3.0, 2.0, 0.0, 200.0, 1500.0, 20000.0, 55000.0).unwrap();
        let err = engine.classify(&reading).unwrap_err();
        assert!(matches!(
            err,
            DiagnosisError::Model(ModelError::ModelNotFound { .. })
        ));
    }

    #[test]
    fn test_train_then_classify() {
        let dir = tempdir().unwrap();
        let engine = engine_in(dir.path());

        let result = engine.train().unwrap();
        assert_eq!(result.models.len(), 4);
        assert!(engine.has_model());
        assert!(engine.model_path().exists());

        let normal =
            GasReading::new(12.0, 5.0, 3.0, 2.0, 0.0, 200.0, 1500.0, 20000.0, 55000.0).unwrap();
        let faulty =
            GasReading::new(2100.0, 5.0, 3.0, 2.0, 500.0, 200.0, 1500.0, 20000.0, 55000.0)
                .unwrap();
        let faults = engine.classify_batch(&[normal, faulty]).unwrap();
        assert_eq!(faults.len(), 2);
        assert_ne!(faults[0], faults[1]);
    }

    #[test]
    fn test_evaluate_all_sorted_by_accuracy() {
        let dir = tempdir().unwrap();
        let engine = engine_in(dir.path());
        let results = engine.evaluate_all().unwrap();
        assert_eq!(results.len(), 4);
        for pair in results.windows(2) {
            assert!(pair[0].accuracy >= pair[1].accuracy);
        }
    }

    #[test]
    fn test_engine_wires_the_unified_service() {
        let dir = tempdir().unwrap();
        let engine = engine_in(dir.path());
        engine.train().unwrap();

        let service =
            UnifiedDiagnosisService::new(NormativeDiagnosisService::new(), engine.classifier());
        let summary = service.compare(&repository().get_all()).unwrap();
        assert_eq!(summary.total, 16);
        assert!(summary.agreement_pct > 0.0);
    }
}
