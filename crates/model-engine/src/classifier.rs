//! Inference Classifier

use crate::pipeline::FittedPipeline;
use crate::{ModelError, N_CLASSES};
use dga_domain::{round_to, FaultType, GasReading};
use feature_prep::{extract_features, FEATURE_DIMENSION};
use ndarray::Array2;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

/// Applies the persisted winning pipeline to gas readings.
///
/// The pipeline is loaded lazily on first use and cached behind a read lock,
/// so concurrent classification shares one immutable snapshot. `refresh`
/// swaps the snapshot after retraining; in-flight calls keep the old one.
#[derive(Debug)]
pub struct FaultClassifier {
    model_path: PathBuf,
    cache: RwLock<Option<Arc<FittedPipeline>>>,
}

impl FaultClassifier {
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            cache: RwLock::new(None),
        }
    }

    /// Where the model artifact is expected on disk
    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    /// Whether a model artifact exists, without loading it
    pub fn has_model(&self) -> bool {
        self.cache
            .read()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
            || self.model_path.exists()
    }

    /// Whether the loaded (or loadable) pipeline exposes probabilities
    pub fn supports_probabilities(&self) -> Result<bool, ModelError> {
        Ok(self.pipeline()?.supports_probabilities())
    }

    /// Drop the cached snapshot so the next call reloads from disk
    pub fn refresh(&self) {
        if let Ok(mut guard) = self.cache.write() {
            *guard = None;
            debug!("classifier cache invalidated");
        }
    }

    /// Predicted fault for one reading
    pub fn classify(&self, reading: &GasReading) -> Result<FaultType, ModelError> {
        let pipeline = self.pipeline()?;
        let x = feature_matrix(std::slice::from_ref(reading));
        // One input row yields exactly one prediction
        let ordinal = pipeline.predict(x.view()).first().copied().unwrap_or(0);
        FaultType::from_ordinal(ordinal).map_err(|e| ModelError::Serialization(e.to_string()))
    }

    /// Predicted fault plus a probability over all nine labels, each value
    /// rounded to 4 decimals
    pub fn classify_with_probabilities(
        &self,
        reading: &GasReading,
    ) -> Result<(FaultType, BTreeMap<FaultType, f64>), ModelError> {
        let pipeline = self.pipeline()?;
        let x = feature_matrix(std::slice::from_ref(reading));
        let probs = pipeline.predict_proba(x.view())?;
        let row = probs.first().copied().unwrap_or([0.0; N_CLASSES]);

        let mut best = FaultType::N;
        let mut best_p = f64::NEG_INFINITY;
        let mut distribution = BTreeMap::new();
        for fault in FaultType::ALL {
            let p = row[fault.ordinal()];
            distribution.insert(fault, round_to(p, 4));
            if p > best_p {
                best_p = p;
                best = fault;
            }
        }
        Ok((best, distribution))
    }

    /// Predicted faults for a batch of readings; empty in, empty out
    pub fn classify_batch(&self, readings: &[GasReading]) -> Result<Vec<FaultType>, ModelError> {
        if readings.is_empty() {
            return Ok(Vec::new());
        }
        let pipeline = self.pipeline()?;
        let x = feature_matrix(readings);
        pipeline
            .predict(x.view())
            .into_iter()
            .map(|ordinal| {
                FaultType::from_ordinal(ordinal)
                    .map_err(|e| ModelError::Serialization(e.to_string()))
            })
            .collect()
    }

    fn pipeline(&self) -> Result<Arc<FittedPipeline>, ModelError> {
        if let Ok(guard) = self.cache.read() {
            if let Some(pipeline) = guard.as_ref() {
                return Ok(Arc::clone(pipeline));
            }
        }

        let loaded = Arc::new(FittedPipeline::load(&self.model_path)?);
        info!(model = %loaded.name, path = %self.model_path.display(), "model loaded");
        if let Ok(mut guard) = self.cache.write() {
            // Another thread may have loaded concurrently; keep its snapshot
            if let Some(existing) = guard.as_ref() {
                return Ok(Arc::clone(existing));
            }
            *guard = Some(Arc::clone(&loaded));
        }
        Ok(loaded)
    }
}

fn feature_matrix(readings: &[GasReading]) -> Array2<f64> {
    let mut values = Vec::with_capacity(readings.len() * FEATURE_DIMENSION);
    for reading in readings {
        values.extend_from_slice(&extract_features(reading));
    }
    Array2::from_shape_vec((readings.len(), FEATURE_DIMENSION), values)
        .expect("row-major gas values match the matrix shape")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::{AlgorithmSpec, KnnParams};
    use crate::pipeline::PipelineSpec;
    use ndarray::Array2;
    use tempfile::tempdir;

    fn reading(h2: f64) -> GasReading {
        GasReading::new(h2, 5.0, 3.0, 2.0, 0.0, 200.0, 1500.0, 20000.0, 55000.0).unwrap()
    }

    fn trained_artifact(path: &Path) {
        // Two clusters split on hydrogen: low -> N (0), high -> D2 (3)
        let mut rows = Vec::new();
        let mut y = Vec::new();
        for i in 0..5 {
            let base = reading(10.0 + i as f64);
            rows.extend_from_slice(&base.values());
            y.push(0);
            let high = reading(2000.0 + i as f64);
            rows.extend_from_slice(&high.values());
            y.push(3);
        }
        let x = Array2::from_shape_vec((10, 9), rows).unwrap();
        let spec = PipelineSpec {
            name: "KNN",
            algorithm: AlgorithmSpec::Knn(KnnParams::default()),
        };
        FittedPipeline::fit(&spec, x.view(), &y).save(path).unwrap();
    }

    #[test]
    fn test_classify_without_model() {
        let dir = tempdir().unwrap();
        let classifier = FaultClassifier::new(dir.path().join("absent.bin"));
        assert!(!classifier.has_model());
        let err = classifier.classify(&reading(10.0)).unwrap_err();
        assert!(matches!(err, ModelError::ModelNotFound { .. }));
    }

    #[test]
    fn test_classify_and_probabilities() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fault.bin");
        trained_artifact(&path);

        let classifier = FaultClassifier::new(&path);
        assert!(classifier.has_model());
        assert_eq!(classifier.classify(&reading(12.0)).unwrap(), FaultType::N);
        assert_eq!(classifier.classify(&reading(2100.0)).unwrap(), FaultType::D2);

        let (fault, probs) = classifier.classify_with_probabilities(&reading(12.0)).unwrap();
        assert_eq!(fault, FaultType::N);
        assert_eq!(probs.len(), 9);
        let sum: f64 = probs.values().sum();
        assert!((sum - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_empty_batch() {
        let dir = tempdir().unwrap();
        // No artifact needed: an empty batch never touches the model
        let classifier = FaultClassifier::new(dir.path().join("absent.bin"));
        assert_eq!(classifier.classify_batch(&[]).unwrap(), Vec::new());
    }

    #[test]
    fn test_refresh_picks_up_new_artifact() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fault.bin");
        trained_artifact(&path);

        let classifier = FaultClassifier::new(&path);
        assert_eq!(classifier.classify(&reading(12.0)).unwrap(), FaultType::N);

        // Overwrite with a model that labels everything D2
        let mut rows = Vec::new();
        let mut y = Vec::new();
        for i in 0..6 {
            rows.extend_from_slice(&reading(10.0 + i as f64).values());
            y.push(if i < 3 { 3 } else { 6 });
        }
        let x = Array2::from_shape_vec((6, 9), rows).unwrap();
        let spec = PipelineSpec {
            name: "KNN",
            algorithm: AlgorithmSpec::Knn(KnnParams { k: 1 }),
        };
        FittedPipeline::fit(&spec, x.view(), &y).save(&path).unwrap();

        // Cached snapshot still answers until refreshed
        assert_eq!(classifier.classify(&reading(12.0)).unwrap(), FaultType::N);
        classifier.refresh();
        assert_ne!(classifier.classify(&reading(12.0)).unwrap(), FaultType::N);
    }
}
