//! Candidate Pipelines and the Persisted Artifact

use crate::algorithms::{
    AlgorithmSpec, FittedAlgorithm, ForestParams, KernelParams, KnnParams, MlpParams,
};
use crate::scaler::StandardScaler;
use crate::{ModelError, N_CLASSES};
use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// A named, unfitted candidate: standard scaling followed by one algorithm
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSpec {
    pub name: &'static str,
    pub algorithm: AlgorithmSpec,
}

/// The four candidates compared during training, in evaluation order
pub fn candidate_pipelines() -> Vec<PipelineSpec> {
    vec![
        PipelineSpec {
            name: "Random Forest",
            algorithm: AlgorithmSpec::RandomForest(ForestParams::default()),
        },
        PipelineSpec {
            name: "RBF Kernel",
            algorithm: AlgorithmSpec::RbfKernel(KernelParams::default()),
        },
        PipelineSpec {
            name: "KNN",
            algorithm: AlgorithmSpec::Knn(KnnParams::default()),
        },
        PipelineSpec {
            name: "MLP",
            algorithm: AlgorithmSpec::Mlp(MlpParams::default()),
        },
    ]
}

/// A fitted scaler + algorithm pair, the unit that gets persisted and later
/// loaded for inference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedPipeline {
    pub name: String,
    scaler: StandardScaler,
    algorithm: FittedAlgorithm,
}

impl FittedPipeline {
    /// Fit the scaler on raw features, then the algorithm on standardized ones
    pub fn fit(spec: &PipelineSpec, x: ArrayView2<'_, f64>, y: &[usize]) -> Self {
        let (scaler, z) = StandardScaler::fit_transform(x);
        let algorithm = spec.algorithm.fit(z.view(), y);
        Self {
            name: spec.name.to_string(),
            scaler,
            algorithm,
        }
    }

    /// Predicted label ordinals for raw (unstandardized) feature rows
    pub fn predict(&self, x: ArrayView2<'_, f64>) -> Vec<usize> {
        let z = self.scaler.transform(x);
        self.algorithm.predict(z.view())
    }

    /// Class distributions for raw feature rows.
    ///
    /// Fails when the fitted algorithm does not expose probabilities; check
    /// [`supports_probabilities`](Self::supports_probabilities) first.
    pub fn predict_proba(
        &self,
        x: ArrayView2<'_, f64>,
    ) -> Result<Vec<[f64; N_CLASSES]>, ModelError> {
        if !self.algorithm.supports_probabilities() {
            return Err(ModelError::ProbabilitiesNotSupported {
                algorithm: self.algorithm.name().to_string(),
            });
        }
        let z = self.scaler.transform(x);
        Ok(self.algorithm.predict_proba(z.view()))
    }

    /// Whether probability queries will succeed on this pipeline
    pub fn supports_probabilities(&self) -> bool {
        self.algorithm.supports_probabilities()
    }

    /// Serialize to a binary artifact on disk
    pub fn save(&self, path: &Path) -> Result<(), ModelError> {
        let bytes = postcard::to_allocvec(self)
            .map_err(|e| ModelError::Serialization(e.to_string()))?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, &bytes)?;
        info!(path = %path.display(), bytes = bytes.len(), "model artifact saved");
        Ok(())
    }

    /// Load a previously saved artifact
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        if !path.exists() {
            return Err(ModelError::ModelNotFound {
                path: path.to_path_buf(),
            });
        }
        let bytes = fs::read(path)?;
        postcard::from_bytes(&bytes).map_err(|e| ModelError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;
    use tempfile::tempdir;

    fn blobs() -> (Array2<f64>, Vec<usize>) {
        let mut rows = Vec::new();
        let mut y = Vec::new();
        for i in 0..10 {
            let jitter = (i % 5) as f64 * 0.02;
            rows.extend_from_slice(&[0.0 + jitter, 1.0]);
            y.push(0);
            rows.extend_from_slice(&[8.0 + jitter, -3.0]);
            y.push(2);
        }
        (Array2::from_shape_vec((20, 2), rows).unwrap(), y)
    }

    #[test]
    fn test_candidates_in_evaluation_order() {
        let names: Vec<&str> = candidate_pipelines().iter().map(|p| p.name).collect();
        assert_eq!(names, ["Random Forest", "RBF Kernel", "KNN", "MLP"]);
    }

    #[test]
    fn test_save_load_round_trip() {
        let (x, y) = blobs();
        let spec = PipelineSpec {
            name: "KNN",
            algorithm: AlgorithmSpec::Knn(KnnParams::default()),
        };
        let fitted = FittedPipeline::fit(&spec, x.view(), &y);

        let dir = tempdir().unwrap();
        let path = dir.path().join("models").join("fault.bin");
        fitted.save(&path).unwrap();

        let loaded = FittedPipeline::load(&path).unwrap();
        assert_eq!(loaded, fitted);
        assert_eq!(loaded.predict(x.view()), fitted.predict(x.view()));
    }

    #[test]
    fn test_load_missing_artifact() {
        let dir = tempdir().unwrap();
        let err = FittedPipeline::load(&dir.path().join("absent.bin")).unwrap_err();
        assert!(matches!(err, ModelError::ModelNotFound { .. }));
    }

    #[test]
    fn test_probability_refusal_when_disabled() {
        let (x, y) = blobs();
        let spec = PipelineSpec {
            name: "RBF Kernel",
            algorithm: AlgorithmSpec::RbfKernel(KernelParams {
                probability: false,
                ..KernelParams::default()
            }),
        };
        let fitted = FittedPipeline::fit(&spec, x.view(), &y);
        assert!(!fitted.supports_probabilities());
        let err = fitted.predict_proba(x.view()).unwrap_err();
        assert!(matches!(err, ModelError::ProbabilitiesNotSupported { .. }));
        // Plain prediction still works
        assert_eq!(fitted.predict(x.view()).len(), 20);
    }
}
