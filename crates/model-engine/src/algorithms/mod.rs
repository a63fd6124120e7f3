//! Classification Algorithms
//!
//! Four hand-rolled candidate algorithms with fixed, documented
//! hyperparameters: a bagged tree ensemble, an RBF kernel-density method, a
//! distance-weighted KNN, and a small feed-forward network. Each fits from a
//! standardized feature matrix and predicts distributions over the nine fault
//! labels.

mod forest;
mod kernel;
mod knn;
mod mlp;

pub use forest::{ForestParams, RandomForest};
pub use kernel::{KernelParams, RbfKernel};
pub use knn::{KnnParams, NearestNeighbors};
pub use mlp::{MlpParams, MultiLayerPerceptron};

use crate::N_CLASSES;
use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};

/// Candidate algorithm with its hyperparameters, before fitting
#[derive(Debug, Clone, PartialEq)]
pub enum AlgorithmSpec {
    RandomForest(ForestParams),
    RbfKernel(KernelParams),
    Knn(KnnParams),
    Mlp(MlpParams),
}

impl AlgorithmSpec {
    /// Fit the algorithm on a standardized feature matrix and ordinal labels
    pub fn fit(&self, x: ArrayView2<'_, f64>, y: &[usize]) -> FittedAlgorithm {
        match self {
            AlgorithmSpec::RandomForest(params) => {
                FittedAlgorithm::RandomForest(RandomForest::fit(x, y, params))
            }
            AlgorithmSpec::RbfKernel(params) => {
                FittedAlgorithm::RbfKernel(RbfKernel::fit(x, y, params))
            }
            AlgorithmSpec::Knn(params) => FittedAlgorithm::Knn(NearestNeighbors::fit(x, y, params)),
            AlgorithmSpec::Mlp(params) => {
                FittedAlgorithm::Mlp(MultiLayerPerceptron::fit(x, y, params))
            }
        }
    }
}

/// A fitted algorithm, ready to predict and serialize
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FittedAlgorithm {
    RandomForest(RandomForest),
    RbfKernel(RbfKernel),
    Knn(NearestNeighbors),
    Mlp(MultiLayerPerceptron),
}

impl FittedAlgorithm {
    /// Class distributions, one row of `N_CLASSES` probabilities per input row
    pub fn predict_proba(&self, x: ArrayView2<'_, f64>) -> Vec<[f64; N_CLASSES]> {
        match self {
            FittedAlgorithm::RandomForest(model) => model.predict_proba(x),
            FittedAlgorithm::RbfKernel(model) => model.predict_proba(x),
            FittedAlgorithm::Knn(model) => model.predict_proba(x),
            FittedAlgorithm::Mlp(model) => model.predict_proba(x),
        }
    }

    /// Predicted label ordinals (argmax of the distributions)
    pub fn predict(&self, x: ArrayView2<'_, f64>) -> Vec<usize> {
        self.predict_proba(x).iter().map(|row| argmax(row)).collect()
    }

    /// Whether probability output is part of this algorithm's contract.
    ///
    /// The kernel method only exposes probabilities when configured with
    /// `probability = true`, mirroring its training-time switch.
    pub fn supports_probabilities(&self) -> bool {
        match self {
            FittedAlgorithm::RbfKernel(model) => model.probability_enabled(),
            _ => true,
        }
    }

    /// Algorithm name for diagnostics and error messages
    pub fn name(&self) -> &'static str {
        match self {
            FittedAlgorithm::RandomForest(_) => "Random Forest",
            FittedAlgorithm::RbfKernel(_) => "RBF Kernel",
            FittedAlgorithm::Knn(_) => "KNN",
            FittedAlgorithm::Mlp(_) => "MLP",
        }
    }
}

/// Index of the largest value; ties resolve to the lowest index
pub(crate) fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, value) in values.iter().enumerate().skip(1) {
        if *value > values[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::argmax;

    #[test]
    fn test_argmax_ties_take_lowest_index() {
        assert_eq!(argmax(&[0.2, 0.5, 0.5, 0.1]), 1);
        assert_eq!(argmax(&[1.0]), 0);
    }
}
