//! RBF Kernel-Density Classifier

use crate::N_CLASSES;
use ndarray::{Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

/// Kernel bandwidth selection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Gamma {
    /// 1 / (n_features * variance of the training matrix)
    Scale,
    /// Fixed value
    Value(f64),
}

/// Kernel-method hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KernelParams {
    pub gamma: Gamma,
    /// Whether probability output is part of the fitted model's contract.
    /// When false, `predict` works but probability queries are refused
    /// upstream, mirroring kernel classifiers whose probability support is a
    /// training-time switch.
    pub probability: bool,
}

impl Default for KernelParams {
    fn default() -> Self {
        Self {
            gamma: Gamma::Scale,
            probability: true,
        }
    }
}

/// Parzen-window classifier with a Gaussian kernel.
///
/// Scores each class by the summed RBF similarity between the query point and
/// that class's training points; probabilities are the normalized scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RbfKernel {
    x: Array2<f64>,
    y: Vec<usize>,
    gamma: f64,
    probability: bool,
    /// Class priors, the fallback distribution when all kernels underflow
    priors: Vec<f64>,
}

impl RbfKernel {
    /// Memorize the training data and resolve the bandwidth
    pub fn fit(x: ArrayView2<'_, f64>, y: &[usize], params: &KernelParams) -> Self {
        let gamma = match params.gamma {
            Gamma::Value(value) => value,
            Gamma::Scale => {
                let n = (x.nrows() * x.ncols()).max(1) as f64;
                let mean = x.sum() / n;
                let var = x.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
                if var > 0.0 {
                    1.0 / (x.ncols() as f64 * var)
                } else {
                    1.0
                }
            }
        };

        let mut priors = vec![0.0; N_CLASSES];
        for &label in y {
            priors[label] += 1.0;
        }
        let total = y.len().max(1) as f64;
        for p in &mut priors {
            *p /= total;
        }

        Self {
            x: x.to_owned(),
            y: y.to_vec(),
            gamma,
            probability: params.probability,
            priors,
        }
    }

    /// Whether the model was fitted with probability output enabled
    pub fn probability_enabled(&self) -> bool {
        self.probability
    }

    /// Normalized kernel-density scores per class
    pub fn predict_proba(&self, x: ArrayView2<'_, f64>) -> Vec<[f64; N_CLASSES]> {
        x.outer_iter().map(|row| self.score_row(row)).collect()
    }

    fn score_row(&self, row: ArrayView1<'_, f64>) -> [f64; N_CLASSES] {
        let mut scores = [0.0; N_CLASSES];
        for (train_row, &label) in self.x.outer_iter().zip(&self.y) {
            let dist_sq: f64 = train_row
                .iter()
                .zip(row.iter())
                .map(|(a, b)| (a - b).powi(2))
                .sum();
            scores[label] += (-self.gamma * dist_sq).exp();
        }

        let total: f64 = scores.iter().sum();
        if total > 0.0 {
            for s in &mut scores {
                *s /= total;
            }
        } else {
            // Every kernel underflowed: fall back to the training priors
            for (s, p) in scores.iter_mut().zip(&self.priors) {
                *s = *p;
            }
        }
        scores
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_nearest_cluster_wins() {
        let x = array![[0.0, 0.0], [0.1, 0.0], [5.0, 5.0], [5.1, 5.0]];
        let y = vec![0, 0, 2, 2];
        let model = RbfKernel::fit(x.view(), &y, &KernelParams::default());

        let probs = model.predict_proba(array![[0.05, 0.0], [5.05, 5.0]].view());
        assert!(probs[0][0] > 0.9);
        assert!(probs[1][2] > 0.9);
    }

    #[test]
    fn test_probability_switch() {
        let x = array![[0.0], [1.0]];
        let y = vec![0, 1];
        let on = RbfKernel::fit(x.view(), &y, &KernelParams::default());
        let off = RbfKernel::fit(
            x.view(),
            &y,
            &KernelParams {
                probability: false,
                ..KernelParams::default()
            },
        );
        assert!(on.probability_enabled());
        assert!(!off.probability_enabled());
    }

    #[test]
    fn test_underflow_falls_back_to_priors() {
        let x = array![[0.0], [0.0], [0.0], [1.0]];
        let y = vec![0, 0, 0, 1];
        let model = RbfKernel::fit(
            x.view(),
            &y,
            &KernelParams {
                gamma: Gamma::Value(1e6),
                probability: true,
            },
        );
        // Far away from all training points: kernels underflow to zero
        let probs = model.predict_proba(array![[1e6]].view());
        assert!((probs[0][0] - 0.75).abs() < 1e-9);
        assert!((probs[0][1] - 0.25).abs() < 1e-9);
    }
}
