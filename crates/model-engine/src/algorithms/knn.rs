//! Distance-Weighted Nearest Neighbors

use crate::N_CLASSES;
use ndarray::{Array2, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

/// KNN hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnnParams {
    /// Number of neighbors consulted per query
    pub k: usize,
}

impl Default for KnnParams {
    fn default() -> Self {
        Self { k: 5 }
    }
}

/// k-nearest-neighbors classifier with inverse-distance vote weights.
///
/// A neighbor at zero distance dominates: the query collapses to a vote over
/// exact matches only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearestNeighbors {
    x: Array2<f64>,
    y: Vec<usize>,
    k: usize,
}

impl NearestNeighbors {
    /// Memorize the training data
    pub fn fit(x: ArrayView2<'_, f64>, y: &[usize], params: &KnnParams) -> Self {
        Self {
            x: x.to_owned(),
            y: y.to_vec(),
            k: params.k.max(1),
        }
    }

    /// Normalized inverse-distance vote weights per class
    pub fn predict_proba(&self, x: ArrayView2<'_, f64>) -> Vec<[f64; N_CLASSES]> {
        x.outer_iter().map(|row| self.vote(row)).collect()
    }

    fn vote(&self, row: ArrayView1<'_, f64>) -> [f64; N_CLASSES] {
        let mut neighbors: Vec<(f64, usize)> = self
            .x
            .outer_iter()
            .zip(&self.y)
            .map(|(train_row, &label)| {
                let dist: f64 = train_row
                    .iter()
                    .zip(row.iter())
                    .map(|(a, b)| (a - b).powi(2))
                    .sum::<f64>()
                    .sqrt();
                (dist, label)
            })
            .collect();
        neighbors.sort_by(|a, b| a.0.total_cmp(&b.0));
        neighbors.truncate(self.k.min(neighbors.len()));

        let mut weights = [0.0; N_CLASSES];
        let exact: Vec<usize> = neighbors
            .iter()
            .filter(|(d, _)| *d == 0.0)
            .map(|&(_, label)| label)
            .collect();

        if exact.is_empty() {
            for (dist, label) in neighbors {
                weights[label] += 1.0 / dist;
            }
        } else {
            // Exact matches carry infinite weight; split evenly among them
            for label in exact {
                weights[label] += 1.0;
            }
        }

        let total: f64 = weights.iter().sum();
        if total > 0.0 {
            for w in &mut weights {
                *w /= total;
            }
        }
        weights
    }
}
