//! Bagged Tree Ensemble

use crate::N_CLASSES;
use ndarray::ArrayView2;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Random-forest hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    /// Number of bootstrapped trees
    pub n_trees: usize,
    /// Depth limit; `None` grows trees until purity
    pub max_depth: Option<usize>,
    /// Minimum samples required to attempt a split
    pub min_samples_split: usize,
    /// Minimum samples each child must keep
    pub min_samples_leaf: usize,
    /// RNG seed for bootstrapping and feature subsampling
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 200,
            max_depth: None,
            min_samples_split: 3,
            min_samples_leaf: 1,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        distribution: Vec<f64>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn leaf_distribution(&self, row: &[f64]) -> &[f64] {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
                Node::Leaf { distribution } => return distribution,
            }
        }
    }
}

/// Ensemble of CART trees grown on bootstrap samples with per-split feature
/// subsampling (sqrt of the feature count). Predictions average the leaf
/// class distributions across trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomForest {
    trees: Vec<Tree>,
}

impl RandomForest {
    /// Fit the ensemble
    pub fn fit(x: ArrayView2<'_, f64>, y: &[usize], params: &ForestParams) -> Self {
        let n = x.nrows();
        let mut rng = StdRng::seed_from_u64(params.seed);
        let mut trees = Vec::with_capacity(params.n_trees);

        for _ in 0..params.n_trees {
            let indices: Vec<usize> = (0..n).map(|_| rng.gen_range(0..n)).collect();
            let mut builder = TreeBuilder {
                x,
                y,
                params,
                nodes: Vec::new(),
            };
            builder.grow(indices, 0, &mut rng);
            trees.push(Tree {
                nodes: builder.nodes,
            });
        }

        Self { trees }
    }

    /// Averaged leaf distributions across all trees
    pub fn predict_proba(&self, x: ArrayView2<'_, f64>) -> Vec<[f64; N_CLASSES]> {
        let n_trees = self.trees.len().max(1) as f64;
        x.outer_iter()
            .map(|row| {
                let row: Vec<f64> = row.to_vec();
                let mut probs = [0.0; N_CLASSES];
                for tree in &self.trees {
                    for (p, leaf) in probs.iter_mut().zip(tree.leaf_distribution(&row)) {
                        *p += leaf;
                    }
                }
                for p in &mut probs {
                    *p /= n_trees;
                }
                probs
            })
            .collect()
    }
}

struct TreeBuilder<'a, 'b> {
    x: ArrayView2<'a, f64>,
    y: &'b [usize],
    params: &'b ForestParams,
    nodes: Vec<Node>,
}

impl TreeBuilder<'_, '_> {
    /// Grow a subtree over `indices`, returning its node id
    fn grow(&mut self, indices: Vec<usize>, depth: usize, rng: &mut StdRng) -> usize {
        let counts = class_counts(self.y, &indices);
        let depth_reached = self
            .params
            .max_depth
            .is_some_and(|limit| depth >= limit);

        if depth_reached
            || indices.len() < self.params.min_samples_split
            || is_pure(&counts)
        {
            return self.push_leaf(&counts, indices.len());
        }

        match self.best_split(&indices, rng) {
            Some((feature, threshold)) => {
                let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
                    .into_iter()
                    .partition(|&i| self.x[[i, feature]] <= threshold);

                let node_id = self.nodes.len();
                self.nodes.push(Node::Split {
                    feature,
                    threshold,
                    left: 0,
                    right: 0,
                });

                let left = self.grow(left_idx, depth + 1, rng);
                let right = self.grow(right_idx, depth + 1, rng);
                if let Node::Split {
                    left: l, right: r, ..
                } = &mut self.nodes[node_id]
                {
                    *l = left;
                    *r = right;
                }
                node_id
            }
            None => self.push_leaf(&counts, indices.len()),
        }
    }

    fn push_leaf(&mut self, counts: &[usize; N_CLASSES], total: usize) -> usize {
        let total = total.max(1) as f64;
        let distribution: Vec<f64> = counts.iter().map(|&c| c as f64 / total).collect();
        let node_id = self.nodes.len();
        self.nodes.push(Node::Leaf { distribution });
        node_id
    }

    /// Best Gini split over a random sqrt-sized subset of features
    fn best_split(&self, indices: &[usize], rng: &mut StdRng) -> Option<(usize, f64)> {
        let n_features = self.x.ncols();
        let n_candidates = (n_features as f64).sqrt().ceil() as usize;
        let mut features: Vec<usize> = (0..n_features).collect();
        features.shuffle(rng);
        features.truncate(n_candidates.max(1));

        let parent_gini = gini(&class_counts(self.y, indices), indices.len());
        let mut best: Option<(usize, f64, f64)> = None;

        for &feature in &features {
            let mut values: Vec<(f64, usize)> = indices
                .iter()
                .map(|&i| (self.x[[i, feature]], self.y[i]))
                .collect();
            values.sort_by(|a, b| a.0.total_cmp(&b.0));

            let total = values.len();
            let mut left_counts = [0usize; N_CLASSES];
            let mut right_counts = class_counts(self.y, indices);

            for split_at in 1..total {
                let (value, label) = values[split_at - 1];
                left_counts[label] += 1;
                right_counts[label] -= 1;

                // Can't split between equal feature values
                if value == values[split_at].0 {
                    continue;
                }
                if split_at < self.params.min_samples_leaf
                    || total - split_at < self.params.min_samples_leaf
                {
                    continue;
                }

                let left_gini = gini(&left_counts, split_at);
                let right_gini = gini(&right_counts, total - split_at);
                let weighted = (split_at as f64 * left_gini
                    + (total - split_at) as f64 * right_gini)
                    / total as f64;
                let gain = parent_gini - weighted;

                if gain > 1e-12 && best.map_or(true, |(_, _, g)| gain > g) {
                    let threshold = (value + values[split_at].0) / 2.0;
                    best = Some((feature, threshold, gain));
                }
            }
        }

        best.map(|(feature, threshold, _)| (feature, threshold))
    }
}

fn class_counts(y: &[usize], indices: &[usize]) -> [usize; N_CLASSES] {
    let mut counts = [0usize; N_CLASSES];
    for &i in indices {
        counts[y[i]] += 1;
    }
    counts
}

fn is_pure(counts: &[usize; N_CLASSES]) -> bool {
    counts.iter().filter(|&&c| c > 0).count() <= 1
}

fn gini(counts: &[usize; N_CLASSES], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / total;
            p * p
        })
        .sum::<f64>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn blobs() -> (Array2<f64>, Vec<usize>) {
        // Two well-separated clusters in 2D
        let mut rows = Vec::new();
        let mut y = Vec::new();
        for i in 0..20 {
            let jitter = (i % 5) as f64 * 0.01;
            rows.extend_from_slice(&[0.0 + jitter, 0.0 + jitter]);
            y.push(0);
            rows.extend_from_slice(&[5.0 + jitter, 5.0 + jitter]);
            y.push(3);
        }
        (Array2::from_shape_vec((40, 2), rows).unwrap(), y)
    }

    #[test]
    fn test_separable_clusters_are_learned() {
        let (x, y) = blobs();
        let params = ForestParams {
            n_trees: 25,
            ..ForestParams::default()
        };
        let model = RandomForest::fit(x.view(), &y, &params);
        let preds = model.predict_proba(x.view());
        for (probs, &label) in preds.iter().zip(&y) {
            assert_eq!(super::super::argmax(probs), label);
        }
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let (x, y) = blobs();
        let params = ForestParams {
            n_trees: 10,
            ..ForestParams::default()
        };
        let model = RandomForest::fit(x.view(), &y, &params);
        for probs in model.predict_proba(x.view()) {
            let sum: f64 = probs.iter().sum();
            assert!((sum - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_deterministic_with_same_seed() {
        let (x, y) = blobs();
        let params = ForestParams {
            n_trees: 5,
            ..ForestParams::default()
        };
        let a = RandomForest::fit(x.view(), &y, &params);
        let b = RandomForest::fit(x.view(), &y, &params);
        assert_eq!(a, b);
    }
}
