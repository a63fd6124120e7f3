//! Stratified Cross-Validation

use crate::algorithms::AlgorithmSpec;
use crate::scaler::StandardScaler;
use ndarray::{ArrayView2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;

/// Fold count actually usable for the data at hand.
///
/// Every class must appear in every fold, so the count is capped by the
/// smallest class, with a floor of 2 folds.
pub fn effective_folds(y: &[usize], requested: usize) -> usize {
    let mut counts = std::collections::BTreeMap::new();
    for &label in y {
        *counts.entry(label).or_insert(0usize) += 1;
    }
    let min_class = counts.values().copied().min().unwrap_or(0);
    requested.min(min_class).max(2)
}

/// Stratified fold assignment: shuffle each class's indices with a seeded RNG,
/// then deal them round-robin across folds. Returns per-fold test index sets.
pub fn stratified_folds(y: &[usize], n_folds: usize, seed: u64) -> Vec<Vec<usize>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut by_class = std::collections::BTreeMap::<usize, Vec<usize>>::new();
    for (i, &label) in y.iter().enumerate() {
        by_class.entry(label).or_default().push(i);
    }

    let mut folds = vec![Vec::new(); n_folds];
    for indices in by_class.into_values() {
        let mut indices = indices;
        indices.shuffle(&mut rng);
        for (offset, index) in indices.into_iter().enumerate() {
            folds[offset % n_folds].push(index);
        }
    }
    for fold in &mut folds {
        fold.sort_unstable();
    }
    folds
}

/// Per-fold accuracy of a candidate fitted on the complement of each fold.
/// The scaler is refit on each training split so no test data leaks into it.
pub fn cross_val_scores(
    spec: &AlgorithmSpec,
    x: ArrayView2<'_, f64>,
    y: &[usize],
    folds: &[Vec<usize>],
) -> Vec<f64> {
    folds
        .iter()
        .enumerate()
        .map(|(fold_no, test_idx)| {
            let (preds, truth) = fold_predictions(spec, x, y, test_idx);
            let correct = preds.iter().zip(&truth).filter(|(p, t)| p == t).count();
            let accuracy = correct as f64 / truth.len().max(1) as f64;
            debug!(fold = fold_no, accuracy, "fold scored");
            accuracy
        })
        .collect()
}

/// Out-of-fold predictions for every sample, aligned with the input order.
/// Each sample is predicted by the one model that never saw it in training.
pub fn cross_val_predict(
    spec: &AlgorithmSpec,
    x: ArrayView2<'_, f64>,
    y: &[usize],
    folds: &[Vec<usize>],
) -> Vec<usize> {
    let mut out = vec![0usize; y.len()];
    for test_idx in folds {
        let (preds, _) = fold_predictions(spec, x, y, test_idx);
        for (&i, pred) in test_idx.iter().zip(preds) {
            out[i] = pred;
        }
    }
    out
}

fn fold_predictions(
    spec: &AlgorithmSpec,
    x: ArrayView2<'_, f64>,
    y: &[usize],
    test_idx: &[usize],
) -> (Vec<usize>, Vec<usize>) {
    let in_test: std::collections::BTreeSet<usize> = test_idx.iter().copied().collect();
    let train_idx: Vec<usize> = (0..y.len()).filter(|i| !in_test.contains(i)).collect();

    let x_train = x.select(Axis(0), &train_idx);
    let y_train: Vec<usize> = train_idx.iter().map(|&i| y[i]).collect();
    let x_test = x.select(Axis(0), test_idx);
    let y_test: Vec<usize> = test_idx.iter().map(|&i| y[i]).collect();

    let (scaler, z_train) = StandardScaler::fit_transform(x_train.view());
    let z_test = scaler.transform(x_test.view());

    let model = spec.fit(z_train.view(), &y_train);
    (model.predict(z_test.view()), y_test)
}
