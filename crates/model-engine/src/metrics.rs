//! Classification Metrics

/// Fraction of predictions matching the truth
pub fn accuracy(truth: &[usize], preds: &[usize]) -> f64 {
    if truth.is_empty() {
        return 0.0;
    }
    let correct = truth.iter().zip(preds).filter(|(t, p)| t == p).count();
    correct as f64 / truth.len() as f64
}

/// Precision, recall, f1 and support for a single label.
/// Undefined ratios (zero denominators) report as 0.0.
pub fn per_class(truth: &[usize], preds: &[usize], label: usize) -> (f64, f64, f64, usize) {
    let mut tp = 0usize;
    let mut fp = 0usize;
    let mut fnn = 0usize;
    for (&t, &p) in truth.iter().zip(preds) {
        match (t == label, p == label) {
            (true, true) => tp += 1,
            (false, true) => fp += 1,
            (true, false) => fnn += 1,
            _ => {}
        }
    }
    let support = tp + fnn;
    let precision = safe_div(tp as f64, (tp + fp) as f64);
    let recall = safe_div(tp as f64, support as f64);
    let f1 = safe_div(2.0 * precision * recall, precision + recall);
    (precision, recall, f1, support)
}

/// Labels actually present in the truth or the predictions, ascending
pub fn present_labels(truth: &[usize], preds: &[usize]) -> Vec<usize> {
    let mut labels: Vec<usize> = truth
        .iter()
        .chain(preds)
        .copied()
        .collect::<std::collections::BTreeSet<_>>()
        .into_iter()
        .collect();
    labels.sort_unstable();
    labels
}

/// Confusion matrix restricted to `labels`; rows are truth, columns are
/// predictions, both in the order of `labels`
pub fn confusion_matrix(truth: &[usize], preds: &[usize], labels: &[usize]) -> Vec<Vec<usize>> {
    let position: std::collections::BTreeMap<usize, usize> = labels
        .iter()
        .enumerate()
        .map(|(pos, &label)| (label, pos))
        .collect();
    let mut matrix = vec![vec![0usize; labels.len()]; labels.len()];
    for (&t, &p) in truth.iter().zip(preds) {
        if let (Some(&row), Some(&col)) = (position.get(&t), position.get(&p)) {
            matrix[row][col] += 1;
        }
    }
    matrix
}

/// Unweighted mean over per-class values
pub fn macro_average(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Support-weighted mean over per-class values
pub fn weighted_average(values: &[f64], supports: &[usize]) -> f64 {
    let total: usize = supports.iter().sum();
    if total == 0 {
        return 0.0;
    }
    values
        .iter()
        .zip(supports)
        .map(|(v, &s)| v * s as f64)
        .sum::<f64>()
        / total as f64
}

fn safe_div(num: f64, den: f64) -> f64 {
    if den > 0.0 {
        num / den
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accuracy() {
        assert_eq!(accuracy(&[0, 1, 2, 2], &[0, 1, 2, 1]), 0.75);
        assert_eq!(accuracy(&[], &[]), 0.0);
    }

    #[test]
    fn test_per_class_counts() {
        let truth = [0, 0, 1, 1, 1];
        let preds = [0, 1, 1, 1, 0];
        let (precision, recall, f1, support) = per_class(&truth, &preds, 1);
        // tp=2, fp=1, fn=1
        assert!((precision - 2.0 / 3.0).abs() < 1e-12);
        assert!((recall - 2.0 / 3.0).abs() < 1e-12);
        assert!((f1 - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(support, 3);
    }

    #[test]
    fn test_absent_label_reports_zero() {
        let (precision, recall, f1, support) = per_class(&[0, 0], &[0, 0], 5);
        assert_eq!((precision, recall, f1, support), (0.0, 0.0, 0.0, 0));
    }

    #[test]
    fn test_confusion_matrix_restricted_to_present_labels() {
        let truth = [0, 0, 4, 4];
        let preds = [0, 4, 4, 4];
        let labels = present_labels(&truth, &preds);
        assert_eq!(labels, vec![0, 4]);
        let matrix = confusion_matrix(&truth, &preds, &labels);
        assert_eq!(matrix, vec![vec![1, 1], vec![0, 2]]);
    }

    #[test]
    fn test_averages() {
        assert!((macro_average(&[1.0, 0.5]) - 0.75).abs() < 1e-12);
        assert!((weighted_average(&[1.0, 0.5], &[1, 3]) - 0.625).abs() < 1e-12);
        assert_eq!(weighted_average(&[1.0], &[0]), 0.0);
    }
}
