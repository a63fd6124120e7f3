//! Column Standardization

use ndarray::{Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

/// Per-column z-score standardization fitted on training data.
///
/// Columns with zero variance keep a scale of 1.0 so transformed values stay
/// finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    /// Fit column means and standard deviations
    pub fn fit(x: ArrayView2<'_, f64>) -> Self {
        let n = x.nrows().max(1) as f64;
        let mut mean = Vec::with_capacity(x.ncols());
        let mut scale = Vec::with_capacity(x.ncols());

        for column in x.axis_iter(Axis(1)) {
            let m = column.sum() / n;
            let var = column.iter().map(|v| (v - m).powi(2)).sum::<f64>() / n;
            let sd = var.sqrt();
            mean.push(m);
            scale.push(if sd > 0.0 { sd } else { 1.0 });
        }

        Self { mean, scale }
    }

    /// Standardize a matrix with the fitted statistics
    pub fn transform(&self, x: ArrayView2<'_, f64>) -> Array2<f64> {
        let mut out = x.to_owned();
        for mut row in out.axis_iter_mut(Axis(0)) {
            for (j, value) in row.iter_mut().enumerate() {
                *value = (*value - self.mean[j]) / self.scale[j];
            }
        }
        out
    }

    /// Fit and transform in one step
    pub fn fit_transform(x: ArrayView2<'_, f64>) -> (Self, Array2<f64>) {
        let scaler = Self::fit(x);
        let transformed = scaler.transform(x);
        (scaler, transformed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_standardizes_columns() {
        let x = array![[1.0, 10.0], [3.0, 10.0], [5.0, 10.0]];
        let (scaler, z) = StandardScaler::fit_transform(x.view());

        // First column: mean 3, sd sqrt(8/3)
        let col0: Vec<f64> = z.column(0).to_vec();
        assert!((col0[0] + col0[2]).abs() < 1e-12);
        assert!(col0[1].abs() < 1e-12);

        // Constant column keeps scale 1 and becomes all zeros
        for v in z.column(1) {
            assert_eq!(*v, 0.0);
        }

        // Transform of the mean row is zero
        let mid = scaler.transform(array![[3.0, 10.0]].view());
        assert!(mid[[0, 0]].abs() < 1e-12);
    }
}
