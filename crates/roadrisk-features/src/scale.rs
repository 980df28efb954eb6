//! Standard scaling of continuous feature columns.

use crate::error::{FeatureError, Result};
use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};

/// Column-wise standard scaler: `z = (x - mean) / std`.
///
/// Fit on training rows, then applied to any matrix with the same column
/// layout. Columns with zero variance scale to zero rather than dividing
/// by zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Per-column means from the fit data
    pub means: Vec<f64>,
    /// Per-column standard deviations from the fit data
    pub stds: Vec<f64>,
}

impl StandardScaler {
    /// Fit per-column means and standard deviations (population std).
    pub fn fit(x: &Array2<f64>) -> Self {
        let n = x.nrows().max(1) as f64;
        let means: Vec<f64> = x
            .axis_iter(Axis(1))
            .map(|column| column.sum() / n)
            .collect();
        let stds: Vec<f64> = x
            .axis_iter(Axis(1))
            .zip(&means)
            .map(|(column, mean)| {
                (column.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt()
            })
            .collect();

        Self { means, stds }
    }

    /// Apply the fitted scaling.
    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        if x.ncols() != self.means.len() {
            return Err(FeatureError::DimensionMismatch {
                expected: self.means.len(),
                actual: x.ncols(),
            });
        }

        let mut out = x.clone();
        for (j, mut column) in out.axis_iter_mut(Axis(1)).enumerate() {
            let mean = self.means[j];
            let std = self.stds[j];
            column.mapv_inplace(|v| if std > 0.0 { (v - mean) / std } else { 0.0 });
        }
        Ok(out)
    }

    /// Fit and transform in one step.
    pub fn fit_transform(x: &Array2<f64>) -> (Self, Array2<f64>) {
        let scaler = Self::fit(x);
        let scaled = scaler
            .transform(x)
            .unwrap_or_else(|_| unreachable!("fit and transform share the input shape"));
        (scaler, scaled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_fit_transform_centers_and_scales() {
        let x = array![[1.0, 10.0], [2.0, 10.0], [3.0, 10.0]];
        let (scaler, scaled) = StandardScaler::fit_transform(&x);

        assert_relative_eq!(scaler.means[0], 2.0);
        // Constant column scales to zero
        assert_relative_eq!(scaled[[0, 1]], 0.0);
        assert_relative_eq!(scaled[[1, 1]], 0.0);

        // Column mean ~0, unit variance
        let col0: Vec<f64> = scaled.column(0).to_vec();
        assert_relative_eq!(col0.iter().sum::<f64>(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(scaled[[2, 0]], -scaled[[0, 0]], epsilon = 1e-12);
    }

    #[test]
    fn test_transform_dimension_mismatch() {
        let x = array![[1.0, 2.0], [3.0, 4.0]];
        let scaler = StandardScaler::fit(&x);
        let narrow = array![[1.0], [2.0]];
        assert!(scaler.transform(&narrow).is_err());
    }

    #[test]
    fn test_transform_reuses_fit_statistics() {
        let train = array![[0.0], [2.0]];
        let scaler = StandardScaler::fit(&train);
        let test = array![[4.0]];
        let scaled = scaler.transform(&test).unwrap();
        // mean 1, std 1 -> (4 - 1) / 1
        assert_relative_eq!(scaled[[0, 0]], 3.0);
    }
}
