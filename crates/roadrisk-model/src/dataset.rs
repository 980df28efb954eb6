//! Modeling table assembly and train/test splitting.
//!
//! The modeling table is the crash-lag frame inner-joined to the per-segment
//! attribute frame; matrices for fitting are pulled out of it by feature
//! name. Splitting is a seeded shuffle so runs are reproducible.

use crate::error::{ModelError, Result};
use ndarray::{Array1, Array2};
use polars::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// The assembled modeling table: one row per segment.
#[derive(Debug, Clone)]
pub struct ModelTable {
    /// Underlying frame, one row per segment
    pub df: DataFrame,
}

impl ModelTable {
    /// Join the lag frame to the per-segment attribute frame on `segment_id`.
    pub fn assemble(lags: &DataFrame, segments: &DataFrame) -> Result<Self> {
        let df = lags
            .clone()
            .lazy()
            .join(
                segments.clone().lazy(),
                [col("segment_id")],
                [col("segment_id")],
                JoinArgs::new(JoinType::Inner),
            )
            .sort(["segment_id"], Default::default())
            .collect()?;

        if df.height() == 0 {
            return Err(ModelError::InsufficientData {
                required: 1,
                actual: 0,
            });
        }

        Ok(Self { df })
    }

    /// Number of rows (segments).
    pub fn len(&self) -> usize {
        self.df.height()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// Segment ids in row order.
    pub fn segment_ids(&self) -> Result<Vec<String>> {
        let ids = self
            .df
            .column("segment_id")
            .map_err(|_| ModelError::MissingColumn("segment_id".to_string()))?
            .str()?;
        Ok(ids.into_iter().flatten().map(String::from).collect())
    }

    /// Extract the named feature columns as a row-major matrix. Nulls
    /// become zero (sparse external sources fill with no exposure).
    pub fn features(&self, columns: &[String]) -> Result<Array2<f64>> {
        let n = self.df.height();
        let mut x = Array2::<f64>::zeros((n, columns.len()));

        for (j, name) in columns.iter().enumerate() {
            let column = self
                .df
                .column(name)
                .map_err(|_| ModelError::MissingColumn(name.clone()))?
                .cast(&DataType::Float64)?;
            let values = column.f64()?;
            for (i, value) in values.into_iter().enumerate() {
                x[[i, j]] = value.unwrap_or(0.0);
            }
        }

        Ok(x)
    }

    /// The binary target vector.
    pub fn target(&self) -> Result<Array1<f64>> {
        let column = self
            .df
            .column("target")
            .map_err(|_| ModelError::MissingColumn("target".to_string()))?
            .cast(&DataType::Float64)?;
        let values = column.f64()?;
        Ok(values.into_iter().map(|v| v.unwrap_or(0.0)).collect())
    }

    /// Positive-class weight `1 / P(target = 1)` over the full table.
    pub fn positive_class_weight(&self) -> Result<f64> {
        let y = self.target()?;
        let rate = y.sum() / y.len() as f64;
        if rate <= 0.0 {
            return Err(ModelError::DegenerateTarget(
                "no positive examples in the modeling table".to_string(),
            ));
        }
        Ok(1.0 / rate)
    }
}

/// Row indices for a shuffled train/test split.
#[derive(Debug, Clone)]
pub struct TrainTestSplit {
    /// Training row indices
    pub train: Vec<usize>,
    /// Held-out test row indices
    pub test: Vec<usize>,
}

impl TrainTestSplit {
    /// Shuffle `0..n` with the given seed and split at `train_fraction`.
    pub fn new(n: usize, train_fraction: f64, seed: u64) -> Result<Self> {
        if !(0.0..1.0).contains(&train_fraction) || train_fraction == 0.0 {
            return Err(ModelError::InvalidParameter(format!(
                "train_fraction must be in (0, 1), got {train_fraction}"
            )));
        }
        if n < 2 {
            return Err(ModelError::InsufficientData {
                required: 2,
                actual: n,
            });
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let mut indices: Vec<usize> = (0..n).collect();
        indices.shuffle(&mut rng);

        let cut = ((n as f64) * train_fraction).round() as usize;
        let cut = cut.clamp(1, n - 1);

        Ok(Self {
            train: indices[..cut].to_vec(),
            test: indices[cut..].to_vec(),
        })
    }
}

/// Select rows of a matrix by index.
pub fn take_rows(x: &Array2<f64>, indices: &[usize]) -> Array2<f64> {
    let mut out = Array2::<f64>::zeros((indices.len(), x.ncols()));
    for (i, &idx) in indices.iter().enumerate() {
        out.row_mut(i).assign(&x.row(idx));
    }
    out
}

/// Select elements of a vector by index.
pub fn take(y: &Array1<f64>, indices: &[usize]) -> Array1<f64> {
    indices.iter().map(|&idx| y[idx]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn lag_frame() -> DataFrame {
        DataFrame::new(vec![
            Series::new("segment_id".into(), vec!["001", "002", "003"]).into(),
            Series::new("target".into(), vec![1i32, 0, 0]).into(),
            Series::new("pre_week".into(), vec![1.0f64, 0.0, 2.0]).into(),
        ])
        .unwrap()
    }

    fn seg_frame() -> DataFrame {
        DataFrame::new(vec![
            Series::new("segment_id".into(), vec!["001", "002", "004"]).into(),
            Series::new("log_AADT".into(), vec![4.6f64, 5.5, 3.0]).into(),
        ])
        .unwrap()
    }

    #[test]
    fn test_assemble_inner_join() {
        let table = ModelTable::assemble(&lag_frame(), &seg_frame()).unwrap();
        // 003 has no attributes, 004 has no lags
        assert_eq!(table.len(), 2);
        assert_eq!(table.segment_ids().unwrap(), vec!["001", "002"]);
    }

    #[test]
    fn test_features_matrix_and_target() {
        let table = ModelTable::assemble(&lag_frame(), &seg_frame()).unwrap();
        let x = table
            .features(&["pre_week".to_string(), "log_AADT".to_string()])
            .unwrap();
        assert_eq!(x.shape(), &[2, 2]);
        assert_relative_eq!(x[[0, 0]], 1.0);
        assert_relative_eq!(x[[1, 1]], 5.5);

        let y = table.target().unwrap();
        assert_eq!(y, array![1.0, 0.0]);
    }

    #[test]
    fn test_features_missing_column() {
        let table = ModelTable::assemble(&lag_frame(), &seg_frame()).unwrap();
        assert!(matches!(
            table.features(&["Conflict".to_string()]),
            Err(ModelError::MissingColumn(_))
        ));
    }

    #[test]
    fn test_positive_class_weight() {
        let table = ModelTable::assemble(&lag_frame(), &seg_frame()).unwrap();
        // 1 positive of 2 rows -> weight 2
        assert_relative_eq!(table.positive_class_weight().unwrap(), 2.0);
    }

    #[test]
    fn test_split_sizes_and_disjointness() {
        let split = TrainTestSplit::new(10, 0.7, 17).unwrap();
        assert_eq!(split.train.len(), 7);
        assert_eq!(split.test.len(), 3);

        let mut all: Vec<usize> = split.train.iter().chain(&split.test).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_split_is_seeded() {
        let a = TrainTestSplit::new(20, 0.7, 42).unwrap();
        let b = TrainTestSplit::new(20, 0.7, 42).unwrap();
        assert_eq!(a.train, b.train);
    }

    #[test]
    fn test_split_rejects_bad_fraction() {
        assert!(TrainTestSplit::new(10, 0.0, 1).is_err());
        assert!(TrainTestSplit::new(10, 1.0, 1).is_err());
    }

    #[test]
    fn test_take_rows() {
        let x = array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
        let sub = take_rows(&x, &[2, 0]);
        assert_eq!(sub, array![[5.0, 6.0], [1.0, 2.0]]);

        let y = array![1.0, 0.0, 1.0];
        assert_eq!(take(&y, &[2, 0]), array![1.0, 1.0]);
    }
}
