//! Gradient-boosted trees for binary classification.
//!
//! Binomial-deviance boosting: each round fits a depth-limited regression
//! tree to the weighted gradients and hessians of the logistic loss and adds
//! a shrunken Newton step to the raw score. `scale_pos_weight` multiplies
//! the loss contribution of positive rows, the usual counter to class
//! imbalance in crash data.

use crate::classifier::{Classifier, sigmoid};
use crate::error::{ModelError, Result};
use crate::tree::{Node, TreeParams};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Configuration for [`GradientBoostedTrees`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoostedConfig {
    /// Number of boosting rounds (default: 100)
    pub n_estimators: usize,
    /// Maximum depth per tree (default: 3)
    pub max_depth: usize,
    /// Minimum hessian sum per child (default: 1.0)
    pub min_child_weight: f64,
    /// Shrinkage applied to each tree's contribution (default: 0.1)
    pub learning_rate: f64,
    /// Loss weight multiplier for positive rows (default: 1.0)
    pub scale_pos_weight: f64,
}

impl Default for BoostedConfig {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: 3,
            min_child_weight: 1.0,
            learning_rate: 0.1,
            scale_pos_weight: 1.0,
        }
    }
}

/// Gradient-boosted tree classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientBoostedTrees {
    /// Model configuration
    pub config: BoostedConfig,
    /// Fitted trees, in boosting order
    pub trees: Vec<Node>,
    /// Initial raw score (log-odds of the weighted base rate)
    pub base_score: f64,
    n_features: usize,
    fitted: bool,
}

impl GradientBoostedTrees {
    /// Create an unfitted model with the given configuration.
    pub const fn new(config: BoostedConfig) -> Self {
        Self {
            config,
            trees: Vec::new(),
            base_score: 0.0,
            n_features: 0,
            fitted: false,
        }
    }

    fn raw_scores(&self, x: &Array2<f64>) -> Array1<f64> {
        let rows: Vec<Vec<f64>> = x.outer_iter().map(|row| row.to_vec()).collect();
        let mut scores = Array1::from_elem(x.nrows(), self.base_score);
        for tree in &self.trees {
            for (i, row) in rows.iter().enumerate() {
                scores[i] += self.config.learning_rate * tree.predict_row(row);
            }
        }
        scores
    }
}

impl Default for GradientBoostedTrees {
    fn default() -> Self {
        Self::new(BoostedConfig::default())
    }
}

impl Classifier for GradientBoostedTrees {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        if x.nrows() != y.len() {
            return Err(ModelError::DimensionMismatch {
                expected: x.nrows(),
                actual: y.len(),
            });
        }
        if self.config.learning_rate <= 0.0 || self.config.learning_rate > 1.0 {
            return Err(ModelError::InvalidParameter(format!(
                "learning_rate must be in (0, 1], got {}",
                self.config.learning_rate
            )));
        }

        let n = x.nrows();
        let weights: Vec<f64> = y
            .iter()
            .map(|&v| {
                if v > 0.5 {
                    self.config.scale_pos_weight
                } else {
                    1.0
                }
            })
            .collect();

        let weighted_pos: f64 = y
            .iter()
            .zip(&weights)
            .map(|(&v, &w)| if v > 0.5 { w } else { 0.0 })
            .sum();
        let weight_sum: f64 = weights.iter().sum();
        let base_rate = weighted_pos / weight_sum;
        if base_rate <= 0.0 || base_rate >= 1.0 {
            return Err(ModelError::DegenerateTarget(
                "both classes are required to fit".to_string(),
            ));
        }
        self.base_score = (base_rate / (1.0 - base_rate)).ln();

        let rows: Vec<Vec<f64>> = x.outer_iter().map(|row| row.to_vec()).collect();
        let indices: Vec<usize> = (0..n).collect();
        let tree_params = TreeParams {
            max_depth: self.config.max_depth,
            min_child_weight: self.config.min_child_weight,
        };

        let mut scores = vec![self.base_score; n];
        let mut trees = Vec::with_capacity(self.config.n_estimators);

        for _ in 0..self.config.n_estimators {
            let mut gradients = vec![0.0f64; n];
            let mut hessians = vec![0.0f64; n];
            for i in 0..n {
                let p = sigmoid(scores[i]);
                gradients[i] = weights[i] * (p - y[i]);
                hessians[i] = weights[i] * p * (1.0 - p);
            }

            let tree = Node::grow(&rows, &gradients, &hessians, &indices, 0, &tree_params);
            for (i, row) in rows.iter().enumerate() {
                scores[i] += self.config.learning_rate * tree.predict_row(row);
            }
            trees.push(tree);
        }

        self.trees = trees;
        self.n_features = x.ncols();
        self.fitted = true;
        Ok(())
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if !self.fitted {
            return Err(ModelError::NotFitted);
        }
        if x.ncols() != self.n_features {
            return Err(ModelError::DimensionMismatch {
                expected: self.n_features,
                actual: x.ncols(),
            });
        }
        Ok(self.raw_scores(x).mapv(sigmoid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn risk_band() -> (Array2<f64>, Array1<f64>) {
        // Positives sit in a mid-range band, so no single threshold on the
        // feature separates the classes
        let x = array![
            [0.0],
            [0.1],
            [0.2],
            [0.35],
            [0.45],
            [0.55],
            [0.65],
            [0.8],
            [0.9],
            [1.0]
        ];
        let y = array![0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0];
        (x, y)
    }

    #[test]
    fn test_fits_nonlinear_pattern() {
        let (x, y) = risk_band();
        let mut model = GradientBoostedTrees::new(BoostedConfig {
            n_estimators: 50,
            max_depth: 2,
            min_child_weight: 0.1,
            learning_rate: 0.3,
            scale_pos_weight: 1.0,
        });
        model.fit(&x, &y).unwrap();

        let probs = model.predict_proba(&x).unwrap();
        for (i, &p) in probs.iter().enumerate() {
            if y[i] > 0.5 {
                assert!(p > 0.8, "row {i}: expected high probability, got {p}");
            } else {
                assert!(p < 0.2, "row {i}: expected low probability, got {p}");
            }
        }
        assert_eq!(model.predict(&x).unwrap(), y);
    }

    #[test]
    fn test_predict_width_mismatch_errors() {
        let x = array![[0.0, 1.0], [1.0, 0.0], [0.0, 0.0], [1.0, 1.0]];
        let y = array![0.0, 1.0, 0.0, 1.0];
        let mut model = GradientBoostedTrees::default();
        model.fit(&x, &y).unwrap();

        let narrow = array![[0.5]];
        assert!(matches!(
            model.predict_proba(&narrow),
            Err(ModelError::DimensionMismatch {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_predict_before_fit_errors() {
        let model = GradientBoostedTrees::default();
        let x = array![[0.0, 0.0]];
        assert!(matches!(
            model.predict_proba(&x),
            Err(ModelError::NotFitted)
        ));
    }

    #[test]
    fn test_scale_pos_weight_raises_probabilities() {
        let x = array![[0.0], [0.2], [0.4], [0.6], [0.8], [1.0]];
        let y = array![0.0, 0.0, 0.0, 0.0, 0.0, 1.0];

        let fit = |spw: f64| {
            let mut model = GradientBoostedTrees::new(BoostedConfig {
                n_estimators: 10,
                scale_pos_weight: spw,
                ..Default::default()
            });
            model.fit(&x, &y).unwrap();
            model.predict_proba(&x).unwrap().sum()
        };

        assert!(fit(5.0) > fit(1.0));
    }

    #[test]
    fn test_single_class_errors() {
        let x = array![[0.0], [1.0]];
        let y = array![0.0, 0.0];
        let mut model = GradientBoostedTrees::default();
        assert!(matches!(
            model.fit(&x, &y),
            Err(ModelError::DegenerateTarget(_))
        ));
    }

    #[test]
    fn test_invalid_learning_rate() {
        let x = array![[0.0], [1.0]];
        let y = array![0.0, 1.0];
        let mut model = GradientBoostedTrees::new(BoostedConfig {
            learning_rate: 0.0,
            ..Default::default()
        });
        assert!(matches!(
            model.fit(&x, &y),
            Err(ModelError::InvalidParameter(_))
        ));
    }
}
