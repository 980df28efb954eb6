//! Regularized logistic regression.
//!
//! Gradient descent on the weighted binomial deviance with an L1 or L2
//! penalty. The intercept is unpenalized; L1 is applied as a proximal
//! soft-threshold step so coefficients can reach exactly zero.

use crate::classifier::{Classifier, sigmoid};
use crate::error::{ModelError, Result};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Penalty type for logistic regression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Penalty {
    /// Lasso penalty (sparse coefficients)
    L1,
    /// Ridge penalty
    #[default]
    L2,
}

/// Class weighting scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ClassWeight {
    /// Uniform example weights
    None,
    /// Weights inversely proportional to class frequency
    #[default]
    Balanced,
}

/// Configuration for [`LogisticRegression`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticConfig {
    /// Penalty type (default: L2)
    pub penalty: Penalty,
    /// Inverse regularization strength, as in scikit-learn's `C` (default: 1.0)
    pub c: f64,
    /// Class weighting (default: balanced)
    pub class_weight: ClassWeight,
    /// Maximum gradient descent iterations (default: 1000)
    pub max_iter: usize,
    /// Convergence tolerance on the loss (default: 1e-6)
    pub tol: f64,
    /// Gradient descent step size (default: 0.1)
    pub learning_rate: f64,
}

impl Default for LogisticConfig {
    fn default() -> Self {
        Self {
            penalty: Penalty::L2,
            c: 1.0,
            class_weight: ClassWeight::Balanced,
            max_iter: 1000,
            tol: 1e-6,
            learning_rate: 0.1,
        }
    }
}

/// Logistic regression classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    /// Model configuration
    pub config: LogisticConfig,
    /// Fitted coefficients, one per feature
    pub coefficients: Vec<f64>,
    /// Fitted intercept
    pub intercept: f64,
    fitted: bool,
}

impl LogisticRegression {
    /// Create an unfitted model with the given configuration.
    pub const fn new(config: LogisticConfig) -> Self {
        Self {
            config,
            coefficients: Vec::new(),
            intercept: 0.0,
            fitted: false,
        }
    }

    fn sample_weights(&self, y: &Array1<f64>) -> Result<Array1<f64>> {
        let n = y.len() as f64;
        let n_pos = y.sum();
        let n_neg = n - n_pos;
        if n_pos == 0.0 || n_neg == 0.0 {
            return Err(ModelError::DegenerateTarget(
                "both classes are required to fit".to_string(),
            ));
        }

        let weights = match self.config.class_weight {
            ClassWeight::None => Array1::ones(y.len()),
            ClassWeight::Balanced => y.mapv(|v| {
                if v > 0.5 {
                    n / (2.0 * n_pos)
                } else {
                    n / (2.0 * n_neg)
                }
            }),
        };
        Ok(weights)
    }

    fn raw_scores(&self, x: &Array2<f64>) -> Array1<f64> {
        let w = Array1::from_vec(self.coefficients.clone());
        x.dot(&w) + self.intercept
    }
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new(LogisticConfig::default())
    }
}

impl Classifier for LogisticRegression {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        if x.nrows() != y.len() {
            return Err(ModelError::DimensionMismatch {
                expected: x.nrows(),
                actual: y.len(),
            });
        }
        if self.config.c <= 0.0 {
            return Err(ModelError::InvalidParameter(format!(
                "C must be positive, got {}",
                self.config.c
            )));
        }

        let (n, k) = x.dim();
        let sample_weights = self.sample_weights(y)?;
        let reg = 1.0 / (self.config.c * n as f64);
        let lr = self.config.learning_rate;

        let mut coefficients = Array1::<f64>::zeros(k);
        let mut intercept = 0.0f64;
        let mut previous_loss = f64::INFINITY;

        for _ in 0..self.config.max_iter {
            let scores = x.dot(&coefficients) + intercept;
            let probs = scores.mapv(sigmoid);

            // Weighted mean gradient of the deviance
            let residuals = (&probs - y) * &sample_weights;
            let mut grad_w = x.t().dot(&residuals) / n as f64;
            let grad_b = residuals.sum() / n as f64;

            if self.config.penalty == Penalty::L2 {
                grad_w = grad_w + &(&coefficients * reg);
            }

            coefficients = coefficients - &(grad_w * lr);
            intercept -= lr * grad_b;

            if self.config.penalty == Penalty::L1 {
                let threshold = lr * reg;
                coefficients.mapv_inplace(|w| w.signum() * (w.abs() - threshold).max(0.0));
            }

            // Weighted deviance for the convergence check
            let mut loss = 0.0;
            for i in 0..n {
                let p = probs[i].clamp(1e-15, 1.0 - 1e-15);
                loss -= sample_weights[i] * (y[i] * p.ln() + (1.0 - y[i]) * (1.0 - p).ln());
            }
            loss /= n as f64;
            match self.config.penalty {
                Penalty::L2 => loss += 0.5 * reg * coefficients.mapv(|w| w * w).sum(),
                Penalty::L1 => loss += reg * coefficients.mapv(f64::abs).sum(),
            }

            if (previous_loss - loss).abs() < self.config.tol {
                break;
            }
            previous_loss = loss;
        }

        self.coefficients = coefficients.to_vec();
        self.intercept = intercept;
        self.fitted = true;
        Ok(())
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if !self.fitted {
            return Err(ModelError::NotFitted);
        }
        if x.ncols() != self.coefficients.len() {
            return Err(ModelError::DimensionMismatch {
                expected: self.coefficients.len(),
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

    /// Linearly separable toy data on one feature.
    fn separable() -> (Array2<f64>, Array1<f64>) {
        let x = array![[-2.0], [-1.5], [-1.0], [1.0], [1.5], [2.0]];
        let y = array![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
        (x, y)
    }

    #[test]
    fn test_fit_separates_classes() {
        let (x, y) = separable();
        let mut model = LogisticRegression::default();
        model.fit(&x, &y).unwrap();

        let probs = model.predict_proba(&x).unwrap();
        assert!(probs[0] < 0.5);
        assert!(probs[5] > 0.5);
        assert!(model.coefficients[0] > 0.0);
    }

    #[test]
    fn test_predict_before_fit_errors() {
        let model = LogisticRegression::default();
        let x = array![[1.0]];
        assert!(matches!(
            model.predict_proba(&x),
            Err(ModelError::NotFitted)
        ));
    }

    #[test]
    fn test_l1_shrinks_noise_feature_harder() {
        // Second feature is pure constant noise
        let x = array![
            [-2.0, 1.0],
            [-1.5, 1.0],
            [-1.0, 1.0],
            [1.0, 1.0],
            [1.5, 1.0],
            [2.0, 1.0]
        ];
        let y = array![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];

        let mut model = LogisticRegression::new(LogisticConfig {
            penalty: Penalty::L1,
            c: 10.0,
            ..Default::default()
        });
        model.fit(&x, &y).unwrap();

        // The signal coefficient survives the soft-threshold, the constant
        // column collapses into the unpenalized intercept
        assert!(model.coefficients[0] > 0.1);
        assert!(model.coefficients[1].abs() < model.coefficients[0].abs());
    }

    #[test]
    fn test_single_class_errors() {
        let x = array![[1.0], [2.0]];
        let y = array![1.0, 1.0];
        let mut model = LogisticRegression::default();
        assert!(matches!(
            model.fit(&x, &y),
            Err(ModelError::DegenerateTarget(_))
        ));
    }

    #[test]
    fn test_invalid_c() {
        let (x, y) = separable();
        let mut model = LogisticRegression::new(LogisticConfig {
            c: 0.0,
            ..Default::default()
        });
        assert!(matches!(
            model.fit(&x, &y),
            Err(ModelError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_balanced_weights_shift_imbalanced_intercept() {
        // Heavily imbalanced data with overlapping features
        let x = array![[0.0], [0.1], [-0.1], [0.05], [-0.05], [0.2], [0.0], [0.1]];
        let y = array![0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0];

        let mut balanced = LogisticRegression::default();
        balanced.fit(&x, &y).unwrap();

        let mut unweighted = LogisticRegression::new(LogisticConfig {
            class_weight: ClassWeight::None,
            ..Default::default()
        });
        unweighted.fit(&x, &y).unwrap();

        // Balanced weighting pushes predicted probabilities upward
        let p_bal = balanced.predict_proba(&x).unwrap();
        let p_unw = unweighted.predict_proba(&x).unwrap();
        assert!(p_bal.sum() > p_unw.sum());
    }
}
