//! The classifier seam shared by both model families.

use crate::boosted::GradientBoostedTrees;
use crate::error::Result;
use crate::logistic::LogisticRegression;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Logistic sigmoid.
pub fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Binary classifier over dense feature matrices.
pub trait Classifier {
    /// Fit on a feature matrix and 0/1 target vector.
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()>;

    /// Predicted probability of the positive class per row.
    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>>;

    /// Hard 0/1 predictions at the 0.5 threshold. A probability of exactly
    /// 0.5 counts as positive.
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        Ok(self
            .predict_proba(x)?
            .mapv(|p| if p >= 0.5 { 1.0 } else { 0.0 }))
    }
}

/// The two model families the pipeline searches over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelKind {
    /// Regularized logistic regression
    LogisticRegression,
    /// Gradient-boosted trees
    GradientBoostedTrees,
}

impl std::fmt::Display for ModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LogisticRegression => write!(f, "logistic regression"),
            Self::GradientBoostedTrees => write!(f, "gradient-boosted trees"),
        }
    }
}

/// A concrete model of either family, serializable once fitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Model {
    /// Logistic regression variant
    Logistic(LogisticRegression),
    /// Gradient-boosted trees variant
    Boosted(GradientBoostedTrees),
}

impl Model {
    /// Which family this model belongs to.
    pub const fn kind(&self) -> ModelKind {
        match self {
            Self::Logistic(_) => ModelKind::LogisticRegression,
            Self::Boosted(_) => ModelKind::GradientBoostedTrees,
        }
    }
}

impl Classifier for Model {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        match self {
            Self::Logistic(m) => m.fit(x, y),
            Self::Boosted(m) => m.fit(x, y),
        }
    }

    fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        match self {
            Self::Logistic(m) => m.predict_proba(x),
            Self::Boosted(m) => m.predict_proba(x),
        }
    }
}
