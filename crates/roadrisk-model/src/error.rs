//! Error types for modeling operations.

use thiserror::Error;

/// Result type for modeling operations.
pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors that can occur during modeling.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// Model used before fitting
    #[error("Model has not been fitted")]
    NotFitted,

    /// Target vector contains a single class
    #[error("Degenerate target: {0}")]
    DegenerateTarget(String),

    /// Dimension mismatch between matrices or vectors
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Actual dimension
        actual: usize,
    },

    /// Invalid parameter value
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Not enough rows for the requested split or folds
    #[error("Insufficient data: need at least {required} rows, got {actual}")]
    InsufficientData {
        /// Required number of rows
        required: usize,
        /// Actual number of rows
        actual: usize,
    },

    /// A column expected in the modeling table is missing
    #[error("Missing column '{0}' in modeling table")]
    MissingColumn(String),

    /// No tuned result under the requested name
    #[error("No tuned model named '{0}'")]
    UnknownModel(String),
}
