//! Error types for feature engineering.

use thiserror::Error;

/// Result type for feature operations.
pub type Result<T> = std::result::Result<T, FeatureError>;

/// Errors that can occur during feature engineering.
#[derive(Debug, Error)]
pub enum FeatureError {
    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// Target week leaves too little history for the quarter lag
    #[error("Target week {week} is too early: need week > {min} for a full quarter of history")]
    TargetWeekTooEarly {
        /// Requested target week
        week: i32,
        /// Minimum exclusive week bound
        min: i32,
    },

    /// Target week is outside the calendar
    #[error("Invalid target week {0}: must be within 1..=53")]
    InvalidWeek(i32),

    /// A column required by a transform is missing
    #[error("Missing column '{0}' for feature transform")]
    MissingColumn(String),

    /// Shape mismatch in matrix operations
    #[error("Dimension mismatch: expected {expected} columns, got {actual}")]
    DimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Actual dimension
        actual: usize,
    },
}
