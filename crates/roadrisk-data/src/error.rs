//! Error types for data operations.

use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur during data operations.
#[derive(Debug, Error)]
pub enum DataError {
    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A required column is missing from an input file
    #[error("Missing column '{column}' in {source_name}")]
    MissingColumn {
        /// Column that was expected
        column: String,
        /// Which input the column was expected in
        source_name: String,
    },

    /// Dataset is empty after filtering
    #[error("Empty dataset: {0}")]
    EmptyDataset(String),
}
