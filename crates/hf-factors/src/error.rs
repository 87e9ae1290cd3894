//! Error types for factor computations.

use thiserror::Error;

/// Result type for factor operations.
pub type Result<T> = std::result::Result<T, FactorError>;

/// Errors that can occur during factor computation.
#[derive(Debug, Error)]
pub enum FactorError {
    /// Missing required column in input data
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// Column present but with an unusable type or content
    #[error("Invalid column {column}: {reason}")]
    InvalidColumn {
        /// Column name
        column: String,
        /// What was wrong with it
        reason: String,
    },

    /// Polars DataFrame error
    #[error("DataFrame error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Factor not found in registry
    #[error("Factor not found: {0}")]
    NotFound(String),

    /// Computation error
    #[error("Computation error: {0}")]
    Computation(String),
}
