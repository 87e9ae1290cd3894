//! Error types for panel assembly and resampling.

use chrono::NaiveDate;
use hf_factors::FactorError;
use thiserror::Error;

/// Result type for exposure operations.
pub type Result<T> = std::result::Result<T, ExposureError>;

/// Errors that can occur while building or resampling factor panels.
#[derive(Debug, Error)]
pub enum ExposureError {
    /// Unsupported configuration value
    #[error("Unsupported {parameter}: {value:?}")]
    Config {
        /// Name of the offending parameter
        parameter: &'static str,
        /// Value that was rejected
        value: String,
    },

    /// Factor computation error
    #[error(transparent)]
    Factor(#[from] FactorError),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// Filesystem error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON configuration
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A daily dataset could not be served
    #[error("Cannot load minute bars for {day}: {reason}")]
    Source {
        /// Trading day that was requested
        day: NaiveDate,
        /// Why it failed
        reason: String,
    },

    /// Rows appended at or before the panel's latest date
    #[error("Cannot append {date} to a panel covering up to {watermark}")]
    NonMonotonicAppend {
        /// Latest date already in the panel
        watermark: NaiveDate,
        /// Offending row date
        date: NaiveDate,
    },

    /// A stored panel belongs to another factor
    #[error("Panel holds {found}, expected {expected}")]
    PanelMismatch {
        /// Factor the caller asked for
        expected: String,
        /// Factor the panel holds
        found: String,
    },

    /// Worker pool could not be created
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl ExposureError {
    /// Configuration error for `parameter`.
    pub fn config(parameter: &'static str, value: impl ToString) -> Self {
        Self::Config {
            parameter,
            value: value.to_string(),
        }
    }
}
