//! Error types for beer-styles
//!
//! Filtering outcomes (a record without a style, a record that does not fit a
//! profile) are not errors; they are counted in the aggregation and trim
//! reports. Only conditions that stop or skip a unit of work live here.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// beer-styles error types
#[derive(Error, Debug)]
pub enum Error {
    /// A raw page could not be read or carries an upstream error marker.
    /// Non-fatal: the unit is skipped and counted.
    #[error("Source unavailable: {unit}: {reason}")]
    SourceUnavailable {
        /// Name of the unit of work (file name, page id)
        unit: String,
        /// Why the unit was skipped
        reason: String,
    },

    /// Unknown profile, empty profile or an invalid configuration value
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Features and labels ended up with different lengths
    #[error("Integrity violation: {features} feature records but {labels} labels")]
    IntegrityViolation {
        /// Number of feature records
        features: usize,
        /// Number of labels
        labels: usize,
    },

    /// Invalid argument to an operation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Storage error (dataset file, Parquet export)
    #[error("Storage error: {0}")]
    StorageError(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Arrow error
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Parquet error
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether a run may skip the failing unit and continue.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::SourceUnavailable { .. })
    }
}
