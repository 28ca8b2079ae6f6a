//! Error types for tarifa operations.
//!
//! Training code propagates these with `?` (fail-fast). The inference layer
//! catches them at its boundary and converts to an absence sentinel (see
//! [`crate::inference`]).

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TarifaError>;

/// Main error type for tarifa operations.
#[derive(Debug, Error)]
pub enum TarifaError {
    /// I/O error (file not found, permission denied, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read or row deserialization error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Artifact serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A required column is missing from the input data.
    #[error("missing column `{name}`")]
    MissingColumn {
        /// Name of the absent column.
        name: String,
    },

    /// Matrix/vector dimensions don't match for the operation.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimensions description.
        expected: String,
        /// Actual dimensions found.
        actual: String,
    },

    /// Operation requires a fitted estimator.
    #[error("{what} is not fitted; call fit() first")]
    NotFitted {
        /// Which estimator was unfitted.
        what: &'static str,
    },

    /// Invalid parameter value provided.
    #[error("invalid parameter {param}={value}: {constraint}")]
    InvalidParameter {
        /// Parameter name.
        param: &'static str,
        /// Provided value.
        value: String,
        /// Constraint description.
        constraint: &'static str,
    },

    /// The least-squares solve failed.
    #[error("least-squares solve failed: {0}")]
    Solve(&'static str),

    /// A single-record input field had the wrong type.
    #[error("invalid record: {0}")]
    InvalidRecord(String),
}
