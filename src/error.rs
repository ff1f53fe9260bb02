//! Error types for the adapter.

use thiserror::Error;

/// Result type alias used throughout this crate.
pub type Result<T> = std::result::Result<T, AtcError>;


/// Errors raised by [`ModelAdapter`](crate::ModelAdapter)
/// and by the estimators it wraps.
///
/// Interrupted training is never reported through this type.
/// An interrupted fit leaves the best model seen so far in place.
#[derive(Error, Debug)]
pub enum AtcError {
    /// The adapter was asked for something it was not configured for,
    /// e.g. intervals without interval predictors.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The caller passed data the adapter cannot work with.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Shapes of two operands do not agree.
    #[error("Invalid shape: expected {expected}, got {actual}")]
    Shape {
        /// Expected shape.
        expected: String,
        /// Actual shape.
        actual: String,
    },

    /// The wrapped estimator lacks a capability the current path needs.
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// Propagated from the wrapped estimator.
    #[error("Estimator error: {0}")]
    Estimator(String),

    /// Raised by `polars` while converting frames.
    #[error("Data frame error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Raised while writing or reading checkpoints.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised while (de)serializing configuration or checkpoints.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}


impl AtcError {
    pub(crate) fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }


    pub(crate) fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }


    pub(crate) fn unsupported<S: Into<String>>(msg: S) -> Self {
        Self::Unsupported(msg.into())
    }
}
