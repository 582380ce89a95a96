//! Error types for the CKD prediction pipeline

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, CkdError>;

/// Main error type for ingestion, preprocessing, training and inference
#[derive(Error, Debug)]
pub enum CkdError {
    #[error("Ingestion error: {0}")]
    Ingestion(String),

    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    #[error("Preprocessing error: {0}")]
    Preprocessing(String),

    #[error("Training error: {0}")]
    Training(String),

    #[error("Model not fitted")]
    ModelNotFitted,

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CkdError {
    /// Shorthand for a shape mismatch between two counts
    pub fn shape(expected: impl std::fmt::Display, actual: impl std::fmt::Display) -> Self {
        CkdError::ShapeMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

impl From<polars::error::PolarsError> for CkdError {
    fn from(err: polars::error::PolarsError) -> Self {
        CkdError::Ingestion(err.to_string())
    }
}

impl From<ndarray::ShapeError> for CkdError {
    fn from(err: ndarray::ShapeError) -> Self {
        CkdError::ShapeMismatch {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}
