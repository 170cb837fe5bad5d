//! Error types shared by the core data model.

use thiserror::Error;

/// Errors raised while constructing or validating domain types.
#[derive(Debug, Error)]
pub enum TypesError {
    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A field value violated an invariant (e.g. a score outside its
    /// declared range).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An embedding did not have the expected dimensionality.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}
