//! Issue clustering/detection/metrics error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IssuesError {
    #[error("storage error: {0}")]
    Storage(#[from] govint_storage::StorageError),

    #[error("types error: {0}")]
    Types(#[from] govint_types::TypesError),

    #[error("clustering error: {0}")]
    Clustering(String),

    #[error("issue not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}
