//! Topic Registry / Classifier error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TopicsError {
    #[error("storage error: {0}")]
    Storage(#[from] govint_storage::StorageError),

    #[error("types error: {0}")]
    Types(#[from] govint_types::TypesError),

    #[error("embedding provider error: {0}")]
    Provider(#[from] govint_providers::ProviderError),

    #[error("topic registry has not been loaded yet")]
    NotLoaded,

    #[error("unknown topic key: {0}")]
    UnknownTopic(String),
}
