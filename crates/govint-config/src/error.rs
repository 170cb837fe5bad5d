//! Config Store and Path Resolver error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config load error: {0}")]
    Load(#[from] config::ConfigError),

    #[error("storage error: {0}")]
    Storage(#[from] govint_storage::StorageError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("unknown config key: {0}")]
    Missing(String),

    #[error("config key {key} has type {actual}, expected {expected}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        actual: String,
    },
}
