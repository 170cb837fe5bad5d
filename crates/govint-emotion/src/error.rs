//! Emotion classifier error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmotionError {
    #[error("candle error: {0}")]
    Candle(#[from] candle_core::Error),

    #[error("tokenizer error: {0}")]
    Tokenizer(String),

    #[error("model file not found: {0}")]
    ModelNotFound(String),

    #[error("failed to download model: {0}")]
    Download(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}
