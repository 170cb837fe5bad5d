//! Sentiment Analyzer errors: the "semantic" class from the error
//! taxonomy (§7) plus passthrough of the provider's "transient
//! external" class. Semantic failures are always terminal — the
//! Batch Orchestrator never retries them.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SentimentError {
    #[error("provider error: {0}")]
    Provider(#[from] govint_providers::ProviderError),

    #[error("emotion model error: {0}")]
    Emotion(#[from] govint_emotion::EmotionError),

    #[error("sentiment score {score} inconsistent with label {label:?}")]
    BandViolation { label: String, score: f32 },

    #[error("malformed llm response: {0}")]
    MalformedOutput(String),
}

impl SentimentError {
    /// Whether this failure is the "transient external" class and may be
    /// retried by the caller. Parse/band failures are always terminal.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SentimentError::Provider(e) if e.is_retryable())
    }
}
