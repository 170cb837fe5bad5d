//! Errors from the external embedding/LLM client contract. Every variant
//! other than `Parse` is the "transient external" class from the error
//! taxonomy — the only errors the orchestrator's retry loop treats as
//! retryable.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("provider call timed out")]
    Timeout,

    #[error("provider rate limit exceeded (HTTP 429)")]
    RateLimited,

    #[error("provider server error (HTTP {status})")]
    ServerError { status: u16 },

    #[error("provider http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider response could not be parsed: {0}")]
    Parse(String),
}

impl ProviderError {
    /// Whether the orchestrator's retry loop should retry this error.
    /// Semantic failures (`Parse`) are terminal.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ProviderError::Timeout | ProviderError::RateLimited | ProviderError::ServerError { .. } | ProviderError::Http(_))
    }
}
