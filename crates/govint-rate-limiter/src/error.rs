//! Rate Limiter error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RateLimiterError {
    #[error("no budget configured for model {0}")]
    UnknownModel(String),

    #[error("timed out waiting for token budget on model {model} after {waited_ms}ms")]
    Timeout { model: String, waited_ms: u64 },

    #[error("requested {requested} tokens exceeds the model's entire per-minute capacity {capacity}")]
    RequestExceedsCapacity { requested: u64, capacity: u64 },
}
