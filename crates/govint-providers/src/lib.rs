//! # govint-providers
//!
//! External client contract for the Embedding Provider (C4) and LLM
//! Provider (C5): narrow async traits plus an OpenAI-compatible HTTP
//! implementation that honours the Rate Limiter's per-model token
//! budgets and retries transient failures with exponential backoff.

pub mod error;
pub mod http;
pub mod traits;

pub use error::ProviderError;
pub use http::{HttpProvider, HttpProviderConfig};
pub use traits::{EmbeddingProvider, LlmProvider};
