//! # govint-rate-limiter
//!
//! The Rate Limiter (C3): per-model token-per-minute budgets for every
//! LLM/embedding model named in `models.llm_models`.

pub mod counter;
pub mod error;
pub mod limiter;

pub use counter::count_tokens;
pub use error::RateLimiterError;
pub use limiter::RateLimiter;
