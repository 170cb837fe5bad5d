//! The narrow client contract the pipeline depends on (§6): `embed`,
//! `embed_batch`, and `chat`. Kept as traits so tests and the
//! `use_existing_data=true` cycle path can supply a mock implementation
//! without touching the HTTP client.

use async_trait::async_trait;

use crate::error::ProviderError;

#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError>;
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError>;
}

#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn chat(&self, system: &str, user: &str) -> Result<String, ProviderError>;
}
