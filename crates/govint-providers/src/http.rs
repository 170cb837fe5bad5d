//! An OpenAI-compatible HTTP implementation of [`EmbeddingProvider`] and
//! [`LlmProvider`], with exponential-backoff retry on transient failures
//! and per-model token budgets honoured via `govint-rate-limiter`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use backoff::{backoff::Backoff, ExponentialBackoff};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use govint_rate_limiter::{count_tokens, RateLimiter};

use crate::error::ProviderError;
use crate::traits::{EmbeddingProvider, LlmProvider};

/// Configuration for an OpenAI-compatible endpoint (embeddings and/or
/// chat completions).
#[derive(Debug, Clone)]
pub struct HttpProviderConfig {
    pub base_url: String,
    pub embedding_model: String,
    pub chat_model: String,
    pub api_key: SecretString,
    pub timeout: Duration,
    pub max_retries: u32,
}

impl HttpProviderConfig {
    pub fn openai(api_key: impl Into<String>, embedding_model: impl Into<String>, chat_model: impl Into<String>) -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            embedding_model: embedding_model.into(),
            chat_model: chat_model.into(),
            api_key: SecretString::from(api_key.into()),
            timeout: Duration::from_secs(60),
            max_retries: 3,
        }
    }
}

pub struct HttpProvider {
    client: Client,
    config: HttpProviderConfig,
    rate_limiter: Arc<RateLimiter>,
}

impl HttpProvider {
    pub fn new(config: HttpProviderConfig, rate_limiter: Arc<RateLimiter>) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            config,
            rate_limiter,
        })
    }

    async fn with_retry<T, F, Fut>(&self, mut call: F) -> Result<T, ProviderError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, ProviderError>>,
    {
        let mut backoff = ExponentialBackoff {
            max_elapsed_time: Some(self.config.timeout * self.config.max_retries.max(1)),
            ..Default::default()
        };
        let mut attempts = 0;

        loop {
            attempts += 1;
            debug!(attempt = attempts, "calling provider");
            match call().await {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) => {
                    if attempts >= self.config.max_retries {
                        error!(error = %e, attempts, "provider call exhausted retries");
                        return Err(e);
                    }
                    match backoff.next_backoff() {
                        Some(duration) => {
                            warn!(error = %e, retry_in_ms = duration.as_millis(), "provider call failed, retrying");
                            tokio::time::sleep(duration).await;
                        }
                        None => {
                            error!(error = %e, "backoff exhausted");
                            return Err(e);
                        }
                    }
                }
            }
        }
    }

    async fn post_embeddings(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
        #[derive(Serialize)]
        struct Request<'a> {
            model: &'a str,
            input: &'a [String],
        }
        #[derive(Deserialize)]
        struct Response {
            data: Vec<EmbeddingRow>,
        }
        #[derive(Deserialize)]
        struct EmbeddingRow {
            embedding: Vec<f32>,
        }

        let estimate: u64 = texts.iter().map(|t| count_tokens(t)).sum();
        self.rate_limiter
            .acquire(&self.config.embedding_model, estimate, self.config.timeout)
            .await
            .map_err(|_| ProviderError::RateLimited)?;

        let url = format!("{}/embeddings", self.config.base_url);
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key.expose_secret()))
            .json(&Request {
                model: &self.config.embedding_model,
                input: texts,
            })
            .send()
            .await?;

        if response.status() == 429 {
            return Err(ProviderError::RateLimited);
        }
        if !response.status().is_success() {
            let status = response.status();
            if status.is_server_error() || matches!(status.as_u16(), 408 | 409 | 425) {
                warn!(%status, "provider returned a transient error status");
                return Err(ProviderError::ServerError { status: status.as_u16() });
            }
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Parse(format!("HTTP {status}: {body}")));
        }

        let parsed: Response = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        Ok(parsed.data.into_iter().map(|row| row.embedding).collect())
    }
}

#[async_trait]
impl EmbeddingProvider for HttpProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        let texts = vec![text.to_string()];
        let mut result = self.with_retry(|| self.post_embeddings(&texts)).await?;
        result
            .pop()
            .ok_or_else(|| ProviderError::Parse("empty embedding response".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let owned = texts.to_vec();
        self.with_retry(|| self.post_embeddings(&owned)).await
    }
}

#[async_trait]
impl LlmProvider for HttpProvider {
    async fn chat(&self, system: &str, user: &str) -> Result<String, ProviderError> {
        #[derive(Serialize)]
        struct Message<'a> {
            role: &'a str,
            content: &'a str,
        }
        #[derive(Serialize)]
        struct Request<'a> {
            model: &'a str,
            messages: Vec<Message<'a>>,
        }
        #[derive(Deserialize)]
        struct Response {
            choices: Vec<Choice>,
        }
        #[derive(Deserialize)]
        struct Choice {
            message: ChoiceMessage,
        }
        #[derive(Deserialize)]
        struct ChoiceMessage {
            content: String,
        }

        let estimate = count_tokens(system) + count_tokens(user);
        self.rate_limiter
            .acquire(&self.config.chat_model, estimate, self.config.timeout)
            .await
            .map_err(|_| ProviderError::RateLimited)?;

        let model = self.config.chat_model.clone();
        let request = Request {
            model: &model,
            messages: vec![
                Message { role: "system", content: system },
                Message { role: "user", content: user },
            ],
        };

        self.with_retry(|| async {
            let url = format!("{}/chat/completions", self.config.base_url);
            let response = self
                .client
                .post(&url)
                .header("Authorization", format!("Bearer {}", self.config.api_key.expose_secret()))
                .json(&request)
                .send()
                .await?;

            if response.status() == 429 {
                return Err(ProviderError::RateLimited);
            }
            if !response.status().is_success() {
                let status = response.status();
                if status.is_server_error() || matches!(status.as_u16(), 408 | 409 | 425) {
                    warn!(%status, "provider returned a transient error status");
                    return Err(ProviderError::ServerError { status: status.as_u16() });
                }
                let body = response.text().await.unwrap_or_default();
                return Err(ProviderError::Parse(format!("HTTP {status}: {body}")));
            }

            let parsed: Response = response
                .json()
                .await
                .map_err(|e| ProviderError::Parse(e.to_string()))?;

            parsed
                .choices
                .into_iter()
                .next()
                .map(|c| c.message.content)
                .ok_or_else(|| ProviderError::Parse("no choices in response".to_string()))
        })
        .await
    }
}
