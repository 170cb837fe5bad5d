//! The Batch Orchestrator's claim -> process -> commit loop (§4.4, §5
//! phases 4-5): claim a bounded batch of pending mentions, fan them out
//! over a bounded worker pool, and commit each outcome back to storage
//! as soon as it finishes rather than waiting on the whole batch.

use std::sync::atomic::{AtomicBool, Ordering};

use futures::stream::{self, StreamExt};
use govint_config::TopicConfig;
use govint_sentiment::SentimentAnalyzer;
use govint_storage::Storage;
use govint_topics::TopicRegistry;
use tracing::{info, instrument, warn};

use crate::claim::claim_batch;
use crate::error::OrchestratorError;
use crate::worker::process_mention;

#[derive(Debug, Clone, Copy)]
pub struct PipelineConfig {
    pub batch_size: usize,
    pub max_workers: usize,
    pub max_retry_attempts: u32,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct BatchResult {
    pub claimed: usize,
    pub completed: usize,
    pub failed: usize,
}

impl BatchResult {
    fn merge(&mut self, other: BatchResult) {
        self.claimed += other.claimed;
        self.completed += other.completed;
        self.failed += other.failed;
    }
}

/// Claim one batch, process it over a bounded worker pool, and commit
/// every outcome. Returns a zeroed `BatchResult` when nothing is pending.
#[instrument(skip(storage, registry, topic_config, analyzer))]
pub async fn run_batch(storage: &Storage, registry: &TopicRegistry, topic_config: &TopicConfig, analyzer: &SentimentAnalyzer, config: PipelineConfig) -> Result<BatchResult, OrchestratorError> {
    let claimed = claim_batch(storage, config.batch_size)?;
    let claimed_count = claimed.len();
    if claimed_count == 0 {
        return Ok(BatchResult::default());
    }

    let outcomes = stream::iter(claimed)
        .map(|mention| process_mention(mention, registry, topic_config, analyzer, config.max_retry_attempts))
        .buffer_unordered(config.max_workers.max(1))
        .collect::<Vec<_>>()
        .await;

    let mut result = BatchResult { claimed: claimed_count, ..Default::default() };
    for outcome in outcomes {
        let completed = outcome.mention.is_completed();
        storage.commit_mention_result(&outcome.mention, &outcome.topic_links, outcome.embedding.as_deref())?;
        if completed {
            result.completed += 1;
        } else {
            result.failed += 1;
        }
    }
    Ok(result)
}

/// Run batches back to back until a claim comes back empty (caught up)
/// or `stop` flips true between batches (§5 cooperative cancellation).
#[instrument(skip(storage, registry, topic_config, analyzer, stop))]
pub async fn run_until_caught_up(storage: &Storage, registry: &TopicRegistry, topic_config: &TopicConfig, analyzer: &SentimentAnalyzer, config: PipelineConfig, stop: &AtomicBool) -> Result<BatchResult, OrchestratorError> {
    let mut total = BatchResult::default();
    loop {
        if stop.load(Ordering::Relaxed) {
            warn!("orchestrator run stopped before catching up");
            break;
        }

        let batch = run_batch(storage, registry, topic_config, analyzer, config).await?;
        if batch.claimed == 0 {
            break;
        }

        info!(claimed = batch.claimed, completed = batch.completed, failed = batch.failed, "batch committed");
        total.merge(batch);

        if batch.claimed < config.batch_size {
            break;
        }
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::Utc;
    use govint_emotion::{EmotionError, EmotionModel, ModelInfo};
    use govint_providers::{EmbeddingProvider, LlmProvider, ProviderError};
    use govint_types::{EmotionDistribution, Mention, SourceType, Topic};
    use tempfile::TempDir;

    use super::*;

    struct StubLlm;

    #[async_trait]
    impl LlmProvider for StubLlm {
        async fn chat(&self, _system: &str, _user: &str) -> Result<String, ProviderError> {
            Ok(r#"{"label": "NEGATIVE", "score": -0.6, "justification": "complaint", "topic_hints": []}"#.to_string())
        }
    }

    struct StubEmbedder;

    #[async_trait]
    impl EmbeddingProvider for StubEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, ProviderError> {
            Ok(vec![0.1, 0.2, 0.3])
        }
        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
            Ok(texts.iter().map(|_| vec![0.1, 0.2, 0.3]).collect())
        }
    }

    struct StubEmotionModel(ModelInfo);

    impl EmotionModel for StubEmotionModel {
        fn info(&self) -> &ModelInfo {
            &self.0
        }
        fn classify(&self, _text: &str) -> Result<EmotionDistribution, EmotionError> {
            Ok(EmotionDistribution { anger: 0.7, sadness: 0.3, ..Default::default() })
        }
    }

    fn test_analyzer() -> SentimentAnalyzer {
        SentimentAnalyzer::new(Arc::new(StubLlm), Arc::new(StubEmotionModel(ModelInfo { name: "stub".into(), max_sequence_length: 256 })), Arc::new(StubEmbedder), Default::default())
    }

    fn pipeline_config() -> PipelineConfig {
        PipelineConfig { batch_size: 10, max_workers: 4, max_retry_attempts: 3 }
    }

    #[tokio::test]
    async fn run_batch_claims_processes_and_commits_every_mention() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::open(dir.path()).unwrap();
        storage.put_topic(&Topic::new("fuel_pricing", "Fuel Pricing", "Fuel subsidies and prices", vec!["fuel".into()])).unwrap();
        let registry = TopicRegistry::load(&storage, &StubEmbedder).await.unwrap();

        for i in 0..3 {
            storage.put_mention(&Mention::new(format!("m{i}"), "fuel prices are too high", Utc::now(), "twitter", SourceType::Citizen, "op1")).unwrap();
        }

        let result = run_batch(&storage, &registry, &TopicConfig::default(), &test_analyzer(), pipeline_config()).await.unwrap();
        assert_eq!(result.claimed, 3);
        assert_eq!(result.completed, 3);
        assert_eq!(result.failed, 0);
        assert!(storage.list_pending_mentions().unwrap().is_empty());
    }

    #[tokio::test]
    async fn run_batch_on_empty_queue_is_a_no_op() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::open(dir.path()).unwrap();
        let registry = TopicRegistry::load(&storage, &StubEmbedder).await.unwrap();

        let result = run_batch(&storage, &registry, &TopicConfig::default(), &test_analyzer(), pipeline_config()).await.unwrap();
        assert_eq!(result.claimed, 0);
    }

    #[tokio::test]
    async fn run_until_caught_up_drains_more_than_one_batch() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::open(dir.path()).unwrap();
        let registry = TopicRegistry::load(&storage, &StubEmbedder).await.unwrap();

        for i in 0..5 {
            storage.put_mention(&Mention::new(format!("m{i}"), "fuel prices are too high", Utc::now(), "twitter", SourceType::Citizen, "op1")).unwrap();
        }

        let mut config = pipeline_config();
        config.batch_size = 2;
        let stop = AtomicBool::new(false);
        let result = run_until_caught_up(&storage, &registry, &TopicConfig::default(), &test_analyzer(), config, &stop).await.unwrap();
        assert_eq!(result.claimed, 5);
        assert_eq!(result.completed, 5);
    }
}
