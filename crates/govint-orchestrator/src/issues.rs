//! Phase 6 of a cycle: Issue Detection runs once classification has
//! caught up, over every active topic in turn (§4.5). Kept here rather
//! than folded into `pipeline::run_batch` since it operates per-topic
//! across the whole cycle's newly-classified mentions, not per batch.

use chrono::{DateTime, Utc};
use govint_config::IssueConfig;
use govint_issues::{detect_issues_for_topic, DetectionOutcome};
use govint_storage::Storage;
use govint_topics::TopicRegistry;
use tracing::{info, instrument};

use crate::error::OrchestratorError;

/// Aggregate detection outcome across every active topic.
#[derive(Debug, Default, Clone, Copy)]
pub struct IssueDetectionResult {
    pub topics_scanned: usize,
    pub issues_created: usize,
    pub issues_updated: usize,
}

#[instrument(skip(storage, registry, config))]
pub fn run_issue_detection(storage: &Storage, registry: &TopicRegistry, config: &IssueConfig, now: DateTime<Utc>) -> Result<IssueDetectionResult, OrchestratorError> {
    let mut result = IssueDetectionResult::default();

    for topic in registry.active_topics() {
        let DetectionOutcome { issues_created, issues_updated, mentions_below_cluster_threshold } = detect_issues_for_topic(storage, &topic.key, config, now)?;
        result.topics_scanned += 1;
        result.issues_created += issues_created;
        result.issues_updated += issues_updated;

        if issues_created > 0 || issues_updated > 0 {
            info!(topic = %topic.key, issues_created, issues_updated, mentions_below_cluster_threshold, "issue detection pass for topic");
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use govint_providers::{EmbeddingProvider, ProviderError};
    use govint_types::{Mention, MentionTopic, SourceType, Topic};
    use tempfile::TempDir;

    use super::*;

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

    fn seed_mention(storage: &Storage, id: &str, embedding: Vec<f32>) {
        let now = Utc::now();
        let mention = Mention::new(id, format!("mention {id} fuel prices"), now, "citizen_post", SourceType::Citizen, "op1");
        storage.put_mention(&mention).unwrap();
        storage.put_embedding(id, &embedding).unwrap();
        storage.put_mention_topic(&MentionTopic::new(format!("mt-{id}"), id, "fuel_pricing", 0.8, 0.5, 0.7)).unwrap();
    }

    #[tokio::test]
    async fn scans_every_active_topic_and_aggregates_outcomes() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::open(dir.path()).unwrap();
        storage.put_topic(&Topic::new("fuel_pricing", "Fuel Pricing", "", vec!["fuel".into()])).unwrap();
        seed_mention(&storage, "m1", vec![1.0, 0.0, 0.0]);
        seed_mention(&storage, "m2", vec![0.99, 0.01, 0.0]);
        seed_mention(&storage, "m3", vec![0.98, 0.02, 0.0]);

        let registry = TopicRegistry::load(&storage, &StubEmbedder).await.unwrap();
        let result = run_issue_detection(&storage, &registry, &IssueConfig::default(), Utc::now()).unwrap();
        assert_eq!(result.topics_scanned, 1);
        assert_eq!(result.issues_created, 1);
    }
}
