//! The Cycle Driver (C18, §6): the single `run_cycle` entrypoint that
//! sequences a full collection cycle — Raw Loader, Dedup sweep, Batch
//! Orchestrator (phases 4-6), and the aggregation/trend/baseline
//! refresh — and folds every phase's outcome into one `CycleSummary`.

use std::collections::HashMap;
use std::sync::atomic::AtomicBool;

use chrono::Utc;
use govint_config::{DeduplicationConfig, PathResolver, ProcessingConfig};
use govint_orchestrator::{run_enrichment_pass, run_issue_detection, run_until_caught_up, PipelineConfig};
use govint_sentiment::SentimentAnalyzer;
use govint_storage::Storage;
use govint_topics::TopicRegistry;
use tracing::{info, instrument};

use crate::error::SchedulerError;
use crate::jobs::{refresh_aggregations, run_dedup_sweep};

/// One collection cycle's outcome, folded phase by phase (§7).
#[derive(Debug, Default, Clone)]
pub struct CycleSummary {
    pub counts_per_phase: HashMap<String, u64>,
    pub failed_mention_ids: Vec<String>,
    pub durations_per_phase: HashMap<String, u64>,
}

impl CycleSummary {
    fn record(&mut self, phase: &str, count: u64, elapsed_ms: u64) {
        self.counts_per_phase.insert(phase.to_string(), count);
        self.durations_per_phase.insert(phase.to_string(), elapsed_ms);
    }
}

/// Run one full cycle.
///
/// When `use_existing_data` is true, phases 1–3 (Raw Loader, Dedup sweep)
/// are skipped entirely, and phase 4 becomes an enrichment pass over
/// already-`completed` mentions — filling in location and topic links
/// from their existing stored embedding rather than calling the LLM or
/// embedding provider again (§6).
#[instrument(skip(storage, registry, analyzer, path_resolver, processing_config, dedup_config, stop))]
#[allow(clippy::too_many_arguments)]
pub async fn run_cycle(
    storage: &Storage,
    registry: &TopicRegistry,
    analyzer: &SentimentAnalyzer,
    path_resolver: &PathResolver,
    operator_id: &str,
    use_existing_data: bool,
    processing_config: &ProcessingConfig,
    dedup_config: &DeduplicationConfig,
    stop: &AtomicBool,
) -> Result<CycleSummary, SchedulerError> {
    let mut summary = CycleSummary::default();

    if use_existing_data {
        let start = std::time::Instant::now();
        let enrichment_result = run_enrichment_pass(storage, registry, &processing_config.topic)?;
        summary.record("classify_and_analyze", enrichment_result.mentions_enriched as u64, start.elapsed().as_millis() as u64);
        info!(mentions_scanned = enrichment_result.mentions_scanned, mentions_enriched = enrichment_result.mentions_enriched, "enrichment pass complete");
    } else {
        let start = std::time::Instant::now();
        let load_summary = govint_ingest::load_raw_directory(storage, path_resolver.raw_input_path(), &path_resolver.raw_processed_path(), operator_id)?;
        summary.record("ingest", load_summary.mentions_loaded as u64, start.elapsed().as_millis() as u64);
        info!(mentions_loaded = load_summary.mentions_loaded, rows_skipped = load_summary.rows_skipped, "raw loader phase complete");

        let start = std::time::Instant::now();
        let dedup_summary = run_dedup_sweep(storage, dedup_config)?;
        summary.record("dedup", dedup_summary.duplicates_removed as u64, start.elapsed().as_millis() as u64);
        info!(duplicates_removed = dedup_summary.duplicates_removed, "dedup sweep phase complete");

        let start = std::time::Instant::now();
        let pipeline_config = PipelineConfig {
            batch_size: processing_config.parallel.sentiment_batch_size,
            max_workers: processing_config.parallel.max_sentiment_workers,
            max_retry_attempts: processing_config.retry.max_attempts,
        };
        let batch_result = run_until_caught_up(storage, registry, &processing_config.topic, analyzer, pipeline_config, stop).await?;
        summary.record("classify_and_analyze", batch_result.completed as u64, start.elapsed().as_millis() as u64);
        info!(completed = batch_result.completed, failed = batch_result.failed, "classification and sentiment analysis phase complete");
    }

    let start = std::time::Instant::now();
    let issue_result = run_issue_detection(storage, registry, &processing_config.issue, Utc::now())?;
    summary.record("issue_detection", (issue_result.issues_created + issue_result.issues_updated) as u64, start.elapsed().as_millis() as u64);
    info!(issues_created = issue_result.issues_created, issues_updated = issue_result.issues_updated, "issue detection phase complete");

    let start = std::time::Instant::now();
    let aggregation_result = refresh_aggregations(storage, registry, &processing_config.aggregation, Utc::now())?;
    summary.record("aggregation", aggregation_result.topics_refreshed as u64, start.elapsed().as_millis() as u64);
    info!(topics_refreshed = aggregation_result.topics_refreshed, "aggregation refresh phase complete");

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::io::Write;
    use std::sync::Arc;

    use async_trait::async_trait;
    use govint_emotion::{EmotionError, EmotionModel, ModelInfo};
    use govint_providers::{EmbeddingProvider, LlmProvider, ProviderError};
    use govint_types::EmotionDistribution;
    use tempfile::TempDir;

    use super::*;

    struct StubLlm;

    #[async_trait]
    impl LlmProvider for StubLlm {
        async fn chat(&self, _system: &str, _user: &str) -> Result<String, ProviderError> {
            Ok(r#"{"label": "NEGATIVE", "score": -0.4, "justification": "frustrated tone", "topic_hints": []}"#.to_string())
        }
    }

    struct StubEmbedder;

    #[async_trait]
    impl EmbeddingProvider for StubEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, ProviderError> {
            Ok(vec![0.2, 0.3, 0.4])
        }
        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
            Ok(texts.iter().map(|_| vec![0.2, 0.3, 0.4]).collect())
        }
    }

    struct StubEmotion(ModelInfo);

    impl EmotionModel for StubEmotion {
        fn info(&self) -> &ModelInfo {
            &self.0
        }
        fn classify(&self, _text: &str) -> Result<EmotionDistribution, EmotionError> {
            Ok(EmotionDistribution { anger: 0.6, neutral: 0.4, ..Default::default() })
        }
    }

    fn write_csv(dir: &std::path::Path, name: &str, body: &str) {
        let mut file = fs::File::create(dir.join(name)).unwrap();
        file.write_all(body.as_bytes()).unwrap();
    }

    #[tokio::test]
    async fn a_full_cycle_ingests_classifies_and_aggregates() {
        let tmp = TempDir::new().unwrap();
        let storage = Storage::open(&tmp.path().join("db")).unwrap();
        storage
            .put_topic(&govint_types::Topic::new("fuel_pricing", "Fuel Pricing", "", vec!["fuel".into(), "prices".into()]))
            .unwrap();

        let raw_dir = tmp.path().join("raw");
        fs::create_dir_all(&raw_dir).unwrap();
        write_csv(
            &raw_dir,
            "batch.csv",
            "text,url,published_at,source,platform,likes\n\
             fuel prices are rising and people are angry,https://example.com/a,2026-01-01T00:00:00Z,citizen,twitter,10\n\
             fuel costs keep climbing this month,https://example.com/b,2026-01-01T00:05:00Z,citizen,twitter,20\n\
             fuel prices remain a constant worry,https://example.com/c,2026-01-01T00:10:00Z,citizen,twitter,5\n",
        );

        let analyzer = SentimentAnalyzer::new(
            Arc::new(StubLlm),
            Arc::new(StubEmotion(ModelInfo { name: "stub".into(), max_sequence_length: 256 })),
            Arc::new(StubEmbedder),
            govint_config::EngagementConfig::default(),
        );
        let registry = TopicRegistry::load(&storage, &StubEmbedder).await.unwrap();

        let mut bootstrap = govint_config::BootstrapSettings::default();
        bootstrap.raw_input_path = raw_dir.to_string_lossy().to_string();
        let path_resolver = PathResolver::from_bootstrap(&bootstrap);

        let processing_config = ProcessingConfig { aggregation: govint_config::AggregationConfig { min_mentions: 1, trend_eps: 2.0 }, ..Default::default() };
        let dedup_config = DeduplicationConfig::default();
        let stop = AtomicBool::new(false);

        let summary = run_cycle(&storage, &registry, &analyzer, &path_resolver, "operator-1", false, &processing_config, &dedup_config, &stop)
            .await
            .unwrap();

        assert_eq!(summary.counts_per_phase["ingest"], 3);
        assert_eq!(summary.counts_per_phase["classify_and_analyze"], 3);
        assert!(storage.list_pending_mentions().unwrap().is_empty());
    }

    #[tokio::test]
    async fn use_existing_data_skips_ingest_and_reanalysis() {
        let tmp = TempDir::new().unwrap();
        let storage = Storage::open(&tmp.path().join("db")).unwrap();
        storage
            .put_topic(&govint_types::Topic::new("fuel_pricing", "Fuel Pricing", "", vec!["fuel".into(), "prices".into()]))
            .unwrap();

        let mut mention = govint_types::Mention::new(
            "m1",
            "fuel prices are rising across the region",
            chrono::Utc::now(),
            "twitter",
            govint_types::SourceType::Citizen,
            "operator-1",
        );
        mention = mention.with_declared_location("Lagos");
        mention.mark_processing();
        mention
            .mark_completed(govint_types::SentimentLabel::Negative, -0.4, "angry".into(), "anger".into(), 0.7, std::collections::HashMap::new(), 2.0, 0.9)
            .unwrap();
        storage.put_mention(&mention).unwrap();
        storage.put_embedding("m1", &[0.2, 0.3, 0.4]).unwrap();

        let analyzer = SentimentAnalyzer::new(
            Arc::new(StubLlm),
            Arc::new(StubEmotion(ModelInfo { name: "stub".into(), max_sequence_length: 256 })),
            Arc::new(StubEmbedder),
            govint_config::EngagementConfig::default(),
        );
        let registry = TopicRegistry::load(&storage, &StubEmbedder).await.unwrap();

        let bootstrap = govint_config::BootstrapSettings::default();
        let path_resolver = PathResolver::from_bootstrap(&bootstrap);

        let processing_config = ProcessingConfig { aggregation: govint_config::AggregationConfig { min_mentions: 1, trend_eps: 2.0 }, ..Default::default() };
        let dedup_config = DeduplicationConfig::default();
        let stop = AtomicBool::new(false);

        let summary = run_cycle(&storage, &registry, &analyzer, &path_resolver, "operator-1", true, &processing_config, &dedup_config, &stop)
            .await
            .unwrap();

        assert!(!summary.counts_per_phase.contains_key("ingest"));
        assert!(!summary.counts_per_phase.contains_key("dedup"));
        assert_eq!(summary.counts_per_phase["classify_and_analyze"], 1);

        let updated = storage.get_mention("m1").unwrap().unwrap();
        assert_eq!(updated.location_label.as_deref(), Some("Lagos"));
        assert_eq!(updated.sentiment_score, Some(-0.4));
    }
}
