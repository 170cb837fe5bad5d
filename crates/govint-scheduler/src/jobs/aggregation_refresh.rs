//! Aggregation refresh: recomputes the Sentiment Aggregator and Trend &
//! Baseline snapshots (§4.6) for every active topic once a cycle's
//! classification has caught up. Storage-aware glue around the pure
//! `govint-aggregation` functions, which know nothing about `Storage`
//! or `Mention`.

use chrono::{DateTime, Duration, Utc};
use govint_aggregation::{aggregate, compute_baseline, compute_trend, AggregationMember};
use govint_config::AggregationConfig;
use govint_storage::Storage;
use govint_topics::TopicRegistry;
use govint_types::{AggregationType, EmotionDistribution, Mention, TimeWindow};
use tracing::{info, instrument};

use crate::error::SchedulerError;

/// Daily buckets looked back over when computing a topic's baseline.
/// Not part of the configuration surface (§6 lists only
/// `processing.aggregation.min_mentions`/`.trend_eps`); a stable
/// compile-time constant keeps baseline semantics predictable across
/// cycles rather than letting it drift with an unrelated config key.
const BASELINE_LOOKBACK_DAYS: u32 = 30;

#[derive(Debug, Default, Clone, Copy)]
pub struct AggregationRefreshSummary {
    pub topics_refreshed: usize,
    pub aggregations_published: usize,
    pub trends_published: usize,
    pub baselines_published: usize,
}

fn completed_mentions_for_topic(storage: &Storage, topic_key: &str) -> Result<Vec<Mention>, SchedulerError> {
    let mut out = Vec::new();
    for link in storage.get_mention_topics_for_topic(topic_key)? {
        if let Some(mention) = storage.get_mention(&link.mention_id)? {
            if mention.is_completed() {
                out.push(mention);
            }
        }
    }
    Ok(out)
}

fn member_for(mention: &Mention) -> Option<AggregationMember> {
    Some(AggregationMember {
        sentiment_label: mention.sentiment_label?,
        sentiment_score: mention.sentiment_score?,
        emotion: mention
            .emotion_distribution
            .as_ref()
            .map(EmotionDistribution::from_hashmap)
            .unwrap_or_default(),
        influence_weight: mention.influence_weight?,
        confidence_weight: mention.confidence_weight?,
    })
}

fn members_in_range(mentions: &[Mention], start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<AggregationMember> {
    mentions
        .iter()
        .filter(|m| m.published_at >= start && m.published_at < end)
        .filter_map(member_for)
        .collect()
}

/// Recompute the current-window aggregation, the period-over-period
/// trend against the prior window of equal length, and the 30-day daily
/// baseline, for one topic.
fn refresh_topic(storage: &Storage, topic_key: &str, config: &AggregationConfig, now: DateTime<Utc>) -> Result<(usize, usize, usize), SchedulerError> {
    let mentions = completed_mentions_for_topic(storage, topic_key)?;
    if mentions.len() < config.min_mentions as usize {
        return Ok((0, 0, 0));
    }

    let window = TimeWindow::TwentyFourHours;
    let window_len = window.duration();
    let period_end = now;
    let period_start = period_end - window_len;
    let previous_period_end = period_start;
    let previous_period_start = previous_period_end - window_len;

    let current_members = members_in_range(&mentions, period_start, period_end);
    let current_agg = aggregate(AggregationType::Topic, topic_key, window, &current_members);
    storage.put_aggregation(&current_agg)?;
    let aggregations_published = 1;

    let previous_members = members_in_range(&mentions, previous_period_start, previous_period_end);
    let previous_agg = aggregate(AggregationType::Topic, topic_key, window, &previous_members);

    let trend = compute_trend(
        AggregationType::Topic,
        topic_key,
        window,
        &current_agg,
        &previous_agg,
        config.trend_eps,
        period_start,
        period_end,
        previous_period_start,
        previous_period_end,
    );
    storage.put_trend(&trend)?;
    let trends_published = 1;

    let mut daily_indices = Vec::with_capacity(BASELINE_LOOKBACK_DAYS as usize);
    for day in 0..BASELINE_LOOKBACK_DAYS {
        let day_end = now - Duration::days(day as i64);
        let day_start = day_end - Duration::days(1);
        let day_members = members_in_range(&mentions, day_start, day_end);
        if day_members.is_empty() {
            continue;
        }
        let day_agg = aggregate(AggregationType::Topic, topic_key, TimeWindow::TwentyFourHours, &day_members);
        daily_indices.push(day_agg.sentiment_index);
    }
    let baseline = compute_baseline(topic_key, &daily_indices, BASELINE_LOOKBACK_DAYS);
    storage.put_baseline(&baseline)?;

    Ok((aggregations_published, trends_published, 1))
}

/// Refresh aggregations, trends, and baselines for every active topic.
#[instrument(skip(storage, registry, config))]
pub fn refresh_aggregations(storage: &Storage, registry: &TopicRegistry, config: &AggregationConfig, now: DateTime<Utc>) -> Result<AggregationRefreshSummary, SchedulerError> {
    let mut summary = AggregationRefreshSummary::default();

    for topic in registry.active_topics() {
        let (aggregations, trends, baselines) = refresh_topic(storage, &topic.key, config, now)?;
        summary.topics_refreshed += 1;
        summary.aggregations_published += aggregations;
        summary.trends_published += trends;
        summary.baselines_published += baselines;
    }

    if summary.aggregations_published > 0 {
        info!(topics_refreshed = summary.topics_refreshed, aggregations_published = summary.aggregations_published, "aggregation refresh complete");
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use govint_providers::{EmbeddingProvider, ProviderError};
    use govint_types::{MentionTopic, SentimentLabel, SourceType, Topic};
    use tempfile::TempDir;

    use super::*;

    struct StubEmbedder;

    #[async_trait]
    impl EmbeddingProvider for StubEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, ProviderError> {
            Ok(vec![0.1, 0.2])
        }
        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
            Ok(texts.iter().map(|_| vec![0.1, 0.2]).collect())
        }
    }

    fn seed_completed_mention(storage: &Storage, id: &str, published_at: DateTime<Utc>) {
        let mut mention = Mention::new(id, format!("mention {id} about fuel prices"), published_at, "twitter", SourceType::Citizen, "op1");
        mention.mark_processing();
        mention
            .mark_completed(SentimentLabel::Negative, -0.4, "angry".into(), "anger".into(), 0.7, std::collections::HashMap::new(), 2.0, 0.9)
            .unwrap();
        storage.put_mention(&mention).unwrap();
        storage.put_mention_topic(&MentionTopic::new(format!("mt-{id}"), id, "fuel_pricing", 0.8, 0.5, 0.7)).unwrap();
    }

    #[tokio::test]
    async fn refreshes_aggregation_trend_and_baseline_for_active_topics() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::open(dir.path()).unwrap();
        storage.put_topic(&Topic::new("fuel_pricing", "Fuel Pricing", "", vec!["fuel".into()])).unwrap();

        let now = Utc::now();
        seed_completed_mention(&storage, "m1", now - Duration::hours(1));
        seed_completed_mention(&storage, "m2", now - Duration::hours(2));
        seed_completed_mention(&storage, "m3", now - Duration::hours(3));

        let registry = TopicRegistry::load(&storage, &StubEmbedder).await.unwrap();
        let config = AggregationConfig { min_mentions: 3, trend_eps: 2.0 };
        let summary = refresh_aggregations(&storage, &registry, &config, now).unwrap();

        assert_eq!(summary.topics_refreshed, 1);
        assert_eq!(summary.aggregations_published, 1);
        assert_eq!(summary.baselines_published, 1);

        let agg = storage.get_aggregation("topic", "fuel_pricing", "24h").unwrap().unwrap();
        assert_eq!(agg.mention_count, 3);

        let baseline = storage.get_baseline("fuel_pricing").unwrap().unwrap();
        assert_eq!(baseline.lookback_days, 30);
    }

    #[tokio::test]
    async fn topic_below_min_mentions_is_skipped() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::open(dir.path()).unwrap();
        storage.put_topic(&Topic::new("fuel_pricing", "Fuel Pricing", "", vec!["fuel".into()])).unwrap();

        let now = Utc::now();
        seed_completed_mention(&storage, "m1", now - Duration::hours(1));

        let registry = TopicRegistry::load(&storage, &StubEmbedder).await.unwrap();
        let config = AggregationConfig { min_mentions: 3, trend_eps: 2.0 };
        let summary = refresh_aggregations(&storage, &registry, &config, now).unwrap();

        assert_eq!(summary.topics_refreshed, 1);
        assert_eq!(summary.aggregations_published, 0);
        assert!(storage.get_aggregation("topic", "fuel_pricing", "24h").unwrap().is_none());
    }
}
