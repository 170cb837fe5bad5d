//! Typed structs for every configurable sub-area named in the
//! configuration surface (§6), each with `default_x()` free functions
//! feeding `#[serde(default = "default_x")]` — the texture of the
//! teacher's `TopicsConfig`. These are the compiled-in defaults the
//! [`crate::store::ConfigStore`] seeds itself with before layering
//! persisted entries and environment overrides on top.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParallelConfig {
    #[serde(default = "default_max_sentiment_workers")]
    pub max_sentiment_workers: usize,
    #[serde(default = "default_location_batch_size")]
    pub location_batch_size: usize,
    #[serde(default = "default_sentiment_batch_size")]
    pub sentiment_batch_size: usize,
}

fn default_max_sentiment_workers() -> usize {
    20
}
fn default_location_batch_size() -> usize {
    300
}
fn default_sentiment_batch_size() -> usize {
    150
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            max_sentiment_workers: default_max_sentiment_workers(),
            location_batch_size: default_location_batch_size(),
            sentiment_batch_size: default_sentiment_batch_size(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutsConfig {
    #[serde(default = "default_collector_timeout_seconds")]
    pub collector_timeout_seconds: u64,
    #[serde(default = "default_batch_timeout_seconds")]
    pub batch_timeout_seconds: u64,
    #[serde(default = "default_http_request_timeout")]
    pub http_request_timeout: u64,
}

fn default_collector_timeout_seconds() -> u64 {
    1000
}
fn default_batch_timeout_seconds() -> u64 {
    300
}
fn default_http_request_timeout() -> u64 {
    120
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        Self {
            collector_timeout_seconds: default_collector_timeout_seconds(),
            batch_timeout_seconds: default_batch_timeout_seconds(),
            http_request_timeout: default_http_request_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_max_attempts() -> u32 {
    3
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicConfig {
    #[serde(default = "default_min_score_threshold")]
    pub min_score_threshold: f32,
    #[serde(default = "default_max_topics")]
    pub max_topics: usize,
    #[serde(default = "default_keyword_weight")]
    pub keyword_weight: f32,
    #[serde(default = "default_embedding_weight")]
    pub embedding_weight: f32,
}

fn default_min_score_threshold() -> f32 {
    0.2
}
fn default_max_topics() -> usize {
    5
}
fn default_keyword_weight() -> f32 {
    0.4
}
fn default_embedding_weight() -> f32 {
    0.6
}

impl Default for TopicConfig {
    fn default() -> Self {
        Self {
            min_score_threshold: default_min_score_threshold(),
            max_topics: default_max_topics(),
            keyword_weight: default_keyword_weight(),
            embedding_weight: default_embedding_weight(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentConfig {
    #[serde(default = "default_positive_threshold")]
    pub positive_threshold: f32,
    #[serde(default = "default_negative_threshold")]
    pub negative_threshold: f32,
}

fn default_positive_threshold() -> f32 {
    0.2
}
fn default_negative_threshold() -> f32 {
    -0.2
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            positive_threshold: default_positive_threshold(),
            negative_threshold: default_negative_threshold(),
        }
    }
}

/// Engagement-to-influence-weight boost curve (§4.3 Open Question
/// resolution): each metric contributes a diminishing-returns boost
/// `cap * (1 - e^(-metric / scale))`, summed and added to the source
/// class's base weight before clamping to the class's ceiling and the
/// global `[1, 5]` envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngagementConfig {
    #[serde(default = "default_engagement_boost_cap")]
    pub boost_cap: f32,
    #[serde(default = "default_likes_scale")]
    pub likes_scale: f64,
    #[serde(default = "default_shares_scale")]
    pub shares_scale: f64,
    #[serde(default = "default_comments_scale")]
    pub comments_scale: f64,
    #[serde(default = "default_reach_scale")]
    pub reach_scale: f64,
}

fn default_engagement_boost_cap() -> f32 {
    1.0
}
fn default_likes_scale() -> f64 {
    500.0
}
fn default_shares_scale() -> f64 {
    200.0
}
fn default_comments_scale() -> f64 {
    100.0
}
fn default_reach_scale() -> f64 {
    5000.0
}

impl Default for EngagementConfig {
    fn default() -> Self {
        Self {
            boost_cap: default_engagement_boost_cap(),
            likes_scale: default_likes_scale(),
            shares_scale: default_shares_scale(),
            comments_scale: default_comments_scale(),
            reach_scale: default_reach_scale(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeConfig {
    #[serde(default = "default_time_window_hours")]
    pub time_window_hours: u32,
}

fn default_time_window_hours() -> u32 {
    24
}

impl Default for VolumeConfig {
    fn default() -> Self {
        Self {
            time_window_hours: default_time_window_hours(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriorityConfig {
    #[serde(default = "default_sentiment_weight")]
    pub sentiment_weight: f32,
    #[serde(default = "default_volume_weight")]
    pub volume_weight: f32,
    #[serde(default = "default_time_weight")]
    pub time_weight: f32,
    #[serde(default = "default_velocity_weight")]
    pub velocity_weight: f32,
}

fn default_sentiment_weight() -> f32 {
    0.4
}
fn default_volume_weight() -> f32 {
    0.3
}
fn default_time_weight() -> f32 {
    0.2
}
fn default_velocity_weight() -> f32 {
    0.1
}

impl Default for PriorityConfig {
    fn default() -> Self {
        Self {
            sentiment_weight: default_sentiment_weight(),
            volume_weight: default_volume_weight(),
            time_weight: default_time_weight(),
            velocity_weight: default_velocity_weight(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueLifecycleConfig {
    #[serde(default = "default_resolved_threshold_days")]
    pub resolved_threshold_days: u32,
}

fn default_resolved_threshold_days() -> u32 {
    7
}

impl Default for IssueLifecycleConfig {
    fn default() -> Self {
        Self {
            resolved_threshold_days: default_resolved_threshold_days(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueConfig {
    #[serde(default = "default_cluster_similarity_threshold")]
    pub cluster_similarity_threshold: f32,
    #[serde(default = "default_issue_similarity_threshold")]
    pub issue_similarity_threshold: f32,
    #[serde(default = "default_min_cluster_size")]
    pub min_cluster_size: usize,
    /// How close in time a new cluster's latest member must be to an
    /// existing issue's `last_activity` to still count as the same issue
    /// (§4.5's match-or-create time-window check). Not named in the
    /// dotted-key table; defaulted here since the formula requires it.
    #[serde(default = "default_match_time_window_hours")]
    pub match_time_window_hours: u32,
    #[serde(default)]
    pub volume: VolumeConfig,
    #[serde(default)]
    pub priority: PriorityConfig,
    #[serde(default)]
    pub lifecycle: IssueLifecycleConfig,
}

fn default_cluster_similarity_threshold() -> f32 {
    0.75
}
fn default_match_time_window_hours() -> u32 {
    48
}
fn default_issue_similarity_threshold() -> f32 {
    0.70
}
fn default_min_cluster_size() -> usize {
    3
}

impl Default for IssueConfig {
    fn default() -> Self {
        Self {
            cluster_similarity_threshold: default_cluster_similarity_threshold(),
            issue_similarity_threshold: default_issue_similarity_threshold(),
            min_cluster_size: default_min_cluster_size(),
            match_time_window_hours: default_match_time_window_hours(),
            volume: VolumeConfig::default(),
            priority: PriorityConfig::default(),
            lifecycle: IssueLifecycleConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationConfig {
    #[serde(default = "default_agg_min_mentions")]
    pub min_mentions: u64,
    #[serde(default = "default_trend_eps")]
    pub trend_eps: f32,
}

fn default_agg_min_mentions() -> u64 {
    3
}
fn default_trend_eps() -> f32 {
    2.0
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            min_mentions: default_agg_min_mentions(),
            trend_eps: default_trend_eps(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeduplicationConfig {
    #[serde(default = "default_dedup_similarity_threshold")]
    pub similarity_threshold: f32,
    #[serde(default = "default_dedup_window_days")]
    pub window_days: u32,
}

fn default_dedup_similarity_threshold() -> f32 {
    0.85
}
fn default_dedup_window_days() -> u32 {
    7
}

impl Default for DeduplicationConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_dedup_similarity_threshold(),
            window_days: default_dedup_window_days(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmModelsConfig {
    #[serde(default)]
    pub available: Vec<String>,
    #[serde(default)]
    pub tpm_capacities: std::collections::HashMap<String, u64>,
}

impl Default for LlmModelsConfig {
    fn default() -> Self {
        Self {
            available: vec!["default".to_string()],
            tpm_capacities: std::collections::HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsConfig {
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
    #[serde(default)]
    pub llm_models: LlmModelsConfig,
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            embedding_model: default_embedding_model(),
            llm_models: LlmModelsConfig::default(),
        }
    }
}

/// Everything under `processing.*`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessingConfig {
    #[serde(default)]
    pub parallel: ParallelConfig,
    #[serde(default)]
    pub timeouts: TimeoutsConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub topic: TopicConfig,
    #[serde(default)]
    pub sentiment: SentimentConfig,
    #[serde(default)]
    pub engagement: EngagementConfig,
    #[serde(default)]
    pub issue: IssueConfig,
    #[serde(default)]
    pub aggregation: AggregationConfig,
}

/// The whole recognized configuration surface (§6), grouped by category
/// the same way `config_entries.category` groups rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeDefaults {
    #[serde(default)]
    pub processing: ProcessingConfig,
    #[serde(default)]
    pub deduplication: DeduplicationConfig,
    #[serde(default)]
    pub models: ModelsConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec_values() {
        let defaults = RuntimeDefaults::default();
        assert_eq!(defaults.processing.parallel.max_sentiment_workers, 20);
        assert_eq!(defaults.processing.topic.min_score_threshold, 0.2);
        assert_eq!(defaults.processing.issue.cluster_similarity_threshold, 0.75);
        assert_eq!(defaults.processing.issue.priority.sentiment_weight, 0.4);
        assert_eq!(defaults.processing.aggregation.trend_eps, 2.0);
        assert_eq!(defaults.deduplication.similarity_threshold, 0.85);
        assert_eq!(defaults.processing.retry.max_attempts, 3);
        assert_eq!(defaults.processing.engagement.boost_cap, 1.0);
    }
}
