//! The Config Store (C1): a database-backed, dotted-key configuration
//! surface with typed getters, a global write lock, and lock-free
//! snapshot reads (§4.1).
//!
//! Every mutating `set()` call persists the new `ConfigEntry`, appends
//! exactly one `ConfigAudit` row (even when the value is unchanged —
//! `reason = "noop"` is allowed), and swaps the in-memory snapshot under
//! a short write lock so concurrent readers never block on a writer.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::Utc;
use govint_storage::Storage;
use govint_types::{ConfigAudit, ConfigEntry, ConfigValueType};
use serde_json::Value;
use tracing::{info, instrument};

use crate::error::ConfigError;
use crate::sections::RuntimeDefaults;

/// One compiled-in default: `(category, key, value, type, description)`.
type SeedEntry = (&'static str, &'static str, Value, ConfigValueType, &'static str);

fn seed_entries() -> Vec<SeedEntry> {
    let d = RuntimeDefaults::default();
    vec![
        (
            "processing.parallel",
            "max_sentiment_workers",
            Value::from(d.processing.parallel.max_sentiment_workers),
            ConfigValueType::Int,
            "thread pool size for parallel topic/sentiment analysis",
        ),
        (
            "processing.parallel",
            "location_batch_size",
            Value::from(d.processing.parallel.location_batch_size),
            ConfigValueType::Int,
            "batch size for the location resolution pass",
        ),
        (
            "processing.parallel",
            "sentiment_batch_size",
            Value::from(d.processing.parallel.sentiment_batch_size),
            ConfigValueType::Int,
            "batch size for the sentiment analysis pass",
        ),
        (
            "processing.timeouts",
            "collector_timeout_seconds",
            Value::from(d.processing.timeouts.collector_timeout_seconds),
            ConfigValueType::Int,
            "max time to wait on the raw collector per cycle",
        ),
        (
            "processing.timeouts",
            "batch_timeout_seconds",
            Value::from(d.processing.timeouts.batch_timeout_seconds),
            ConfigValueType::Int,
            "max time a claimed batch may run before rollback",
        ),
        (
            "processing.timeouts",
            "http_request_timeout",
            Value::from(d.processing.timeouts.http_request_timeout),
            ConfigValueType::Int,
            "per-request timeout for embedding/LLM provider calls",
        ),
        (
            "processing.retry",
            "max_attempts",
            Value::from(d.processing.retry.max_attempts),
            ConfigValueType::Int,
            "max retry attempts for transient external errors",
        ),
        (
            "processing.topic",
            "min_score_threshold",
            Value::from(d.processing.topic.min_score_threshold),
            ConfigValueType::Float,
            "minimum combined score for a topic to be attached",
        ),
        (
            "processing.topic",
            "max_topics",
            Value::from(d.processing.topic.max_topics),
            ConfigValueType::Int,
            "max topics attached per mention",
        ),
        (
            "processing.topic",
            "keyword_weight",
            Value::from(d.processing.topic.keyword_weight),
            ConfigValueType::Float,
            "weight of keyword score in the combined topic score",
        ),
        (
            "processing.topic",
            "embedding_weight",
            Value::from(d.processing.topic.embedding_weight),
            ConfigValueType::Float,
            "weight of embedding score in the combined topic score",
        ),
        (
            "processing.sentiment",
            "positive_threshold",
            Value::from(d.processing.sentiment.positive_threshold),
            ConfigValueType::Float,
            "minimum score for a positive sentiment label",
        ),
        (
            "processing.sentiment",
            "negative_threshold",
            Value::from(d.processing.sentiment.negative_threshold),
            ConfigValueType::Float,
            "maximum score for a negative sentiment label",
        ),
        (
            "processing.issue",
            "cluster_similarity_threshold",
            Value::from(d.processing.issue.cluster_similarity_threshold),
            ConfigValueType::Float,
            "minimum centroid similarity to join an existing cluster",
        ),
        (
            "processing.issue",
            "issue_similarity_threshold",
            Value::from(d.processing.issue.issue_similarity_threshold),
            ConfigValueType::Float,
            "minimum similarity for match-or-create against an existing issue",
        ),
        (
            "processing.issue",
            "min_cluster_size",
            Value::from(d.processing.issue.min_cluster_size),
            ConfigValueType::Int,
            "minimum mentions required to seed a new issue",
        ),
        (
            "processing.issue.volume",
            "time_window_hours",
            Value::from(d.processing.issue.volume.time_window_hours),
            ConfigValueType::Int,
            "window used to compute current vs previous volume",
        ),
        (
            "processing.issue.priority",
            "sentiment_weight",
            Value::from(d.processing.issue.priority.sentiment_weight),
            ConfigValueType::Float,
            "priority score weight for sentiment severity",
        ),
        (
            "processing.issue.priority",
            "volume_weight",
            Value::from(d.processing.issue.priority.volume_weight),
            ConfigValueType::Float,
            "priority score weight for mention volume",
        ),
        (
            "processing.issue.priority",
            "time_weight",
            Value::from(d.processing.issue.priority.time_weight),
            ConfigValueType::Float,
            "priority score weight for issue recency",
        ),
        (
            "processing.issue.priority",
            "velocity_weight",
            Value::from(d.processing.issue.priority.velocity_weight),
            ConfigValueType::Float,
            "priority score weight for volume velocity",
        ),
        (
            "processing.issue.lifecycle",
            "resolved_threshold_days",
            Value::from(d.processing.issue.lifecycle.resolved_threshold_days),
            ConfigValueType::Int,
            "days of inactivity before an active issue is resolved",
        ),
        (
            "processing.issue",
            "match_time_window_hours",
            Value::from(d.processing.issue.match_time_window_hours),
            ConfigValueType::Int,
            "max gap between a candidate issue's last activity and a cluster's latest member to still match",
        ),
        (
            "processing.engagement",
            "boost_cap",
            Value::from(d.processing.engagement.boost_cap),
            ConfigValueType::Float,
            "maximum influence-weight boost contributed by any single engagement metric",
        ),
        (
            "processing.engagement",
            "likes_scale",
            Value::from(d.processing.engagement.likes_scale),
            ConfigValueType::Float,
            "saturation scale for the likes-count engagement boost",
        ),
        (
            "processing.engagement",
            "shares_scale",
            Value::from(d.processing.engagement.shares_scale),
            ConfigValueType::Float,
            "saturation scale for the shares-count engagement boost",
        ),
        (
            "processing.engagement",
            "comments_scale",
            Value::from(d.processing.engagement.comments_scale),
            ConfigValueType::Float,
            "saturation scale for the comments-count engagement boost",
        ),
        (
            "processing.engagement",
            "reach_scale",
            Value::from(d.processing.engagement.reach_scale),
            ConfigValueType::Float,
            "saturation scale for the reach-count engagement boost",
        ),
        (
            "processing.aggregation",
            "min_mentions",
            Value::from(d.processing.aggregation.min_mentions),
            ConfigValueType::Int,
            "minimum mentions required to publish an aggregation snapshot",
        ),
        (
            "processing.aggregation",
            "trend_eps",
            Value::from(d.processing.aggregation.trend_eps),
            ConfigValueType::Float,
            "dead zone around zero delta classified as stable",
        ),
        (
            "deduplication",
            "similarity_threshold",
            Value::from(d.deduplication.similarity_threshold),
            ConfigValueType::Float,
            "minimum similarity for two mentions to be treated as duplicates",
        ),
        (
            "deduplication",
            "window_days",
            Value::from(d.deduplication.window_days),
            ConfigValueType::Int,
            "lookback window for duplicate candidate search",
        ),
        (
            "models",
            "embedding_model",
            Value::from(d.models.embedding_model),
            ConfigValueType::String,
            "embedding model identifier passed to the Embedding Provider",
        ),
        (
            "models.llm_models",
            "available",
            serde_json::to_value(d.models.llm_models.available).unwrap(),
            ConfigValueType::Array,
            "LLM model identifiers the Rate Limiter tracks budgets for",
        ),
        (
            "models.llm_models",
            "tpm_capacities",
            serde_json::to_value(d.models.llm_models.tpm_capacities).unwrap(),
            ConfigValueType::Json,
            "per-model tokens-per-minute budget",
        ),
    ]
}

fn dotted(category: &str, key: &str) -> String {
    format!("{category}.{key}")
}

/// Database-backed configuration store, shared across the running
/// process behind an `Arc`.
pub struct ConfigStore {
    storage: Arc<Storage>,
    snapshot: RwLock<HashMap<String, Value>>,
}

impl ConfigStore {
    /// Seed the store: compiled defaults, then any persisted entries
    /// from a prior run, then `GOVINT_<CATEGORY>__<KEY>` environment
    /// overrides, highest precedence last.
    #[instrument(skip(storage))]
    pub fn load(storage: Arc<Storage>) -> Result<Self, ConfigError> {
        let mut snapshot = HashMap::new();

        for (category, key, value, value_type, description) in seed_entries() {
            let dotted_key = dotted(category, key);
            snapshot.insert(dotted_key.clone(), value.clone());

            if storage.get_config_entry(category, key)?.is_none() {
                storage.put_config_entry(&ConfigEntry {
                    category: category.to_string(),
                    key: key.to_string(),
                    value,
                    value_type,
                    description: description.to_string(),
                    default_value: snapshot[&dotted_key].clone(),
                    active: true,
                    updated_by: "bootstrap".to_string(),
                    updated_at: Utc::now(),
                })?;
            }
        }

        for entry in storage.list_all_config_entries()? {
            if entry.active {
                snapshot.insert(dotted(&entry.category, &entry.key), entry.value);
            }
        }

        apply_env_overrides(&mut snapshot);

        Ok(Self {
            storage,
            snapshot: RwLock::new(snapshot),
        })
    }

    fn snapshot_get(&self, dotted_key: &str) -> Option<Value> {
        self.snapshot.read().unwrap().get(dotted_key).cloned()
    }

    pub fn get(&self, dotted_key: &str) -> Result<Value, ConfigError> {
        self.snapshot_get(dotted_key)
            .ok_or_else(|| ConfigError::Missing(dotted_key.to_string()))
    }

    /// Unknown keys return `default` rather than raising.
    pub fn get_or(&self, dotted_key: &str, default: Value) -> Value {
        self.snapshot_get(dotted_key).unwrap_or(default)
    }

    pub fn get_int(&self, dotted_key: &str) -> Result<i64, ConfigError> {
        let value = self.get(dotted_key)?;
        value.as_i64().ok_or_else(|| ConfigError::TypeMismatch {
            key: dotted_key.to_string(),
            expected: "int",
            actual: json_type_name(&value).to_string(),
        })
    }

    pub fn get_float(&self, dotted_key: &str) -> Result<f64, ConfigError> {
        let value = self.get(dotted_key)?;
        value.as_f64().ok_or_else(|| ConfigError::TypeMismatch {
            key: dotted_key.to_string(),
            expected: "float",
            actual: json_type_name(&value).to_string(),
        })
    }

    pub fn get_bool(&self, dotted_key: &str) -> Result<bool, ConfigError> {
        let value = self.get(dotted_key)?;
        value.as_bool().ok_or_else(|| ConfigError::TypeMismatch {
            key: dotted_key.to_string(),
            expected: "bool",
            actual: json_type_name(&value).to_string(),
        })
    }

    pub fn get_string(&self, dotted_key: &str) -> Result<String, ConfigError> {
        let value = self.get(dotted_key)?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ConfigError::TypeMismatch {
                key: dotted_key.to_string(),
                expected: "string",
                actual: json_type_name(&value).to_string(),
            })
    }

    pub fn get_list(&self, dotted_key: &str) -> Result<Vec<Value>, ConfigError> {
        let value = self.get(dotted_key)?;
        value
            .as_array()
            .cloned()
            .ok_or_else(|| ConfigError::TypeMismatch {
                key: dotted_key.to_string(),
                expected: "array",
                actual: json_type_name(&value).to_string(),
            })
    }

    pub fn get_object(&self, dotted_key: &str) -> Result<serde_json::Map<String, Value>, ConfigError> {
        let value = self.get(dotted_key)?;
        value
            .as_object()
            .cloned()
            .ok_or_else(|| ConfigError::TypeMismatch {
                key: dotted_key.to_string(),
                expected: "object",
                actual: json_type_name(&value).to_string(),
            })
    }

    /// Materialize the whole `processing.*` surface into the typed
    /// struct callers actually want to pass around (the Cycle Driver's
    /// per-cycle config, handed to the orchestrator, dedup sweep, and
    /// aggregation refresh). Every field was seeded by [`Self::load`],
    /// so only a corrupted store would make a lookup fail.
    pub fn processing_config(&self) -> Result<crate::sections::ProcessingConfig, ConfigError> {
        Ok(crate::sections::ProcessingConfig {
            parallel: crate::sections::ParallelConfig {
                max_sentiment_workers: self.get_int("processing.parallel.max_sentiment_workers")? as usize,
                location_batch_size: self.get_int("processing.parallel.location_batch_size")? as usize,
                sentiment_batch_size: self.get_int("processing.parallel.sentiment_batch_size")? as usize,
            },
            timeouts: crate::sections::TimeoutsConfig {
                collector_timeout_seconds: self.get_int("processing.timeouts.collector_timeout_seconds")? as u64,
                batch_timeout_seconds: self.get_int("processing.timeouts.batch_timeout_seconds")? as u64,
                http_request_timeout: self.get_int("processing.timeouts.http_request_timeout")? as u64,
            },
            retry: crate::sections::RetryConfig {
                max_attempts: self.get_int("processing.retry.max_attempts")? as u32,
            },
            topic: crate::sections::TopicConfig {
                min_score_threshold: self.get_float("processing.topic.min_score_threshold")? as f32,
                max_topics: self.get_int("processing.topic.max_topics")? as usize,
                keyword_weight: self.get_float("processing.topic.keyword_weight")? as f32,
                embedding_weight: self.get_float("processing.topic.embedding_weight")? as f32,
            },
            sentiment: crate::sections::SentimentConfig {
                positive_threshold: self.get_float("processing.sentiment.positive_threshold")? as f32,
                negative_threshold: self.get_float("processing.sentiment.negative_threshold")? as f32,
            },
            engagement: crate::sections::EngagementConfig {
                boost_cap: self.get_float("processing.engagement.boost_cap")? as f32,
                likes_scale: self.get_float("processing.engagement.likes_scale")?,
                shares_scale: self.get_float("processing.engagement.shares_scale")?,
                comments_scale: self.get_float("processing.engagement.comments_scale")?,
                reach_scale: self.get_float("processing.engagement.reach_scale")?,
            },
            issue: crate::sections::IssueConfig {
                cluster_similarity_threshold: self.get_float("processing.issue.cluster_similarity_threshold")? as f32,
                issue_similarity_threshold: self.get_float("processing.issue.issue_similarity_threshold")? as f32,
                min_cluster_size: self.get_int("processing.issue.min_cluster_size")? as usize,
                match_time_window_hours: self.get_int("processing.issue.match_time_window_hours")? as u32,
                volume: crate::sections::VolumeConfig {
                    time_window_hours: self.get_int("processing.issue.volume.time_window_hours")? as u32,
                },
                priority: crate::sections::PriorityConfig {
                    sentiment_weight: self.get_float("processing.issue.priority.sentiment_weight")? as f32,
                    volume_weight: self.get_float("processing.issue.priority.volume_weight")? as f32,
                    time_weight: self.get_float("processing.issue.priority.time_weight")? as f32,
                    velocity_weight: self.get_float("processing.issue.priority.velocity_weight")? as f32,
                },
                lifecycle: crate::sections::IssueLifecycleConfig {
                    resolved_threshold_days: self.get_int("processing.issue.lifecycle.resolved_threshold_days")? as u32,
                },
            },
            aggregation: crate::sections::AggregationConfig {
                min_mentions: self.get_int("processing.aggregation.min_mentions")? as u64,
                trend_eps: self.get_float("processing.aggregation.trend_eps")? as f32,
            },
        })
    }

    /// Materialize the `deduplication.*` surface for the dedup sweep.
    pub fn deduplication_config(&self) -> Result<crate::sections::DeduplicationConfig, ConfigError> {
        Ok(crate::sections::DeduplicationConfig {
            similarity_threshold: self.get_float("deduplication.similarity_threshold")? as f32,
            window_days: self.get_int("deduplication.window_days")? as u32,
        })
    }

    /// Persist a new value, append an audit row, and swap the snapshot.
    /// `reason = "noop"` is allowed when `new_value == old_value`.
    #[instrument(skip(self, new_value))]
    pub fn set(
        &self,
        category: &str,
        key: &str,
        new_value: Value,
        value_type: ConfigValueType,
        description: &str,
        changed_by: &str,
        reason: &str,
    ) -> Result<(), ConfigError> {
        let dotted_key = dotted(category, key);
        let old_value = self.snapshot_get(&dotted_key).unwrap_or(Value::Null);
        let now = Utc::now();

        let existing = self.storage.get_config_entry(category, key)?;
        let default_value = existing
            .map(|e| e.default_value)
            .unwrap_or_else(|| new_value.clone());

        self.storage.put_config_entry(&ConfigEntry {
            category: category.to_string(),
            key: key.to_string(),
            value: new_value.clone(),
            value_type,
            description: description.to_string(),
            default_value,
            active: true,
            updated_by: changed_by.to_string(),
            updated_at: now,
        })?;

        self.storage.append_config_audit(&ConfigAudit {
            category: category.to_string(),
            key: key.to_string(),
            old_value,
            new_value: new_value.clone(),
            changed_by: changed_by.to_string(),
            changed_at: now,
            reason: reason.to_string(),
        })?;

        self.snapshot.write().unwrap().insert(dotted_key, new_value);

        info!(category, key, changed_by, "config entry updated");
        Ok(())
    }
}

fn apply_env_overrides(snapshot: &mut HashMap<String, Value>) {
    for (env_key, env_value) in std::env::vars() {
        let Some(rest) = env_key.strip_prefix("GOVINT__") else {
            continue;
        };
        let Some((category_raw, key_raw)) = rest.rsplit_once("__") else {
            continue;
        };
        let category = category_raw.to_lowercase().replace("__", ".");
        let key = key_raw.to_lowercase();
        let dotted_key = dotted(&category, &key);
        if snapshot.contains_key(&dotted_key) {
            let parsed = serde_json::from_str(&env_value)
                .unwrap_or_else(|_| Value::String(env_value.clone()));
            snapshot.insert(dotted_key, parsed);
        }
    }
}

pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
