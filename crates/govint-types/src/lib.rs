//! # govint-types
//!
//! Core data model for the governance-intelligence pipeline: the entities
//! and invariants that every other crate in the workspace operates on.
//!
//! - `Mention`: a captured piece of content plus its processing state and
//!   analyzer-derived fields.
//! - `Topic` / `MentionTopic`: the fixed governance taxonomy and its
//!   many-to-many link to mentions.
//! - `Issue` / `IssueMention`: evolving clusters of related mentions and
//!   their membership links.
//! - `SentimentAggregation` / `TopicBaseline` / `SentimentTrend`:
//!   precomputed aggregation snapshots.
//! - `ConfigEntry` / `ConfigAudit`: the persisted half of the Config Store.

pub mod aggregation;
pub mod config_entry;
pub mod error;
pub mod issue;
pub mod mention;
pub mod topic;

pub use aggregation::{
    AggregationType, SentimentAggregation, SentimentTrend, TimeWindow, TopicBaseline,
    TrendDirection,
};
pub use config_entry::{ConfigAudit, ConfigEntry, ConfigValueType};
pub use error::TypesError;
pub use issue::{
    EmotionDistribution, Issue, IssueMention, IssueState, PriorityBand, SentimentDistribution,
};
pub use mention::{
    validate_sentiment_band, Engagement, Mention, MentionTopic, ProcessingStatus, SentimentLabel,
    SourceType,
};
pub use topic::{non_governance_topic, Embedding, KeywordGroup, Topic};
