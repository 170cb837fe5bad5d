//! Column family definitions for RocksDB.
//!
//! Each column family isolates data with a different access pattern:
//! - mentions / mention_embeddings: the append-heavy core table and its
//!   one-row-per-mention dense vectors (Zstd compression, large values).
//! - topics: small, read-mostly governance catalogue.
//! - mention_topics / issue_mentions: link tables, each with a secondary
//!   index column family for the reverse lookup direction.
//! - issues: evolving cluster state, read-and-written every cycle.
//! - sentiment_aggregations / topic_sentiment_baselines / sentiment_trends:
//!   precomputed, idempotently-rewritten snapshots.
//! - config_entries / config_audit: the Config Store's persisted layer
//!   (audit is append-only, FIFO compaction).

use rocksdb::{ColumnFamilyDescriptor, Options};

pub const CF_MENTIONS: &str = "mentions";
pub const CF_MENTION_EMBEDDINGS: &str = "mention_embeddings";
pub const CF_TOPICS: &str = "topics";
pub const CF_MENTION_TOPICS: &str = "mention_topics";
pub const CF_MENTION_TOPICS_BY_TOPIC: &str = "mention_topics_by_topic";
pub const CF_ISSUES: &str = "issues";
pub const CF_ISSUE_MENTIONS: &str = "issue_mentions";
pub const CF_ISSUE_MENTIONS_BY_MENTION: &str = "issue_mentions_by_mention";
pub const CF_SENTIMENT_AGGREGATIONS: &str = "sentiment_aggregations";
pub const CF_TOPIC_SENTIMENT_BASELINES: &str = "topic_sentiment_baselines";
pub const CF_SENTIMENT_TRENDS: &str = "sentiment_trends";
pub const CF_CONFIG_ENTRIES: &str = "config_entries";
pub const CF_CONFIG_AUDIT: &str = "config_audit";
pub const CF_CHECKPOINTS: &str = "checkpoints";

pub const ALL_CF_NAMES: &[&str] = &[
    CF_MENTIONS,
    CF_MENTION_EMBEDDINGS,
    CF_TOPICS,
    CF_MENTION_TOPICS,
    CF_MENTION_TOPICS_BY_TOPIC,
    CF_ISSUES,
    CF_ISSUE_MENTIONS,
    CF_ISSUE_MENTIONS_BY_MENTION,
    CF_SENTIMENT_AGGREGATIONS,
    CF_TOPIC_SENTIMENT_BASELINES,
    CF_SENTIMENT_TRENDS,
    CF_CONFIG_ENTRIES,
    CF_CONFIG_AUDIT,
    CF_CHECKPOINTS,
];

/// Mentions and their embeddings are the hottest, largest-value tables;
/// compress them.
fn zstd_options() -> Options {
    let mut opts = Options::default();
    opts.set_compression_type(rocksdb::DBCompressionType::Zstd);
    opts
}

/// Append-only audit trail: FIFO compaction, same rationale as the
/// teacher's outbox queue.
fn fifo_options() -> Options {
    let mut opts = Options::default();
    opts.set_compaction_style(rocksdb::DBCompactionStyle::Fifo);
    opts.set_fifo_compaction_options(&rocksdb::FifoCompactOptions::default());
    opts
}

pub fn build_cf_descriptors() -> Vec<ColumnFamilyDescriptor> {
    vec![
        ColumnFamilyDescriptor::new(CF_MENTIONS, zstd_options()),
        ColumnFamilyDescriptor::new(CF_MENTION_EMBEDDINGS, zstd_options()),
        ColumnFamilyDescriptor::new(CF_TOPICS, Options::default()),
        ColumnFamilyDescriptor::new(CF_MENTION_TOPICS, Options::default()),
        ColumnFamilyDescriptor::new(CF_MENTION_TOPICS_BY_TOPIC, Options::default()),
        ColumnFamilyDescriptor::new(CF_ISSUES, Options::default()),
        ColumnFamilyDescriptor::new(CF_ISSUE_MENTIONS, Options::default()),
        ColumnFamilyDescriptor::new(CF_ISSUE_MENTIONS_BY_MENTION, Options::default()),
        ColumnFamilyDescriptor::new(CF_SENTIMENT_AGGREGATIONS, Options::default()),
        ColumnFamilyDescriptor::new(CF_TOPIC_SENTIMENT_BASELINES, Options::default()),
        ColumnFamilyDescriptor::new(CF_SENTIMENT_TRENDS, Options::default()),
        ColumnFamilyDescriptor::new(CF_CONFIG_ENTRIES, Options::default()),
        ColumnFamilyDescriptor::new(CF_CONFIG_AUDIT, fifo_options()),
        ColumnFamilyDescriptor::new(CF_CHECKPOINTS, Options::default()),
    ]
}
