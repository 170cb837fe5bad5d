//! # govint-storage
//!
//! RocksDB-backed persistence for the governance-intelligence pipeline.
//!
//! Every table named in the external interface (mentions, topics, issues,
//! the link tables between them, precomputed aggregation snapshots, and
//! the Config Store's persisted layer) lives in its own column family.
//! `Storage` exposes a generic, CF-scoped `put`/`get`/`delete`/
//! `prefix_iterator` API as well as narrow per-entity convenience methods
//! built on top of it, so callers can reach for whichever fits.
//!
//! ```rust,ignore
//! use govint_storage::Storage;
//!
//! let storage = Storage::open(Path::new("/path/to/db"))?;
//! storage.put_mention(&mention)?;
//! ```

pub mod column_families;
pub mod db;
pub mod error;
pub mod keys;

pub use column_families::{
    ALL_CF_NAMES, CF_CHECKPOINTS, CF_CONFIG_AUDIT, CF_CONFIG_ENTRIES, CF_ISSUES,
    CF_ISSUE_MENTIONS, CF_ISSUE_MENTIONS_BY_MENTION, CF_MENTIONS, CF_MENTION_EMBEDDINGS,
    CF_MENTION_TOPICS, CF_MENTION_TOPICS_BY_TOPIC, CF_SENTIMENT_AGGREGATIONS,
    CF_SENTIMENT_TRENDS, CF_TOPICS, CF_TOPIC_SENTIMENT_BASELINES,
};
pub use db::Storage;
pub use error::StorageError;
