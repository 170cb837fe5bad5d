//! Key encoding for every column family.
//!
//! Most tables are keyed directly by their natural id (mention id, topic
//! key, issue id, ...) using simple `"{prefix}:{id}"` strings, following
//! the free-function key-builder idiom. The audit log is the one
//! time-ordered, append-only table and gets the zero-padded
//! `"{prefix}:{timestamp_ms:013}:{ulid}"` scheme so a prefix scan returns
//! it in chronological order.

use ulid::Ulid;

use crate::error::StorageError;

pub fn mention_key(mention_id: &str) -> Vec<u8> {
    format!("mention:{mention_id}").into_bytes()
}

pub fn embedding_key(mention_id: &str) -> Vec<u8> {
    format!("embedding:{mention_id}").into_bytes()
}

pub fn topic_key(topic_key: &str) -> Vec<u8> {
    format!("topic:{topic_key}").into_bytes()
}

pub fn mention_topic_key(mention_id: &str, topic_key: &str) -> Vec<u8> {
    format!("mt:{mention_id}:{topic_key}").into_bytes()
}

/// Secondary index: topic -> mention, for "all mentions linked to topic T".
pub fn mention_topic_by_topic_key(topic_key: &str, mention_id: &str) -> Vec<u8> {
    format!("mt_by_topic:{topic_key}:{mention_id}").into_bytes()
}

pub fn mention_topic_by_topic_prefix(topic_key: &str) -> Vec<u8> {
    format!("mt_by_topic:{topic_key}:").into_bytes()
}

pub fn issue_key(issue_id: &str) -> Vec<u8> {
    format!("issue:{issue_id}").into_bytes()
}

pub fn issue_slug_key(slug: &str) -> Vec<u8> {
    format!("issue_slug:{slug}").into_bytes()
}

pub fn issue_mention_key(issue_id: &str, mention_id: &str) -> Vec<u8> {
    format!("im:{issue_id}:{mention_id}").into_bytes()
}

pub fn issue_mention_prefix(issue_id: &str) -> Vec<u8> {
    format!("im:{issue_id}:").into_bytes()
}

/// Secondary index: mention -> issue, to enforce "at most one issue per
/// topic per mention" (§3 invariant) without scanning every issue.
pub fn issue_mention_by_mention_key(mention_id: &str, issue_id: &str) -> Vec<u8> {
    format!("im_by_mention:{mention_id}:{issue_id}").into_bytes()
}

pub fn issue_mention_by_mention_prefix(mention_id: &str) -> Vec<u8> {
    format!("im_by_mention:{mention_id}:").into_bytes()
}

pub fn aggregation_key(agg_type: &str, agg_key: &str, window: &str) -> Vec<u8> {
    format!("agg:{agg_type}:{agg_key}:{window}").into_bytes()
}

pub fn baseline_key(topic_key: &str) -> Vec<u8> {
    format!("baseline:{topic_key}").into_bytes()
}

pub fn trend_key(agg_type: &str, agg_key: &str, window: &str) -> Vec<u8> {
    format!("trend:{agg_type}:{agg_key}:{window}").into_bytes()
}

pub fn config_entry_key(category: &str, key: &str) -> Vec<u8> {
    format!("config:{category}:{key}").into_bytes()
}

pub fn config_entry_category_prefix(category: &str) -> Vec<u8> {
    format!("config:{category}:").into_bytes()
}

/// Key for checkpoint entries, one per orchestrator/scheduler job.
/// Format: `checkpoint:{job_name}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckpointKey {
    pub job_name: String,
}

impl CheckpointKey {
    pub fn new(job_name: impl Into<String>) -> Self {
        Self {
            job_name: job_name.into(),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        format!("checkpoint:{}", self.job_name).into_bytes()
    }
}

/// Key for an audit row. Format: `audit:{timestamp_ms:013}:{ulid}` — zero
/// padded so a prefix scan over the column family returns rows in
/// chronological order, same rationale as the teacher's `EventKey`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditKey {
    pub timestamp_ms: i64,
    pub ulid: Ulid,
}

impl AuditKey {
    pub fn new(timestamp_ms: i64) -> Self {
        Self {
            timestamp_ms,
            ulid: Ulid::new(),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        format!("audit:{:013}:{}", self.timestamp_ms, self.ulid).into_bytes()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StorageError> {
        let s = std::str::from_utf8(bytes)
            .map_err(|e| StorageError::Key(format!("invalid utf-8: {e}")))?;
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 3 || parts[0] != "audit" {
            return Err(StorageError::Key(format!("invalid audit key: {s}")));
        }
        let timestamp_ms: i64 = parts[1]
            .parse()
            .map_err(|e| StorageError::Key(format!("invalid timestamp: {e}")))?;
        let ulid: Ulid = parts[2]
            .parse()
            .map_err(|e| StorageError::Key(format!("invalid ulid: {e}")))?;
        Ok(Self { timestamp_ms, ulid })
    }
}
