//! RocksDB-backed persistence for every table in the pipeline's external
//! interface (spec §6).
//!
//! `Storage` exposes a generic, column-family-scoped `put`/`get`/`delete`/
//! `prefix_iterator` API alongside narrow per-entity convenience methods
//! built on top of it. Every multi-key write (a mention-topic link's dual
//! index, an issue-mention link's dual index) goes through a single
//! `WriteBatch` so it commits atomically, matching the teacher's
//! `put_event`/`put_toc_node` idiom.

use std::path::Path;
use std::sync::Arc;

use rocksdb::{Options, WriteBatch, DB};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::column_families::{self, *};
use crate::error::StorageError;
use crate::keys::{self, AuditKey, CheckpointKey};
use govint_types::{
    ConfigAudit, ConfigEntry, Issue, IssueMention, IssueState, Mention, MentionTopic,
    ProcessingStatus, SentimentAggregation, SentimentTrend, Topic, TopicBaseline,
};

/// RocksDB-backed storage handle. Wrap in `Arc` at call sites that need
/// shared ownership (orchestrator worker pool, scheduler jobs).
pub struct Storage {
    db: DB,
}

impl Storage {
    #[instrument]
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);
        opts.set_compaction_style(rocksdb::DBCompactionStyle::Universal);
        opts.set_max_background_jobs(4);

        let cf_descriptors = column_families::build_cf_descriptors();
        let db = DB::open_cf_descriptors(&opts, path, cf_descriptors)?;

        Ok(Self { db })
    }

    pub fn open_arc(path: &Path) -> Result<Arc<Self>, StorageError> {
        Ok(Arc::new(Self::open(path)?))
    }

    fn cf(&self, name: &str) -> Result<&rocksdb::ColumnFamily, StorageError> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StorageError::ColumnFamilyNotFound(name.to_string()))
    }

    // ---- generic column-family-scoped accessors -------------------------

    pub fn put(&self, cf: &str, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        let handle = self.cf(cf)?;
        self.db.put_cf(handle, key, value)?;
        Ok(())
    }

    pub fn get(&self, cf: &str, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        let handle = self.cf(cf)?;
        Ok(self.db.get_cf(handle, key)?)
    }

    pub fn delete(&self, cf: &str, key: &[u8]) -> Result<(), StorageError> {
        let handle = self.cf(cf)?;
        self.db.delete_cf(handle, key)?;
        Ok(())
    }

    /// Scan every key with the given prefix, in lexicographic order.
    pub fn prefix_iterator(
        &self,
        cf: &str,
        prefix: &[u8],
    ) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StorageError> {
        let handle = self.cf(cf)?;
        let mut out = Vec::new();
        for item in self.db.prefix_iterator_cf(handle, prefix) {
            let (key, value) = item?;
            if !key.starts_with(prefix) {
                break;
            }
            out.push((key.to_vec(), value.to_vec()));
        }
        Ok(out)
    }

    fn put_json<T: Serialize>(&self, cf: &str, key: &[u8], value: &T) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec(value)?;
        self.put(cf, key, &bytes)
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        cf: &str,
        key: &[u8],
    ) -> Result<Option<T>, StorageError> {
        match self.get(cf, key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    pub fn flush(&self) -> Result<(), StorageError> {
        for name in ALL_CF_NAMES {
            let handle = self.cf(name)?;
            self.db.flush_cf(handle)?;
        }
        Ok(())
    }

    // ---- mentions ---------------------------------------------------------

    #[instrument(skip(self, mention))]
    pub fn put_mention(&self, mention: &Mention) -> Result<(), StorageError> {
        self.put_json(CF_MENTIONS, &keys::mention_key(&mention.id), mention)
    }

    pub fn get_mention(&self, mention_id: &str) -> Result<Option<Mention>, StorageError> {
        self.get_json(CF_MENTIONS, &keys::mention_key(mention_id))
    }

    /// Drop a mention rejected by the Deduplication Service before it
    /// ever reaches the claim queue (§4.7).
    pub fn delete_mention(&self, mention_id: &str) -> Result<(), StorageError> {
        self.delete(CF_MENTIONS, &keys::mention_key(mention_id))
    }

    /// All mentions currently `pending`, ordered by id — the Rust analog
    /// of the claim query's `WHERE processing_status = 'pending' ORDER BY
    /// id` (the exclusive-claim `FOR UPDATE SKIP LOCKED` semantics are
    /// implemented by the orchestrator, not here).
    pub fn list_pending_mentions(&self) -> Result<Vec<Mention>, StorageError> {
        let mut out = Vec::new();
        for (_, value) in self.prefix_iterator(CF_MENTIONS, b"mention:")? {
            let mention: Mention = serde_json::from_slice(&value)?;
            if mention.processing_status == ProcessingStatus::Pending {
                out.push(mention);
            }
        }
        out.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(out)
    }

    pub fn list_mentions(&self) -> Result<Vec<Mention>, StorageError> {
        let mut out = Vec::new();
        for (_, value) in self.prefix_iterator(CF_MENTIONS, b"mention:")? {
            out.push(serde_json::from_slice(&value)?);
        }
        Ok(out)
    }

    /// Writes a completed (or failed) mention alongside its topic links
    /// and embedding in a single `WriteBatch`, matching the Batch
    /// Orchestrator's "one write transaction per mention" requirement
    /// (§4.4). `topic_links` and `embedding` are empty/`None` on a
    /// failure commit.
    #[instrument(skip(self, mention, topic_links, embedding))]
    pub fn commit_mention_result(&self, mention: &Mention, topic_links: &[MentionTopic], embedding: Option<&[f32]>) -> Result<(), StorageError> {
        let mut batch = WriteBatch::default();

        let mentions_cf = self.cf(CF_MENTIONS)?;
        batch.put_cf(mentions_cf, keys::mention_key(&mention.id), serde_json::to_vec(mention)?);

        let links_cf = self.cf(CF_MENTION_TOPICS)?;
        let links_by_topic_cf = self.cf(CF_MENTION_TOPICS_BY_TOPIC)?;
        for link in topic_links {
            let bytes = serde_json::to_vec(link)?;
            batch.put_cf(links_cf, keys::mention_topic_key(&link.mention_id, &link.topic_key), &bytes);
            batch.put_cf(links_by_topic_cf, keys::mention_topic_by_topic_key(&link.topic_key, &link.mention_id), &bytes);
        }

        if let Some(vector) = embedding {
            let embeddings_cf = self.cf(CF_MENTION_EMBEDDINGS)?;
            batch.put_cf(embeddings_cf, keys::embedding_key(&mention.id), serde_json::to_vec(&vector)?);
        }

        self.db.write(batch)?;
        Ok(())
    }

    // ---- embeddings ---------------------------------------------------------

    pub fn put_embedding(&self, mention_id: &str, vector: &[f32]) -> Result<(), StorageError> {
        self.put_json(CF_MENTION_EMBEDDINGS, &keys::embedding_key(mention_id), &vector)
    }

    pub fn get_embedding(&self, mention_id: &str) -> Result<Option<Vec<f32>>, StorageError> {
        self.get_json(CF_MENTION_EMBEDDINGS, &keys::embedding_key(mention_id))
    }

    // ---- topics ---------------------------------------------------------

    pub fn put_topic(&self, topic: &Topic) -> Result<(), StorageError> {
        self.put_json(CF_TOPICS, &keys::topic_key(&topic.key), topic)
    }

    pub fn get_topic(&self, key: &str) -> Result<Option<Topic>, StorageError> {
        self.get_json(CF_TOPICS, &keys::topic_key(key))
    }

    pub fn list_active_topics(&self) -> Result<Vec<Topic>, StorageError> {
        let mut out = Vec::new();
        for (_, value) in self.prefix_iterator(CF_TOPICS, b"topic:")? {
            let topic: Topic = serde_json::from_slice(&value)?;
            if topic.active {
                out.push(topic);
            }
        }
        Ok(out)
    }

    // ---- mention-topic links ------------------------------------------------

    /// Writes the primary (mention -> topic) and secondary (topic ->
    /// mention) index in one atomic batch, mirroring the teacher's
    /// dual-index link writes.
    #[instrument(skip(self, link))]
    pub fn put_mention_topic(&self, link: &MentionTopic) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec(link)?;
        let mut batch = WriteBatch::default();
        let primary = self.cf(CF_MENTION_TOPICS)?;
        let secondary = self.cf(CF_MENTION_TOPICS_BY_TOPIC)?;
        batch.put_cf(
            primary,
            keys::mention_topic_key(&link.mention_id, &link.topic_key),
            &bytes,
        );
        batch.put_cf(
            secondary,
            keys::mention_topic_by_topic_key(&link.topic_key, &link.mention_id),
            &bytes,
        );
        self.db.write(batch)?;
        Ok(())
    }

    pub fn get_mention_topics_for_mention(
        &self,
        mention_id: &str,
    ) -> Result<Vec<MentionTopic>, StorageError> {
        let prefix = format!("mt:{mention_id}:").into_bytes();
        let mut out = Vec::new();
        for (_, value) in self.prefix_iterator(CF_MENTION_TOPICS, &prefix)? {
            out.push(serde_json::from_slice(&value)?);
        }
        Ok(out)
    }

    pub fn get_mention_topics_for_topic(
        &self,
        topic_key: &str,
    ) -> Result<Vec<MentionTopic>, StorageError> {
        let prefix = keys::mention_topic_by_topic_prefix(topic_key);
        let mut out = Vec::new();
        for (_, value) in self.prefix_iterator(CF_MENTION_TOPICS_BY_TOPIC, &prefix)? {
            out.push(serde_json::from_slice(&value)?);
        }
        Ok(out)
    }

    // ---- issues ---------------------------------------------------------

    /// Writes the issue row and its slug index entry atomically. Both
    /// live in `CF_ISSUES` under disjoint key namespaces (`issue:` vs
    /// `issue_slug:`), so a prefix scan over `issue:` never sees slug rows.
    #[instrument(skip(self, issue))]
    pub fn put_issue(&self, issue: &Issue) -> Result<(), StorageError> {
        let mut batch = WriteBatch::default();
        let issues_cf = self.cf(CF_ISSUES)?;
        let bytes = serde_json::to_vec(issue)?;
        batch.put_cf(issues_cf, keys::issue_key(&issue.id), &bytes);
        batch.put_cf(
            issues_cf,
            keys::issue_slug_key(&issue.slug),
            issue.id.as_bytes(),
        );
        self.db.write(batch)?;
        Ok(())
    }

    pub fn get_issue(&self, issue_id: &str) -> Result<Option<Issue>, StorageError> {
        self.get_json(CF_ISSUES, &keys::issue_key(issue_id))
    }

    pub fn get_issue_by_slug(&self, slug: &str) -> Result<Option<Issue>, StorageError> {
        match self.get(CF_ISSUES, &keys::issue_slug_key(slug))? {
            Some(id_bytes) => {
                let id = String::from_utf8(id_bytes)
                    .map_err(|e| StorageError::Key(format!("invalid issue id bytes: {e}")))?;
                self.get_issue(&id)
            }
            None => Ok(None),
        }
    }

    /// All non-archived, non-resolved issues for a topic, ordered by
    /// `last_activity` desc — the candidate list for match-or-create
    /// (§4.5, Open Question 1 tie-break).
    pub fn list_candidate_issues_for_topic(
        &self,
        topic_key: &str,
    ) -> Result<Vec<Issue>, StorageError> {
        let mut out = Vec::new();
        for (key, value) in self.prefix_iterator(CF_ISSUES, b"issue:")? {
            if key.starts_with(b"issue_slug:") {
                continue;
            }
            let issue: Issue = serde_json::from_slice(&value)?;
            if issue.primary_topic_key == topic_key
                && !matches!(issue.state, IssueState::Resolved | IssueState::Archived)
            {
                out.push(issue);
            }
        }
        out.sort_by(|a, b| b.last_activity.cmp(&a.last_activity));
        Ok(out)
    }

    // ---- issue-mention links ------------------------------------------------

    #[instrument(skip(self, link))]
    pub fn put_issue_mention(&self, link: &IssueMention) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec(link)?;
        let mut batch = WriteBatch::default();
        let primary = self.cf(CF_ISSUE_MENTIONS)?;
        let secondary = self.cf(CF_ISSUE_MENTIONS_BY_MENTION)?;
        batch.put_cf(
            primary,
            keys::issue_mention_key(&link.issue_id, &link.mention_id),
            &bytes,
        );
        batch.put_cf(
            secondary,
            keys::issue_mention_by_mention_key(&link.mention_id, &link.issue_id),
            &bytes,
        );
        self.db.write(batch)?;
        Ok(())
    }

    pub fn get_issue_mentions(&self, issue_id: &str) -> Result<Vec<IssueMention>, StorageError> {
        let prefix = keys::issue_mention_prefix(issue_id);
        let mut out = Vec::new();
        for (_, value) in self.prefix_iterator(CF_ISSUE_MENTIONS, &prefix)? {
            out.push(serde_json::from_slice(&value)?);
        }
        Ok(out)
    }

    /// Enforces "a mention may be linked to at most one issue per topic"
    /// (§3 invariant): returns any existing link for `(mention_id, topic_key)`.
    pub fn get_issue_mention_for_mention_and_topic(
        &self,
        mention_id: &str,
        topic_key: &str,
    ) -> Result<Option<IssueMention>, StorageError> {
        let prefix = keys::issue_mention_by_mention_prefix(mention_id);
        for (_, value) in self.prefix_iterator(CF_ISSUE_MENTIONS_BY_MENTION, &prefix)? {
            let link: IssueMention = serde_json::from_slice(&value)?;
            if link.topic_key == topic_key {
                return Ok(Some(link));
            }
        }
        Ok(None)
    }

    pub fn mention_count_for_issue(&self, issue_id: &str) -> Result<u64, StorageError> {
        Ok(self.get_issue_mentions(issue_id)?.len() as u64)
    }

    // ---- aggregations, baselines, trends -------------------------------------

    pub fn put_aggregation(&self, agg: &SentimentAggregation) -> Result<(), StorageError> {
        let key = keys::aggregation_key(
            agg_type_str(agg.aggregation_type),
            &agg.aggregation_key,
            agg.window.as_str(),
        );
        self.put_json(CF_SENTIMENT_AGGREGATIONS, &key, agg)
    }

    pub fn get_aggregation(
        &self,
        agg_type: &str,
        agg_key: &str,
        window: &str,
    ) -> Result<Option<SentimentAggregation>, StorageError> {
        self.get_json(
            CF_SENTIMENT_AGGREGATIONS,
            &keys::aggregation_key(agg_type, agg_key, window),
        )
    }

    pub fn put_baseline(&self, baseline: &TopicBaseline) -> Result<(), StorageError> {
        self.put_json(
            CF_TOPIC_SENTIMENT_BASELINES,
            &keys::baseline_key(&baseline.topic_key),
            baseline,
        )
    }

    pub fn get_baseline(&self, topic_key: &str) -> Result<Option<TopicBaseline>, StorageError> {
        self.get_json(CF_TOPIC_SENTIMENT_BASELINES, &keys::baseline_key(topic_key))
    }

    pub fn put_trend(&self, trend: &SentimentTrend) -> Result<(), StorageError> {
        let key = keys::trend_key(
            agg_type_str(trend.aggregation_type),
            &trend.aggregation_key,
            trend.window.as_str(),
        );
        self.put_json(CF_SENTIMENT_TRENDS, &key, trend)
    }

    pub fn get_trend(
        &self,
        agg_type: &str,
        agg_key: &str,
        window: &str,
    ) -> Result<Option<SentimentTrend>, StorageError> {
        self.get_json(CF_SENTIMENT_TRENDS, &keys::trend_key(agg_type, agg_key, window))
    }

    // ---- config store persistence -------------------------------------------

    pub fn put_config_entry(&self, entry: &ConfigEntry) -> Result<(), StorageError> {
        self.put_json(
            CF_CONFIG_ENTRIES,
            &keys::config_entry_key(&entry.category, &entry.key),
            entry,
        )
    }

    pub fn get_config_entry(
        &self,
        category: &str,
        key: &str,
    ) -> Result<Option<ConfigEntry>, StorageError> {
        self.get_json(CF_CONFIG_ENTRIES, &keys::config_entry_key(category, key))
    }

    pub fn list_config_entries_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<ConfigEntry>, StorageError> {
        let mut out = Vec::new();
        for (_, value) in
            self.prefix_iterator(CF_CONFIG_ENTRIES, &keys::config_entry_category_prefix(category))?
        {
            out.push(serde_json::from_slice(&value)?);
        }
        Ok(out)
    }

    pub fn list_all_config_entries(&self) -> Result<Vec<ConfigEntry>, StorageError> {
        let mut out = Vec::new();
        for (_, value) in self.prefix_iterator(CF_CONFIG_ENTRIES, b"config:")? {
            out.push(serde_json::from_slice(&value)?);
        }
        Ok(out)
    }

    /// Appends exactly one audit row. Never overwrites a prior row — the
    /// audit log is append-only (§4.1 guarantee).
    pub fn append_config_audit(&self, audit: &ConfigAudit) -> Result<(), StorageError> {
        let key = AuditKey::new(audit.changed_at.timestamp_millis());
        self.put_json(CF_CONFIG_AUDIT, &key.to_bytes(), audit)
    }

    pub fn list_config_audit(&self) -> Result<Vec<ConfigAudit>, StorageError> {
        let mut out = Vec::new();
        for (_, value) in self.prefix_iterator(CF_CONFIG_AUDIT, b"audit:")? {
            out.push(serde_json::from_slice(&value)?);
        }
        Ok(out)
    }

    // ---- checkpoints (orchestrator / scheduler job progress) ----------------

    pub fn put_checkpoint(&self, job_name: &str, sequence: u64) -> Result<(), StorageError> {
        let key = CheckpointKey::new(job_name);
        self.put(CF_CHECKPOINTS, &key.to_bytes(), &sequence.to_be_bytes())
    }

    pub fn get_checkpoint(&self, job_name: &str) -> Result<Option<u64>, StorageError> {
        let key = CheckpointKey::new(job_name);
        match self.get(CF_CHECKPOINTS, &key.to_bytes())? {
            Some(bytes) if bytes.len() == 8 => {
                let mut arr = [0u8; 8];
                arr.copy_from_slice(&bytes);
                Ok(Some(u64::from_be_bytes(arr)))
            }
            Some(_) => Err(StorageError::Key(format!(
                "malformed checkpoint value for {job_name}"
            ))),
            None => Ok(None),
        }
    }
}

fn agg_type_str(t: govint_types::AggregationType) -> &'static str {
    match t {
        govint_types::AggregationType::Topic => "topic",
        govint_types::AggregationType::Issue => "issue",
        govint_types::AggregationType::Entity => "entity",
    }
}

/// Discriminator helper for callers persisting a raw `Value` alongside a
/// declared `ConfigValueType`.
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

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use govint_types::{Issue, IssueMention, Mention, MentionTopic, SourceType, Topic};
    use tempfile::TempDir;

    fn open_test_storage() -> (TempDir, Storage) {
        let dir = TempDir::new().unwrap();
        let storage = Storage::open(dir.path()).unwrap();
        (dir, storage)
    }

    #[test]
    fn mention_roundtrip() {
        let (_dir, storage) = open_test_storage();
        let mention = Mention::new(
            "m1",
            "fuel prices are too high",
            Utc::now(),
            "twitter",
            SourceType::Citizen,
            "op1",
        );
        storage.put_mention(&mention).unwrap();
        let loaded = storage.get_mention("m1").unwrap().unwrap();
        assert_eq!(loaded.id, "m1");
        assert_eq!(storage.list_pending_mentions().unwrap().len(), 1);
    }

    #[test]
    fn delete_mention_removes_it_from_the_pending_queue() {
        let (_dir, storage) = open_test_storage();
        let mention = Mention::new("m1", "fuel prices are too high", Utc::now(), "twitter", SourceType::Citizen, "op1");
        storage.put_mention(&mention).unwrap();
        storage.delete_mention("m1").unwrap();
        assert!(storage.get_mention("m1").unwrap().is_none());
        assert!(storage.list_pending_mentions().unwrap().is_empty());
    }

    #[test]
    fn mention_topic_dual_index_is_queryable_both_ways() {
        let (_dir, storage) = open_test_storage();
        let link = MentionTopic::new("mt1", "m1", "fuel_pricing", 0.8, 0.5, 0.9);
        storage.put_mention_topic(&link).unwrap();

        let by_mention = storage.get_mention_topics_for_mention("m1").unwrap();
        assert_eq!(by_mention.len(), 1);
        let by_topic = storage.get_mention_topics_for_topic("fuel_pricing").unwrap();
        assert_eq!(by_topic.len(), 1);
    }

    #[test]
    fn commit_mention_result_writes_mention_links_and_embedding_together() {
        let (_dir, storage) = open_test_storage();
        let mut mention = Mention::new("m1", "fuel prices are too high", Utc::now(), "twitter", SourceType::Citizen, "op1");
        mention.mark_processing();
        let link = MentionTopic::new("mt1", "m1", "fuel_pricing", 0.8, 0.5, 0.9);

        storage.commit_mention_result(&mention, &[link], Some(&[0.1, 0.2, 0.3])).unwrap();

        assert_eq!(storage.get_mention_topics_for_mention("m1").unwrap().len(), 1);
        assert_eq!(storage.get_embedding("m1").unwrap().unwrap(), vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn issue_lookup_by_slug_does_not_leak_into_candidate_scan() {
        let (_dir, storage) = open_test_storage();
        let issue = Issue::new(
            "i1",
            "fuel-pricing-2026",
            "fuel_pricing",
            Utc::now(),
            vec![0.1; 4],
            0.75,
        );
        storage.put_issue(&issue).unwrap();
        let found = storage.get_issue_by_slug("fuel-pricing-2026").unwrap().unwrap();
        assert_eq!(found.id, "i1");

        let candidates = storage.list_candidate_issues_for_topic("fuel_pricing").unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].id, "i1");
    }

    #[test]
    fn issue_mention_enforces_single_issue_per_topic_lookup() {
        let (_dir, storage) = open_test_storage();
        let link = IssueMention::new("im1", "i1", "m1", 0.9, "fuel_pricing").unwrap();
        storage.put_issue_mention(&link).unwrap();
        let found = storage
            .get_issue_mention_for_mention_and_topic("m1", "fuel_pricing")
            .unwrap();
        assert!(found.is_some());
        assert_eq!(storage.mention_count_for_issue("i1").unwrap(), 1);
    }

    #[test]
    fn checkpoint_roundtrip() {
        let (_dir, storage) = open_test_storage();
        assert_eq!(storage.get_checkpoint("orchestrator").unwrap(), None);
        storage.put_checkpoint("orchestrator", 42).unwrap();
        assert_eq!(storage.get_checkpoint("orchestrator").unwrap(), Some(42));
    }

    #[test]
    fn topic_registry_filters_inactive() {
        let (_dir, storage) = open_test_storage();
        let mut t = Topic::new("fuel_pricing", "Fuel Pricing", "desc", vec!["fuel".into()]);
        storage.put_topic(&t).unwrap();
        t.active = false;
        t.key = "archived_topic".into();
        storage.put_topic(&t).unwrap();
        let active = storage.list_active_topics().unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].key, "fuel_pricing");
    }

    #[test]
    fn config_audit_is_append_only_and_listable() {
        let (_dir, storage) = open_test_storage();
        for i in 0..3 {
            storage
                .append_config_audit(&ConfigAudit {
                    category: "processing.topic".into(),
                    key: "min_score_threshold".into(),
                    old_value: serde_json::json!(0.2),
                    new_value: serde_json::json!(0.25),
                    changed_by: "op1".into(),
                    changed_at: Utc::now() + chrono::Duration::milliseconds(i),
                    reason: "tuning".into(),
                })
                .unwrap();
        }
        assert_eq!(storage.list_config_audit().unwrap().len(), 3);
    }

    #[test]
    fn debug_logging_does_not_panic() {
        debug!("storage test harness alive");
    }
}
