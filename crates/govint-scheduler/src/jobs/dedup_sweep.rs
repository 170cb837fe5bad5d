//! Dedup sweep: runs between the Raw Loader and the Batch Orchestrator
//! (§4.7). Newly-loaded `pending` mentions are evaluated against every
//! already-accepted mention inside the configured lookback window;
//! rejects are dropped before the orchestrator ever claims them.

use chrono::Utc;
use govint_config::DeduplicationConfig;
use govint_dedup::{DedupDecision, Deduplicator, RawCandidate};
use govint_storage::Storage;
use govint_types::ProcessingStatus;
use tracing::{info, instrument};

use crate::error::SchedulerError;

#[derive(Debug, Default, Clone, Copy)]
pub struct DedupSweepSummary {
    pub candidates_evaluated: usize,
    pub duplicates_removed: usize,
}

fn mention_to_candidate(mention: &govint_types::Mention) -> RawCandidate {
    RawCandidate {
        url: mention.url.clone(),
        text: mention.text.clone(),
        published_at: mention.published_at,
    }
}

/// Evaluate every pending mention against the accepted-mention window
/// and delete the ones rejected as duplicates.
#[instrument(skip(storage, config))]
pub fn run_dedup_sweep(storage: &Storage, config: &DeduplicationConfig) -> Result<DedupSweepSummary, SchedulerError> {
    let now = Utc::now();
    let window = chrono::Duration::days(config.window_days as i64);

    let existing: Vec<RawCandidate> = storage
        .list_mentions()?
        .into_iter()
        .filter(|m| m.processing_status != ProcessingStatus::Pending && (now - m.published_at) <= window)
        .map(|m| mention_to_candidate(&m))
        .collect();

    let mut deduplicator = Deduplicator::new(config.clone(), existing);
    let mut summary = DedupSweepSummary::default();

    for mention in storage.list_pending_mentions()? {
        summary.candidates_evaluated += 1;
        let candidate = mention_to_candidate(&mention);
        if let DedupDecision::Reject(reason) = deduplicator.evaluate(&candidate) {
            info!(mention_id = %mention.id, reason = ?reason, "dropping duplicate mention before claim");
            storage.delete_mention(&mention.id)?;
            summary.duplicates_removed += 1;
        }
    }

    Ok(summary)
}
