//! The claim step of the Batch Orchestrator's claim→process→commit loop.
//!
//! RocksDB has no `SELECT ... FOR UPDATE SKIP LOCKED`; the pending-order
//! scan plus an immediate `processing` write for each selected row is the
//! single-process analog — a mention moves out of `pending` the moment
//! it's claimed, so no other claim call can pick it up again until it's
//! committed back to `completed` or `failed`.

use govint_storage::Storage;
use govint_types::Mention;
use tracing::instrument;

use crate::error::OrchestratorError;

/// Claim up to `batch_size` pending mentions, ordered by id, marking each
/// `processing` before returning it.
#[instrument(skip(storage))]
pub fn claim_batch(storage: &Storage, batch_size: usize) -> Result<Vec<Mention>, OrchestratorError> {
    let mut pending = storage.list_pending_mentions()?;
    pending.truncate(batch_size);

    let mut claimed = Vec::with_capacity(pending.len());
    for mut mention in pending {
        mention.mark_processing();
        storage.put_mention(&mention)?;
        claimed.push(mention);
    }
    Ok(claimed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use govint_types::SourceType;
    use tempfile::TempDir;

    #[test]
    fn claim_marks_mentions_processing_and_respects_batch_size() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::open(dir.path()).unwrap();
        for i in 0..5 {
            let mention = Mention::new(format!("m{i}"), "fuel prices", Utc::now(), "twitter", SourceType::Citizen, "op1");
            storage.put_mention(&mention).unwrap();
        }

        let claimed = claim_batch(&storage, 3).unwrap();
        assert_eq!(claimed.len(), 3);
        assert!(claimed.iter().all(|m| m.processing_status == govint_types::ProcessingStatus::Processing));
        assert_eq!(storage.list_pending_mentions().unwrap().len(), 2);
    }
}
