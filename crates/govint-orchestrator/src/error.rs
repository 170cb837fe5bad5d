//! Batch Orchestrator errors — the "infrastructure" class from the error
//! taxonomy (§7): storage failures and claim conflicts abort the current
//! batch rather than failing one mention.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("storage error: {0}")]
    Storage(#[from] govint_storage::StorageError),

    #[error("issue detection error: {0}")]
    IssueDetection(#[from] govint_issues::IssuesError),

    #[error("claim failed: {0}")]
    Claim(String),

    #[error("batch exceeded its timeout")]
    BatchTimeout,
}
