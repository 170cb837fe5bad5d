//! Batch Orchestrator (C12): the claim -> process -> commit engine that
//! drives phases 4-5 of a collection cycle. Pulls pending mentions in
//! bounded batches, runs topic classification and sentiment analysis
//! over a worker pool, and commits every result back to storage in a
//! single transaction per mention (§4.4).

pub mod claim;
pub mod enrichment;
pub mod error;
pub mod issues;
pub mod location;
pub mod pipeline;
pub mod worker;

pub use claim::claim_batch;
pub use enrichment::{run_enrichment_pass, EnrichmentResult};
pub use error::OrchestratorError;
pub use issues::{run_issue_detection, IssueDetectionResult};
pub use location::resolve_location;
pub use pipeline::{run_batch, run_until_caught_up, BatchResult, PipelineConfig};
pub use worker::{process_mention, MentionOutcome};
