//! # govint-scheduler
//!
//! The Cycle Driver (C18) and its background jobs.
//!
//! - [`cycle::run_cycle`] sequences one full collection cycle: Raw
//!   Loader, Dedup sweep, Batch Orchestrator (classification, sentiment
//!   analysis, issue detection), and aggregation refresh (§6, §7).
//! - [`scheduler::SchedulerService`] wraps `tokio-cron-scheduler` with
//!   timezone-aware cron scheduling and graceful shutdown, the same way
//!   it's used by the teacher's daemon.
//! - [`jobs`] holds the storage-aware job bodies the scheduler puts on
//!   a cron: the dedup sweep and the aggregation refresh.
//! - [`registry::JobRegistry`] tracks recent job runs for observability.
//! - [`overlap::OverlapGuard`] and [`jitter::JitterConfig`] are general
//!   scheduling utilities a job body can reach for if it needs
//!   overlap prevention or scatter, though `run_cycle` itself doesn't
//!   need either.
//!
//! # Example
//!
//! ```ignore
//! use govint_scheduler::{SchedulerService, SchedulerConfig};
//!
//! let config = SchedulerConfig::default();
//! let scheduler = SchedulerService::new(config).await?;
//!
//! scheduler.add_cron_job(
//!     "collection-cycle",
//!     "0 0 * * * *",
//!     None,
//!     move |stop_token| {
//!         let stop = std::sync::atomic::AtomicBool::new(false);
//!         async move { /* run_cycle(...) */ }
//!     },
//! ).await?;
//!
//! scheduler.start().await?;
//! ```

pub mod config;
pub mod cycle;
pub mod error;
pub mod jitter;
pub mod jobs;
pub mod overlap;
pub mod registry;
mod scheduler;

pub use config::SchedulerConfig;
pub use cycle::{run_cycle, CycleSummary};
pub use error::SchedulerError;
pub use jitter::JitterConfig;
pub use overlap::{OverlapGuard, OverlapPolicy, RunGuard};
pub use registry::{JobRegistry, JobOutput, JobResult, JobStatus};
pub use scheduler::{validate_cron_expression, SchedulerService};
