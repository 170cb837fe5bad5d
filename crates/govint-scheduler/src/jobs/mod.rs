//! Background job bodies the Cycle Driver schedules on a cron (§6): the
//! dedup sweep that runs between the Raw Loader and the Batch
//! Orchestrator, and the aggregation/trend/baseline refresh that runs
//! once classification has caught up.

pub mod aggregation_refresh;
pub mod dedup_sweep;

pub use aggregation_refresh::{refresh_aggregations, AggregationRefreshSummary};
pub use dedup_sweep::{run_dedup_sweep, DedupSweepSummary};
