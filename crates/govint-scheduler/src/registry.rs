//! Job registry for tracking job metadata and execution status.
//!
//! The `JobRegistry` provides a thread-safe registry for tracking the execution
//! status of scheduled jobs, including last/next run times, durations, and error counts.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of a job execution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum JobResult {
    /// Job completed successfully
    Success,
    /// Job failed with an error message
    Failed(String),
    /// Job was skipped (e.g., due to overlap policy)
    Skipped(String),
}

/// Extended job output with optional metadata.
///
/// Use this when your job needs to report stats back to the registry
/// (e.g., prune count, items processed).
#[derive(Debug, Clone, Default)]
pub struct JobOutput {
    /// Arbitrary key-value metadata from the job run.
    pub metadata: HashMap<String, String>,
}

impl JobOutput {
    /// Create a new empty job output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a metadata entry.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Add prune count metadata (convenience method for prune jobs).
    pub fn with_prune_count(self, count: u32) -> Self {
        self.with_metadata("prune_count", count.to_string())
    }

    /// Add items processed metadata (convenience method).
    pub fn with_items_processed(self, count: usize) -> Self {
        self.with_metadata("items_processed", count.to_string())
    }
}

/// Status of a registered job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatus {
    /// Name of the job
    pub job_name: String,
    /// Cron expression for the job schedule
    pub cron_expr: String,
    /// When the job last started (if ever)
    pub last_run: Option<DateTime<Utc>>,
    /// Duration of the last run in milliseconds
    pub last_duration_ms: Option<u64>,
    /// Result of the last execution
    pub last_result: Option<JobResult>,
    /// When the job is next scheduled to run
    pub next_run: Option<DateTime<Utc>>,
    /// Total number of times the job has run
    pub run_count: u64,
    /// Total number of times the job has failed
    pub error_count: u64,
    /// Whether the job is currently executing
    pub is_running: bool,
    /// Whether the job is paused
    pub is_paused: bool,
    /// Optional metadata from last run (e.g., prune count, items processed)
    /// Maps arbitrary keys to string values for extensibility.
    #[serde(default)]
    pub last_run_metadata: HashMap<String, String>,
}

impl JobStatus {
    /// Create a new job status with the given name and cron expression.
    pub fn new(job_name: String, cron_expr: String) -> Self {
        Self {
            job_name,
            cron_expr,
            last_run: None,
            last_duration_ms: None,
            last_result: None,
            next_run: None,
            run_count: 0,
            error_count: 0,
            is_running: false,
            is_paused: false,
            last_run_metadata: HashMap::new(),
        }
    }
}

/// Registry for tracking job metadata and execution status.
///
/// The registry provides thread-safe access to job status information,
/// allowing multiple jobs to update their status concurrently.
///
/// # Example
///
/// ```
/// use memory_scheduler::JobRegistry;
///
/// let registry = JobRegistry::new();
/// registry.register("hourly-rollup", "0 0 * * * *");
///
/// // Job starts
/// registry.record_start("hourly-rollup");
/// assert!(registry.is_running("hourly-rollup"));
///
/// // Job completes
/// use memory_scheduler::JobResult;
/// registry.record_complete("hourly-rollup", JobResult::Success, 1500);
/// assert!(!registry.is_running("hourly-rollup"));
/// ```
pub struct JobRegistry {
    jobs: RwLock<HashMap<String, JobStatus>>,
}

impl JobRegistry {
    /// Create a new empty job registry.
    pub fn new() -> Self {
        Self {
            jobs: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new job in the registry.
    ///
    /// If a job with the same name already exists, it will be replaced.
    pub fn register(&self, job_name: &str, cron_expr: &str) {
        let mut jobs = self.jobs.write().unwrap();
        jobs.insert(
            job_name.to_string(),
            JobStatus::new(job_name.to_string(), cron_expr.to_string()),
        );
    }

    /// Record that a job has started executing.
    pub fn record_start(&self, job_name: &str) {
        let mut jobs = self.jobs.write().unwrap();
        if let Some(status) = jobs.get_mut(job_name) {
            status.is_running = true;
        }
    }

    /// Record that a job has completed.
    ///
    /// Updates the last run time, duration, result, and run/error counts.
    pub fn record_complete(&self, job_name: &str, result: JobResult, duration_ms: u64) {
        self.record_complete_with_metadata(job_name, result, duration_ms, HashMap::new());
    }

    /// Record that a job has completed with optional metadata.
    ///
    /// Updates the last run time, duration, result, run/error counts, and metadata.
    /// Metadata can include job-specific stats like prune count, items processed, etc.
    pub fn record_complete_with_metadata(
        &self,
        job_name: &str,
        result: JobResult,
        duration_ms: u64,
        metadata: HashMap<String, String>,
    ) {
        let mut jobs = self.jobs.write().unwrap();
        if let Some(status) = jobs.get_mut(job_name) {
            status.is_running = false;
            status.last_run = Some(Utc::now());
            status.last_duration_ms = Some(duration_ms);
            status.run_count += 1;
            if matches!(result, JobResult::Failed(_)) {
                status.error_count += 1;
            }
            status.last_result = Some(result);
            status.last_run_metadata = metadata;
        }
    }

    /// Update the next scheduled run time for a job.
    pub fn set_next_run(&self, job_name: &str, next: DateTime<Utc>) {
        let mut jobs = self.jobs.write().unwrap();
        if let Some(status) = jobs.get_mut(job_name) {
            status.next_run = Some(next);
        }
    }

    /// Set the paused state of a job.
    pub fn set_paused(&self, job_name: &str, paused: bool) {
        let mut jobs = self.jobs.write().unwrap();
        if let Some(status) = jobs.get_mut(job_name) {
            status.is_paused = paused;
        }
    }

    /// Get the status of a specific job.
    ///
    /// Returns `None` if the job is not registered.
    pub fn get_status(&self, job_name: &str) -> Option<JobStatus> {
        self.jobs.read().unwrap().get(job_name).cloned()
    }

    /// Get the status of all registered jobs.
    pub fn get_all_status(&self) -> Vec<JobStatus> {
        self.jobs.read().unwrap().values().cloned().collect()
    }

    /// Check if a job is currently running.
    ///
    /// Returns `false` if the job is not registered.
    pub fn is_running(&self, job_name: &str) -> bool {
        self.jobs
            .read()
            .unwrap()
            .get(job_name)
            .map(|s| s.is_running)
            .unwrap_or(false)
    }

    /// Check if a job is registered.
    pub fn is_registered(&self, job_name: &str) -> bool {
        self.jobs.read().unwrap().contains_key(job_name)
    }

    /// Check if a job is paused.
    ///
    /// Returns `false` if the job is not registered.
    pub fn is_paused(&self, job_name: &str) -> bool {
        self.jobs
            .read()
            .unwrap()
            .get(job_name)
            .map(|s| s.is_paused)
            .unwrap_or(false)
    }

    /// Get the number of registered jobs.
    pub fn job_count(&self) -> usize {
        self.jobs.read().unwrap().len()
    }
}

impl Default for JobRegistry {
    fn default() -> Self {
        Self::new()
    }
}
