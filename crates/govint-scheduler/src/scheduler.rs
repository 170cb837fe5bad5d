//! Scheduler service wrapper around tokio-cron-scheduler.
//!
//! Provides lifecycle management for background jobs with graceful
//! shutdown support: jobs receive a clone of the shutdown token and are
//! expected to check it and exit cleanly when cancelled.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono_tz::Tz;
use tokio_cron_scheduler::{Job, JobScheduler};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::registry::JobRegistry;
use crate::{SchedulerConfig, SchedulerError};

/// Validate a cron expression.
///
/// Checks that the expression is syntactically valid. The expression should
/// use 6-field format: second minute hour day-of-month month day-of-week.
///
/// # Errors
///
/// Returns `SchedulerError::InvalidCron` if the expression is not valid.
pub fn validate_cron_expression(expr: &str) -> Result<(), SchedulerError> {
    match Job::new_async(expr, |_uuid, _lock| Box::pin(async {})) {
        Ok(_) => Ok(()),
        Err(e) => Err(SchedulerError::InvalidCron(format!("'{}': {}", expr, e))),
    }
}

/// Service wrapper around `JobScheduler` for lifecycle management.
///
/// Provides start/stop functionality with graceful shutdown support via
/// `CancellationToken` propagation to jobs, plus a registry for
/// observability into the cycle driver's background jobs.
pub struct SchedulerService {
    scheduler: JobScheduler,
    config: SchedulerConfig,
    shutdown_token: CancellationToken,
    is_running: AtomicBool,
    registry: Arc<JobRegistry>,
}

impl SchedulerService {
    /// Create a new scheduler service with the given configuration.
    ///
    /// The scheduler is created but not started. Call `start()` to begin
    /// executing scheduled jobs.
    pub async fn new(config: SchedulerConfig) -> Result<Self, SchedulerError> {
        let _ = config.parse_timezone()?;
        let scheduler = JobScheduler::new().await?;

        Ok(Self {
            scheduler,
            config,
            shutdown_token: CancellationToken::new(),
            is_running: AtomicBool::new(false),
            registry: Arc::new(JobRegistry::new()),
        })
    }

    /// Get a reference to the job registry.
    pub fn registry(&self) -> Arc<JobRegistry> {
        self.registry.clone()
    }

    /// Start the scheduler. Jobs begin executing according to their schedules.
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::AlreadyRunning` if already started.
    pub async fn start(&self) -> Result<(), SchedulerError> {
        if self.is_running.swap(true, Ordering::SeqCst) {
            return Err(SchedulerError::AlreadyRunning);
        }

        self.scheduler.start().await?;
        info!("scheduler started");

        Ok(())
    }

    /// Shutdown the scheduler gracefully: cancel the shutdown token, give
    /// running jobs time to observe it, then stop the underlying scheduler.
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::NotRunning` if not started.
    pub async fn shutdown(&mut self) -> Result<(), SchedulerError> {
        if !self.is_running.load(Ordering::SeqCst) {
            return Err(SchedulerError::NotRunning);
        }

        info!("initiating scheduler shutdown");
        self.shutdown_token.cancel();

        tokio::time::sleep(std::time::Duration::from_secs(
            self.config.shutdown_timeout_secs.min(5),
        ))
        .await;

        if let Err(e) = self.scheduler.shutdown().await {
            warn!("error during scheduler shutdown: {}", e);
        }

        self.is_running.store(false, Ordering::SeqCst);
        info!("scheduler shutdown complete");

        Ok(())
    }

    /// Get a clone of the shutdown token for job cancellation.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown_token.clone()
    }

    /// Check if the scheduler is currently running.
    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::SeqCst)
    }

    /// Add a pre-built job to the scheduler, returning its UUID.
    pub async fn add_job(&self, job: tokio_cron_scheduler::Job) -> Result<uuid::Uuid, SchedulerError> {
        let uuid = self.scheduler.add(job).await?;
        Ok(uuid)
    }

    /// Get the scheduler configuration.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Add a cron job with timezone-aware scheduling.
    ///
    /// `job_fn` receives a clone of the shutdown token so long-running
    /// jobs (the cycle driver, the aggregation refresh) can observe
    /// cancellation between phases.
    ///
    /// # Errors
    ///
    /// Returns an error if the cron expression is invalid or the
    /// timezone is not recognized.
    pub async fn add_cron_job<F, Fut>(
        &self,
        name: &str,
        cron_expr: &str,
        timezone: Option<&str>,
        job_fn: F,
    ) -> Result<uuid::Uuid, SchedulerError>
    where
        F: Fn(CancellationToken) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send,
    {
        let tz: Tz = match timezone {
            Some(tz_str) => tz_str
                .parse()
                .map_err(|_| SchedulerError::InvalidTimezone(tz_str.to_string()))?,
            None => self.config.parse_timezone()?,
        };

        validate_cron_expression(cron_expr)?;

        let job_name = name.to_string();
        let shutdown_token = self.shutdown_token.clone();
        let registry = self.registry.clone();
        registry.register(name, cron_expr);

        let job = Job::new_async_tz(cron_expr, tz, move |_uuid, _lock| {
            let name = job_name.clone();
            let token = shutdown_token.clone();
            let job_fn = job_fn.clone();
            let registry = registry.clone();

            Box::pin(async move {
                registry.record_start(&name);
                info!(job = %name, "job started");
                let start = std::time::Instant::now();

                job_fn(token).await;

                let elapsed = start.elapsed();
                registry.record_complete(&name, crate::registry::JobResult::Success, elapsed.as_millis() as u64);
                info!(job = %name, duration_ms = elapsed.as_millis(), "job completed");
            })
        })
        .map_err(|e| SchedulerError::InvalidCron(e.to_string()))?;

        let uuid = self.scheduler.add(job).await?;
        info!(job = %name, uuid = %uuid, cron = %cron_expr, timezone = %tz.name(), "job registered");

        Ok(uuid)
    }

    /// Parse a timezone string into a `chrono_tz::Tz`.
    pub fn parse_timezone(tz_str: &str) -> Result<Tz, SchedulerError> {
        tz_str
            .parse()
            .map_err(|_| SchedulerError::InvalidTimezone(tz_str.to_string()))
    }
}
