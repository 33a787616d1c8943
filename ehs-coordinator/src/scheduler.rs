//! Refresh scheduler
//!
//! Runs [`PollingCoordinator::refresh`] on a fixed interval in a background
//! task. Each refresh is awaited before the next tick is taken, so cycles
//! never overlap. A failed cycle is logged and retried on the next tick.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::coordinator::{PollingCoordinator, RefreshOutcome};
use crate::error::{CoordinatorError, Result};

/// Background task calling `refresh()` every update interval
#[derive(Debug)]
pub struct RefreshScheduler {
    interval: Duration,
    task_handle: JoinHandle<()>,
    shutdown_tx: watch::Sender<bool>,
    started_at: SystemTime,
    poll_count: Arc<AtomicU64>,
    error_count: Arc<AtomicU64>,
}

impl RefreshScheduler {
    /// Start ticking at the coordinator's configured interval
    ///
    /// The first tick fires one interval from now; the eager refresh at
    /// setup is the caller's job.
    pub fn start(coordinator: Arc<PollingCoordinator>) -> Self {
        let interval = coordinator.config().update_interval;
        Self::start_with_interval(coordinator, interval)
    }

    pub fn start_with_interval(coordinator: Arc<PollingCoordinator>, interval: Duration) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let poll_count = Arc::new(AtomicU64::new(0));
        let error_count = Arc::new(AtomicU64::new(0));

        let task_poll_count = Arc::clone(&poll_count);
        let task_error_count = Arc::clone(&error_count);

        let task_handle = tokio::spawn(async move {
            Self::refresh_loop(
                coordinator,
                interval,
                shutdown_rx,
                task_poll_count,
                task_error_count,
            )
            .await;
        });

        Self {
            interval,
            task_handle,
            shutdown_tx,
            started_at: SystemTime::now(),
            poll_count,
            error_count,
        }
    }

    async fn refresh_loop(
        coordinator: Arc<PollingCoordinator>,
        interval: Duration,
        mut shutdown_rx: watch::Receiver<bool>,
        poll_count: Arc<AtomicU64>,
        error_count: Arc<AtomicU64>,
    ) {
        tracing::debug!("Refresh scheduler started (interval: {:?})", interval);

        let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                // Only ever set to true, and a dropped sender means the
                // scheduler handle is gone.
                _ = shutdown_rx.changed() => break,
                _ = ticker.tick() => {
                    poll_count.fetch_add(1, Ordering::Relaxed);
                    match coordinator.refresh().await {
                        Ok(RefreshOutcome::Skipped) => {
                            tracing::debug!("Refresh skipped, transport unavailable");
                        }
                        Ok(RefreshOutcome::Completed { .. }) => {}
                        Err(e) => {
                            let errors = error_count.fetch_add(1, Ordering::Relaxed) + 1;
                            tracing::warn!("Refresh failed (error {}): {}", errors, e);
                        }
                    }
                }
            }
        }

        tracing::debug!("Refresh scheduler stopped");
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        !self.task_handle.is_finished()
    }

    pub fn stats(&self) -> SchedulerStats {
        SchedulerStats {
            interval: self.interval,
            started_at: self.started_at,
            poll_count: self.poll_count.load(Ordering::Relaxed),
            error_count: self.error_count.load(Ordering::Relaxed),
            is_running: self.is_running(),
        }
    }

    /// Stop ticking and wait for an in-flight refresh to finish
    pub async fn shutdown(self) -> Result<()> {
        let _ = self.shutdown_tx.send(true);
        self.task_handle.await.map_err(|e| {
            CoordinatorError::Shutdown(format!("Failed to await refresh task: {}", e))
        })
    }
}

/// Statistics for the refresh scheduler
#[derive(Debug, Clone)]
pub struct SchedulerStats {
    pub interval: Duration,
    pub started_at: SystemTime,
    pub poll_count: u64,
    pub error_count: u64,
    pub is_running: bool,
}

impl std::fmt::Display for SchedulerStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Refresh Scheduler Stats:")?;
        writeln!(f, "  Interval: {:?}", self.interval)?;
        writeln!(f, "  Polls: {}", self.poll_count)?;
        writeln!(f, "  Errors: {}", self.error_count)?;
        writeln!(f, "  Running: {}", self.is_running)
    }
}
