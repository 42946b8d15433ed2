//! Daily scheduler for the bloom filter sync.
//!
//! Two states, looping until cancelled:
//!
//! - **Waiting**: sleep until the next local midnight, recomputed from the
//!   clock on every iteration (nothing is persisted, so a restart lands on
//!   the same schedule)
//! - **Running**: one [`SyncCycle`]; its failures are logged, never fatal
//!
//! Cycles never overlap: the next wait starts only after the cycle returns.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use guardian_domain::{AppConfig, SyncSettings};
//! use guardian_infra::api::{ClientCredentials, SyncApiClient};
//! use guardian_infra::scheduling::{DailyScheduler, SyncCycle};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = SyncSettings::new("/var/lib/guardian", "/var/lib/guardian/filtered_report.log");
//! let api = Arc::new(SyncApiClient::from_settings(&settings)?);
//! let tokens = Arc::new(ClientCredentials::new(api.clone(), AppConfig::new("id", "secret")?));
//! let mut scheduler = DailyScheduler::new(SyncCycle::new(api, tokens, settings));
//!
//! scheduler.start().await?;
//! // ... application runs ...
//! scheduler.stop().await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use guardian_common::time::{next_midnight, until_next_midnight, Clock, SystemClock};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use super::cycle::{CycleReport, SyncCycle};
use crate::context::SyncContext;
use crate::scheduling::error::{SchedulerError, SchedulerResult};

/// Type alias for task handle to avoid complexity warnings
type TaskHandle = Arc<Mutex<Option<JoinHandle<()>>>>;

const DEFAULT_JOIN_TIMEOUT: Duration = Duration::from_secs(5);

/// Runs a [`SyncCycle`] at every local midnight
pub struct DailyScheduler {
    cycle: Arc<SyncCycle>,
    clock: Arc<dyn Clock>,
    join_timeout: Duration,
    cancellation_token: CancellationToken,
    task_handle: TaskHandle,
}

impl DailyScheduler {
    pub fn new(cycle: SyncCycle) -> Self {
        Self {
            cycle: Arc::new(cycle),
            clock: Arc::new(SystemClock),
            join_timeout: DEFAULT_JOIN_TIMEOUT,
            cancellation_token: CancellationToken::new(),
            task_handle: Arc::new(Mutex::new(None)),
        }
    }

    /// Replace the wall clock, e.g. with a fixed one in tests.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Run the Waiting/Running loop on the current task until `cancel`
    /// fires. Returns promptly from any state once cancelled.
    pub async fn run(&self, cancel: CancellationToken) {
        Self::run_loop(Arc::clone(&self.cycle), Arc::clone(&self.clock), cancel).await;
    }

    /// One Running-state pass under `ctx`, outside the daily loop.
    pub async fn run_cycle(&self, ctx: &SyncContext) -> CycleReport {
        self.cycle.run(ctx).await
    }

    /// Start the scheduler
    ///
    /// Spawns a background task that runs [`run`](Self::run).
    ///
    /// # Errors
    ///
    /// Returns error if scheduler is already running
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> SchedulerResult<()> {
        if self.is_running() {
            return Err(SchedulerError::AlreadyRunning);
        }

        info!("Starting daily scheduler");

        // Create a new cancellation token (supports restart after stop)
        self.cancellation_token = CancellationToken::new();

        let cycle = Arc::clone(&self.cycle);
        let clock = Arc::clone(&self.clock);
        let cancel = self.cancellation_token.clone();

        let handle = tokio::spawn(async move {
            Self::run_loop(cycle, clock, cancel).await;
        });

        *self.task_handle.lock().await = Some(handle);

        info!("Daily scheduler started");
        Ok(())
    }

    /// Stop the scheduler gracefully
    ///
    /// Cancels the background task and awaits completion.
    ///
    /// # Errors
    ///
    /// Returns error if scheduler is not running, or if the task does not
    /// finish within the join timeout
    #[instrument(skip(self))]
    pub async fn stop(&mut self) -> SchedulerResult<()> {
        if !self.is_running() {
            return Err(SchedulerError::NotRunning);
        }

        info!("Stopping daily scheduler");

        self.cancellation_token.cancel();

        if let Some(handle) = self.task_handle.lock().await.take() {
            let join_timeout = self.join_timeout;
            tokio::time::timeout(join_timeout, handle)
                .await
                .map_err(|source| SchedulerError::Timeout { duration: join_timeout, source })??;
        }

        info!("Daily scheduler stopped");
        Ok(())
    }

    /// Check if scheduler is running
    ///
    /// A scheduler is considered running if it has an active task handle that
    /// hasn't finished.
    pub fn is_running(&self) -> bool {
        self.task_handle
            .try_lock()
            .ok()
            .and_then(|guard| guard.as_ref().map(|h| !h.is_finished()))
            .unwrap_or(false)
    }

    async fn run_loop(cycle: Arc<SyncCycle>, clock: Arc<dyn Clock>, cancel: CancellationToken) {
        info!("Daily scheduler loop started");
        loop {
            let now = clock.now();
            let next_run = next_midnight(&now);
            let wait = until_next_midnight(&now);
            info!(next_run = %next_run, wait_secs = wait.as_secs(), "Waiting for next sync");

            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    debug!("Daily scheduler loop cancelled while waiting");
                    break;
                }
                () = tokio::time::sleep(wait) => {}
            }

            let ctx = SyncContext::new(cancel.child_token());
            let report = cycle.run(&ctx).await;
            debug!(cycle_id = %report.cycle_id, skipped = report.skipped(), "Cycle returned");

            if cancel.is_cancelled() {
                debug!("Daily scheduler loop cancelled during cycle");
                break;
            }
        }
        info!("Daily scheduler loop stopped");
    }
}

impl Drop for DailyScheduler {
    fn drop(&mut self) {
        self.cancellation_token.cancel();
    }
}
