//! Scheduling infrastructure for the daily sync
//!
//! - [`SyncCycle`]: one token + download (+ optional upload) pass
//! - [`DailyScheduler`]: runs a cycle at every local midnight
//!
//! The scheduler follows the usual runtime rules:
//! - Explicit lifecycle management (start/stop)
//! - Join handles for spawned tasks
//! - Cancellation token support
//! - Structured tracing for every state transition

pub mod cycle;
pub mod daily_scheduler;
pub mod error;

pub use cycle::{CycleReport, SyncCycle};
pub use daily_scheduler::DailyScheduler;
pub use error::{SchedulerError, SchedulerResult};
