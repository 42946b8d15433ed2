//! Clock abstraction for testability
//!
//! The scheduler asks a [`Clock`] for "now" on every iteration instead of
//! calling `Local::now()` directly, so tests can place it just before
//! midnight.

use chrono::{DateTime, Local};

/// Source of local wall-clock time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

/// Real system clock. Use this in production code.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}
