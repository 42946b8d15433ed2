//! Test support for crates that drive the scheduler
//!
//! Enabled by the `test-utils` feature; never compiled into release builds
//! of downstream crates unless they ask for it.

pub mod time;

pub use time::FixedClock;
