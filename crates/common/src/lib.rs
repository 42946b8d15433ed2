//! Common utilities shared across Story Guardian crates.
//!
//! # Feature Tiers
//!
//! - `runtime` (default): cancellable retry executor and next-midnight
//!   scheduling helpers
//! - `test-utils`: controllable clock for tests of downstream crates

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod resilience;
#[cfg(feature = "runtime")]
pub mod time;

#[cfg(feature = "runtime")]
pub use resilience::{
    retry_with_policy, RetryConfig, RetryDecision, RetryError, RetryExecutor,
    RetryPolicy, RetryResult,
};
#[cfg(feature = "runtime")]
pub use time::{next_midnight, until_next_midnight, Clock, SystemClock};

// Test support
// --------------------------------------------------------------------
#[cfg(all(feature = "runtime", any(feature = "test-utils", test)))]
pub mod testing;
