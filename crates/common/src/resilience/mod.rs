//! Resilience patterns for transient failures
//!
//! Currently a single pattern: a fixed-delay retry executor whose policy is
//! supplied by the caller and whose delays honour a cancellation token.
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use guardian_common::resilience::{policies::PredicateRetry, retry_with_policy, RetryConfig};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() {
//! let cancel = CancellationToken::new();
//! let policy = PredicateRetry::new(|err: &std::io::Error| {
//!     err.kind() != std::io::ErrorKind::Interrupted
//! });
//! let result = retry_with_policy(
//!     &cancel,
//!     RetryConfig::fixed(6, Duration::from_secs(3)),
//!     policy,
//!     || async { Ok::<_, std::io::Error>(()) },
//! )
//! .await;
//! # let _ = result;
//! # }
//! ```

pub mod retry;

pub use retry::{
    policies, retry_with_policy, RetryConfig, RetryDecision, RetryError,
    RetryExecutor, RetryPolicy, RetryResult,
};
