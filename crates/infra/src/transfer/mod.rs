//! Transfer operations
//!
//! - **download**: fetch the presigned URL, stream the bloom filter into the
//!   output directory
//! - **upload**: package the local report as multipart and hand it off,
//!   deleting it only after the service accepted it
//!
//! Both are single attempts; [`with_retry`] applies the cycle's retry
//! budget, never retrying cancellation or deadline errors.

pub mod download;
pub mod multipart;
pub mod upload;

use std::future::Future;
use std::path::Path;

use guardian_common::resilience::policies::PredicateRetry;
use guardian_common::resilience::{retry_with_policy, RetryConfig};
use guardian_domain::{GuardianError, Result, SyncSettings};
use tracing::debug;

pub use download::{download_bloom_filter, DownloadSummary};
pub use upload::{upload_report_file, UploadOutcome};

use crate::context::SyncContext;
use crate::errors::InfraError;

/// Retry budget configured for transfer operations.
pub fn retry_config(settings: &SyncSettings) -> RetryConfig {
    RetryConfig::fixed(settings.retry_attempts, settings.retry_delay)
}

fn is_retryable(err: &GuardianError) -> bool {
    !err.is_cancellation()
}

/// Run `operation` under the retry executor, returning its last error once
/// the budget is spent. Delays end early when `ctx` is cancelled.
pub async fn with_retry<F, Fut, T>(ctx: &SyncContext, config: RetryConfig, operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    retry_with_policy(ctx.cancellation_token(), config, PredicateRetry::new(is_retryable), operation)
        .await
        .map_err(|err| {
            debug!(attempts = err.attempts(), "transfer gave up");
            InfraError::from(err).into()
        })
}

fn filesystem(action: &str, path: &Path, err: std::io::Error) -> GuardianError {
    GuardianError::Filesystem(format!("failed to {action} {}: {err}", path.display()))
}
