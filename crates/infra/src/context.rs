//! Request-scoped context for one sync cycle
//!
//! A [`SyncContext`] carries the cancellation signal, an optional caller
//! deadline and, once fetched, the cycle's access token. It is passed by
//! reference to every operation in the cycle and dropped when the cycle ends,
//! so no credential outlives the cycle that obtained it.

use std::future::Future;
use std::time::Duration;

use guardian_domain::{AccessToken, GuardianError, Result};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone)]
pub struct SyncContext {
    cancel: CancellationToken,
    deadline: Option<Instant>,
    access_token: Option<AccessToken>,
}

impl SyncContext {
    pub fn new(cancel: CancellationToken) -> Self {
        Self { cancel, deadline: None, access_token: None }
    }

    /// Context that can never be cancelled. Handy in tests and one-shot tools.
    pub fn background() -> Self {
        Self::new(CancellationToken::new())
    }

    /// Stop waiting on any operation once `deadline` passes.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        });
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Bind the cycle's credential. The original context is left untouched.
    pub fn with_access_token(&self, token: AccessToken) -> Self {
        Self { access_token: Some(token), ..self.clone() }
    }

    /// The bound credential, or an internal error when the caller forgot to
    /// bind one before an authenticated call.
    pub fn require_access_token(&self) -> Result<&AccessToken> {
        self.access_token.as_ref().ok_or_else(|| {
            GuardianError::Internal("no access token bound to the sync context".into())
        })
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Fail fast if the context is already cancelled or past its deadline.
    pub fn check(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(GuardianError::Cancelled);
        }
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Err(GuardianError::DeadlineExceeded);
        }
        Ok(())
    }

    /// Drive `fut` to completion unless the context is cancelled or its
    /// deadline passes first. Cancellation wins ties.
    pub async fn guard<F, T>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        self.check()?;

        let deadline = self.deadline;
        let expired = async move {
            match deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(GuardianError::Cancelled),
            () = expired => Err(GuardianError::DeadlineExceeded),
            result = fut => result,
        }
    }
}
