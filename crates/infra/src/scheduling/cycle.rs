//! One Running-state pass of the daily scheduler.
//!
//! Token first; without one the cycle is skipped. Then the bloom filter
//! download under the retry budget, then (only when enabled) the report
//! upload under the same budget. Failures are recorded in the
//! [`CycleReport`] and logged, never propagated.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use guardian_domain::{Result, SyncSettings};
use tracing::{debug, error, info, instrument, warn, Span};
use uuid::Uuid;

use crate::api::{AccessTokenProvider, SyncApiClient};
use crate::context::SyncContext;
use crate::transfer::{
    download_bloom_filter, retry_config, upload_report_file, with_retry, DownloadSummary,
    UploadOutcome,
};

/// Outcome of one cycle.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub cycle_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub token_acquired: bool,
    /// `None` when the cycle was skipped before downloading
    pub download: Option<Result<DownloadSummary>>,
    /// `None` when uploads are disabled or the cycle was skipped
    pub upload: Option<Result<UploadOutcome>>,
}

impl CycleReport {
    /// No token, so nothing else was attempted.
    pub fn skipped(&self) -> bool {
        !self.token_acquired
    }

    /// Every attempted step succeeded.
    pub fn is_success(&self) -> bool {
        self.token_acquired
            && self.download.as_ref().is_some_and(|r| r.is_ok())
            && self.upload.as_ref().map_or(true, |r| r.is_ok())
    }
}

/// The work done once per day.
pub struct SyncCycle {
    api: Arc<SyncApiClient>,
    tokens: Arc<dyn AccessTokenProvider>,
    settings: SyncSettings,
}

impl SyncCycle {
    pub fn new(
        api: Arc<SyncApiClient>,
        tokens: Arc<dyn AccessTokenProvider>,
        settings: SyncSettings,
    ) -> Self {
        Self { api, tokens, settings }
    }

    /// Run one cycle under `ctx`. The fetched token is bound to a derived
    /// context and dropped when this returns.
    #[instrument(skip_all, fields(cycle_id = tracing::field::Empty))]
    pub async fn run(&self, ctx: &SyncContext) -> CycleReport {
        let cycle_id = Uuid::now_v7();
        Span::current().record("cycle_id", tracing::field::display(cycle_id));
        let started_at = Utc::now();
        info!("Sync cycle started");

        let token = match self.tokens.access_token(ctx).await {
            Ok(token) => token,
            Err(err) => {
                warn!(
                    error = %err,
                    kind = err.label(),
                    status = err.status(),
                    "Access token unavailable, skipping cycle"
                );
                return CycleReport {
                    cycle_id,
                    started_at,
                    finished_at: Utc::now(),
                    token_acquired: false,
                    download: None,
                    upload: None,
                };
            }
        };

        let ctx = ctx.with_access_token(token);
        let api = self.api.as_ref();
        let cycle_ctx = &ctx;
        let retry = retry_config(&self.settings);

        let output_dir = self.settings.output_dir.as_path();
        let download =
            with_retry(cycle_ctx, retry.clone(), move || download_bloom_filter(api, cycle_ctx, output_dir))
                .await;
        match &download {
            Ok(summary) => info!(bytes = summary.bytes, "Bloom filter refreshed"),
            Err(err) => error!(
                error = %err,
                kind = err.label(),
                status = err.status(),
                "Bloom filter download failed"
            ),
        }

        let upload = if self.settings.upload_enabled {
            let report_path = self.settings.report_path.as_path();
            let upload =
                with_retry(cycle_ctx, retry, move || upload_report_file(api, cycle_ctx, report_path))
                    .await;
            match &upload {
                Ok(outcome) => info!(?outcome, "Report upload finished"),
                Err(err) => error!(error = %err, kind = err.label(), "Report upload failed"),
            }
            Some(upload)
        } else {
            debug!("Report upload disabled");
            None
        };

        let report = CycleReport {
            cycle_id,
            started_at,
            finished_at: Utc::now(),
            token_acquired: true,
            download: Some(download),
            upload,
        };
        info!(success = report.is_success(), "Sync cycle finished");
        report
    }
}
