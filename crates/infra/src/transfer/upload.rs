//! Report upload.

use std::io::ErrorKind;
use std::path::Path;

use guardian_domain::constants::{REPORT_FILENAME, REPORT_FORM_FIELD};
use guardian_domain::Result;
use tokio::fs;
use tracing::{debug, info, instrument, warn};

use super::{filesystem, multipart};
use crate::api::SyncApiClient;
use crate::context::SyncContext;

/// What [`upload_report_file`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    /// No report file existed; nothing was sent.
    Skipped,
    /// The report was accepted and removed locally.
    Uploaded { bytes: usize },
}

/// Upload the accumulated report at `file_path`, then delete it.
///
/// A missing file is not an error. The file is only removed after the
/// service answered 2xx, so a failed upload leaves it for the next cycle.
/// Once accepted, the upload counts as done even if the local file cannot be
/// removed; that failure is logged.
///
/// # Errors
/// Reading the file yields `GuardianError::Filesystem`; upload failures pass
/// through unchanged.
#[instrument(skip(api, ctx), fields(file = %file_path.display()))]
pub async fn upload_report_file(
    api: &SyncApiClient,
    ctx: &SyncContext,
    file_path: &Path,
) -> Result<UploadOutcome> {
    let content = match fs::read(file_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!("No report file, skipping upload");
            return Ok(UploadOutcome::Skipped);
        }
        Err(err) => return Err(filesystem("read report", file_path, err)),
    };

    let filename = file_path
        .file_name()
        .map_or_else(|| REPORT_FILENAME.into(), |name| name.to_string_lossy());
    let bytes = content.len();
    let form = multipart::encode_file(REPORT_FORM_FIELD, &filename, &content);
    drop(content);

    api.upload_file(ctx, form.bytes, &form.content_type).await?;

    match fs::remove_file(file_path).await {
        Ok(()) => info!(bytes, "Report uploaded and removed"),
        Err(err) if err.kind() == ErrorKind::NotFound => info!(bytes, "Report uploaded"),
        Err(err) => {
            let err = filesystem("remove uploaded report", file_path, err);
            warn!(bytes, error = %err, "Report uploaded but not removed");
        }
    }

    Ok(UploadOutcome::Uploaded { bytes })
}
