//! Bloom filter download.

use std::path::{Path, PathBuf};

use guardian_domain::constants::BLOOM_FILTER_FILENAME;
use guardian_domain::{GuardianError, Result};
use reqwest::header::HeaderMap;
use reqwest::{Method, Response};
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument, warn};

use super::filesystem;
use crate::api::SyncApiClient;
use crate::context::SyncContext;
use crate::errors::InfraError;

/// Where the filter landed and how large it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadSummary {
    pub path: PathBuf,
    pub bytes: u64,
}

/// Download today's bloom filter into `output_dir`.
///
/// Creates the directory if needed, resolves the presigned URL with the
/// context's token, then streams the unauthenticated download into
/// `bloom_filter.gob.part` and renames it over `bloom_filter.gob`. A failed
/// attempt never replaces the previous filter.
///
/// # Errors
/// Directory or file failures are `GuardianError::Filesystem`; API and
/// transport failures pass through unchanged.
#[instrument(skip(api, ctx), fields(output_dir = %output_dir.display()))]
pub async fn download_bloom_filter(
    api: &SyncApiClient,
    ctx: &SyncContext,
    output_dir: &Path,
) -> Result<DownloadSummary> {
    fs::create_dir_all(output_dir)
        .await
        .map_err(|err| filesystem("create output directory", output_dir, err))?;

    let url = api.fetch_presigned_download_url(ctx).await?;
    let response =
        api.http().execute(ctx, Method::GET, url.as_str(), None, HeaderMap::new()).await?;

    let destination = output_dir.join(BLOOM_FILTER_FILENAME);
    let partial = output_dir.join(format!("{BLOOM_FILTER_FILENAME}.part"));

    let bytes = match stream_to_file(ctx, response, &partial).await {
        Ok(bytes) => bytes,
        Err(err) => {
            if let Err(cleanup) = fs::remove_file(&partial).await {
                debug!(error = %cleanup, "No partial download to clean up");
            }
            return Err(err);
        }
    };

    fs::rename(&partial, &destination)
        .await
        .map_err(|err| filesystem("replace bloom filter", &destination, err))?;

    info!(path = %destination.display(), bytes, "Bloom filter downloaded");
    Ok(DownloadSummary { path: destination, bytes })
}

async fn stream_to_file(ctx: &SyncContext, mut response: Response, path: &Path) -> Result<u64> {
    let mut file = File::create(path).await.map_err(|err| filesystem("create", path, err))?;
    let mut written = 0u64;

    loop {
        let chunk = ctx
            .guard(async {
                response.chunk().await.map_err(|err| GuardianError::from(InfraError::from(err)))
            })
            .await?;
        let Some(chunk) = chunk else { break };

        file.write_all(&chunk).await.map_err(|err| filesystem("write", path, err))?;
        written += chunk.len() as u64;
    }

    file.flush().await.map_err(|err| filesystem("flush", path, err))?;
    if let Err(err) = file.sync_all().await {
        warn!(error = %err, "fsync of downloaded bloom filter failed");
    }
    Ok(written)
}
