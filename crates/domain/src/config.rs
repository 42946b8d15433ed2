//! Configuration records
//!
//! Both records are built once at startup and handed to the scheduler by
//! value; nothing here is process-global.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT, DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_DELAY,
};
use crate::errors::{GuardianError, Result};

/// Client credentials for the remote sync service.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub client_id: String,
    pub client_secret: String,
}

impl AppConfig {
    /// Build a validated configuration.
    ///
    /// # Errors
    /// Returns `GuardianError::Config` if either value is empty or blank.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Result<Self> {
        let config = Self { client_id: client_id.into(), client_secret: client_secret.into() };
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    /// Returns `GuardianError::Config` naming the first missing field.
    pub fn validate(&self) -> Result<()> {
        if self.client_id.trim().is_empty() {
            return Err(GuardianError::Config("client_id must not be empty".into()));
        }
        if self.client_secret.trim().is_empty() {
            return Err(GuardianError::Config("client_secret must not be empty".into()));
        }
        Ok(())
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Settings that drive the daily synchronization loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSettings {
    /// Directory the bloom filter file is written into
    pub output_dir: PathBuf,
    /// Report file accumulated between cycles
    pub report_path: PathBuf,
    /// Whether the report upload runs after the download
    pub upload_enabled: bool,
    /// Total attempts per transfer operation (initial try included)
    pub retry_attempts: u32,
    /// Fixed delay between transfer attempts
    pub retry_delay: Duration,
    /// Global timeout applied to every HTTP call
    pub request_timeout: Duration,
    /// Base URL of the remote service, with trailing slash
    pub base_url: String,
}

impl SyncSettings {
    pub fn new(output_dir: impl Into<PathBuf>, report_path: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            report_path: report_path.into(),
            upload_enabled: false,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_upload_enabled(mut self, enabled: bool) -> Self {
        self.upload_enabled = enabled;
        self
    }

    pub fn with_retry(mut self, attempts: u32, delay: Duration) -> Self {
        self.retry_attempts = attempts;
        self.retry_delay = delay;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// # Errors
    /// Returns `GuardianError::Config` for a zero attempt budget, a zero
    /// request timeout or an empty base URL.
    pub fn validate(&self) -> Result<()> {
        if self.retry_attempts == 0 {
            return Err(GuardianError::Config("retry_attempts must be at least 1".into()));
        }
        if self.request_timeout.is_zero() {
            return Err(GuardianError::Config("request_timeout must be non-zero".into()));
        }
        if self.base_url.trim().is_empty() {
            return Err(GuardianError::Config("base_url must not be empty".into()));
        }
        Ok(())
    }
}
