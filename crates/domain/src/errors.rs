//! Error types used throughout the application

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Story Guardian
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "detail")]
pub enum GuardianError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("{url} returned status {status}")]
    Status { status: u16, url: String, body: String },

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Filesystem error: {0}")]
    Filesystem(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Deadline exceeded")]
    DeadlineExceeded,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GuardianError {
    /// True for errors raised because the caller stopped waiting.
    ///
    /// These are never retried: the caller no longer wants the result.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled | Self::DeadlineExceeded)
    }

    /// HTTP status carried by a non-2xx transport failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the error only makes sense at startup.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_) | Self::UnsupportedPlatform(_))
    }

    /// Stable label for structured logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::UnsupportedPlatform(_) => "unsupported_platform",
            Self::Network(_) => "network",
            Self::Status { .. } => "status",
            Self::Timeout(_) => "timeout",
            Self::Decode(_) => "decode",
            Self::Filesystem(_) => "filesystem",
            Self::Cancelled => "cancelled",
            Self::DeadlineExceeded => "deadline_exceeded",
            Self::Internal(_) => "internal",
        }
    }
}

/// Result type alias for Story Guardian operations
pub type Result<T> = std::result::Result<T, GuardianError>;
