//! # Story Guardian Infrastructure
//!
//! Every piece of Story Guardian that touches the network, the filesystem or
//! the process environment.
//!
//! This crate contains:
//! - Authenticated HTTP transport with context-bound cancellation
//! - The remote sync API client (token, presigned URL, upload)
//! - Transfer operations (bloom filter download, report upload)
//! - The daily scheduler that drives a sync cycle at local midnight
//! - Environment configuration loading and OS path resolution
//!
//! ## Architecture
//! - Depends on `guardian-domain` for errors and configuration records
//! - Depends on `guardian-common` for retry and wall-clock helpers

pub mod api;
pub mod config;
pub mod context;
pub mod errors;
pub mod http;
pub mod paths;
pub mod scheduling;
pub mod transfer;

// Re-export commonly used items
pub use api::{AccessTokenProvider, ClientCredentials, Endpoints, SyncApiClient};
pub use context::SyncContext;
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use scheduling::{CycleReport, DailyScheduler, SchedulerError, SyncCycle};
pub use transfer::{download_bloom_filter, upload_report_file, UploadOutcome};
