//! Remote sync API client
//!
//! Three operations against the sync service, all relative to one base URL:
//!
//! - token exchange (`POST oauth/token`, client credentials, unauthenticated)
//! - presigned download URL lookup (`GET api/bloom-filter/file/1`, bearer)
//! - report upload (`POST api/upload/report/v1`, bearer)
//!
//! # Architecture
//!
//! - Built on [`HttpClient`](crate::http::HttpClient); no direct reqwest sends
//! - The bearer token comes from the [`SyncContext`](crate::SyncContext), not
//!   from client state
//! - No retries here; transfer operations wrap calls in the retry executor

pub mod auth;
pub mod client;
pub mod types;

pub use auth::{AccessTokenProvider, ClientCredentials};
pub use client::{Endpoints, SyncApiClient};
pub use types::{PresignedUrlResponse, TokenRequest, TokenResponse};
