//! Application constants
//!
//! Centralized location for the fixed values of the remote sync service and
//! the local file layout.

use std::time::Duration;

// Remote service
pub const DEFAULT_BASE_URL: &str = "https://svc.cipherowl.ai/";
pub const OAUTH_TOKEN_PATH: &str = "oauth/token";
pub const BLOOM_FILTER_PATH: &str = "api/bloom-filter/file/1";
pub const UPLOAD_REPORT_PATH: &str = "api/upload/report/v1";
pub const TOKEN_AUDIENCE: &str = "svc.cipherowl.ai";
pub const TOKEN_GRANT_TYPE: &str = "client_credentials";

// Local file layout
pub const BLOOM_FILTER_FILENAME: &str = "bloom_filter.gob";
pub const REPORT_FILENAME: &str = "filtered_report.log";
pub const REPORT_FORM_FIELD: &str = "file";

// Environment
pub const ENV_PREFIX: &str = "CIPHEROWL_";

// Transfer policy
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 6;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(3);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
