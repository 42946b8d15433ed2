//! Shared fixtures for infra integration tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use guardian_domain::{AppConfig, SyncSettings};
use guardian_infra::api::{ClientCredentials, Endpoints, SyncApiClient};
use guardian_infra::http::HttpClient;
use guardian_infra::scheduling::SyncCycle;
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN: &str = "integration-token";
pub const BLOOM_BODY: &str = "bloom_filter_data";
pub const PRESIGNED_PATH: &str = "/bucket/bloom_filter.gob";

/// Route test logs through the libtest capture; `RUST_LOG` picks the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Scratch output directory plus report path for one test.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self { dir: TempDir::new().expect("temp dir should be created") }
    }

    pub fn output_dir(&self) -> PathBuf {
        self.dir.path().join("guardian")
    }

    pub fn report_path(&self) -> PathBuf {
        self.dir.path().join("filtered_report.log")
    }

    pub fn bloom_path(&self) -> PathBuf {
        self.output_dir().join("bloom_filter.gob")
    }

    /// Settings pointed at `server` with a fast retry budget.
    pub fn settings(&self, server: &MockServer) -> SyncSettings {
        SyncSettings::new(self.output_dir(), self.report_path())
            .with_base_url(server.uri())
            .with_retry(6, Duration::from_millis(10))
            .with_request_timeout(Duration::from_secs(5))
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

pub fn api_client(server: &MockServer) -> Arc<SyncApiClient> {
    let http = HttpClient::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .expect("http client should build");
    let endpoints = Endpoints::from_base(&server.uri()).expect("mock server URI is absolute");
    Arc::new(SyncApiClient::new(http, endpoints))
}

/// Cycle wired with real client-credentials against `server`.
pub fn sync_cycle(server: &MockServer, settings: SyncSettings) -> SyncCycle {
    let api = api_client(server);
    let config = AppConfig::new("client-id", "client-secret").expect("valid credentials");
    let tokens = Arc::new(ClientCredentials::new(api.clone(), config));
    SyncCycle::new(api, tokens, settings)
}

pub async fn mount_token_ok(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": TOKEN,
            "scope": "bloom",
            "expires_in": 86400,
            "token_type": "Bearer",
        })))
        .mount(server)
        .await;
}

pub async fn mount_presigned_ok(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/bloom-filter/file/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "presignedUrl": format!("{}{PRESIGNED_PATH}?X-Amz-Signature=sig", server.uri()),
        })))
        .mount(server)
        .await;
}

pub async fn mount_bloom_ok(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(PRESIGNED_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(BLOOM_BODY))
        .mount(server)
        .await;
}

/// Count requests the server saw for `request_path`.
pub async fn requests_to(server: &MockServer, request_path: &str) -> usize {
    server
        .received_requests()
        .await
        .expect("request recording is enabled")
        .iter()
        .filter(|request| request.url.path() == request_path)
        .count()
}
