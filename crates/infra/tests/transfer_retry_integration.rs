//! Retry behaviour of transfer operations under the cycle's retry budget.

mod support;

use std::time::Duration;

use guardian_common::resilience::RetryConfig;
use guardian_domain::{AccessToken, GuardianError};
use guardian_infra::transfer::{download_bloom_filter, with_retry};
use guardian_infra::SyncContext;
use support::{api_client, init_tracing, requests_to, Workspace, TOKEN};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PRESIGNED_ENDPOINT: &str = "/api/bloom-filter/file/1";

async fn mount_unavailable(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(PRESIGNED_ENDPOINT))
        .respond_with(ResponseTemplate::new(503).set_body_string("try later"))
        .mount(server)
        .await;
}

fn authed(cancel: CancellationToken) -> SyncContext {
    SyncContext::new(cancel).with_access_token(AccessToken::new(TOKEN))
}

#[tokio::test]
async fn test_persistent_failure_uses_whole_budget() {
    init_tracing();
    let server = MockServer::start().await;
    mount_unavailable(&server).await;

    let api = api_client(&server);
    let workspace = Workspace::new();
    let output_dir = workspace.output_dir();
    let ctx = authed(CancellationToken::new());

    let result = with_retry(&ctx, RetryConfig::fixed(6, Duration::from_millis(10)), || {
        download_bloom_filter(&api, &ctx, &output_dir)
    })
    .await;

    match result {
        Err(GuardianError::Status { status, body, .. }) => {
            assert_eq!(status, 503);
            assert_eq!(body, "try later");
        }
        other => panic!("expected the last status error, got {other:?}"),
    }
    assert_eq!(requests_to(&server, PRESIGNED_ENDPOINT).await, 6);
}

#[tokio::test]
async fn test_unauthorized_presigned_url_is_retried_and_last_error_returned() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(PRESIGNED_ENDPOINT))
        .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
        .expect(6)
        .mount(&server)
        .await;

    let api = api_client(&server);
    let workspace = Workspace::new();
    let output_dir = workspace.output_dir();
    let ctx = authed(CancellationToken::new());

    let result = with_retry(&ctx, RetryConfig::fixed(6, Duration::from_millis(10)), || {
        download_bloom_filter(&api, &ctx, &output_dir)
    })
    .await;

    match result {
        Err(GuardianError::Status { status, body, url }) => {
            assert_eq!(status, 401);
            assert_eq!(body, "token expired");
            assert!(url.ends_with(PRESIGNED_ENDPOINT));
        }
        other => panic!("expected the last status error, got {other:?}"),
    }
    assert!(!workspace.bloom_path().exists());
}

#[tokio::test]
async fn test_cancel_during_delay_abandons_remaining_attempts() {
    init_tracing();
    let server = MockServer::start().await;
    mount_unavailable(&server).await;

    let api = api_client(&server);
    let workspace = Workspace::new();
    let output_dir = workspace.output_dir();
    let cancel = CancellationToken::new();
    let ctx = authed(cancel.clone());

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(300)).await;
        trigger.cancel();
    });

    let result = tokio::time::timeout(
        Duration::from_secs(5),
        with_retry(&ctx, RetryConfig::fixed(6, Duration::from_secs(30)), || {
            download_bloom_filter(&api, &ctx, &output_dir)
        }),
    )
    .await
    .expect("cancellation should end the retry loop well before the delay");

    assert_eq!(result.unwrap_err(), GuardianError::Cancelled);
    assert_eq!(requests_to(&server, PRESIGNED_ENDPOINT).await, 1);
}

#[tokio::test]
async fn test_cancelled_context_makes_single_attempt_without_network() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let api = api_client(&server);
    let workspace = Workspace::new();
    let output_dir = workspace.output_dir();
    let cancel = CancellationToken::new();
    cancel.cancel();
    let ctx = authed(cancel);

    let started = std::time::Instant::now();
    let result = with_retry(&ctx, RetryConfig::fixed(6, Duration::from_secs(3)), || {
        download_bloom_filter(&api, &ctx, &output_dir)
    })
    .await;

    assert_eq!(result.unwrap_err(), GuardianError::Cancelled);
    assert!(started.elapsed() < Duration::from_secs(3));
}
