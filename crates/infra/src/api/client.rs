//! Sync API client
//!
//! Stateless apart from the transport and resolved endpoint URLs. Every
//! authenticated call reads the bearer token from the [`SyncContext`] it is
//! given, so one client serves every cycle.

use guardian_domain::constants::{BLOOM_FILTER_PATH, OAUTH_TOKEN_PATH, UPLOAD_REPORT_PATH};
use guardian_domain::{AccessToken, GuardianError, PresignedUrl, Result, SyncSettings};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument};
use url::Url;

use super::types::{PresignedUrlResponse, TokenRequest, TokenResponse};
use crate::context::SyncContext;
use crate::errors::InfraError;
use crate::http::HttpClient;

/// Fully resolved endpoint URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub token: Url,
    pub bloom_filter: Url,
    pub upload_report: Url,
}

impl Endpoints {
    /// Resolve the three fixed sub-paths against `base`.
    ///
    /// A missing trailing slash is added so the last base segment is kept.
    ///
    /// # Errors
    /// Returns `GuardianError::Config` if `base` is not an absolute URL.
    pub fn from_base(base: &str) -> Result<Self> {
        let normalized = if base.ends_with('/') { base.to_string() } else { format!("{base}/") };
        let base = Url::parse(&normalized)
            .map_err(|err| GuardianError::Config(format!("invalid base URL {normalized}: {err}")))?;
        let join = |path: &str| {
            base.join(path)
                .map_err(|err| GuardianError::Config(format!("invalid endpoint path {path}: {err}")))
        };

        Ok(Self {
            token: join(OAUTH_TOKEN_PATH)?,
            bloom_filter: join(BLOOM_FILTER_PATH)?,
            upload_report: join(UPLOAD_REPORT_PATH)?,
        })
    }
}

/// Client for the remote sync service
#[derive(Debug, Clone)]
pub struct SyncApiClient {
    http: HttpClient,
    endpoints: Endpoints,
}

impl SyncApiClient {
    pub fn new(http: HttpClient, endpoints: Endpoints) -> Self {
        Self { http, endpoints }
    }

    /// Build a client with the transport timeout and base URL from
    /// `settings`.
    ///
    /// # Errors
    /// Returns `GuardianError::Config` for an unusable base URL or timeout.
    pub fn from_settings(settings: &SyncSettings) -> Result<Self> {
        let http = HttpClient::builder().timeout(settings.request_timeout).build()?;
        Ok(Self::new(http, Endpoints::from_base(&settings.base_url)?))
    }

    /// The underlying transport, for unauthenticated downloads.
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Exchange client credentials for a bearer token.
    ///
    /// # Errors
    /// Transport failures and non-2xx replies come back as the transport
    /// error; an unparsable or empty body is `GuardianError::Decode`.
    #[instrument(skip(self, ctx, client_secret), fields(client_id = %client_id))]
    pub async fn fetch_access_token(
        &self,
        ctx: &SyncContext,
        client_id: &str,
        client_secret: &str,
    ) -> Result<AccessToken> {
        let body = serde_json::to_vec(&TokenRequest::client_credentials(client_id, client_secret))
            .map_err(|err| GuardianError::Internal(format!("failed to encode token request: {err}")))?;

        let response = self
            .http
            .execute(ctx, Method::POST, self.endpoints.token.as_str(), Some(body), HeaderMap::new())
            .await?;
        let token: TokenResponse = read_json(ctx, response).await?;

        if token.access_token.is_empty() {
            return Err(GuardianError::Decode("token response has an empty access_token".into()));
        }

        info!(expires_in = ?token.expires_in, "Access token acquired");
        Ok(AccessToken::new(token.access_token))
    }

    /// Look up today's presigned bloom filter download URL.
    ///
    /// # Errors
    /// `GuardianError::Internal` if `ctx` carries no token; otherwise as
    /// [`fetch_access_token`](Self::fetch_access_token).
    #[instrument(skip(self, ctx))]
    pub async fn fetch_presigned_download_url(&self, ctx: &SyncContext) -> Result<PresignedUrl> {
        let headers = bearer_headers(ctx)?;
        let response = self
            .http
            .execute(ctx, Method::GET, self.endpoints.bloom_filter.as_str(), None, headers)
            .await?;
        let body: PresignedUrlResponse = read_json(ctx, response).await?;

        if body.presigned_url.is_empty() {
            return Err(GuardianError::Decode("bloom filter response has an empty presignedUrl".into()));
        }

        let url = PresignedUrl::new(body.presigned_url);
        debug!(url = %url, "Presigned download URL received");
        Ok(url)
    }

    /// Upload raw bytes with the given content type. The reply body is
    /// discarded.
    ///
    /// # Errors
    /// `GuardianError::Internal` if `ctx` carries no token or
    /// `content_type` is not a valid header value; transport errors as-is.
    #[instrument(skip(self, ctx, content), fields(bytes = content.len()))]
    pub async fn upload_file(
        &self,
        ctx: &SyncContext,
        content: Vec<u8>,
        content_type: &str,
    ) -> Result<()> {
        let mut headers = bearer_headers(ctx)?;
        let content_type = HeaderValue::from_str(content_type)
            .map_err(|err| GuardianError::Internal(format!("invalid content type: {err}")))?;
        headers.insert(CONTENT_TYPE, content_type);

        let response = self
            .http
            .execute(ctx, Method::POST, self.endpoints.upload_report.as_str(), Some(content), headers)
            .await?;
        drop(response);

        info!("Report uploaded");
        Ok(())
    }
}

fn bearer_headers(ctx: &SyncContext) -> Result<HeaderMap> {
    let token = ctx.require_access_token()?;
    let mut value = HeaderValue::from_str(&token.bearer())
        .map_err(|_| GuardianError::Internal("access token is not a valid header value".into()))?;
    value.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, value);
    Ok(headers)
}

async fn read_json<T: DeserializeOwned>(ctx: &SyncContext, response: Response) -> Result<T> {
    let bytes = ctx
        .guard(async move {
            response.bytes().await.map_err(|err| GuardianError::from(InfraError::from(err)))
        })
        .await?;
    serde_json::from_slice(&bytes).map_err(|err| InfraError::from(err).into())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio_util::sync::CancellationToken;
    use wiremock::matchers::{body_json, header, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn client_for(server: &MockServer) -> SyncApiClient {
        let http = HttpClient::builder().timeout(Duration::from_secs(5)).build().unwrap();
        SyncApiClient::new(http, Endpoints::from_base(&server.uri()).unwrap())
    }

    fn authed() -> SyncContext {
        SyncContext::background().with_access_token(AccessToken::new("test-token"))
    }

    #[test]
    fn endpoints_resolve_against_base() {
        let endpoints = Endpoints::from_base("https://svc.cipherowl.ai/").unwrap();
        assert_eq!(endpoints.token.as_str(), "https://svc.cipherowl.ai/oauth/token");
        assert_eq!(
            endpoints.bloom_filter.as_str(),
            "https://svc.cipherowl.ai/api/bloom-filter/file/1"
        );
        assert_eq!(
            endpoints.upload_report.as_str(),
            "https://svc.cipherowl.ai/api/upload/report/v1"
        );
    }

    #[test]
    fn endpoints_keep_base_path_without_trailing_slash() {
        let endpoints = Endpoints::from_base("http://127.0.0.1:8080/staging").unwrap();
        assert_eq!(endpoints.token.as_str(), "http://127.0.0.1:8080/staging/oauth/token");
    }

    #[test]
    fn relative_base_is_a_config_error() {
        assert!(matches!(Endpoints::from_base("svc.cipherowl.ai"), Err(GuardianError::Config(_))));
    }

    #[tokio::test]
    async fn fetch_access_token_posts_client_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .and(header("content-type", "application/json"))
            .and(body_json(serde_json::json!({
                "client_id": "id",
                "client_secret": "secret",
                "audience": "svc.cipherowl.ai",
                "grant_type": "client_credentials",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "abc",
                "scope": "bloom:read",
                "expires_in": 86400,
                "token_type": "Bearer",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let token = client_for(&server)
            .fetch_access_token(&SyncContext::background(), "id", "secret")
            .await
            .unwrap();
        assert_eq!(token.as_str(), "abc");
    }

    #[tokio::test]
    async fn fetch_access_token_fails_on_bad_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/token"))
            .respond_with(ResponseTemplate::new(400).set_body_string("invalid_client"))
            .expect(1)
            .mount(&server)
            .await;

        let result =
            client_for(&server).fetch_access_token(&SyncContext::background(), "id", "bad").await;
        match result {
            Err(GuardianError::Status { status, body, .. }) => {
                assert_eq!(status, 400);
                assert_eq!(body, "invalid_client");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn fetch_access_token_rejects_malformed_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let result =
            client_for(&server).fetch_access_token(&SyncContext::background(), "id", "secret").await;
        assert!(matches!(result, Err(GuardianError::Decode(_))));
    }

    #[tokio::test]
    async fn fetch_access_token_rejects_empty_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"access_token": ""})),
            )
            .mount(&server)
            .await;

        let result =
            client_for(&server).fetch_access_token(&SyncContext::background(), "id", "secret").await;
        assert!(matches!(result, Err(GuardianError::Decode(_))));
    }

    #[tokio::test]
    async fn presigned_url_uses_bearer_from_context() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/bloom-filter/file/1"))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "presignedUrl": "https://bucket.example/bloom.gob?sig=1",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let url = client_for(&server).fetch_presigned_download_url(&authed()).await.unwrap();
        assert_eq!(url.as_str(), "https://bucket.example/bloom.gob?sig=1");
    }

    #[tokio::test]
    async fn presigned_url_unauthorized_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/bloom-filter/file/1"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let result = client_for(&server).fetch_presigned_download_url(&authed()).await;
        assert_eq!(result.unwrap_err().status(), Some(401));
    }

    #[tokio::test]
    async fn presigned_url_without_token_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("GET")).respond_with(ResponseTemplate::new(200)).expect(0).mount(&server).await;

        let result =
            client_for(&server).fetch_presigned_download_url(&SyncContext::background()).await;
        assert!(matches!(result, Err(GuardianError::Internal(_))));
    }

    #[tokio::test]
    async fn upload_file_sends_bytes_with_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/upload/report/v1"))
            .and(header("authorization", "Bearer test-token"))
            .and(header("content-type", "multipart/form-data; boundary=xyz"))
            .and(header_exists("content-length"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"status":"ok"}"#))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server)
            .upload_file(&authed(), b"payload".to_vec(), "multipart/form-data; boundary=xyz")
            .await
            .unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests[0].body, b"payload");
    }

    #[tokio::test]
    async fn cancelled_context_skips_token_exchange() {
        let server = MockServer::start().await;
        Mock::given(method("POST")).respond_with(ResponseTemplate::new(200)).expect(0).mount(&server).await;

        let cancel = CancellationToken::new();
        cancel.cancel();
        let result =
            client_for(&server).fetch_access_token(&SyncContext::new(cancel), "id", "secret").await;
        assert_eq!(result.unwrap_err(), GuardianError::Cancelled);
    }
}
