use std::time::Duration;

use guardian_domain::constants::DEFAULT_REQUEST_TIMEOUT;
use guardian_domain::{GuardianError, Result};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client as ReqwestClient, Method, Response, Url};
use tracing::{debug, instrument};

use crate::context::SyncContext;
use crate::errors::InfraError;

/// Longest slice of a non-2xx body kept for diagnostics.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Bytes read from a non-2xx body; enough for the char limit at 4 bytes per
/// char.
const MAX_ERROR_BODY_BYTES: usize = MAX_ERROR_BODY_CHARS * 4;

const USER_AGENT: &str = concat!("story-guardian/", env!("CARGO_PKG_VERSION"));

/// HTTP client with a fixed per-request timeout and context-bound
/// cancellation.
///
/// There are no retries at this layer; callers wrap operations in the retry
/// executor when they want them.
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: ReqwestClient,
    timeout: Duration,
}

impl HttpClient {
    /// Start building a new HTTP client.
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::default()
    }

    /// Execute one request bound to `ctx`.
    ///
    /// The effective deadline is the earlier of the context deadline and the
    /// transport timeout. A body without an explicit `Content-Type` is sent
    /// as `application/json`. Any status outside 2xx is returned as
    /// [`GuardianError::Status`] with a bounded copy of the response body;
    /// the response itself is released.
    #[instrument(skip(self, ctx, body, headers), fields(%method, url = %loggable_url(url)))]
    pub async fn execute(
        &self,
        ctx: &SyncContext,
        method: Method,
        url: &str,
        body: Option<Vec<u8>>,
        mut headers: HeaderMap,
    ) -> Result<Response> {
        ctx.check()?;

        let parsed = Url::parse(url).map_err(|err| {
            GuardianError::Internal(format!("invalid request URL {}: {err}", loggable_url(url)))
        })?;

        if body.is_some() && !headers.contains_key(CONTENT_TYPE) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        let mut request = self.client.request(method, parsed).headers(headers);
        if let Some(body) = body {
            request = request.body(body);
        }

        let timeout = self.timeout;
        ctx.guard(async move {
            let response = request.send().await.map_err(|err| map_send_error(err, timeout))?;
            let status = response.status();
            debug!(status = status.as_u16(), "received HTTP response");

            if status.is_success() {
                return Ok(response);
            }

            let url = loggable_url(response.url().as_str());
            let body = read_error_body(response).await;
            Err(GuardianError::Status { status: status.as_u16(), url, body })
        })
        .await
    }
}

/// Builder for [`HttpClient`].
///
/// Proxies from `HTTP_PROXY`, `HTTPS_PROXY` and `NO_PROXY` are honoured
/// unless [`no_proxy`](Self::no_proxy) is set.
#[derive(Debug)]
pub struct HttpClientBuilder {
    timeout: Duration,
    system_proxy: bool,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self { timeout: DEFAULT_REQUEST_TIMEOUT, system_proxy: true }
    }
}

impl HttpClientBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Connect directly, ignoring the proxy environment.
    pub fn no_proxy(mut self) -> Self {
        self.system_proxy = false;
        self
    }

    pub fn build(self) -> Result<HttpClient> {
        if self.timeout.is_zero() {
            return Err(GuardianError::Config("request timeout must be greater than 0".into()));
        }

        let mut builder = ReqwestClient::builder().timeout(self.timeout).user_agent(USER_AGENT);
        if !self.system_proxy {
            builder = builder.no_proxy();
        }

        let client = builder.build().map_err(|err| {
            let infra: InfraError = err.into();
            GuardianError::from(infra)
        })?;

        Ok(HttpClient { client, timeout: self.timeout })
    }
}

fn map_send_error(err: reqwest::Error, timeout: Duration) -> GuardianError {
    if err.is_timeout() {
        return GuardianError::Timeout(timeout);
    }
    let infra: InfraError = err.into();
    infra.into()
}

/// Read at most [`MAX_ERROR_BODY_BYTES`] of a failed response, then drop
/// the rest unread.
async fn read_error_body(mut response: Response) -> String {
    let mut buf = Vec::new();
    while buf.len() < MAX_ERROR_BODY_BYTES {
        match response.chunk().await {
            Ok(Some(chunk)) => buf.extend_from_slice(&chunk),
            Ok(None) => break,
            Err(err) => {
                debug!(error = %err.without_url(), "failed to read error response body");
                break;
            }
        }
    }
    buf.truncate(MAX_ERROR_BODY_BYTES);
    String::from_utf8_lossy(&buf).chars().take(MAX_ERROR_BODY_CHARS).collect()
}

/// URL without its query string, safe to log.
pub(crate) fn loggable_url(url: &str) -> String {
    url.split('?').next().unwrap_or_default().to_string()
}
