//! Access token acquisition
//!
//! The scheduler depends on [`AccessTokenProvider`] rather than on the API
//! client directly, so tests can swap in a canned or failing provider.

use std::sync::Arc;

use async_trait::async_trait;
use guardian_domain::{AccessToken, AppConfig, Result};
use tracing::debug;

use super::client::SyncApiClient;
use crate::context::SyncContext;

/// Trait for providing access tokens
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Obtain a fresh token for one cycle.
    async fn access_token(&self, ctx: &SyncContext) -> Result<AccessToken>;
}

/// OAuth client-credentials exchange against the sync service.
///
/// Fetches a new token on every call; nothing is cached between cycles.
pub struct ClientCredentials {
    api: Arc<SyncApiClient>,
    config: AppConfig,
}

impl ClientCredentials {
    pub fn new(api: Arc<SyncApiClient>, config: AppConfig) -> Self {
        Self { api, config }
    }
}

#[async_trait]
impl AccessTokenProvider for ClientCredentials {
    async fn access_token(&self, ctx: &SyncContext) -> Result<AccessToken> {
        debug!(client_id = %self.config.client_id, "Requesting access token");
        self.api.fetch_access_token(ctx, &self.config.client_id, &self.config.client_secret).await
    }
}
