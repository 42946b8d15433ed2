//! JSON shapes exchanged with the sync service.

use std::fmt;

use guardian_domain::constants::{TOKEN_AUDIENCE, TOKEN_GRANT_TYPE};
use serde::{Deserialize, Serialize};

/// Body of the client-credentials token exchange.
#[derive(Clone, Serialize)]
pub struct TokenRequest<'a> {
    pub client_id: &'a str,
    pub client_secret: &'a str,
    pub audience: &'a str,
    pub grant_type: &'a str,
}

impl<'a> TokenRequest<'a> {
    pub fn client_credentials(client_id: &'a str, client_secret: &'a str) -> Self {
        Self { client_id, client_secret, audience: TOKEN_AUDIENCE, grant_type: TOKEN_GRANT_TYPE }
    }
}

impl fmt::Debug for TokenRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenRequest")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("audience", &self.audience)
            .field("grant_type", &self.grant_type)
            .finish()
    }
}

/// Token exchange reply. Only `access_token` is used; expiry is ignored
/// because a fresh token is fetched every cycle.
#[derive(Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub token_type: Option<String>,
}

impl fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"<redacted>")
            .field("scope", &self.scope)
            .field("expires_in", &self.expires_in)
            .field("token_type", &self.token_type)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PresignedUrlResponse {
    #[serde(rename = "presignedUrl")]
    pub presigned_url: String,
}
