//! Value types carried through a single synchronization cycle

use std::fmt;

use serde::{Deserialize, Serialize};

/// Short-lived bearer credential obtained once per cycle.
///
/// Never persisted; `Debug` output is redacted so the token cannot leak into
/// logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Single-use download link returned by the bloom filter endpoint.
///
/// The query string embeds its own authorization, so only the path is shown
/// by `Display`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PresignedUrl(String);

impl PresignedUrl {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PresignedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let without_query = self.0.split('?').next().unwrap_or_default();
        f.write_str(without_query)
    }
}

impl fmt::Debug for PresignedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PresignedUrl({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_token_debug_is_redacted() {
        let token = AccessToken::new("secret-token");
        assert_eq!(format!("{token:?}"), "AccessToken(<redacted>)");
        assert_eq!(token.bearer(), "Bearer secret-token");
    }

    #[test]
    fn presigned_url_display_hides_signature() {
        let url = PresignedUrl::new("https://bucket.s3.amazonaws.com/bf.gob?X-Amz-Signature=abc");
        assert_eq!(url.to_string(), "https://bucket.s3.amazonaws.com/bf.gob");
        assert!(url.as_str().contains("X-Amz-Signature"));
    }
}
