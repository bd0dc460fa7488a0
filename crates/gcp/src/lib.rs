//! Beacon GCP auth
//!
//! Bearer-token acquisition for the warehouse and document-store adapters.
//! Three modes:
//!
//! - **Anonymous**: no Authorization header. For emulators and tests.
//! - **Static**: a token supplied via configuration (e.g. from
//!   `gcloud auth print-access-token` during development).
//! - **Metadata**: fetched from the GCE/Cloud Run metadata server and
//!   cached until shortly before expiry.
//!
//! The provider is cheap to clone and safe to share across adapters.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Deserialize;
use thiserror::Error;
use tokio::sync::Mutex;

/// Metadata-server token endpoint
const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

/// Refresh this long before the reported expiry
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Token acquisition errors
#[derive(Debug, Error)]
pub enum AuthError {
    /// Metadata server unreachable
    #[error("metadata server request failed: {0}")]
    Metadata(String),

    /// Token response could not be parsed
    #[error("malformed token response: {0}")]
    Malformed(String),
}

/// Result type for token operations
pub type Result<T> = std::result::Result<T, AuthError>;

/// How tokens are obtained
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthMode {
    /// No authentication (emulator / tests)
    #[default]
    Anonymous,
    /// Fixed token from configuration
    Static(String),
    /// GCE metadata server with expiry caching
    Metadata,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug)]
struct CachedToken {
    token: String,
    fetched_at: Instant,
    ttl: Duration,
}

impl CachedToken {
    fn is_fresh(&self) -> bool {
        self.fetched_at.elapsed() + EXPIRY_MARGIN < self.ttl
    }
}

/// Shared token provider
#[derive(Clone)]
pub struct TokenProvider {
    mode: AuthMode,
    client: reqwest::Client,
    cache: Arc<Mutex<Option<CachedToken>>>,
}

impl std::fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mode = match &self.mode {
            AuthMode::Anonymous => "anonymous",
            AuthMode::Static(_) => "static",
            AuthMode::Metadata => "metadata",
        };
        f.debug_struct("TokenProvider").field("mode", &mode).finish()
    }
}

impl TokenProvider {
    /// Create a provider for the given mode
    pub fn new(mode: AuthMode) -> Self {
        Self {
            mode,
            client: reqwest::Client::new(),
            cache: Arc::new(Mutex::new(None)),
        }
    }

    /// Provider that never attaches credentials
    pub fn anonymous() -> Self {
        Self::new(AuthMode::Anonymous)
    }

    /// Get a bearer token, or `None` in anonymous mode
    pub async fn bearer(&self) -> Result<Option<String>> {
        match &self.mode {
            AuthMode::Anonymous => Ok(None),
            AuthMode::Static(token) => Ok(Some(token.clone())),
            AuthMode::Metadata => self.metadata_token().await.map(Some),
        }
    }

    async fn metadata_token(&self) -> Result<String> {
        let mut cache = self.cache.lock().await;

        if let Some(cached) = cache.as_ref() {
            if cached.is_fresh() {
                return Ok(cached.token.clone());
            }
        }

        let response = self
            .client
            .get(METADATA_TOKEN_URL)
            .header("Metadata-Flavor", "Google")
            .send()
            .await
            .map_err(|e| AuthError::Metadata(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AuthError::Metadata(format!(
                "metadata server returned {}",
                response.status()
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Malformed(e.to_string()))?;

        tracing::debug!(expires_in = token.expires_in, "refreshed access token");

        let ttl = Duration::from_secs(token.expires_in);
        *cache = Some(CachedToken {
            token: token.access_token.clone(),
            fetched_at: Instant::now(),
            ttl,
        });

        Ok(token.access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_anonymous_yields_no_token() {
        let provider = TokenProvider::anonymous();
        assert_eq!(provider.bearer().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_static_token_returned_as_is() {
        let provider = TokenProvider::new(AuthMode::Static("abc123".into()));
        assert_eq!(provider.bearer().await.unwrap(), Some("abc123".into()));
    }

    #[test]
    fn test_cached_token_freshness() {
        let fresh = CachedToken {
            token: "t".into(),
            fetched_at: Instant::now(),
            ttl: Duration::from_secs(3600),
        };
        assert!(fresh.is_fresh());

        let stale = CachedToken {
            token: "t".into(),
            fetched_at: Instant::now(),
            ttl: Duration::from_secs(30),
        };
        // Inside the expiry margin counts as stale
        assert!(!stale.is_fresh());
    }
}
