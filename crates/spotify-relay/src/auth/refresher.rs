//! Token acquisition against the Spotify accounts service.
//!
//! Covers both halves of the authorization code grant: the initial code
//! exchange at login completion, and refresh-token exchanges thereafter.
//! The relay authenticates itself with HTTP Basic client credentials on
//! every call. Failures are not retried.

use serde::Deserialize;

use crate::config::{ClientCredentials, Config};
use crate::error::{ExchangeError, ExchangeResult};

/// A successful grant from the token endpoint.
///
/// `refresh_token` is present on the initial code exchange and only
/// sometimes on refresh; when present it must replace the stored value.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenGrant {
    /// Opaque bearer token for Web API calls.
    pub access_token: String,

    /// Declared access token lifetime in seconds.
    pub expires_in: u64,

    /// Replacement refresh token, if upstream reissued one.
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Client of the accounts token endpoint.
#[derive(Clone)]
pub struct TokenRefresher {
    /// Shared HTTP client.
    http: reqwest::Client,

    /// Full token endpoint URL.
    token_url: String,

    /// Redirect URI sent with authorization code exchanges.
    redirect_uri: String,

    /// Relay client credentials for Basic auth.
    credentials: ClientCredentials,
}

impl TokenRefresher {
    /// Create a refresher from the relay configuration.
    #[must_use]
    pub fn new(http: reqwest::Client, config: &Config) -> Self {
        Self {
            http,
            token_url: config.token_url(),
            redirect_uri: config.redirect_uri.clone(),
            credentials: config.credentials.clone(),
        }
    }

    /// Exchange an authorization code for the initial token pair.
    ///
    /// # Errors
    ///
    /// Returns error when the exchange is rejected or unreachable.
    pub async fn exchange_code(&self, code: &str) -> ExchangeResult<TokenGrant> {
        self.request_grant(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", &self.redirect_uri),
        ])
        .await
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// The caller guarantees `refresh_token` is non-empty; an absent token
    /// is a caller error, not a refresher error.
    ///
    /// # Errors
    ///
    /// Returns error when the exchange is rejected or unreachable. Error
    /// subtypes are not distinguished and nothing is retried.
    pub async fn refresh(&self, refresh_token: &str) -> ExchangeResult<TokenGrant> {
        self.request_grant(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ])
        .await
    }

    async fn request_grant(&self, params: &[(&str, &str)]) -> ExchangeResult<TokenGrant> {
        let response = self
            .http
            .post(&self.token_url)
            .basic_auth(&self.credentials.client_id, Some(&self.credentials.client_secret))
            .form(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), body = %body, "Token exchange rejected");
            return Err(ExchangeError::Rejected { status: status.as_u16(), body });
        }

        // A malformed grant body collapses into the same exchange failure.
        let grant: TokenGrant = response.json().await?;
        Ok(grant)
    }
}

impl std::fmt::Debug for TokenRefresher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenRefresher").field("token_url", &self.token_url).finish_non_exhaustive()
    }
}
