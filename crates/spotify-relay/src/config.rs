//! Configuration for the Spotify relay.

use std::time::Duration;

/// API configuration constants.
pub mod api {
    use std::time::Duration;

    /// Base URL for the Spotify accounts service (authorization + token endpoints).
    pub const ACCOUNTS_URL: &str = "https://accounts.spotify.com";

    /// Base URL for the Spotify Web API.
    pub const API_URL: &str = "https://api.spotify.com/v1";

    /// Scopes requested during authorization.
    pub const SCOPES: &str = "user-top-read user-read-currently-playing user-follow-read \
                              user-modify-playback-state user-read-playback-state";

    /// Request timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Maximum keepalive connections per host.
    pub const MAX_KEEPALIVE: usize = 10;

    /// Keepalive expiry.
    pub const KEEPALIVE_EXPIRY: Duration = Duration::from_secs(30);

    /// Number of top tracks returned by the aggregate endpoint.
    pub const TOP_TRACKS_LIMIT: u8 = 10;

    /// Time range for top tracks.
    pub const TOP_TRACKS_RANGE: &str = "short_term";

    /// Number of followed artists returned by the aggregate endpoint.
    pub const FOLLOWED_ARTISTS_LIMIT: u8 = 50;
}

/// Cookie names and lifetimes.
pub mod cookies {
    use std::time::Duration;

    /// Cookie holding the bearer access token.
    pub const ACCESS_TOKEN: &str = "access_token";

    /// Cookie holding the refresh token.
    pub const REFRESH_TOKEN: &str = "refresh_token";

    /// Refresh token cookie lifetime: a fixed 30-day policy ceiling,
    /// independent of upstream's own invalidation rules.
    pub const REFRESH_TOKEN_TTL: Duration = Duration::from_secs(30 * 24 * 3600);
}

/// Immutable client credentials for the relay itself.
///
/// Used only to authenticate against the accounts token endpoint via
/// HTTP Basic auth; the secret never reaches end users or logs.
#[derive(Clone)]
pub struct ClientCredentials {
    /// OAuth client identifier.
    pub client_id: String,

    /// OAuth client secret.
    pub client_secret: String,
}

impl std::fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientCredentials").field("client_id", &self.client_id).finish_non_exhaustive()
    }
}

/// Relay configuration, constructed once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Client credentials for the token endpoint.
    pub credentials: ClientCredentials,

    /// Redirect URI registered with Spotify for the callback route.
    pub redirect_uri: String,

    /// Base URL for the accounts service (overridable for mock servers).
    pub accounts_url: String,

    /// Base URL for the Web API (overridable for mock servers).
    pub api_url: String,

    /// Whether relay cookies carry the `Secure` attribute.
    pub secure_cookies: bool,

    /// Request timeout.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,
}

impl Config {
    /// Create a new configuration with the given credentials and redirect URI.
    #[must_use]
    pub fn new(client_id: String, client_secret: String, redirect_uri: String) -> Self {
        Self {
            credentials: ClientCredentials { client_id, client_secret },
            redirect_uri,
            accounts_url: api::ACCOUNTS_URL.to_string(),
            api_url: api::API_URL.to_string(),
            secure_cookies: false,
            request_timeout: api::REQUEST_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
        }
    }

    /// Create a test configuration with both base URLs pointed at a mock server.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            credentials: ClientCredentials {
                client_id: "test-client-id".to_string(),
                client_secret: "test-client-secret".to_string(),
            },
            redirect_uri: format!("{base_url}/callback"),
            accounts_url: base_url.to_string(),
            api_url: format!("{base_url}/v1"),
            secure_cookies: false,
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
        }
    }

    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns error if a required variable is missing.
    pub fn from_env() -> anyhow::Result<Self> {
        use anyhow::Context;

        let client_id =
            std::env::var("SPOTIFY_CLIENT_ID").context("SPOTIFY_CLIENT_ID is not set")?;
        let client_secret =
            std::env::var("SPOTIFY_CLIENT_SECRET").context("SPOTIFY_CLIENT_SECRET is not set")?;
        let redirect_uri =
            std::env::var("SPOTIFY_REDIRECT_URI").context("SPOTIFY_REDIRECT_URI is not set")?;

        let secure_cookies = std::env::var("RELAY_SECURE_COOKIES")
            .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let mut config = Self::new(client_id, client_secret, redirect_uri);
        config.secure_cookies = secure_cookies;
        Ok(config)
    }

    /// Full URL of the accounts token endpoint.
    #[must_use]
    pub fn token_url(&self) -> String {
        format!("{}/api/token", self.accounts_url)
    }

    /// Full URL of the accounts authorization endpoint.
    #[must_use]
    pub fn authorize_url(&self) -> String {
        format!("{}/authorize", self.accounts_url)
    }
}
