//! Spotify Web API client.
//!
//! A thin bearer-authenticated wrapper over the handful of endpoints the
//! relay proxies. The bearer token is supplied per call (it lives in the
//! caller's cookies, not in the client), connections are pooled, and
//! nothing is retried or cached.

use reqwest::{Client, StatusCode};

use crate::config::{Config, api};
use crate::error::{UpstreamError, UpstreamResult};
use crate::models::{CurrentlyPlaying, FollowedArtists, TopTracks};

/// Spotify Web API client.
#[derive(Clone)]
pub struct SpotifyClient {
    /// Pooled HTTP client.
    http: Client,

    /// Web API base URL.
    api_url: String,
}

impl SpotifyClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(api::MAX_KEEPALIVE)
            .pool_idle_timeout(api::KEEPALIVE_EXPIRY)
            .gzip(true)
            .build()?;

        Ok(Self { http, api_url: config.api_url.clone() })
    }

    /// The underlying HTTP client, shared with the token refresher.
    #[must_use]
    pub fn http(&self) -> Client {
        self.http.clone()
    }

    /// Get the user's top tracks over the configured short-term window.
    ///
    /// # Errors
    ///
    /// Returns error on API failure.
    pub async fn top_tracks(&self, token: &str, limit: u8) -> UpstreamResult<TopTracks> {
        let url = format!("{}/me/top/tracks", self.api_url);
        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(&[("limit", limit.to_string()), ("time_range", api::TOP_TRACKS_RANGE.to_string())])
            .send()
            .await?;

        let response = handle_response(response).await?;
        Ok(response.json().await?)
    }

    /// Get the currently playing track.
    ///
    /// Returns `Ok(None)` when the player reports no content (nothing
    /// playing, or no active device) instead of an error, so sibling
    /// fetches in an aggregate request stay unaffected.
    ///
    /// # Errors
    ///
    /// Returns error on API failure.
    pub async fn currently_playing(&self, token: &str) -> UpstreamResult<Option<CurrentlyPlaying>> {
        let url = format!("{}/me/player/currently-playing", self.api_url);
        let response = self.http.get(&url).bearer_auth(token).send().await?;

        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let response = handle_response(response).await?;
        Ok(Some(response.json().await?))
    }

    /// Get the artists the user follows.
    ///
    /// # Errors
    ///
    /// Returns error on API failure.
    pub async fn followed_artists(&self, token: &str, limit: u8) -> UpstreamResult<FollowedArtists> {
        let url = format!("{}/me/following", self.api_url);
        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(&[("type", "artist".to_string()), ("limit", limit.to_string())])
            .send()
            .await?;

        let response = handle_response(response).await?;
        Ok(response.json().await?)
    }

    /// Pause the user's playback.
    ///
    /// # Errors
    ///
    /// Returns error on API failure; 403 and 404 map to the friendly
    /// playback-control errors.
    pub async fn pause_playback(&self, token: &str) -> UpstreamResult<()> {
        let url = format!("{}/me/player/pause", self.api_url);
        let response =
            self.http.put(&url).bearer_auth(token).json(&serde_json::json!({})).send().await?;

        playback_response(response).await
    }

    /// Start playback of a single track.
    ///
    /// # Errors
    ///
    /// Returns error on API failure; 403 and 404 map to the friendly
    /// playback-control errors.
    pub async fn start_playback(&self, token: &str, track_uri: &str) -> UpstreamResult<()> {
        let url = format!("{}/me/player/play", self.api_url);
        let response = self
            .http
            .put(&url)
            .bearer_auth(token)
            .json(&serde_json::json!({ "uris": [track_uri] }))
            .send()
            .await?;

        playback_response(response).await
    }
}

impl std::fmt::Debug for SpotifyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpotifyClient").field("api_url", &self.api_url).finish_non_exhaustive()
    }
}

/// Map a non-success API response into an error with the upstream status
/// and a best-effort message from the upstream error body.
async fn handle_response(response: reqwest::Response) -> UpstreamResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(UpstreamError::api(status.as_u16(), extract_message(&body)))
}

/// Playback-control responses additionally special-case the two statuses
/// the player endpoints use for account tier and device problems.
async fn playback_response(response: reqwest::Response) -> UpstreamResult<()> {
    match response.status() {
        StatusCode::FORBIDDEN => Err(UpstreamError::PremiumRequired),
        StatusCode::NOT_FOUND => Err(UpstreamError::NoActiveDevice),
        _ => {
            handle_response(response).await?;
            Ok(())
        }
    }
}

/// Pull `error.message` out of a Spotify error body, falling back to a
/// generic message when the body has some other shape.
fn extract_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error")?.get("message")?.as_str().map(ToOwned::to_owned))
        .unwrap_or_else(|| "Failed to fetch Spotify data".to_string())
}
