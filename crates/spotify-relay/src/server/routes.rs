//! Route wiring and request handlers.
//!
//! Every data/control operation resolves its access token through the auth
//! gate first and threads the (possibly mutated) cookie jar back into its
//! response. `/login`, `/callback` and `/logout` manage the token lifecycle
//! itself.

use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{TokenRefresher, cookies, gate};
use crate::client::SpotifyClient;
use crate::config::{Config, api};
use crate::error::{RelayError, RelayResult};
use crate::models::{ArtistSummary, ListeningData, NowPlaying, TrackSummary};

/// Shared state for HTTP handlers.
pub struct RelayState {
    /// Relay configuration.
    pub config: Config,

    /// Token endpoint client.
    pub refresher: TokenRefresher,

    /// Web API client.
    pub client: SpotifyClient,
}

impl RelayState {
    /// Build the shared state, wiring the refresher and API client onto one
    /// connection pool.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let client = SpotifyClient::new(&config)?;
        let refresher = TokenRefresher::new(client.http(), &config);
        Ok(Self { config, refresher, client })
    }
}

/// Create the relay router.
pub fn create_router(state: Arc<RelayState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/login", get(login))
        .route("/callback", get(callback))
        .route("/spotify", get(listening_data))
        .route("/spotify/pause", post(pause_playback))
        .route("/spotify/play", post(start_playback))
        .route("/spotify/logout", post(logout))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "spotify-relay",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

// ─── Authorization ───────────────────────────────────────────────────────────

/// `GET /login`
///
/// Redirect to the Spotify authorization page with the fixed scope set.
async fn login(State(state): State<Arc<RelayState>>) -> Redirect {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("response_type", "code")
        .append_pair("client_id", &state.config.credentials.client_id)
        .append_pair("scope", api::SCOPES)
        .append_pair("redirect_uri", &state.config.redirect_uri)
        .finish();

    Redirect::to(&format!("{}?{query}", state.config.authorize_url()))
}

#[derive(Debug, Deserialize)]
struct CallbackQuery {
    code: Option<String>,
}

/// `GET /callback`
///
/// Exchange the authorization code for the initial token pair, set both
/// cookies, and hand the browser over to the data endpoint.
async fn callback(
    State(state): State<Arc<RelayState>>,
    jar: CookieJar,
    Query(query): Query<CallbackQuery>,
) -> Response {
    let Some(code) = query.code.as_deref().filter(|c| !c.is_empty()) else {
        return RelayError::bad_request("Missing authorization code").into_response();
    };

    match state.refresher.exchange_code(code).await {
        Ok(grant) => {
            tracing::info!("Authorization code exchanged");
            let jar = cookies::apply_grant(jar, &grant, state.config.secure_cookies);
            (jar, Redirect::to("/spotify")).into_response()
        }
        Err(err) => {
            tracing::error!(error = %err, "Authorization code exchange failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Authentication failed" })),
            )
                .into_response()
        }
    }
}

// ─── Gate-guarded operations ─────────────────────────────────────────────────

/// `GET /spotify`
///
/// Aggregate listening data: top tracks, currently playing, followed
/// artists. The three upstream reads run concurrently once the token is
/// resolved; they are independent and unordered.
async fn listening_data(
    State(state): State<Arc<RelayState>>,
    jar: CookieJar,
) -> RelayResult<Response> {
    let (token, jar) =
        gate::resolve_token(&state.refresher, jar, state.config.secure_cookies).await?;

    let (top_tracks, now_playing, followed) = tokio::try_join!(
        state.client.top_tracks(&token, api::TOP_TRACKS_LIMIT),
        state.client.currently_playing(&token),
        state.client.followed_artists(&token, api::FOLLOWED_ARTISTS_LIMIT),
    )?;

    let data = ListeningData {
        top_tracks: top_tracks.items.into_iter().map(TrackSummary::from).collect(),
        now_playing: now_playing.map_or_else(NowPlaying::not_playing, NowPlaying::from),
        followed_artists: followed.artists.items.into_iter().map(ArtistSummary::from).collect(),
    };

    Ok((jar, Json(json!({ "success": true, "data": data }))).into_response())
}

/// `POST /spotify/pause`
async fn pause_playback(
    State(state): State<Arc<RelayState>>,
    jar: CookieJar,
) -> RelayResult<Response> {
    let (token, jar) =
        gate::resolve_token(&state.refresher, jar, state.config.secure_cookies).await?;

    state.client.pause_playback(&token).await?;

    Ok((jar, Json(json!({ "success": true, "message": "Playback paused" }))).into_response())
}

#[derive(Debug, Default, Deserialize)]
struct PlayRequest {
    #[serde(rename = "trackUri")]
    track_uri: Option<String>,
}

/// `POST /spotify/play`
///
/// The track URI is validated before token resolution so a caller error
/// never triggers a refresh exchange or any upstream call.
async fn start_playback(
    State(state): State<Arc<RelayState>>,
    jar: CookieJar,
    body: Bytes,
) -> RelayResult<Response> {
    let request: PlayRequest = if body.is_empty() {
        PlayRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|_| RelayError::bad_request("Invalid JSON request body"))?
    };

    let track_uri = request
        .track_uri
        .filter(|uri| !uri.is_empty())
        .ok_or_else(|| RelayError::bad_request("trackUri is required (e.g., spotify:track:xxxxx)"))?;

    let (token, jar) =
        gate::resolve_token(&state.refresher, jar, state.config.secure_cookies).await?;

    state.client.start_playback(&token, &track_uri).await?;

    Ok((
        jar,
        Json(json!({
            "success": true,
            "message": "Playback started",
            "trackUri": track_uri,
        })),
    )
        .into_response())
}

/// `POST /spotify/logout`
///
/// Clears both token cookies unconditionally; succeeds even when no
/// cookies were set.
async fn logout(jar: CookieJar) -> Response {
    let jar = cookies::clear(jar);
    (jar, Json(json!({ "success": true, "message": "Logged out successfully" }))).into_response()
}
