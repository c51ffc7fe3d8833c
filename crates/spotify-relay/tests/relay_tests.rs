//! Route-level integration tests: authorization redirects, the callback
//! exchange, aggregate data reshaping, playback control, and logout.

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{LOCATION, SET_COOKIE};
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{any, body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use spotify_relay::Config;
use spotify_relay::server::routes::{RelayState, create_router};

fn build_router(mock_server: &MockServer) -> axum::Router {
    let state = RelayState::new(Config::for_testing(&mock_server.uri())).unwrap();
    create_router(Arc::new(state))
}

async fn response_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn set_cookies(response: &axum::response::Response) -> Vec<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

/// Sample track JSON in the upstream schema.
fn sample_track_json(id: &str, name: &str, artist: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "artists": [{"name": artist}],
        "album": {
            "name": "Test Album",
            "images": [{"url": format!("https://img/{id}")}]
        },
        "uri": format!("spotify:track:{id}"),
        "external_urls": {"spotify": format!("https://open.spotify.com/track/{id}")},
        "duration_ms": 200_000,
        "preview_url": null
    })
}

fn sample_artist_json(id: &str, name: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": name,
        "genres": ["jazz"],
        "followers": {"total": 4321},
        "popularity": 66,
        "images": [{"url": format!("https://img/{id}")}],
        "external_urls": {"spotify": format!("https://open.spotify.com/artist/{id}")}
    })
}

// ─── Health ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_health_check() {
    let mock_server = MockServer::start().await;

    let response = build_router(&mock_server)
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["service"], "spotify-relay");
}

// ─── Login ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_login_redirects_to_authorization_with_scopes() {
    let mock_server = MockServer::start().await;

    let response = build_router(&mock_server)
        .oneshot(Request::get("/login").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert!(response.status().is_redirection());

    let location = response.headers().get(LOCATION).unwrap().to_str().unwrap();
    assert!(location.starts_with(&format!("{}/authorize?", mock_server.uri())));
    assert!(location.contains("response_type=code"));
    assert!(location.contains("client_id=test-client-id"));
    assert!(location.contains("user-top-read"));
    assert!(location.contains("user-modify-playback-state"));
    assert!(location.contains("redirect_uri="));
}

// ─── Callback ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_callback_sets_both_cookies_and_redirects() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "initial-access-token",
            "expires_in": 3600,
            "refresh_token": "initial-refresh-token"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = build_router(&mock_server)
        .oneshot(Request::get("/callback?code=one-time-code").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert!(response.status().is_redirection());
    assert_eq!(response.headers().get(LOCATION).unwrap(), "/spotify");

    let cookies = set_cookies(&response);
    assert!(cookies.iter().any(|c| {
        c.contains("access_token=initial-access-token")
            && c.contains("Max-Age=3600")
            && c.contains("HttpOnly")
    }));
    assert!(cookies.iter().any(|c| {
        c.contains("refresh_token=initial-refresh-token") && c.contains("Max-Age=2592000")
    }));
}

#[tokio::test]
async fn test_callback_without_code_is_a_caller_error() {
    let mock_server = MockServer::start().await;

    Mock::given(any()).respond_with(ResponseTemplate::new(500)).expect(0).mount(&mock_server).await;

    let response = build_router(&mock_server)
        .oneshot(Request::get("/callback").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_callback_exchange_failure_is_generic() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"error": "invalid_grant"})))
        .mount(&mock_server)
        .await;

    let response = build_router(&mock_server)
        .oneshot(Request::get("/callback?code=expired-code").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = response_json(response).await;
    assert_eq!(json["error"], "Authentication failed");
}

// ─── Aggregate listening data ────────────────────────────────────────────────

#[tokio::test]
async fn test_listening_data_reshapes_all_three_branches() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/me/top/tracks"))
        .and(query_param("limit", "10"))
        .and(query_param("time_range", "short_term"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [sample_track_json("t1", "So What", "Miles Davis")]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/me/player/currently-playing"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "is_playing": true,
            "progress_ms": 42_000,
            "item": sample_track_json("t2", "Naima", "John Coltrane")
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/me/following"))
        .and(query_param("type", "artist"))
        .and(query_param("limit", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "artists": {"items": [sample_artist_json("a1", "Thelonious Monk")]}
        })))
        .mount(&mock_server)
        .await;

    let response = build_router(&mock_server)
        .oneshot(
            Request::get("/spotify")
                .header("Cookie", "access_token=live-access-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;

    assert_eq!(json["success"], true);

    let track = &json["data"]["topTracks"][0];
    assert_eq!(track["name"], "So What");
    assert_eq!(track["artist"], "Miles Davis");
    assert_eq!(track["albumArt"], "https://img/t1");
    assert_eq!(track["uri"], "spotify:track:t1");

    let playing = &json["data"]["nowPlaying"];
    assert_eq!(playing["isPlaying"], true);
    assert_eq!(playing["name"], "Naima");
    assert_eq!(playing["progress_ms"], 42_000);

    let artist = &json["data"]["followedArtists"][0];
    assert_eq!(artist["name"], "Thelonious Monk");
    assert_eq!(artist["followers"], 4321);
    assert_eq!(artist["genres"][0], "jazz");
}

#[tokio::test]
async fn test_idle_player_yields_default_payload_without_failing_siblings() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/me/top/tracks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [sample_track_json("t1", "So What", "Miles Davis")]
        })))
        .mount(&mock_server)
        .await;

    // Nothing playing: the player endpoint answers 204 with no body.
    Mock::given(method("GET"))
        .and(path("/v1/me/player/currently-playing"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/me/following"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "artists": {"items": [sample_artist_json("a1", "Thelonious Monk")]}
        })))
        .mount(&mock_server)
        .await;

    let response = build_router(&mock_server)
        .oneshot(
            Request::get("/spotify")
                .header("Cookie", "access_token=live-access-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;

    assert_eq!(json["data"]["nowPlaying"]["isPlaying"], false);
    assert_eq!(json["data"]["nowPlaying"]["message"], "No track currently playing");
    // Sibling branches are unaffected by the idle player.
    assert_eq!(json["data"]["topTracks"][0]["name"], "So What");
    assert_eq!(json["data"]["followedArtists"][0]["name"], "Thelonious Monk");
}

#[tokio::test]
async fn test_upstream_rejection_keeps_status_and_message() {
    let mock_server = MockServer::start().await;

    let expired = ResponseTemplate::new(401).set_body_json(json!({
        "error": {"status": 401, "message": "The access token expired"}
    }));

    Mock::given(method("GET")).and(path("/v1/me/top/tracks")).respond_with(expired.clone())
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/me/player/currently-playing"))
        .respond_with(expired.clone())
        .mount(&mock_server)
        .await;
    Mock::given(method("GET")).and(path("/v1/me/following")).respond_with(expired)
        .mount(&mock_server)
        .await;

    let response = build_router(&mock_server)
        .oneshot(
            Request::get("/spotify")
                .header("Cookie", "access_token=stale-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = response_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "The access token expired");
}

// ─── Playback control ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_pause_playback() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/v1/me/player/pause"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = build_router(&mock_server)
        .oneshot(
            Request::post("/spotify/pause")
                .header("Cookie", "access_token=live-access-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["message"], "Playback paused");
}

#[tokio::test]
async fn test_pause_without_premium_gets_friendly_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/v1/me/player/pause"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {"status": 403, "message": "Player command failed: Premium required"}
        })))
        .mount(&mock_server)
        .await;

    let response = build_router(&mock_server)
        .oneshot(
            Request::post("/spotify/pause")
                .header("Cookie", "access_token=live-access-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = response_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Spotify Premium required for playback control");
}

#[tokio::test]
async fn test_play_starts_the_requested_track() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/v1/me/player/play"))
        .and(body_json(json!({"uris": ["spotify:track:abc123"]})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = build_router(&mock_server)
        .oneshot(
            Request::post("/spotify/play")
                .header("Cookie", "access_token=live-access-token")
                .header("Content-Type", "application/json")
                .body(Body::from(json!({"trackUri": "spotify:track:abc123"}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["message"], "Playback started");
    assert_eq!(json["trackUri"], "spotify:track:abc123");
}

#[tokio::test]
async fn test_play_without_track_uri_fails_before_any_upstream_call() {
    let mock_server = MockServer::start().await;

    Mock::given(any()).respond_with(ResponseTemplate::new(500)).expect(0).mount(&mock_server).await;

    // No cookies on purpose: validation must come before token resolution,
    // so the caller error wins over the auth failure.
    let response = build_router(&mock_server)
        .oneshot(
            Request::post("/spotify/play")
                .header("Content-Type", "application/json")
                .body(Body::from(json!({}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = response_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "trackUri is required (e.g., spotify:track:xxxxx)");
}

#[tokio::test]
async fn test_play_with_no_active_device() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/v1/me/player/play"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"status": 404, "message": "Device not found"}
        })))
        .mount(&mock_server)
        .await;

    let response = build_router(&mock_server)
        .oneshot(
            Request::post("/spotify/play")
                .header("Cookie", "access_token=live-access-token")
                .header("Content-Type", "application/json")
                .body(Body::from(json!({"trackUri": "spotify:track:abc123"}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = response_json(response).await;
    assert_eq!(json["error"], "No active device found");
}

// ─── Logout ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_logout_clears_both_cookies() {
    let mock_server = MockServer::start().await;

    let response = build_router(&mock_server)
        .oneshot(
            Request::post("/spotify/logout")
                .header("Cookie", "access_token=live; refresh_token=stored")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let cookies = set_cookies(&response);
    assert!(cookies.iter().any(|c| c.starts_with("access_token=") && c.contains("Max-Age=0")));
    assert!(cookies.iter().any(|c| c.starts_with("refresh_token=") && c.contains("Max-Age=0")));

    let json = response_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Logged out successfully");
}

#[tokio::test]
async fn test_logout_succeeds_with_no_cookies_set() {
    let mock_server = MockServer::start().await;

    let response = build_router(&mock_server)
        .oneshot(Request::post("/spotify/logout").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = response_json(response).await;
    assert_eq!(json["success"], true);
}
