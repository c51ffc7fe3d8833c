//! Error types for the Spotify relay.
//!
//! Uses `thiserror` for structured error handling with automatic `From`
//! implementations. Every failure is translated into a structured JSON
//! response rather than exception-style control flow.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Errors from the accounts token endpoint (code exchange and refresh).
///
/// Upstream error subtypes are not distinguished beyond this: a rejection,
/// a transport failure, and a malformed body all end the exchange the same
/// way. Details are logged, not surfaced.
#[derive(thiserror::Error, Debug)]
pub enum ExchangeError {
    /// Transport failure reaching the token endpoint.
    #[error("token endpoint request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response from the token endpoint.
    #[error("token endpoint returned {status}: {body}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body, best effort.
        body: String,
    },
}

/// Errors from the auth gate.
#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    /// Both token cookies absent; the session must be re-authorized.
    #[error("no refresh token available, please login at /login")]
    Unauthenticated,

    /// The single refresh attempt failed; terminal for this session.
    #[error("failed to refresh access token")]
    RefreshFailed(#[source] ExchangeError),
}

impl AuthError {
    /// Machine-readable reason for the failure.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::RefreshFailed(_) => "refresh_failed",
        }
    }
}

/// Errors from the upstream Web API.
#[derive(thiserror::Error, Debug)]
pub enum UpstreamError {
    /// Transport failure (connection, DNS, TLS, body read).
    #[error("failed to reach the Spotify API: {0}")]
    Http(#[from] reqwest::Error),

    /// Playback control rejected for a non-premium account (403).
    #[error("Spotify Premium required for playback control")]
    PremiumRequired,

    /// Playback control with no active device (404).
    #[error("No active device found")]
    NoActiveDevice,

    /// Any other non-success API response, with a best-effort message
    /// extracted from the upstream error body.
    #[error("Spotify API error ({status}): {message}")]
    Api {
        /// Upstream HTTP status code.
        status: u16,
        /// Message from the upstream error body, or a generic fallback.
        message: String,
    },
}

impl UpstreamError {
    /// Create an API error with upstream status and message.
    #[must_use]
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api { status, message: message.into() }
    }

    /// The HTTP status the relay responds with for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            // Transport failures have no upstream status; use the default.
            Self::Http(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::PremiumRequired => StatusCode::FORBIDDEN,
            Self::NoActiveDevice => StatusCode::NOT_FOUND,
            Self::Api { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

/// Top-level error for request handlers.
#[derive(thiserror::Error, Debug)]
pub enum RelayError {
    /// Auth gate failure.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Upstream API failure.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// Missing or invalid caller input; fails fast, no upstream call.
    #[error("{0}")]
    BadRequest(String),
}

impl RelayError {
    /// Create a caller-error with the given message.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        match self {
            Self::Auth(err) => (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "Authentication failed",
                    "reason": err.reason(),
                    "message": err.to_string(),
                    "loginUrl": "/login",
                })),
            )
                .into_response(),
            Self::Upstream(err) => (
                err.status_code(),
                Json(json!({
                    "success": false,
                    "error": err.to_string(),
                })),
            )
                .into_response(),
            Self::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "success": false,
                    "error": message,
                })),
            )
                .into_response(),
        }
    }
}

/// Result type alias for token exchange operations.
pub type ExchangeResult<T> = Result<T, ExchangeError>;

/// Result type alias for upstream API operations.
pub type UpstreamResult<T> = Result<T, UpstreamError>;

/// Result type alias for request handlers.
pub type RelayResult<T> = Result<T, RelayError>;
