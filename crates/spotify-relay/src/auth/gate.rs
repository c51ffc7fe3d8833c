//! Request-time auth gate.
//!
//! Guarantees a usable access token before an upstream-calling operation
//! proceeds. Per request the gate walks a small state machine over the two
//! token cookies:
//!
//! - access cookie present → return it, zero upstream calls
//! - access absent, refresh present → exactly one refresh exchange;
//!   success updates the cookies, failure is terminal for the session
//! - both absent → immediate failure, no upstream call
//!
//! Nothing is cached across requests; the cookie jar is the only state.

use axum_extra::extract::cookie::CookieJar;

use super::cookies;
use super::refresher::TokenRefresher;
use crate::config::cookies::{ACCESS_TOKEN, REFRESH_TOKEN};
use crate::error::AuthError;

/// Resolve a usable access token for this request.
///
/// On the refresh path the returned jar carries the new token cookies;
/// callers must include it in their response for the mutation to reach the
/// client. Downstream operations must not proceed past a failure.
///
/// # Errors
///
/// Returns [`AuthError::Unauthenticated`] when no refresh token is
/// available, and [`AuthError::RefreshFailed`] when the single refresh
/// attempt is rejected.
pub async fn resolve_token(
    refresher: &TokenRefresher,
    jar: CookieJar,
    secure_cookies: bool,
) -> Result<(String, CookieJar), AuthError> {
    // Cookie absence already encodes expiry; presence is the only check.
    if let Some(cookie) = jar.get(ACCESS_TOKEN) {
        return Ok((cookie.value().to_string(), jar));
    }

    // An empty refresh cookie counts as absent; the refresher requires a
    // non-empty token.
    let Some(refresh_token) = jar
        .get(REFRESH_TOKEN)
        .map(|c| c.value().to_string())
        .filter(|token| !token.is_empty())
    else {
        return Err(AuthError::Unauthenticated);
    };

    let grant = refresher.refresh(&refresh_token).await.map_err(AuthError::RefreshFailed)?;

    tracing::debug!("Access token refreshed");

    let access_token = grant.access_token.clone();
    let jar = cookies::apply_grant(jar, &grant, secure_cookies);
    Ok((access_token, jar))
}
