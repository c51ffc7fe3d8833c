//! Relay-issued token cookies.
//!
//! Both cookies are HTTP-only and scoped to the whole relay. The access
//! cookie's Max-Age mirrors the upstream-declared token lifetime, so cookie
//! expiry is what retires a stale token; the refresh cookie gets a fixed
//! 30-day window. `SameSite=None` requires `Secure`, so the cross-site
//! variant is tied to the secure-cookies switch.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use super::refresher::TokenGrant;
use crate::config::cookies::{ACCESS_TOKEN, REFRESH_TOKEN, REFRESH_TOKEN_TTL};

/// Build the access token cookie with the upstream-declared lifetime.
#[must_use]
pub fn access_cookie(token: String, expires_in_secs: u64, secure: bool) -> Cookie<'static> {
    token_cookie(ACCESS_TOKEN, token, expires_in_secs, secure)
}

/// Build the refresh token cookie with the fixed 30-day policy window.
#[must_use]
pub fn refresh_cookie(token: String, secure: bool) -> Cookie<'static> {
    token_cookie(REFRESH_TOKEN, token, REFRESH_TOKEN_TTL.as_secs(), secure)
}

/// Apply a token grant to the jar: always overwrite the access cookie,
/// overwrite the refresh cookie only when upstream reissued one.
#[must_use]
pub fn apply_grant(jar: CookieJar, grant: &TokenGrant, secure: bool) -> CookieJar {
    let jar = jar.add(access_cookie(grant.access_token.clone(), grant.expires_in, secure));
    match &grant.refresh_token {
        Some(refresh) => jar.add(refresh_cookie(refresh.clone(), secure)),
        None => jar,
    }
}

/// Remove both token cookies from the jar.
#[must_use]
pub fn clear(jar: CookieJar) -> CookieJar {
    jar.remove(removal(ACCESS_TOKEN)).remove(removal(REFRESH_TOKEN))
}

fn token_cookie(name: &'static str, value: String, max_age_secs: u64, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .path("/")
        .secure(secure)
        .same_site(if secure { SameSite::None } else { SameSite::Lax })
        .max_age(time::Duration::seconds(i64::try_from(max_age_secs).unwrap_or(i64::MAX)))
        .build()
}

/// A removal cookie must match the original path to take effect.
fn removal(name: &'static str) -> Cookie<'static> {
    let mut cookie = Cookie::new(name, "");
    cookie.set_path("/");
    cookie
}
