//! OAuth 2.0 token lifecycle for the relay.
//!
//! The relay is a confidential OAuth client of the Spotify accounts service
//! (authorization code grant, RFC 6749 §4.1, with Basic client
//! authentication). Tokens are held exclusively in HTTP-only browser cookies;
//! the relay itself stays stateless.
//!
//! - `refresher` exchanges authorization codes and refresh tokens for grants
//! - `gate` resolves a usable access token per request, refreshing silently
//! - `cookies` builds and mutates the relay-issued token cookies

pub mod cookies;
pub mod gate;
pub mod refresher;

pub use refresher::{TokenGrant, TokenRefresher};
