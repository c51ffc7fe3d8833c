//! Spotify Relay
//!
//! A stateless backend relay between a client application and the Spotify
//! Web API. Performs the OAuth2 authorization-code exchange, keeps the
//! resulting token pair in HTTP-only browser cookies, refreshes expired
//! access tokens transparently, and proxies a handful of read/write
//! operations (listening data, pause/resume playback), reshaping upstream
//! JSON into a simplified response contract.
//!
//! # Design
//!
//! - **Cookie-as-database**: tokens live entirely in the per-request cookie
//!   data supplied by the client. No server-side session store, no
//!   cross-request mutable state, no locking.
//! - **Single refresh attempt**: the auth gate performs at most one refresh
//!   exchange per request; a failed refresh sends the caller back to
//!   `/login`. Nothing is retried.
//!
//! # Example
//!
//! ```no_run
//! use spotify_relay::{Config, RelayServer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     RelayServer::new(config)?.run(3000).await
//! }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod server;

pub use client::SpotifyClient;
pub use config::Config;
pub use error::{AuthError, ExchangeError, RelayError, UpstreamError};
pub use server::RelayServer;
