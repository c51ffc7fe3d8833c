//! HTTP server for the relay.

pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::Config;
use routes::RelayState;

/// The relay HTTP server.
pub struct RelayServer {
    /// Shared handler state.
    state: Arc<RelayState>,
}

impl RelayServer {
    /// Create a new server from the relay configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        Ok(Self { state: Arc::new(RelayState::new(config)?) })
    }

    /// Run the server until a shutdown signal arrives.
    ///
    /// # Errors
    ///
    /// Returns error on bind or server failure.
    pub async fn run(self, port: u16) -> anyhow::Result<()> {
        let router = routes::create_router(self.state);
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        tracing::info!("Relay listening on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;

        tracing::info!("Relay shut down");
        Ok(())
    }
}

impl std::fmt::Debug for RelayServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayServer").finish_non_exhaustive()
    }
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c().await.expect("Failed to install CTRL+C handler");
    tracing::info!("Received shutdown signal");
}
