//! Spotify Relay - Entry Point

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use spotify_relay::{Config, RelayServer};

#[derive(Parser, Debug)]
#[command(name = "spotify-relay")]
#[command(about = "Cookie-backed OAuth relay for the Spotify Web API")]
#[command(version)]
struct Cli {
    /// HTTP server port
    #[arg(long, default_value = "3000", env = "PORT")]
    port: u16,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn init_tracing(log_level: &str, json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        subscriber.with(tracing_subscriber::fmt::layer().compact()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Credentials may come from a local .env file during development.
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), port = cli.port, "Starting Spotify relay");

    let config = Config::from_env()?;
    let server = RelayServer::new(config)?;

    server.run(cli.port).await
}
