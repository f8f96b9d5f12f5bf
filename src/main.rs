//! echo-probe: a TCP echo-session client
//!
//! Connects to an echo peer on a fixed port, then loops forever:
//! - Send a fixed message in full
//! - Read echoed bytes back until the count matches the message length
//!
//! Features:
//! - Byte-accounted receive rounds with bounded chunk reads
//! - Guaranteed single release of the connection on every exit path
//! - Configuration via CLI arguments or TOML file

mod client;
mod config;
mod session;

use client::Client;
use config::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::load()?;

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!(
        host = %config.host,
        port = config.port,
        recv_buffer = config.recv_buffer,
        "Starting echo-probe client"
    );

    let client = Client::new(config);
    client.run().await?;

    Ok(())
}
