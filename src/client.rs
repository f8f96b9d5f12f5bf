//! Client lifecycle: connect, drive the session loop, release the connection.
//!
//! The connection is owned by [`Client::run`] for its whole lifetime and is
//! dropped at a single release point, on every exit path: transport failure,
//! or interrupt.

use crate::config::Config;
use crate::session::{self, TransportError, MESSAGE};
use tokio::net::TcpStream;
use tracing::info;

/// Client instance
pub struct Client {
    config: Config,
}

/// Errors surfaced to the process boundary.
#[derive(Debug)]
pub enum ClientError {
    /// The initial connection could not be established. Fatal, no retry.
    Setup(std::io::Error),
    /// The established connection failed or was closed mid-session.
    Transport(TransportError),
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::Setup(e) => write!(f, "Failed to connect to echo peer: {}", e),
            ClientError::Transport(e) => write!(f, "Session ended: {}", e),
        }
    }
}

impl std::error::Error for ClientError {}

impl Client {
    /// Create a new client instance
    pub fn new(config: Config) -> Self {
        Client { config }
    }

    /// Connect to the echo peer and run send/receive rounds until the
    /// connection ends or the process is interrupted.
    ///
    /// The stream is released exactly once, after the loop exits, whichever
    /// way it exits.
    pub async fn run(&self) -> Result<(), ClientError> {
        let mut stream = TcpStream::connect((self.config.host.as_str(), self.config.port))
            .await
            .map_err(ClientError::Setup)?;
        info!(host = %self.config.host, port = self.config.port, "Connected to echo peer");

        let result = tokio::select! {
            res = session::run(&mut stream, MESSAGE, self.config.recv_buffer) => {
                res.map_err(ClientError::Transport)
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupt received");
                Ok(())
            }
        };

        // Single release point for the connection
        info!("Closing connection");
        drop(stream);

        result
    }
}
