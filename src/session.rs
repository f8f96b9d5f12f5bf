//! Echo session loop: byte-accounted send/receive rounds.
//!
//! One round transmits the fixed message in full, then waits until as many
//! bytes have been echoed back, reading in bounded chunks. Rounds repeat
//! until the transport fails or the peer closes; there is no normal exit.
//!
//! The loop is generic over the stream so tests can drive it with scripted
//! mocks and in-memory pipes instead of live sockets.

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

/// The fixed message sent on every round.
pub const MESSAGE: &[u8] = b"This is the message.  It will be repeated.";

/// Transport failures after the connection is established.
#[derive(Debug)]
pub enum TransportError {
    /// The peer closed the connection (zero-byte read).
    Closed,
    /// I/O failure during send or receive.
    Io(std::io::Error),
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportError::Closed => write!(f, "connection closed by peer"),
            TransportError::Io(e) => write!(f, "transport failure: {}", e),
        }
    }
}

impl std::error::Error for TransportError {}

impl From<std::io::Error> for TransportError {
    fn from(e: std::io::Error) -> Self {
        TransportError::Io(e)
    }
}

/// Run echo rounds over `conn` until the connection ends.
///
/// Every round sends `message` in full, then blocks in [`recv_round`] until
/// the echoed byte count matches the message length. The loop never returns
/// `Ok`: it runs until cancelled from outside or until the transport fails.
///
/// An empty `message` skips the receive wait entirely, so the loop degrades
/// to an unthrottled send cycle.
pub async fn run<S>(conn: &mut S, message: &[u8], recv_buffer: usize) -> Result<(), TransportError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut buf = BytesMut::with_capacity(recv_buffer);
    buf.resize(recv_buffer, 0);

    loop {
        info!(
            len = message.len(),
            data = %String::from_utf8_lossy(message),
            "Sending message"
        );
        conn.write_all(message).await?;
        conn.flush().await?;

        recv_round(conn, message.len(), &mut buf).await?;
    }
}

/// Wait out one receive round: read until at least `expected` bytes have
/// arrived, returning the final count.
///
/// The count can exceed `expected` only within the read that crossed it;
/// the condition is re-checked after every increment. `expected == 0`
/// issues no reads at all. `buf` bounds a single chunk and must be
/// non-empty when `expected > 0`.
pub async fn recv_round<S>(
    conn: &mut S,
    expected: usize,
    buf: &mut BytesMut,
) -> Result<usize, TransportError>
where
    S: AsyncRead + Unpin,
{
    let mut received = 0;

    while received < expected {
        let n = conn.read(&mut buf[..]).await?;
        if n == 0 {
            debug!(received, expected, "Peer closed mid-round");
            return Err(TransportError::Closed);
        }

        received += n;
        info!(
            chunk = n,
            received,
            expected,
            data = %String::from_utf8_lossy(&buf[..n]),
            "Received"
        );
    }

    Ok(received)
}
