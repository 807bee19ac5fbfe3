//! Individual WebSocket connection handle.

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};
use uuid::Uuid;

/// Unique connection identifier
pub type ConnectionId = Uuid;

/// Why a frame could not be handed to a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SendError {
    /// The connection was closed or its writer has gone away.
    #[error("connection closed")]
    Closed,
    /// The peer is not draining its outbound queue.
    #[error("outbound queue full")]
    QueueFull,
}

/// A handle to a single WebSocket connection.
///
/// Holds the sender side of the connection's outbound queue; the socket
/// writer owned by the gateway drains the other end. Closing the handle
/// cancels its token, which the gateway observes to tear the socket down.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique connection ID
    pub id: ConnectionId,
    /// When the connection was established
    pub connected_at: DateTime<Utc>,
    sender: mpsc::Sender<String>,
    closed: CancellationToken,
}

impl ConnectionHandle {
    /// Create a handle plus the receiver its socket writer should drain.
    pub fn new(buffer_size: usize) -> (Self, mpsc::Receiver<String>) {
        let (sender, receiver) = mpsc::channel(buffer_size.max(1));
        let handle = Self {
            id: Uuid::new_v4(),
            connected_at: Utc::now(),
            sender,
            closed: CancellationToken::new(),
        };
        (handle, receiver)
    }

    /// Queue a text frame for this connection without waiting.
    pub fn try_send(&self, frame: String) -> Result<(), SendError> {
        if !self.is_open() {
            return Err(SendError::Closed);
        }
        match self.sender.try_send(frame) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(_)) => Err(SendError::QueueFull),
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.close();
                Err(SendError::Closed)
            }
        }
    }

    /// Check if the connection is still open
    pub fn is_open(&self) -> bool {
        !self.closed.is_cancelled() && !self.sender.is_closed()
    }

    /// Mark the connection closed. Idempotent.
    pub fn close(&self) {
        self.closed.cancel();
    }

    /// Resolves once the connection has been closed from any side.
    pub fn closed(&self) -> WaitForCancellationFuture<'_> {
        self.closed.cancelled()
    }
}
