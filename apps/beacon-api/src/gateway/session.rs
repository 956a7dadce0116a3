//! Per-connection handle: identifier, lifecycle state, and outbound queue.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use axum::extract::ws::Message;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::SendError;

/// Lifecycle state of one connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ConnState {
    Open = 0,
    Closing = 1,
    Closed = 2,
}

impl ConnState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => ConnState::Open,
            1 => ConnState::Closing,
            _ => ConnState::Closed,
        }
    }
}

/// One live bidirectional socket.
///
/// The session loop that created the handle owns it; the registry only ever
/// holds a weak reference and never closes or mutates a connection through
/// it. Frames queued with [`ConnectionHandle::enqueue`] are drained onto the
/// socket by the owning session loop.
pub struct ConnectionHandle {
    client_id: String,
    state: AtomicU8,
    outbound: mpsc::UnboundedSender<Message>,
}

impl ConnectionHandle {
    /// Create a handle in the `Open` state together with the receiving half
    /// of its outbound queue.
    pub fn new(client_id: String) -> (Arc<Self>, mpsc::UnboundedReceiver<Message>) {
        let (outbound, rx) = mpsc::unbounded_channel();
        let handle = Arc::new(Self {
            client_id,
            state: AtomicU8::new(ConnState::Open as u8),
            outbound,
        });
        (handle, rx)
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn state(&self) -> ConnState {
        ConnState::from_u8(self.state.load(Ordering::Relaxed))
    }

    pub fn set_state(&self, state: ConnState) {
        self.state.store(state as u8, Ordering::Relaxed);
    }

    pub fn is_open(&self) -> bool {
        self.state() == ConnState::Open
    }

    /// Queue a frame for delivery by the owning session loop. Fails only
    /// when that loop has already dropped its receiver.
    pub fn enqueue(&self, message: Message) -> Result<(), SendError<Message>> {
        self.outbound.send(message)
    }
}
