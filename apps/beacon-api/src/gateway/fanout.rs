//! Best-effort broadcast fan-out over a registry snapshot.
//!
//! Delivery is fire-and-forget: a non-open or failed recipient is skipped
//! and never aborts delivery to the rest. No ordering guarantee across
//! recipients, no retry.

use std::sync::Arc;

use axum::extract::ws::Message;

use super::registry::ConnectionRegistry;

/// The broadcast dispatcher. Cloneable via `Arc` — store in `AppState`.
pub struct Broadcaster {
    registry: Arc<ConnectionRegistry>,
}

impl Broadcaster {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Queue `message` on every registered open connection.
    ///
    /// Returns the number of connections the frame was queued for. Each
    /// owning session loop performs the actual socket write, so one slow or
    /// dead peer cannot block the others.
    pub fn broadcast(&self, message: Message) -> usize {
        let mut delivered = 0;
        for handle in self.registry.snapshot() {
            if !handle.is_open() {
                tracing::debug!(client_id = %handle.client_id(), "broadcast skipped non-open connection");
                continue;
            }
            match handle.enqueue(message.clone()) {
                Ok(()) => delivered += 1,
                Err(_) => {
                    // The owning session already dropped its receiver.
                    tracing::debug!(client_id = %handle.client_id(), "broadcast skipped closed receiver");
                }
            }
        }
        delivered
    }
}
