pub mod config;
pub mod error;
pub mod gateway;

use std::sync::Arc;

use axum::extract::ws::Message;

use config::Config;
use gateway::fanout::Broadcaster;
use gateway::registry::ConnectionRegistry;
use gateway::storage::SharedValue;

/// Shared application state available to every session task.
///
/// Constructed once at startup and injected into each connection's task;
/// there are no globals.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub registry: Arc<ConnectionRegistry>,
    pub value: Arc<SharedValue>,
    pub fanout: Arc<Broadcaster>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let registry = Arc::new(ConnectionRegistry::new());
        Self {
            config: Arc::new(config),
            value: Arc::new(SharedValue::new()),
            fanout: Arc::new(Broadcaster::new(registry.clone())),
            registry,
        }
    }

    /// Replace the shared value, then fan the new value out to every open
    /// connection — the setter included. Returns the recipient count.
    pub fn publish(&self, message: String) -> usize {
        let frame = gateway::protocol::encode_value(&message);
        self.value.set(message);
        self.fanout.broadcast(Message::Text(frame.into()))
    }
}
