//! Connection registry: client identifier → weak connection handle.
//!
//! Uses `DashMap` for shard-level concurrency. Entries are weak references,
//! so the registry can never keep a connection alive or close one; a
//! session that dies without deregistering simply disappears from the next
//! snapshot.

use std::sync::{Arc, Weak};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::error::RegistryError;

use super::session::ConnectionHandle;

/// Shared registry of all live connections.
pub struct ConnectionRegistry {
    connections: DashMap<String, Weak<ConnectionHandle>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
        }
    }

    /// Register a connection under its client identifier.
    ///
    /// Identifiers are freshly generated ULIDs, so a collision is
    /// effectively unreachable, but the contract is explicit: an already
    /// present key is rejected rather than overwritten.
    pub fn add(&self, id: &str, handle: &Arc<ConnectionHandle>) -> Result<(), RegistryError> {
        match self.connections.entry(id.to_string()) {
            Entry::Occupied(_) => Err(RegistryError::DuplicateKey),
            Entry::Vacant(slot) => {
                slot.insert(Arc::downgrade(handle));
                Ok(())
            }
        }
    }

    /// Remove a connection. Idempotent — a no-op when the id is absent.
    pub fn remove(&self, id: &str) {
        self.connections.remove(id);
    }

    /// Point-in-time copy of the currently registered handles.
    ///
    /// Safe to iterate while other connections register and deregister.
    /// Entries whose session has already dropped its handle are skipped.
    pub fn snapshot(&self) -> Vec<Arc<ConnectionHandle>> {
        self.connections
            .iter()
            .filter_map(|entry| entry.value().upgrade())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}
