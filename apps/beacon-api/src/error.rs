//! Error types for the WebSocket layer.
//!
//! Every error here is scoped to a single request or connection. Nothing in
//! this module ever terminates the server process.

use std::error::Error;
use std::fmt;

/// Decode failure at the protocol boundary.
#[derive(Debug)]
pub enum ProtocolError {
    /// A set frame's body was not the expected `{"message": ...}` JSON shape.
    MalformedPayload(serde_json::Error),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::MalformedPayload(err) => write!(f, "malformed set payload: {err}"),
        }
    }
}

impl Error for ProtocolError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ProtocolError::MalformedPayload(err) => Some(err),
        }
    }
}

/// Failure inserting a connection into the registry.
#[derive(Debug, PartialEq, Eq)]
pub enum RegistryError {
    /// The client identifier is already registered.
    DuplicateKey,
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::DuplicateKey => write!(f, "client identifier already registered"),
        }
    }
}

impl Error for RegistryError {}
