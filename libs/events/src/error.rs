//! Error types for event handling.

use thiserror::Error;

/// Errors that can occur when handling events.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EventError {
    /// The HTTP method is not one of the known methods.
    #[error("unknown HTTP method: {0}")]
    UnknownMethod(String),

    /// The peer type is neither client nor server.
    #[error("unknown peer type: {0}")]
    UnknownPeerType(String),

    /// The log message type is neither OUT nor ERR.
    #[error("unknown message type: {0}")]
    UnknownMessageType(String),

    /// A required envelope field was not provided.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for EventError {
    fn from(err: serde_json::Error) -> Self {
        EventError::Serialization(err.to_string())
    }
}
