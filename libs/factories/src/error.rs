//! Error types for event construction.

use sonde_events::EventError;
use thiserror::Error;

/// Errors that can occur when building events.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FactoryError {
    /// The request method is not one of the known HTTP methods.
    #[error("unknown HTTP method: {0}")]
    UnknownMethod(String),

    /// The factory configuration is invalid.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Wrapping the event in an envelope failed.
    #[error(transparent)]
    Event(#[from] EventError),
}

impl FactoryError {
    /// Returns true if this error was caused by an unrecognized method.
    pub fn is_unknown_method(&self) -> bool {
        matches!(self, FactoryError::UnknownMethod(_))
    }
}
