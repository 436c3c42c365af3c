//! # sonde-events
//!
//! Telemetry event type definitions and serialization for sonde.
//!
//! ## Design Principles
//!
//! - Events are immutable value records; nothing mutates them after construction
//! - Optional fields stay optional: an absent value serializes as absent, never
//!   as a zero value
//! - Enumerations are closed; text outside the known set is rejected rather
//!   than coerced to a default
//!
//! ## Envelope
//!
//! Emitters wrap each event in an [`Envelope`] carrying:
//! - The emitting component (`origin`)
//! - Placement metadata (`deployment`, `job`, `index`, `ip`)
//! - Free-form `tags`
//! - The event itself, tagged with its [`EventType`]
//!
//! ## Event Types
//!
//! - HTTP spans (`HttpStart`, `HttpStop`, `HttpStartStop`)
//! - Application logs (`LogMessage`)
//! - Container resource samples (`ContainerMetric`)

mod envelope;
mod error;
mod types;

pub use envelope::*;
pub use error::EventError;
pub use types::*;

pub use sonde_id::CorrelationId;
