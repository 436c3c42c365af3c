//! # sonde-id
//!
//! Correlation identifiers for sonde telemetry events.
//!
//! ## Design Principles
//!
//! - Every 128-bit identifier (request ids, application ids) is carried as two
//!   64-bit halves, `low` and `high`
//! - The mapping from 16 raw bytes to halves is deterministic and reversible
//! - Parsing accepts the canonical UUID text forms (hyphenated or simple hex)
//!
//! ## Byte Layout
//!
//! ```text
//! bytes[0..8]  -> low  (big-endian u64)
//! bytes[8..16] -> high (big-endian u64)
//! ```

mod error;
mod types;

pub use error::IdError;
pub use types::*;

/// Re-export uuid for consumers that need to generate or inspect raw UUIDs
pub use uuid::Uuid;
