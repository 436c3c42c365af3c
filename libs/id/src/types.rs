//! The 128-bit correlation identifier shared by all telemetry events.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::IdError;

/// Number of raw bytes in a correlation ID.
pub const CORRELATION_ID_LEN: usize = 16;

// =============================================================================
// Correlation ID
// =============================================================================

/// A 128-bit identifier split into two 64-bit halves.
///
/// Used both for an event's own request ID and for embedded application IDs.
/// The halves are read from the raw bytes as big-endian integers: bytes
/// `0..8` become `low`, bytes `8..16` become `high`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CorrelationId {
    low: u64,
    high: u64,
}

impl CorrelationId {
    /// Creates a correlation ID from a freshly generated v4 UUID.
    #[must_use]
    pub fn new() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Creates a correlation ID directly from its halves.
    #[must_use]
    pub const fn from_parts(low: u64, high: u64) -> Self {
        Self { low, high }
    }

    /// Creates a correlation ID from 16 raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; CORRELATION_ID_LEN]) -> Self {
        let mut low = [0u8; 8];
        let mut high = [0u8; 8];
        let mut i = 0;
        while i < 8 {
            low[i] = bytes[i];
            high[i] = bytes[i + 8];
            i += 1;
        }
        Self {
            low: u64::from_be_bytes(low),
            high: u64::from_be_bytes(high),
        }
    }

    /// Creates a correlation ID from a byte slice that must hold exactly 16 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, IdError> {
        let raw: [u8; CORRELATION_ID_LEN] =
            bytes.try_into().map_err(|_| IdError::InvalidLength {
                expected: CORRELATION_ID_LEN,
                actual: bytes.len(),
            })?;
        Ok(Self::from_bytes(raw))
    }

    /// Creates a correlation ID from the raw bytes of a UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self::from_bytes(*uuid.as_bytes())
    }

    /// Parses a correlation ID from UUID text (hyphenated or simple hex).
    pub fn parse(s: &str) -> Result<Self, IdError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(IdError::Empty);
        }

        let uuid = Uuid::parse_str(s).map_err(|e| IdError::InvalidUuid(e.to_string()))?;
        Ok(Self::from_uuid(uuid))
    }

    /// Returns the low half.
    #[must_use]
    pub const fn low(&self) -> u64 {
        self.low
    }

    /// Returns the high half.
    #[must_use]
    pub const fn high(&self) -> u64 {
        self.high
    }

    /// Returns the 16 raw bytes this ID was built from.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; CORRELATION_ID_LEN] {
        let mut bytes = [0u8; CORRELATION_ID_LEN];
        bytes[..8].copy_from_slice(&self.low.to_be_bytes());
        bytes[8..].copy_from_slice(&self.high.to_be_bytes());
        bytes
    }

    /// Returns the ID as a UUID.
    #[must_use]
    pub fn to_uuid(&self) -> Uuid {
        Uuid::from_bytes(self.to_bytes())
    }
}

impl std::fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_uuid().hyphenated())
    }
}

impl std::str::FromStr for CorrelationId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Uuid> for CorrelationId {
    fn from(uuid: Uuid) -> Self {
        Self::from_uuid(uuid)
    }
}

impl From<[u8; CORRELATION_ID_LEN]> for CorrelationId {
    fn from(bytes: [u8; CORRELATION_ID_LEN]) -> Self {
        Self::from_bytes(bytes)
    }
}

impl From<CorrelationId> for Uuid {
    fn from(id: CorrelationId) -> Self {
        id.to_uuid()
    }
}

// =============================================================================
// Tests
// =============================================================================
