//! Event envelope - the transport wrapper for all events.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Event, EventError, EventType};

/// The event envelope - common metadata around a single event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Component that emitted the event (e.g. "gorouter").
    pub origin: String,

    /// When the envelope was stamped, in nanoseconds since the Unix epoch.
    pub timestamp: i64,

    /// Deployment the origin runs in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployment: Option<String>,

    /// Job name of the origin.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job: Option<String>,

    /// Index of the origin within its job.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,

    /// Address of the origin.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,

    /// Free-form key/value tags.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,

    /// The wrapped event, tagged with its `event_type`.
    #[serde(flatten)]
    pub event: Event,
}

impl Envelope {
    /// Creates a new envelope builder.
    pub fn builder() -> EnvelopeBuilder {
        EnvelopeBuilder::new()
    }

    /// Returns the type of the wrapped event.
    pub fn event_type(&self) -> EventType {
        self.event.event_type()
    }

    /// Serializes the envelope to JSON bytes.
    pub fn to_json(&self) -> Result<Vec<u8>, EventError> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// Builder for constructing envelopes.
#[derive(Debug, Default)]
pub struct EnvelopeBuilder {
    origin: Option<String>,
    timestamp: Option<i64>,
    deployment: Option<String>,
    job: Option<String>,
    index: Option<String>,
    ip: Option<String>,
    tags: BTreeMap<String, String>,
    event: Option<Event>,
}

impl EnvelopeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn deployment(mut self, deployment: impl Into<String>) -> Self {
        self.deployment = Some(deployment.into());
        self
    }

    pub fn job(mut self, job: impl Into<String>) -> Self {
        self.job = Some(job.into());
        self
    }

    pub fn index(mut self, index: impl Into<String>) -> Self {
        self.index = Some(index.into());
        self
    }

    pub fn ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self
    }

    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    pub fn tags<I, K, V>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.tags
            .extend(tags.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn event(mut self, event: impl Into<Event>) -> Self {
        self.event = Some(event.into());
        self
    }

    /// Builds the envelope.
    ///
    /// Fails with [`EventError::MissingField`] if the origin, timestamp or
    /// event was not set.
    pub fn build(self) -> Result<Envelope, EventError> {
        let origin = self
            .origin
            .filter(|o| !o.is_empty())
            .ok_or(EventError::MissingField("origin"))?;

        Ok(Envelope {
            origin,
            timestamp: self.timestamp.ok_or(EventError::MissingField("timestamp"))?,
            deployment: self.deployment,
            job: self.job,
            index: self.index,
            ip: self.ip,
            tags: self.tags,
            event: self.event.ok_or(EventError::MissingField("event"))?,
        })
    }
}
