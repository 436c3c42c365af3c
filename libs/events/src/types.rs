//! Event type definitions for all telemetry events.
//!
//! Each event kind has a payload struct with its event-specific data. The
//! [`Event`] enum ties them together for transport inside an envelope.

use serde::{Deserialize, Serialize};
use sonde_id::CorrelationId;

use crate::EventError;

// =============================================================================
// Event Type Constants
// =============================================================================

/// All event type names as constants.
pub mod event_types {
    // HTTP
    pub const HTTP_START: &str = "http_start";
    pub const HTTP_STOP: &str = "http_stop";
    pub const HTTP_START_STOP: &str = "http_start_stop";

    // Logs
    pub const LOG_MESSAGE: &str = "log_message";

    // Metrics
    pub const CONTAINER_METRIC: &str = "container_metric";
}

/// Discriminant for the payload carried by an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    HttpStart,
    HttpStop,
    HttpStartStop,
    LogMessage,
    ContainerMetric,
}

impl EventType {
    /// Returns the wire name of this event type.
    pub const fn as_str(&self) -> &'static str {
        match self {
            EventType::HttpStart => event_types::HTTP_START,
            EventType::HttpStop => event_types::HTTP_STOP,
            EventType::HttpStartStop => event_types::HTTP_START_STOP,
            EventType::LogMessage => event_types::LOG_MESSAGE,
            EventType::ContainerMetric => event_types::CONTAINER_METRIC,
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Enumerations
// =============================================================================

/// Which side of an HTTP exchange an event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeerType {
    Client,
    Server,
}

impl std::fmt::Display for PeerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PeerType::Client => write!(f, "client"),
            PeerType::Server => write!(f, "server"),
        }
    }
}

impl std::str::FromStr for PeerType {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "client" => Ok(PeerType::Client),
            "server" => Ok(PeerType::Server),
            _ => Err(EventError::UnknownPeerType(s.to_string())),
        }
    }
}

/// Output stream a log line was written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MessageType {
    Out,
    Err,
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageType::Out => write!(f, "OUT"),
            MessageType::Err => write!(f, "ERR"),
        }
    }
}

impl std::str::FromStr for MessageType {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self, <Self as std::str::FromStr>::Err> {
        match s.to_ascii_uppercase().as_str() {
            "OUT" => Ok(MessageType::Out),
            "ERR" => Ok(MessageType::Err),
            _ => Err(EventError::UnknownMessageType(s.to_string())),
        }
    }
}

/// HTTP request methods known to the event schema.
///
/// Method tokens are case-sensitive; `"get"` is not `GET`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING-KEBAB-CASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Head,
    Acl,
    BaselineControl,
    Bind,
    Checkin,
    Checkout,
    Connect,
    Copy,
    Debug,
    Label,
    Link,
    Lock,
    Merge,
    Mkactivity,
    Mkcalendar,
    Mkcol,
    Mkredirectref,
    Mkworkspace,
    Move,
    Options,
    Orderpatch,
    Patch,
    Pri,
    Propfind,
    Proppatch,
    Rebind,
    Report,
    Search,
    Showmethod,
    Spacejump,
    Textsearch,
    Trace,
    Track,
    Unbind,
    Uncheckout,
    Unlink,
    Unlock,
    Update,
    Updateredirectref,
    VersionControl,
}

impl Method {
    /// Every known method, in schema order.
    pub const ALL: [Method; 44] = [
        Method::Get,
        Method::Post,
        Method::Put,
        Method::Delete,
        Method::Head,
        Method::Acl,
        Method::BaselineControl,
        Method::Bind,
        Method::Checkin,
        Method::Checkout,
        Method::Connect,
        Method::Copy,
        Method::Debug,
        Method::Label,
        Method::Link,
        Method::Lock,
        Method::Merge,
        Method::Mkactivity,
        Method::Mkcalendar,
        Method::Mkcol,
        Method::Mkredirectref,
        Method::Mkworkspace,
        Method::Move,
        Method::Options,
        Method::Orderpatch,
        Method::Patch,
        Method::Pri,
        Method::Propfind,
        Method::Proppatch,
        Method::Rebind,
        Method::Report,
        Method::Search,
        Method::Showmethod,
        Method::Spacejump,
        Method::Textsearch,
        Method::Trace,
        Method::Track,
        Method::Unbind,
        Method::Uncheckout,
        Method::Unlink,
        Method::Unlock,
        Method::Update,
        Method::Updateredirectref,
        Method::VersionControl,
    ];

    /// Returns the request-line token for this method.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
            Method::Acl => "ACL",
            Method::BaselineControl => "BASELINE-CONTROL",
            Method::Bind => "BIND",
            Method::Checkin => "CHECKIN",
            Method::Checkout => "CHECKOUT",
            Method::Connect => "CONNECT",
            Method::Copy => "COPY",
            Method::Debug => "DEBUG",
            Method::Label => "LABEL",
            Method::Link => "LINK",
            Method::Lock => "LOCK",
            Method::Merge => "MERGE",
            Method::Mkactivity => "MKACTIVITY",
            Method::Mkcalendar => "MKCALENDAR",
            Method::Mkcol => "MKCOL",
            Method::Mkredirectref => "MKREDIRECTREF",
            Method::Mkworkspace => "MKWORKSPACE",
            Method::Move => "MOVE",
            Method::Options => "OPTIONS",
            Method::Orderpatch => "ORDERPATCH",
            Method::Patch => "PATCH",
            Method::Pri => "PRI",
            Method::Propfind => "PROPFIND",
            Method::Proppatch => "PROPPATCH",
            Method::Rebind => "REBIND",
            Method::Report => "REPORT",
            Method::Search => "SEARCH",
            Method::Showmethod => "SHOWMETHOD",
            Method::Spacejump => "SPACEJUMP",
            Method::Textsearch => "TEXTSEARCH",
            Method::Trace => "TRACE",
            Method::Track => "TRACK",
            Method::Unbind => "UNBIND",
            Method::Uncheckout => "UNCHECKOUT",
            Method::Unlink => "UNLINK",
            Method::Unlock => "UNLOCK",
            Method::Update => "UPDATE",
            Method::Updateredirectref => "UPDATEREDIRECTREF",
            Method::VersionControl => "VERSION-CONTROL",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Method {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Schema enum names spell the hyphen as an underscore.
        let token = s.replace('_', "-");
        Method::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == token)
            .ok_or_else(|| EventError::UnknownMethod(s.to_string()))
    }
}

// =============================================================================
// Event Payloads
// =============================================================================

// -----------------------------------------------------------------------------
// HTTP Events
// -----------------------------------------------------------------------------

/// Emitted when an HTTP request begins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpStart {
    /// Nanoseconds since the Unix epoch.
    pub timestamp: i64,
    pub request_id: CorrelationId,
    pub peer_type: PeerType,
    pub method: Method,
    /// Host and path, without scheme or credentials.
    pub uri: String,
    pub remote_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_id: Option<CorrelationId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_index: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,
}

/// Emitted when an HTTP response completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpStop {
    pub timestamp: i64,
    pub uri: String,
    pub request_id: CorrelationId,
    pub peer_type: PeerType,
    pub status_code: i32,
    pub content_length: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_id: Option<CorrelationId>,
}

/// A whole request/response exchange in one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpStartStop {
    pub start_timestamp: i64,
    pub stop_timestamp: i64,
    pub request_id: CorrelationId,
    pub peer_type: PeerType,
    pub method: Method,
    pub uri: String,
    pub remote_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    pub status_code: i32,
    pub content_length: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_id: Option<CorrelationId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_index: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,
}

// -----------------------------------------------------------------------------
// Log Events
// -----------------------------------------------------------------------------

/// A single line of application output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogMessage {
    /// Raw message bytes, copied without transformation.
    pub message: Vec<u8>,
    pub message_type: MessageType,
    pub timestamp: i64,
    pub app_id: String,
    pub source_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_instance: Option<String>,
}

// -----------------------------------------------------------------------------
// Metric Events
// -----------------------------------------------------------------------------

/// Point-in-time resource usage of one application instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerMetric {
    pub application_id: String,
    pub instance_index: i32,
    pub cpu_percentage: f64,
    pub memory_bytes: u64,
    pub disk_bytes: u64,
}

// =============================================================================
// Event Union
// =============================================================================

/// Any event the factory can produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event_type", content = "event", rename_all = "snake_case")]
pub enum Event {
    HttpStart(HttpStart),
    HttpStop(HttpStop),
    HttpStartStop(HttpStartStop),
    LogMessage(LogMessage),
    ContainerMetric(ContainerMetric),
}

impl Event {
    /// Returns the discriminant for this payload.
    pub const fn event_type(&self) -> EventType {
        match self {
            Event::HttpStart(_) => EventType::HttpStart,
            Event::HttpStop(_) => EventType::HttpStop,
            Event::HttpStartStop(_) => EventType::HttpStartStop,
            Event::LogMessage(_) => EventType::LogMessage,
            Event::ContainerMetric(_) => EventType::ContainerMetric,
        }
    }
}

impl From<HttpStart> for Event {
    fn from(event: HttpStart) -> Self {
        Event::HttpStart(event)
    }
}

impl From<HttpStop> for Event {
    fn from(event: HttpStop) -> Self {
        Event::HttpStop(event)
    }
}

impl From<HttpStartStop> for Event {
    fn from(event: HttpStartStop) -> Self {
        Event::HttpStartStop(event)
    }
}

impl From<LogMessage> for Event {
    fn from(event: LogMessage) -> Self {
        Event::LogMessage(event)
    }
}

impl From<ContainerMetric> for Event {
    fn from(event: ContainerMetric) -> Self {
        Event::ContainerMetric(event)
    }
}

// =============================================================================
// Tests
// =============================================================================
