//! # sonde-factories
//!
//! Builds sonde telemetry events from raw inputs.
//!
//! ## Design Principles
//!
//! - Construction is pure field mapping; the only outside input is the clock
//! - Optional request headers fill optional fields and never fail an event
//! - Unknown HTTP methods are reported, never mapped to a default
//!
//! ## Recognized Headers
//!
//! | Header               | Field            |
//! |----------------------|------------------|
//! | `X-CF-ApplicationID` | `application_id` |
//! | `X-CF-InstanceIndex` | `instance_index` |
//! | `X-CF-InstanceID`    | `instance_id`    |
//! | `User-Agent`         | `user_agent`     |
//!
//! ## Example
//!
//! ```
//! use sonde_events::PeerType;
//! use sonde_factories::{new_http_start, CorrelationId, InboundRequest};
//!
//! let req = http::Request::builder()
//!     .method("GET")
//!     .uri("http://foo.example.com/")
//!     .body(())
//!     .unwrap();
//! let request = InboundRequest::from_request(&req, "127.0.0.1");
//!
//! let event = new_http_start(&request, PeerType::Server, CorrelationId::new()).unwrap();
//! assert_eq!(event.uri, "foo.example.com/");
//! ```

mod clock;
mod config;
mod error;
mod factory;
mod headers;
mod request;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{FactoryConfig, DEFAULT_ORIGIN};
pub use error::FactoryError;
pub use factory::*;
pub use headers::{
    HeaderFields, APPLICATION_ID_HEADER, INSTANCE_ID_HEADER, INSTANCE_INDEX_HEADER,
    USER_AGENT_HEADER,
};
pub use request::{InboundRequest, RequestInfo};

pub use sonde_id::CorrelationId;
