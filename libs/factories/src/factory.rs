//! The event factory.

use sonde_events::{
    ContainerMetric, Envelope, Event, HttpStart, HttpStartStop, HttpStop, LogMessage, MessageType,
    Method, PeerType,
};
use sonde_id::CorrelationId;

use crate::{Clock, FactoryConfig, FactoryError, HeaderFields, RequestInfo, SystemClock};

/// Builds telemetry events, stamping timestamps from its clock.
#[derive(Debug, Clone, Default)]
pub struct EventFactory<C = SystemClock> {
    clock: C,
    config: FactoryConfig,
}

impl EventFactory<SystemClock> {
    /// Creates a factory on the system clock with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a factory on the system clock configured from the environment.
    pub fn from_env() -> Result<Self, FactoryError> {
        Ok(Self::new().with_config(FactoryConfig::from_env()?))
    }
}

impl<C: Clock> EventFactory<C> {
    /// Creates a factory on the given clock.
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            config: FactoryConfig::default(),
        }
    }

    pub fn with_config(mut self, config: FactoryConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &FactoryConfig {
        &self.config
    }

    /// Builds the event recorded when an HTTP request begins.
    pub fn http_start(
        &self,
        request: &(impl RequestInfo + ?Sized),
        peer_type: PeerType,
        request_id: CorrelationId,
    ) -> Result<HttpStart, FactoryError> {
        let method = parse_method(request)?;
        let headers = HeaderFields::extract(request);

        let event = HttpStart {
            timestamp: self.clock.now_nanos(),
            request_id,
            peer_type,
            method,
            uri: uri(request),
            remote_address: request.remote_addr().to_string(),
            user_agent: headers.user_agent,
            application_id: headers.application_id,
            instance_index: headers.instance_index,
            instance_id: headers.instance_id,
        };
        tracing::trace!(%request_id, %method, uri = %event.uri, "built http start event");
        Ok(event)
    }

    /// Builds the event recorded when an HTTP response completes.
    pub fn http_stop(
        &self,
        request: &(impl RequestInfo + ?Sized),
        status_code: i32,
        content_length: i64,
        peer_type: PeerType,
        request_id: CorrelationId,
    ) -> HttpStop {
        let headers = HeaderFields::extract(request);

        let event = HttpStop {
            timestamp: self.clock.now_nanos(),
            uri: uri(request),
            request_id,
            peer_type,
            status_code,
            content_length,
            application_id: headers.application_id,
        };
        tracing::trace!(%request_id, status_code, uri = %event.uri, "built http stop event");
        event
    }

    /// Builds a single event covering a whole request/response exchange.
    pub fn http_start_stop(
        &self,
        request: &(impl RequestInfo + ?Sized),
        status_code: i32,
        content_length: i64,
        peer_type: PeerType,
        request_id: CorrelationId,
    ) -> Result<HttpStartStop, FactoryError> {
        let method = parse_method(request)?;
        let headers = HeaderFields::extract(request);
        let timestamp = self.clock.now_nanos();

        let event = HttpStartStop {
            start_timestamp: timestamp,
            stop_timestamp: timestamp,
            request_id,
            peer_type,
            method,
            uri: uri(request),
            remote_address: request.remote_addr().to_string(),
            user_agent: headers.user_agent,
            status_code,
            content_length,
            application_id: headers.application_id,
            instance_index: headers.instance_index,
            instance_id: headers.instance_id,
        };
        tracing::trace!(
            %request_id,
            %method,
            status_code,
            uri = %event.uri,
            "built http start/stop event"
        );
        Ok(event)
    }

    /// Builds a log message event. The message bytes are copied as-is.
    pub fn log_message(
        &self,
        message_type: MessageType,
        message: impl AsRef<[u8]>,
        app_id: impl Into<String>,
        source_type: impl Into<String>,
    ) -> LogMessage {
        LogMessage {
            message: message.as_ref().to_vec(),
            message_type,
            timestamp: self.clock.now_nanos(),
            app_id: app_id.into(),
            source_type: source_type.into(),
            source_instance: None,
        }
    }

    /// Builds a container metric event. No timestamp is involved.
    pub fn container_metric(
        &self,
        application_id: impl Into<String>,
        instance_index: i32,
        cpu_percentage: f64,
        memory_bytes: u64,
        disk_bytes: u64,
    ) -> ContainerMetric {
        new_container_metric(
            application_id,
            instance_index,
            cpu_percentage,
            memory_bytes,
            disk_bytes,
        )
    }

    /// Wraps an event in an envelope stamped with this factory's metadata.
    pub fn envelope(&self, event: impl Into<Event>) -> Result<Envelope, FactoryError> {
        let config = &self.config;
        let mut builder = Envelope::builder()
            .origin(config.origin.as_str())
            .timestamp(self.clock.now_nanos())
            .tags(config.tags.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .event(event);

        if let Some(deployment) = &config.deployment {
            builder = builder.deployment(deployment.as_str());
        }
        if let Some(job) = &config.job {
            builder = builder.job(job.as_str());
        }
        if let Some(index) = &config.index {
            builder = builder.index(index.as_str());
        }
        if let Some(ip) = &config.ip {
            builder = builder.ip(ip.as_str());
        }

        Ok(builder.build()?)
    }
}

// =============================================================================
// Free Functions
// =============================================================================

/// Builds a correlation ID from 16 raw bytes.
pub fn new_correlation_id(bytes: [u8; 16]) -> CorrelationId {
    CorrelationId::from_bytes(bytes)
}

/// [`EventFactory::http_start`] on the system clock.
pub fn new_http_start(
    request: &(impl RequestInfo + ?Sized),
    peer_type: PeerType,
    request_id: CorrelationId,
) -> Result<HttpStart, FactoryError> {
    EventFactory::new().http_start(request, peer_type, request_id)
}

/// [`EventFactory::http_stop`] on the system clock.
pub fn new_http_stop(
    request: &(impl RequestInfo + ?Sized),
    status_code: i32,
    content_length: i64,
    peer_type: PeerType,
    request_id: CorrelationId,
) -> HttpStop {
    EventFactory::new().http_stop(request, status_code, content_length, peer_type, request_id)
}

/// [`EventFactory::http_start_stop`] on the system clock.
pub fn new_http_start_stop(
    request: &(impl RequestInfo + ?Sized),
    status_code: i32,
    content_length: i64,
    peer_type: PeerType,
    request_id: CorrelationId,
) -> Result<HttpStartStop, FactoryError> {
    EventFactory::new().http_start_stop(request, status_code, content_length, peer_type, request_id)
}

/// [`EventFactory::log_message`] on the system clock.
pub fn new_log_message(
    message_type: MessageType,
    message: impl AsRef<[u8]>,
    app_id: impl Into<String>,
    source_type: impl Into<String>,
) -> LogMessage {
    EventFactory::new().log_message(message_type, message, app_id, source_type)
}

/// Builds a container metric event.
pub fn new_container_metric(
    application_id: impl Into<String>,
    instance_index: i32,
    cpu_percentage: f64,
    memory_bytes: u64,
    disk_bytes: u64,
) -> ContainerMetric {
    ContainerMetric {
        application_id: application_id.into(),
        instance_index,
        cpu_percentage,
        memory_bytes,
        disk_bytes,
    }
}

fn parse_method(request: &(impl RequestInfo + ?Sized)) -> Result<Method, FactoryError> {
    let raw = request.method();
    raw.parse::<Method>().map_err(|_| {
        tracing::debug!(method = raw, "rejecting unknown HTTP method");
        FactoryError::UnknownMethod(raw.to_string())
    })
}

fn uri(request: &(impl RequestInfo + ?Sized)) -> String {
    format!("{}{}", request.host(), request.path())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FixedClock, InboundRequest};
    use crate::headers::{APPLICATION_ID_HEADER, INSTANCE_ID_HEADER, INSTANCE_INDEX_HEADER};
    use http::Request;
    use proptest::prelude::*;
    use sonde_events::EventType;
    use uuid::Uuid;

    const NOW: i64 = 1_700_000_000_123_456_789;

    fn factory() -> EventFactory<FixedClock> {
        EventFactory::with_clock(FixedClock::new(NOW))
    }

    fn request(method: &str, headers: &[(&str, &str)]) -> Request<()> {
        let mut builder = Request::builder()
            .method(method)
            .uri("http://foo.example.com/")
            .header("User-Agent", "our-testing-client");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap()
    }

    fn inbound(req: &Request<()>) -> InboundRequest<'_> {
        InboundRequest::from_request(req, "127.0.0.1")
    }

    #[test]
    fn test_http_start_sets_fields() {
        let request_id = CorrelationId::new();
        let req = request("GET", &[]);

        let event = factory()
            .http_start(&inbound(&req), PeerType::Server, request_id)
            .unwrap();

        assert_eq!(
            event,
            HttpStart {
                timestamp: NOW,
                request_id,
                peer_type: PeerType::Server,
                method: Method::Get,
                uri: "foo.example.com/".to_string(),
                remote_address: "127.0.0.1".to_string(),
                user_agent: Some("our-testing-client".to_string()),
                application_id: None,
                instance_index: None,
                instance_id: None,
            }
        );
    }

    #[test]
    fn test_http_start_on_system_clock() {
        let req = request("GET", &[]);
        let event = new_http_start(&inbound(&req), PeerType::Server, CorrelationId::new()).unwrap();
        assert_ne!(event.timestamp, 0);
    }

    #[test]
    fn test_http_start_application_id() {
        let app_id = Uuid::new_v4();
        let req = request("GET", &[(APPLICATION_ID_HEADER, app_id.to_string().as_str())]);

        let event = factory()
            .http_start(&inbound(&req), PeerType::Server, CorrelationId::new())
            .unwrap();

        assert_eq!(
            event.application_id,
            Some(new_correlation_id(*app_id.as_bytes()))
        );
    }

    #[test]
    fn test_http_start_instance_index() {
        let req = request("GET", &[(INSTANCE_INDEX_HEADER, "1")]);
        let event = factory()
            .http_start(&inbound(&req), PeerType::Server, CorrelationId::new())
            .unwrap();
        assert_eq!(event.instance_index, Some(1));
    }

    #[test]
    fn test_http_start_instance_id() {
        let req = request("GET", &[(INSTANCE_ID_HEADER, "fake-id")]);
        let event = factory()
            .http_start(&inbound(&req), PeerType::Server, CorrelationId::new())
            .unwrap();
        assert_eq!(event.instance_id.as_deref(), Some("fake-id"));
    }

    #[test]
    fn test_http_start_other_method() {
        let req = request("PATCH", &[]);
        let event = factory()
            .http_start(&inbound(&req), PeerType::Server, CorrelationId::new())
            .unwrap();
        assert_eq!(event.method, Method::Patch);
    }

    #[test]
    fn test_http_start_unknown_method() {
        let req = request("BREW", &[]);
        let err = factory()
            .http_start(&inbound(&req), PeerType::Client, CorrelationId::new())
            .unwrap_err();
        assert_eq!(err, FactoryError::UnknownMethod("BREW".to_string()));
        assert!(err.is_unknown_method());
    }

    #[test]
    fn test_http_start_malformed_index_keeps_other_headers() {
        let req = request(
            "GET",
            &[(INSTANCE_INDEX_HEADER, "one"), (INSTANCE_ID_HEADER, "fake-id")],
        );
        let event = factory()
            .http_start(&inbound(&req), PeerType::Server, CorrelationId::new())
            .unwrap();
        assert_eq!(event.instance_index, None);
        assert_eq!(event.instance_id.as_deref(), Some("fake-id"));
    }

    #[test]
    fn test_http_start_keeps_non_ascii_headers() {
        let mut req = request("GET", &[]);
        req.headers_mut().insert(
            "user-agent",
            http::HeaderValue::from_bytes("curl/8 (café)".as_bytes()).unwrap(),
        );
        req.headers_mut().insert(
            "x-cf-instanceid",
            http::HeaderValue::from_bytes("inst-é".as_bytes()).unwrap(),
        );

        let event = factory()
            .http_start(&inbound(&req), PeerType::Server, CorrelationId::new())
            .unwrap();

        assert_eq!(event.user_agent.as_deref(), Some("curl/8 (café)"));
        assert_eq!(event.instance_id.as_deref(), Some("inst-é"));
    }

    #[test]
    fn test_uri_keeps_encoded_path() {
        let req = Request::builder()
            .uri("http://foo.example.com/a%20b?q=1")
            .body(())
            .unwrap();
        let event = factory().http_stop(&inbound(&req), 200, 0, PeerType::Server, CorrelationId::new());
        assert_eq!(event.uri, "foo.example.com/a%20b");
    }

    #[test]
    fn test_http_start_without_user_agent() {
        let req = Request::builder()
            .uri("http://foo.example.com/path")
            .body(())
            .unwrap();
        let event = factory()
            .http_start(&inbound(&req), PeerType::Client, CorrelationId::new())
            .unwrap();
        assert_eq!(event.user_agent, None);
        assert_eq!(event.uri, "foo.example.com/path");

        let json = serde_json::to_value(&event).unwrap();
        assert!(json.get("user_agent").is_none());
    }

    #[test]
    fn test_http_stop_sets_fields() {
        let app_id = Uuid::new_v4();
        let request_id = CorrelationId::new();
        let req = request("GET", &[(APPLICATION_ID_HEADER, app_id.to_string().as_str())]);

        let event = factory().http_stop(&inbound(&req), 200, 3, PeerType::Server, request_id);

        assert_eq!(
            event,
            HttpStop {
                timestamp: NOW,
                uri: "foo.example.com/".to_string(),
                request_id,
                peer_type: PeerType::Server,
                status_code: 200,
                content_length: 3,
                application_id: Some(CorrelationId::from_uuid(app_id)),
            }
        );
    }

    #[test]
    fn test_http_stop_on_system_clock() {
        let req = request("GET", &[]);
        let event = new_http_stop(&inbound(&req), 200, 3, PeerType::Server, CorrelationId::new());
        assert_ne!(event.timestamp, 0);
        assert_eq!(event.application_id, None);
    }

    #[test]
    fn test_http_start_stop_extracts_headers() {
        let app_id = Uuid::new_v4();
        let req = request(
            "GET",
            &[
                (APPLICATION_ID_HEADER, app_id.to_string().as_str()),
                (INSTANCE_INDEX_HEADER, "1"),
                (INSTANCE_ID_HEADER, "fake-id"),
            ],
        );

        let event = factory()
            .http_start_stop(&inbound(&req), 200, 3, PeerType::Server, CorrelationId::new())
            .unwrap();

        assert_eq!(event.application_id, Some(CorrelationId::from_uuid(app_id)));
        assert_eq!(event.instance_index, Some(1));
        assert_eq!(event.instance_id.as_deref(), Some("fake-id"));
        assert_eq!(event.method, Method::Get);
        assert_eq!(event.status_code, 200);
        assert_eq!(event.content_length, 3);
        assert_eq!(event.remote_address, "127.0.0.1");
        assert_eq!(event.user_agent.as_deref(), Some("our-testing-client"));
    }

    #[test]
    fn test_http_start_stop_single_timestamp() {
        let req = request("GET", &[]);
        let event = new_http_start_stop(&inbound(&req), 404, 0, PeerType::Client, CorrelationId::new())
            .unwrap();
        assert_ne!(event.start_timestamp, 0);
        assert_eq!(event.start_timestamp, event.stop_timestamp);
    }

    #[test]
    fn test_http_start_stop_unknown_method() {
        let req = request("BREW", &[]);
        let result =
            factory().http_start_stop(&inbound(&req), 200, 3, PeerType::Server, CorrelationId::new());
        assert!(matches!(result, Err(FactoryError::UnknownMethod(m)) if m == "BREW"));
    }

    #[test]
    fn test_log_message() {
        let event = factory().log_message(MessageType::Out, "hello", "app-id", "App");
        assert_eq!(
            event,
            LogMessage {
                message: b"hello".to_vec(),
                message_type: MessageType::Out,
                timestamp: NOW,
                app_id: "app-id".to_string(),
                source_type: "App".to_string(),
                source_instance: None,
            }
        );
    }

    #[test]
    fn test_log_message_on_system_clock() {
        let event = new_log_message(MessageType::Err, "hello", "app-id", "App");
        assert_ne!(event.timestamp, 0);
        assert_eq!(event.message, b"hello");
        assert_eq!(event.message_type, MessageType::Err);
    }

    #[test]
    fn test_log_message_bytes_untouched() {
        let raw = [0xffu8, 0x00, b'\n', 0xc3];
        let event = factory().log_message(MessageType::Err, raw, "app-id", "App");
        assert_eq!(event.message, raw.to_vec());
    }

    #[test]
    fn test_container_metric() {
        let metric = new_container_metric("some_app_id", 7, 42.24, 1234, 13231231);
        assert_eq!(
            metric,
            ContainerMetric {
                application_id: "some_app_id".to_string(),
                instance_index: 7,
                cpu_percentage: 42.24,
                memory_bytes: 1234,
                disk_bytes: 13231231,
            }
        );
        assert_eq!(
            factory().container_metric("some_app_id", 7, 42.24, 1234, 13231231),
            metric
        );
    }

    #[test]
    fn test_envelope_uses_config() {
        let config = FactoryConfig {
            origin: "router".to_string(),
            job: Some("router_z1".to_string()),
            tags: [("az".to_string(), "z1".to_string())].into_iter().collect(),
            ..FactoryConfig::default()
        };
        let factory = factory().with_config(config);
        let metric = factory.container_metric("some_app_id", 7, 42.24, 1234, 13231231);

        let envelope = factory.envelope(metric).unwrap();

        assert_eq!(envelope.origin, "router");
        assert_eq!(envelope.timestamp, NOW);
        assert_eq!(envelope.job.as_deref(), Some("router_z1"));
        assert_eq!(envelope.deployment, None);
        assert_eq!(envelope.tags.get("az").map(String::as_str), Some("z1"));
        assert_eq!(envelope.event_type(), EventType::ContainerMetric);
    }

    #[test]
    fn test_envelope_rejects_empty_origin() {
        let config = FactoryConfig {
            origin: String::new(),
            ..FactoryConfig::default()
        };
        let factory = factory().with_config(config);
        let event = factory.log_message(MessageType::Out, "hello", "app-id", "App");

        assert!(matches!(
            factory.envelope(event),
            Err(FactoryError::Event(sonde_events::EventError::MissingField("origin")))
        ));
    }

    proptest! {
        #[test]
        fn test_application_id_header_matches_raw_bytes(bytes in any::<[u8; 16]>()) {
            let app_id = Uuid::from_bytes(bytes);
            let req = request("GET", &[(APPLICATION_ID_HEADER, app_id.to_string().as_str())]);
            let event = factory()
                .http_start(&inbound(&req), PeerType::Server, CorrelationId::new())
                .unwrap();
            prop_assert_eq!(event.application_id, Some(new_correlation_id(bytes)));
        }
    }
}
