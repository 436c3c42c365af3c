//! Read-only view of an inbound HTTP request.

use std::borrow::Cow;

use http::header::HOST;
use http::request::Parts;
use http::{HeaderMap, Method, Request, Uri};

/// The parts of an HTTP request that events are built from.
pub trait RequestInfo {
    /// Method token from the request line.
    fn method(&self) -> &str;

    /// Target host, including any port. Empty when unknown.
    fn host(&self) -> &str;

    /// Target path as sent on the wire, without query string.
    fn path(&self) -> &str;

    /// Network address of the peer.
    fn remote_addr(&self) -> &str;

    /// Value of the named header, if present. Bytes that are not UTF-8 are
    /// replaced with U+FFFD.
    fn header(&self, name: &str) -> Option<Cow<'_, str>>;
}

/// An [`http`] request paired with the address of the peer that sent it.
#[derive(Debug, Clone)]
pub struct InboundRequest<'a> {
    method: &'a Method,
    uri: &'a Uri,
    headers: &'a HeaderMap,
    remote_addr: String,
}

impl<'a> InboundRequest<'a> {
    /// Wraps request head parts.
    pub fn from_parts(parts: &'a Parts, remote_addr: impl Into<String>) -> Self {
        Self {
            method: &parts.method,
            uri: &parts.uri,
            headers: &parts.headers,
            remote_addr: remote_addr.into(),
        }
    }

    /// Wraps a full request; the body is never read.
    pub fn from_request<B>(request: &'a Request<B>, remote_addr: impl Into<String>) -> Self {
        Self {
            method: request.method(),
            uri: request.uri(),
            headers: request.headers(),
            remote_addr: remote_addr.into(),
        }
    }
}

impl RequestInfo for InboundRequest<'_> {
    fn method(&self) -> &str {
        self.method.as_str()
    }

    fn host(&self) -> &str {
        // Absolute-form targets carry the host; origin-form targets rely on
        // the Host header.
        match self.uri.authority() {
            Some(authority) => strip_userinfo(authority.as_str()),
            None => self
                .headers
                .get(HOST)
                .and_then(|v| v.to_str().ok())
                .map(strip_userinfo)
                .unwrap_or_default(),
        }
    }

    fn path(&self) -> &str {
        self.uri.path()
    }

    fn remote_addr(&self) -> &str {
        &self.remote_addr
    }

    fn header(&self, name: &str) -> Option<Cow<'_, str>> {
        self.headers
            .get(name)
            .map(|v| String::from_utf8_lossy(v.as_bytes()))
    }
}

fn strip_userinfo(authority: &str) -> &str {
    authority
        .rsplit_once('@')
        .map_or(authority, |(_, host)| host)
}
