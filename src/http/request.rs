//! Incoming request carrier
//!
//! Built by the transport from hyper request parts once the body is collected.
//! Handlers only read from it.

use hyper::body::Bytes;
use hyper::header::{HeaderName, HeaderValue};
use hyper::http::request::Parts;
use hyper::{HeaderMap, Method, Version};

/// An HTTP request as seen by route handlers
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    path: String,
    query: Option<String>,
    version: Version,
    headers: HeaderMap,
    body: Bytes,
}

impl Request {
    /// Create a request with no headers and an empty body
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            version: Version::HTTP_11,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    /// Build from hyper request parts and a fully collected body
    pub fn from_parts(parts: Parts, body: Bytes) -> Self {
        Self {
            path: parts.uri.path().to_string(),
            query: parts.uri.query().map(ToString::to_string),
            method: parts.method,
            version: parts.version,
            headers: parts.headers,
            body,
        }
    }

    /// Add a header. Names or values that are not valid HTTP are ignored.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.append(name, value);
        }
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Request path without the query string
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub const fn version(&self) -> Version {
        self.version
    }

    /// Look up a header by name (case-insensitive).
    /// Returns `None` when absent or not valid visible ASCII.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub const fn body(&self) -> &Bytes {
        &self.body
    }
}
