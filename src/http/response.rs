//! HTTP response value and transport-level response builders
//!
//! `Response` is produced by handlers and the static resolver through
//! `ResponseBuilder` and is never mutated afterwards. The free functions build
//! the hyper responses the transport answers with on its own.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{StatusCode, Version};

pub const DEFAULT_CONTENT_TYPE: &str = "text/html";

/// Finished, immutable HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    version: Version,
    status: StatusCode,
    content_type: String,
    body: Bytes,
}

impl Response {
    pub fn builder() -> ResponseBuilder {
        ResponseBuilder::default()
    }

    pub const fn version(&self) -> Version {
        self.version
    }

    pub const fn status(&self) -> StatusCode {
        self.status
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub const fn body(&self) -> &Bytes {
        &self.body
    }
}

/// Builder for [`Response`]
///
/// Defaults to HTTP/1.1, 200 OK, `text/html` and an empty body.
#[derive(Debug, Clone)]
pub struct ResponseBuilder {
    version: Version,
    status: StatusCode,
    content_type: String,
    body: Bytes,
}

impl Default for ResponseBuilder {
    fn default() -> Self {
        Self {
            version: Version::HTTP_11,
            status: StatusCode::OK,
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            body: Bytes::new(),
        }
    }
}

impl ResponseBuilder {
    #[must_use]
    pub const fn version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    #[must_use]
    pub const fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn build(self) -> Response {
        Response {
            version: self.version,
            status: self.status,
            content_type: self.content_type,
            body: self.body,
        }
    }
}

/// Convert a dispatched response into the hyper response written to the wire
pub fn into_hyper_response(
    response: Response,
    server_name: &str,
) -> hyper::Response<Full<Bytes>> {
    let Response {
        version,
        status,
        content_type,
        body,
    } = response;
    let content_length = body.len();

    hyper::Response::builder()
        .status(status)
        .version(version)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .header("Server", server_name)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            build_500_response()
        })
}

/// Build 400 Bad Request response
pub fn build_400_response() -> hyper::Response<Full<Bytes>> {
    hyper::Response::builder()
        .status(400)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("400 Bad Request")))
        .unwrap_or_else(|e| {
            log_build_error("400", &e);
            hyper::Response::new(Full::new(Bytes::from("400 Bad Request")))
        })
}

/// Build 413 Payload Too Large response
pub fn build_413_response() -> hyper::Response<Full<Bytes>> {
    hyper::Response::builder()
        .status(413)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("413 Payload Too Large")))
        .unwrap_or_else(|e| {
            log_build_error("413", &e);
            hyper::Response::new(Full::new(Bytes::from("413 Payload Too Large")))
        })
}

/// Build 500 Internal Server Error response
pub fn build_500_response() -> hyper::Response<Full<Bytes>> {
    hyper::Response::builder()
        .status(500)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("500 Internal Server Error")))
        .unwrap_or_else(|e| {
            log_build_error("500", &e);
            hyper::Response::new(Full::new(Bytes::from("500 Internal Server Error")))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let resp = Response::builder().build();
        assert_eq!(resp.version(), Version::HTTP_11);
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.content_type(), "text/html");
        assert!(resp.body().is_empty());
    }

    #[test]
    fn test_into_hyper_response_sets_headers() {
        let resp = Response::builder()
            .status(StatusCode::CREATED)
            .content_type("application/json")
            .body(r#"{"id":1}"#)
            .build();

        let hyper_resp = into_hyper_response(resp, "dispatcher/test");
        assert_eq!(hyper_resp.status(), StatusCode::CREATED);
        assert_eq!(hyper_resp.headers()["content-type"], "application/json");
        assert_eq!(hyper_resp.headers()["content-length"], "8");
        assert_eq!(hyper_resp.headers()["server"], "dispatcher/test");
    }

    #[test]
    fn test_error_responses() {
        assert_eq!(build_400_response().status(), 400);
        assert_eq!(build_413_response().status(), 413);
        assert_eq!(build_500_response().status(), 500);
    }
}
