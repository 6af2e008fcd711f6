//! Transport entry point
//!
//! Turns a hyper request into a [`Request`], runs the dispatcher on the
//! blocking pool and converts the outcome back into a hyper response. Dispatch
//! errors end here as 500 responses.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Bytes, Incoming};
use hyper::Response;

use crate::config::AppState;
use crate::http::{self, Request};
use crate::logger::{self, AccessLogEntry};

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: hyper::Request<Incoming>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let max_body_size = state.config.http.max_body_size;

    // 1. Check declared body size
    if let Some(resp) = check_body_size(&req, max_body_size) {
        return Ok(resp);
    }

    // 2. Collect body, bounded for chunked uploads too
    let (parts, body) = req.into_parts();
    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    let body = match Limited::new(body, limit).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            logger::log_error(&format!(
                "Request body exceeded {max_body_size} bytes while reading"
            ));
            return Ok(http::build_413_response());
        }
        Err(e) => {
            logger::log_warning(&format!("Failed to read request body: {e}"));
            return Ok(http::build_400_response());
        }
    };
    let request = Request::from_parts(parts, body);

    let mut entry = state
        .access_log
        .then(|| AccessLogEntry::from_request(&request, peer_addr));

    // 3. Dispatch off the async workers; handlers and file reads block
    let dispatch_state = Arc::clone(&state);
    let outcome =
        tokio::task::spawn_blocking(move || dispatch_state.dispatcher.dispatch(&request)).await;

    let response = match outcome {
        Ok(Ok(resp)) => http::into_hyper_response(resp, &state.config.http.server_name),
        Ok(Err(e)) => {
            logger::log_dispatch_error(&e);
            http::build_500_response()
        }
        Err(e) => {
            logger::log_error(&format!("Dispatch task failed: {e}"));
            http::build_500_response()
        }
    };

    // 4. Access log
    if let Some(entry) = entry.as_mut() {
        entry.finish(
            response.status().as_u16(),
            response_body_len(&response),
            started.elapsed(),
        );
        logger::log_access(entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(
    req: &hyper::Request<Incoming>,
    max_body_size: u64,
) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

fn response_body_len(response: &Response<Full<Bytes>>) -> usize {
    response
        .headers()
        .get("content-length")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}
