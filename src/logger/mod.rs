//! Logger module
//!
//! Provides logging for the dispatcher and its HTTP transport:
//! - Subscriber setup (`tracing-subscriber`, chrono timestamps)
//! - Server lifecycle events
//! - Route table and dispatch events
//! - Access logging with multiple formats (target `access`)

mod format;

pub use format::AccessLogEntry;

use std::net::SocketAddr;

use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, LoggingConfig};
use crate::dispatch::RouteDescriptor;
use crate::error::DispatchError;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Initialize the global subscriber
///
/// `RUST_LOG` takes precedence over `logging.level`. Should be called once at
/// application startup.
pub fn init(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(ChronoLocal::new(TIME_FORMAT.to_string()))
        .try_init()
}

pub fn log_server_start(addr: &SocketAddr, config: &Config, route_count: usize) {
    tracing::info!(
        address = %addr,
        base_package = %config.base_package(),
        static_root = %config.resources.static_root,
        routes = route_count,
        workers = ?config.server.workers,
        "Server started, listening on http://{addr}"
    );
}

pub fn log_shutdown_requested(active_connections: usize) {
    tracing::info!(active_connections, "Shutdown requested, no longer accepting connections");
}

pub fn log_shutdown_complete(remaining_connections: usize) {
    if remaining_connections == 0 {
        tracing::info!("Shutdown complete");
    } else {
        tracing::warn!(
            remaining_connections,
            "Shutdown deadline reached with connections still open"
        );
    }
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    tracing::debug!(peer = %peer_addr, "Connection accepted");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    tracing::error!("Failed to serve connection: {err:?}");
}

pub fn log_error(message: &str) {
    tracing::error!("{message}");
}

pub fn log_warning(message: &str) {
    tracing::warn!("{message}");
}

pub fn log_route_registered(descriptor: &RouteDescriptor, controller: &str) {
    tracing::info!(route = %descriptor, controller, "Route registered");
}

pub fn log_route_overwritten(descriptor: &RouteDescriptor, previous: &str, current: &str) {
    tracing::warn!(
        route = %descriptor,
        previous,
        current,
        "Duplicate route, later registration wins"
    );
}

pub fn log_route_matched(descriptor: &RouteDescriptor, controller: &str) {
    tracing::debug!(route = %descriptor, controller, "Route matched");
}

pub fn log_fallback(descriptor: &RouteDescriptor) {
    tracing::debug!(request = %descriptor, "No route matched, serving static resource");
}

pub fn log_not_found(path: &str) {
    tracing::debug!(path, "Static resource not found, serving not-found document");
}

pub fn log_dispatch_error(err: &DispatchError) {
    tracing::error!(error = %err, "Dispatch failed");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    tracing::info!(target: "access", "{}", entry.format(format));
}
