//! Error types
//!
//! Startup failures (`ConfigError`, `DiscoveryError`) abort initialization.
//! Per-request failures (`ResourceReadError`, `HandlerError`) are surfaced to
//! the transport layer, which answers them with a 500 response.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration could not be loaded or resolved.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration sources could not be read or deserialized.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// No base package was configured.
    #[error("base package must not be empty")]
    EmptyBasePackage,

    /// The base package matched no registered controller.
    #[error("base package '{0}' does not contain any registered controller")]
    UnknownBasePackage(String),

    /// host:port could not be parsed into a socket address.
    #[error("invalid listen address '{addr}': {reason}")]
    InvalidAddress { addr: String, reason: String },
}

/// A routed controller could not be instantiated.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("controller '{controller}' declares routes but has no no-argument constructor")]
    MissingConstructor { controller: String },

    #[error("controller '{controller}' failed to construct: {reason}")]
    Construction { controller: String, reason: String },
}

/// Route table construction failed.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
}

/// A static resource (or the not-found document) could not be read.
#[derive(Debug, Error)]
#[error("failed to read resource '{}': {source}", path.display())]
pub struct ResourceReadError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Error returned by an application handler.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct HandlerError {
    message: String,
}

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Failure while dispatching a single request.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("handler failed: {0}")]
    Handler(#[from] HandlerError),

    #[error(transparent)]
    Resource(#[from] ResourceReadError),
}
