// Configuration module entry point
// Loads layered configuration and holds the shared application state

mod state;
mod types;

use std::net::SocketAddr;

use crate::error::ConfigError;

// Re-export public types
pub use state::AppState;
pub use types::{
    ApplicationConfig, Config, HttpConfig, LoggingConfig, PerformanceConfig, ResourcesConfig,
    ServerConfig,
};

/// Default config file name (without extension)
pub const DEFAULT_CONFIG_NAME: &str = "application";

impl Config {
    /// Load configuration from the specified file path (extension optional).
    ///
    /// Layers: built-in defaults, then the file (if present), then `APP_*`
    /// environment variables with `__` between sections, e.g.
    /// `APP_SERVER__PORT=9000`.
    pub fn load_from(config_path: &str) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("resources.static_root", "static")?
            .set_default("resources.not_found_page", "404.html")?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.server_name", "route-dispatcher/0.1")?
            .set_default("http.max_body_size", 10_485_760)? // 10MB
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(DEFAULT_CONFIG_NAME)
    }

    /// Base package handed to controller discovery
    pub fn base_package(&self) -> &str {
        &self.application.base_package
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse().map_err(|e: std::net::AddrParseError| ConfigError::InvalidAddress {
            reason: e.to_string(),
            addr,
        })
    }
}
