// Application state module
// Shared, read-only state handed to every connection

use super::types::Config;
use crate::dispatch::Dispatcher;

/// Application state
///
/// Built once before the listener starts; never mutated afterwards.
pub struct AppState {
    pub config: Config,
    pub dispatcher: Dispatcher,
    /// Cached from `config.logging.access_log`
    pub access_log: bool,
}

impl AppState {
    pub fn new(config: Config, dispatcher: Dispatcher) -> Self {
        let access_log = config.logging.access_log;
        Self {
            config,
            dispatcher,
            access_log,
        }
    }
}
