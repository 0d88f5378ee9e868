// Application state module
// Shared by every connection task

use crate::handler::Engine;

use super::types::Config;

/// Application state
pub struct AppState {
    pub config: Config,
    pub engine: Engine,
}

impl AppState {
    pub const fn new(config: Config, engine: Engine) -> Self {
        Self { config, engine }
    }

    pub const fn access_log(&self) -> bool {
        self.config.logging.access_log
    }

    pub fn access_log_format(&self) -> &str {
        &self.config.logging.access_log_format
    }
}
