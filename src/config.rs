//! Application configuration file.

use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use sharetoe_core::SessionConfig;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Settings read from `sharetoe.toml`.
///
/// ```toml
/// log_filter = "info,sharetoe=debug"
///
/// [session]
/// search_depth = 2
/// computer_move_delay_secs = 0.5
/// win_reset_delay_secs = 1.5
/// draw_reset_delay_secs = 2.0
/// ```
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize)]
pub struct AppConfig {
    /// Tracing filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    log_filter: String,

    /// Game session tuning.
    #[serde(default)]
    session: SessionConfig,
}

#[instrument]
fn default_log_filter() -> String {
    "warn,sharetoe=info,sharetoe_core=info".to_string()
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        info!(depth = config.session.search_depth(), "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise returns defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Replaces the session's search depth.
    pub fn with_search_depth(mut self, depth: u32) -> Self {
        self.session = self.session.with_search_depth(depth);
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let depth = *self.session.search_depth();
        if depth > sharetoe_core::MAX_DEPTH {
            return Err(ConfigError::new(format!(
                "search_depth {} exceeds the maximum of {}",
                depth,
                sharetoe_core::MAX_DEPTH
            )));
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
            session: SessionConfig::default(),
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
