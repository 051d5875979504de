//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all settings. The
//! configuration is a TOML file, by default `./sharecache/config.toml`;
//! the database URL can be overridden with `SHARECACHE_DATABASE_URL`.
//!
//! # Example
//!
//! ```no_run
//! use sharecache::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(Config::DEFAULT_PATH)?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use serde::Deserialize;
use std::path::Path;

use super::cache::{CacheConfig, RolloverConfig};
use super::database::{DatabaseConfig, JobsConfig};
use super::logging::LoggingConfig;
use crate::error::{ConfigError, Result};

/// Environment variable that replaces `database.url`.
pub const DATABASE_URL_ENV: &str = "SHARECACHE_DATABASE_URL";

/// Main application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Backing store connection settings.
    pub database: DatabaseConfig,

    /// Asynchronous job queue settings.
    #[serde(default)]
    pub jobs: JobsConfig,

    /// Cache behaviour.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Daily real-time rollover.
    #[serde(default)]
    pub rollover: RolloverConfig,

    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Default location of the configuration file.
    pub const DEFAULT_PATH: &'static str = "./sharecache/config.toml";

    /// Parse configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;

        if let Ok(url) = std::env::var(DATABASE_URL_ENV) {
            if !url.trim().is_empty() {
                config.database.url = url;
            }
        }

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read
    /// - The TOML content is malformed
    /// - Validation fails
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Check that required fields are present and values are in range.
    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::MissingField { field: "url" }.into());
        }
        if self.database.pool_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "pool_size",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.jobs.queue_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "queue_capacity",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        match self.logging.format.as_str() {
            "pretty" | "json" => {}
            other => {
                return Err(ConfigError::InvalidValue {
                    field: "format",
                    reason: format!("expected \"pretty\" or \"json\", got \"{other}\""),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }

    /// Initialize warning-level logging to stderr for one-shot commands.
    pub fn init_command_logging(&self) {
        self.logging.init_for_command();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn minimal_config_uses_defaults() {
        let config = Config::parse_toml("[database]\nurl = \"market.db\"\n").unwrap();

        assert_eq!(config.database.pool_size, 5);
        assert_eq!(config.database.busy_timeout_ms, 5000);
        assert_eq!(config.jobs.queue_capacity, 1024);
        assert!(!config.cache.write_behind);
        assert!(config.rollover.enabled);
        assert_eq!(config.rollover.at.to_string(), "15:30:00");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn rollover_time_is_parsed() {
        let toml = "[database]\nurl = \"market.db\"\n[rollover]\nenabled = false\nat = \"09:15:00\"\n";
        let config = Config::parse_toml(toml).unwrap();
        assert!(!config.rollover.enabled);
        assert_eq!(config.rollover.at.to_string(), "09:15:00");
    }

    #[test]
    fn missing_database_section_is_a_parse_error() {
        let result = Config::parse_toml("[logging]\nlevel = \"debug\"\n");
        assert!(matches!(result, Err(Error::Config(ConfigError::Parse(_)))));
    }

    #[test]
    fn unknown_log_format_is_rejected() {
        let toml = "[database]\nurl = \"market.db\"\n[logging]\nformat = \"xml\"\n";
        assert!(matches!(
            Config::parse_toml(toml),
            Err(Error::Config(ConfigError::InvalidValue { field: "format", .. }))
        ));
    }
}
