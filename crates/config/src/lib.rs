//! kfeed Configuration
//!
//! TOML-based configuration loading with sensible defaults.
//! Minimal config should just work - only specify what you need to change.
//!
//! # Parsing
//!
//! Use the `FromStr` trait to parse configuration:
//!
//! ```
//! use kfeed_config::Config;
//! use std::str::FromStr;
//!
//! let config = Config::from_str("[feed]\ncapacity = 500").unwrap();
//! assert_eq!(config.feed.capacity, 500);
//! ```
//!
//! # Example Full Config
//!
//! ```toml
//! [feed]
//! capacity = 1000
//!
//! [server]
//! http_addr = "127.0.0.1:8080"
//! stream_addr = "127.0.0.1:50051"
//! heartbeat_interval_secs = 30
//!
//! [log]
//! level = "info"
//! format = "console"
//! ```

mod error;
mod feed;
mod logging;
mod server;

use std::fs;
use std::path::Path;
use std::str::FromStr;

pub use error::{ConfigError, Result};
pub use feed::{DEFAULT_CAPACITY, FeedConfig};
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use server::ServerConfig;

use serde::Deserialize;

/// Main configuration structure
///
/// All sections are optional with sensible defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Event log settings (capacity)
    pub feed: FeedConfig,

    /// Listen addresses for the consumer-facing transports
    pub server: ServerConfig,

    /// Logging configuration
    pub log: LogConfig,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, contains invalid TOML, or
    /// fails validation.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string
    ///
    /// Prefer using the `FromStr` trait implementation.
    fn parse(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s).map_err(ConfigError::ParseError)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// Invalid values are rejected here, at load time, so the running
    /// process never has to handle them.
    fn validate(&self) -> Result<()> {
        self.feed.validate()?;
        self.server.validate()?;
        Ok(())
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config.feed.capacity, DEFAULT_CAPACITY);
        assert_eq!(config.server.http_addr, "127.0.0.1:8080");
        assert_eq!(config.log.level, LogLevel::Info);
    }

    #[test]
    fn test_full_config_parse() {
        let toml = r#"
[feed]
capacity = 250

[server]
http_addr = "0.0.0.0:8080"
stream_addr = "0.0.0.0:50051"
heartbeat_interval_secs = 10

[log]
level = "debug"
format = "json"
"#;
        let config = Config::from_str(toml).unwrap();

        assert_eq!(config.feed.capacity, 250);
        assert_eq!(config.server.http_addr, "0.0.0.0:8080");
        assert_eq!(config.server.stream_addr, "0.0.0.0:50051");
        assert_eq!(config.server.heartbeat_interval_secs, 10);
        assert_eq!(config.log.level, LogLevel::Debug);
        assert_eq!(config.log.format, LogFormat::Json);
    }

    #[test]
    fn test_zero_capacity_rejected_at_load() {
        let result = Config::from_str("[feed]\ncapacity = 0");
        match result {
            Err(ConfigError::InvalidValue { section, field, .. }) => {
                assert_eq!(section, "feed");
                assert_eq!(field, "capacity");
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_toml() {
        let result = Config::from_str("invalid { toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_file() {
        let result = Config::from_file("/nonexistent/kfeed.toml");
        assert!(matches!(result, Err(ConfigError::IoError { .. })));
    }
}
