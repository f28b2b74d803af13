//! Server configuration
//!
//! Bind addresses for the two consumer-facing transports.

use serde::Deserialize;

use crate::error::{ConfigError, Result};

/// Server configuration
///
/// # Example
///
/// ```toml
/// [server]
/// http_addr = "127.0.0.1:8080"
/// stream_addr = "127.0.0.1:50051"
/// heartbeat_interval_secs = 30
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// HTTP API listen address (snapshot queries, stats, health)
    /// Default: 127.0.0.1:8080
    pub http_addr: String,

    /// Feed stream listen address (live tailing)
    /// Default: 127.0.0.1:50051
    pub stream_addr: String,

    /// Heartbeat interval for stream connections, in seconds
    /// Default: 30
    pub heartbeat_interval_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: "127.0.0.1:8080".to_string(),
            stream_addr: "127.0.0.1:50051".to_string(),
            heartbeat_interval_secs: 30,
        }
    }
}

impl ServerConfig {
    /// Validate the server section
    pub fn validate(&self) -> Result<()> {
        if self.http_addr.is_empty() {
            return Err(ConfigError::invalid_value(
                "server",
                "http_addr",
                "must not be empty",
            ));
        }
        if self.stream_addr.is_empty() {
            return Err(ConfigError::invalid_value(
                "server",
                "stream_addr",
                "must not be empty",
            ));
        }
        if self.heartbeat_interval_secs == 0 {
            return Err(ConfigError::invalid_value(
                "server",
                "heartbeat_interval_secs",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}
