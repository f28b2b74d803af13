//! Feed configuration
//!
//! Controls the bounded event log at the heart of the process.

use serde::Deserialize;

use crate::error::{ConfigError, Result};

/// Default retained-event capacity
pub const DEFAULT_CAPACITY: usize = 1000;

/// Feed configuration
///
/// # Example
///
/// ```toml
/// [feed]
/// capacity = 1000
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Maximum number of retained events. Must be at least 1; there is no
    /// runtime resizing.
    /// Default: 1000
    pub capacity: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl FeedConfig {
    /// Validate the feed section
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(ConfigError::invalid_value(
                "feed",
                "capacity",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}
