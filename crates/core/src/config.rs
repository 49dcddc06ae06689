//! Run-level configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration error (invalid externally-supplied settings).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A setting failed validation (e.g. zero batch size).
    #[error("invalid configuration: {0}")]
    Invalid(String),

    /// A required setting was not supplied.
    #[error("missing configuration: {0}")]
    Missing(String),
}

impl ConfigError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }

    pub fn missing(msg: impl Into<String>) -> Self {
        Self::Missing(msg.into())
    }
}

/// Pacing and batching knobs for a reconciliation run.
///
/// Batch size defaults to 35; combined with the disjunctive SKU query
/// fan-out this stays under the remote query result limit of 250.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Maximum number of SKUs resolved and updated per round trip.
    pub batch_size: usize,
    /// Fixed delay between batches (rate-limit pacing).
    pub batch_pause: Duration,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            batch_size: 35,
            batch_pause: Duration::from_secs(5),
        }
    }
}

impl RunConfig {
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_batch_pause(mut self, pause: Duration) -> Self {
        self.batch_pause = pause;
        self
    }

    /// Validate externally-supplied settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::invalid("batch_size must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = RunConfig::default();
        assert_eq!(config.batch_size, 35);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        let config = RunConfig::default().with_batch_size(0);
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }
}
