//! Registry configuration.
//!
//! Tunables for the measurement types a registry hands out. The conversion
//! layer itself has no knobs; everything here feeds histogram reservoirs and
//! meter rate bookkeeping.

use crate::core::{MetricMapError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default number of samples kept by a histogram or timer reservoir.
pub const DEFAULT_RESERVOIR_CAPACITY: usize = 1028;

/// Default interval between EWMA rate ticks, in seconds.
pub const DEFAULT_RATE_TICK_SECONDS: u64 = 5;

/// Configuration for metrics handed out by a [`MetricRegistry`].
///
/// [`MetricRegistry`]: crate::registry::MetricRegistry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RegistryConfig {
    /// Maximum samples retained per histogram/timer reservoir. Oldest
    /// samples are dropped first once the reservoir is full.
    pub reservoir_capacity: usize,
    /// Seconds between rate decay ticks for meter and timer rates.
    pub rate_tick_seconds: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            reservoir_capacity: DEFAULT_RESERVOIR_CAPACITY,
            rate_tick_seconds: DEFAULT_RATE_TICK_SECONDS,
        }
    }
}

impl RegistryConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.reservoir_capacity == 0 {
            return Err(MetricMapError::config("reservoir_capacity must be greater than zero"));
        }
        if self.rate_tick_seconds == 0 {
            return Err(MetricMapError::config("rate_tick_seconds must be greater than zero"));
        }
        Ok(())
    }

    /// The rate tick interval as a [`Duration`].
    pub fn rate_tick_interval(&self) -> Duration {
        Duration::from_secs(self.rate_tick_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = RegistryConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.reservoir_capacity, 1028);
        assert_eq!(config.rate_tick_interval(), Duration::from_secs(5));
    }

    #[test]
    fn test_zero_reservoir_rejected() {
        let config = RegistryConfig {
            reservoir_capacity: 0,
            ..RegistryConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_tick_rejected() {
        let config = RegistryConfig {
            rate_tick_seconds: 0,
            ..RegistryConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_round_trip_with_defaults() {
        let config: RegistryConfig = serde_json::from_str(r#"{"reservoir_capacity": 256}"#)
            .expect("valid config json");
        assert_eq!(config.reservoir_capacity, 256);
        assert_eq!(config.rate_tick_seconds, DEFAULT_RATE_TICK_SECONDS);
    }
}
