//! Crate error types.

use thiserror::Error;

/// Errors produced by metricmap operations.
///
/// Conversions themselves are total functions and never fail; errors only
/// arise from registry misuse or invalid configuration.
#[derive(Error, Debug)]
pub enum MetricMapError {
    /// A name was requested as one metric kind but is registered as another.
    #[error("metric `{name}` is registered as {existing}, requested as {requested}")]
    KindMismatch {
        /// Registered metric name.
        name: String,
        /// Kind currently held by the registry.
        existing: &'static str,
        /// Kind the caller asked for.
        requested: &'static str,
    },

    /// An explicit `register` call hit a name that is already taken.
    #[error("metric `{0}` is already registered")]
    AlreadyRegistered(String),

    /// Invalid configuration value.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for metricmap operations.
pub type Result<T> = std::result::Result<T, MetricMapError>;

impl MetricMapError {
    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Returns the error category for logging.
    pub fn category(&self) -> &'static str {
        match self {
            Self::KindMismatch { .. } | Self::AlreadyRegistered(_) => "registry",
            Self::Config(_) => "config",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mismatch_display() {
        let err = MetricMapError::KindMismatch {
            name: "requests".to_owned(),
            existing: "counter",
            requested: "timer",
        };
        assert_eq!(
            err.to_string(),
            "metric `requests` is registered as counter, requested as timer"
        );
        assert_eq!(err.category(), "registry");
    }

    #[test]
    fn test_config_error() {
        let err = MetricMapError::config("reservoir capacity must be non-zero");
        assert_eq!(err.category(), "config");
        assert!(err.to_string().contains("reservoir capacity"));
    }
}
