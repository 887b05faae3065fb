//! Core types shared across the crate: errors and configuration.

pub mod config;
pub mod error;

pub use config::RegistryConfig;
pub use error::{MetricMapError, Result};
