//! Metricmap - snapshot live metrics into ordered key-value maps.
//!
//! Metricmap flattens heterogeneous live metrics (counters, gauges, meters,
//! timers, histograms, and a concurrent multi-key aggregate) into stable,
//! nested `serde_json::Map` trees suitable for admin APIs, monitoring
//! exporters, or display. Measurement stays cheap and concurrent; the
//! conversion layer is deterministic, filterable, and unit-correct (timer
//! nanoseconds come out as milliseconds).
//!
//! # Architecture
//!
//! - `metrics`: the metric kinds and the sealed [`Metric`] dispatch enum
//! - `registry`: named metric instances with lexicographic iteration
//! - `filter`: selection predicates and their combination rule
//! - `export`: the `*_to_map` conversions and [`to_named_maps`]
//! - `core`: errors and configuration
//!
//! # Example
//!
//! ```
//! use metricmap::{to_named_maps, MetricRegistry, MetricSelector};
//!
//! fn main() -> metricmap::Result<()> {
//!     let registry = MetricRegistry::new();
//!     registry.counter("http.requests")?.inc();
//!     registry.aggregate("replica.lag")?.set("shard-1", 0.5);
//!
//!     to_named_maps(&registry, &MetricSelector::all(), false, |name, map| {
//!         println!("{name}: {}", serde_json::Value::Object(map));
//!     });
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod core;
pub mod export;
pub mod filter;
pub mod metrics;
pub mod registry;

// Re-export the working set for convenience
pub use crate::core::{MetricMapError, RegistryConfig, Result};
pub use crate::export::{
    aggregate_to_map, counter_to_map, gauge_to_map, histogram_to_map, meter_to_map, metric_to_map,
    ns_to_ms, timer_to_map, to_named_maps, MetricMap,
};
pub use crate::filter::{AcceptAll, MetricFilter, MetricSelector, NamePrefix};
pub use crate::metrics::{
    AggregateMetric, Counter, Gauge, Histogram, Meter, Metric, Snapshot, Timer, TimerGuard, Update,
};
pub use crate::registry::MetricRegistry;
