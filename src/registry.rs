//! Named collection of live metric instances.
//!
//! The registry owns one [`Metric`] handle per name and hands out shared
//! handles to callers. Iteration order is always name-lexicographic, which
//! the export layer relies on for deterministic output.

use crate::core::{MetricMapError, RegistryConfig, Result};
use crate::metrics::{AggregateMetric, Counter, Gauge, Histogram, Meter, Metric, Timer};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// A named collection of live metrics.
///
/// Accessors like [`counter`](Self::counter) are get-or-register: the first
/// call under a name creates the metric, later calls hand back the same
/// instance. Asking for a name under a different kind is an error rather
/// than a silent shadow.
#[derive(Debug, Default)]
pub struct MetricRegistry {
    config: RegistryConfig,
    metrics: RwLock<BTreeMap<String, Metric>>,
}

impl MetricRegistry {
    /// Create a registry with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry whose metrics use the given configuration.
    pub fn with_config(config: RegistryConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            metrics: RwLock::new(BTreeMap::new()),
        })
    }

    /// Get or register the counter named `name`.
    pub fn counter(&self, name: &str) -> Result<Arc<Counter>> {
        match self.get_or_register(name, "counter", |_| Metric::Counter(Arc::new(Counter::new())))? {
            Metric::Counter(counter) => Ok(counter),
            other => Err(self.kind_mismatch(name, other.kind(), "counter")),
        }
    }

    /// Get or register the gauge named `name`.
    pub fn gauge(&self, name: &str) -> Result<Arc<Gauge>> {
        match self.get_or_register(name, "gauge", |_| Metric::Gauge(Arc::new(Gauge::new())))? {
            Metric::Gauge(gauge) => Ok(gauge),
            other => Err(self.kind_mismatch(name, other.kind(), "gauge")),
        }
    }

    /// Get or register the meter named `name`.
    pub fn meter(&self, name: &str) -> Result<Arc<Meter>> {
        match self.get_or_register(name, "meter", |config| {
            Metric::Meter(Arc::new(Meter::with_tick_interval(config.rate_tick_interval())))
        })? {
            Metric::Meter(meter) => Ok(meter),
            other => Err(self.kind_mismatch(name, other.kind(), "meter")),
        }
    }

    /// Get or register the histogram named `name`.
    pub fn histogram(&self, name: &str) -> Result<Arc<Histogram>> {
        match self.get_or_register(name, "histogram", |config| {
            Metric::Histogram(Arc::new(Histogram::with_capacity(config.reservoir_capacity)))
        })? {
            Metric::Histogram(histogram) => Ok(histogram),
            other => Err(self.kind_mismatch(name, other.kind(), "histogram")),
        }
    }

    /// Get or register the timer named `name`.
    pub fn timer(&self, name: &str) -> Result<Arc<Timer>> {
        match self.get_or_register(name, "timer", |config| {
            Metric::Timer(Arc::new(Timer::from_parts(
                Meter::with_tick_interval(config.rate_tick_interval()),
                Histogram::with_capacity(config.reservoir_capacity),
            )))
        })? {
            Metric::Timer(timer) => Ok(timer),
            other => Err(self.kind_mismatch(name, other.kind(), "timer")),
        }
    }

    /// Get or register the aggregate metric named `name`.
    pub fn aggregate(&self, name: &str) -> Result<Arc<AggregateMetric>> {
        match self.get_or_register(name, "aggregate", |_| {
            Metric::Aggregate(Arc::new(AggregateMetric::new()))
        })? {
            Metric::Aggregate(aggregate) => Ok(aggregate),
            other => Err(self.kind_mismatch(name, other.kind(), "aggregate")),
        }
    }

    /// Register an externally built metric under `name`.
    ///
    /// Unlike the get-or-register accessors this refuses to reuse an
    /// existing name of any kind.
    pub fn register<M: Into<Metric>>(&self, name: &str, metric: M) -> Result<()> {
        let mut metrics = self.metrics.write();
        if metrics.contains_key(name) {
            return Err(MetricMapError::AlreadyRegistered(name.to_owned()));
        }
        let metric = metric.into();
        debug!(name, kind = metric.kind(), "registered metric");
        metrics.insert(name.to_owned(), metric);
        Ok(())
    }

    /// Remove the metric named `name`. Returns whether anything was removed.
    pub fn remove(&self, name: &str) -> bool {
        let removed = self.metrics.write().remove(name).is_some();
        if removed {
            debug!(name, "removed metric");
        }
        removed
    }

    /// Handle to the metric named `name`, if registered.
    pub fn get(&self, name: &str) -> Option<Metric> {
        self.metrics.read().get(name).cloned()
    }

    /// Registered names in lexicographic order.
    pub fn names(&self) -> Vec<String> {
        self.metrics.read().keys().cloned().collect()
    }

    /// Number of registered metrics.
    pub fn len(&self) -> usize {
        self.metrics.read().len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.metrics.read().is_empty()
    }

    /// Clone of all entries in lexicographic name order.
    ///
    /// Handles are cheap `Arc` clones; callers convert without holding the
    /// registry lock.
    pub fn sorted_entries(&self) -> Vec<(String, Metric)> {
        self.metrics
            .read()
            .iter()
            .map(|(name, metric)| (name.clone(), metric.clone()))
            .collect()
    }

    fn get_or_register(
        &self,
        name: &str,
        requested: &'static str,
        make: impl FnOnce(&RegistryConfig) -> Metric,
    ) -> Result<Metric> {
        {
            let metrics = self.metrics.read();
            if let Some(existing) = metrics.get(name) {
                return self.check_kind(name, existing, requested);
            }
        }
        let mut metrics = self.metrics.write();
        // racing registrant may have won between the two locks
        if let Some(existing) = metrics.get(name) {
            return self.check_kind(name, existing, requested);
        }
        let metric = make(&self.config);
        debug!(name, kind = metric.kind(), "registered metric");
        metrics.insert(name.to_owned(), metric.clone());
        Ok(metric)
    }

    fn check_kind(&self, name: &str, existing: &Metric, requested: &'static str) -> Result<Metric> {
        if existing.kind() == requested {
            Ok(existing.clone())
        } else {
            Err(self.kind_mismatch(name, existing.kind(), requested))
        }
    }

    fn kind_mismatch(
        &self,
        name: &str,
        existing: &'static str,
        requested: &'static str,
    ) -> MetricMapError {
        MetricMapError::KindMismatch {
            name: name.to_owned(),
            existing,
            requested,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_or_register_returns_same_instance() {
        let registry = MetricRegistry::new();
        let first = registry.counter("requests").unwrap();
        first.inc();
        let second = registry.counter("requests").unwrap();
        assert_eq!(second.count(), 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_kind_mismatch_is_an_error() {
        let registry = MetricRegistry::new();
        registry.counter("requests").unwrap();
        let err = registry.timer("requests").unwrap_err();
        assert!(matches!(err, MetricMapError::KindMismatch { .. }));
    }

    #[test]
    fn test_register_refuses_duplicates() {
        let registry = MetricRegistry::new();
        registry
            .register("agg", Arc::new(AggregateMetric::new()))
            .unwrap();
        let err = registry
            .register("agg", Arc::new(AggregateMetric::new()))
            .unwrap_err();
        assert!(matches!(err, MetricMapError::AlreadyRegistered(_)));
    }

    #[test]
    fn test_remove() {
        let registry = MetricRegistry::new();
        registry.meter("events").unwrap();
        assert!(registry.remove("events"));
        assert!(!registry.remove("events"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_sorted_entries_are_lexicographic() {
        let registry = MetricRegistry::new();
        registry.counter("zeta").unwrap();
        registry.counter("alpha").unwrap();
        registry.counter("mu").unwrap();
        let names: Vec<String> = registry
            .sorted_entries()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec!["alpha", "mu", "zeta"]);
    }

    #[test]
    fn test_config_flows_into_new_metrics() {
        let config = RegistryConfig {
            reservoir_capacity: 2,
            ..RegistryConfig::default()
        };
        let registry = MetricRegistry::with_config(config).unwrap();
        let histogram = registry.histogram("sizes").unwrap();
        for v in [1.0, 2.0, 3.0] {
            histogram.update(v);
        }
        assert_eq!(histogram.snapshot().len(), 2);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = RegistryConfig {
            reservoir_capacity: 0,
            ..RegistryConfig::default()
        };
        assert!(MetricRegistry::with_config(config).is_err());
    }
}
