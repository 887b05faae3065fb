//! Metric selection predicates.
//!
//! A [`MetricFilter`] decides whether one named metric is of interest. A
//! [`MetricSelector`] combines them the way callers actually select metrics
//! for export: any of a list of name filters, AND a secondary must-match
//! filter. The combination rule lives here, in one place, so it can be
//! tested in isolation.

use crate::metrics::Metric;

/// Predicate over a named metric instance.
pub trait MetricFilter: Send + Sync {
    /// Whether the metric should be selected.
    fn matches(&self, name: &str, metric: &Metric) -> bool;
}

/// Matches every metric.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl MetricFilter for AcceptAll {
    fn matches(&self, _name: &str, _metric: &Metric) -> bool {
        true
    }
}

/// Matches metrics whose name starts with a fixed prefix.
#[derive(Debug, Clone)]
pub struct NamePrefix {
    prefix: String,
}

impl NamePrefix {
    /// Create a prefix filter.
    pub fn new<S: Into<String>>(prefix: S) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl MetricFilter for NamePrefix {
    fn matches(&self, name: &str, _metric: &Metric) -> bool {
        name.starts_with(&self.prefix)
    }
}

impl<F> MetricFilter for F
where
    F: Fn(&str, &Metric) -> bool + Send + Sync,
{
    fn matches(&self, name: &str, metric: &Metric) -> bool {
        self(name, metric)
    }
}

/// The full selection rule applied during export:
/// `any_of(name_filters) AND must_match`.
///
/// An empty name-filter list matches nothing; pass [`AcceptAll`] to select
/// everything.
pub struct MetricSelector {
    name_filters: Vec<Box<dyn MetricFilter>>,
    must_match: Box<dyn MetricFilter>,
}

impl MetricSelector {
    /// Build a selector from its two halves.
    pub fn new(name_filters: Vec<Box<dyn MetricFilter>>, must_match: Box<dyn MetricFilter>) -> Self {
        Self {
            name_filters,
            must_match,
        }
    }

    /// Selector matching every metric.
    pub fn all() -> Self {
        Self::new(vec![Box::new(AcceptAll)], Box::new(AcceptAll))
    }

    /// Whether the metric passes at least one name filter and the
    /// must-match filter.
    pub fn matches(&self, name: &str, metric: &Metric) -> bool {
        self.name_filters
            .iter()
            .any(|filter| filter.matches(name, metric))
            && self.must_match.matches(name, metric)
    }
}

impl std::fmt::Debug for MetricSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricSelector")
            .field("name_filters", &self.name_filters.len())
            .finish_non_exhaustive()
    }
}
