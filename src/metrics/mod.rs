//! Metric kinds and the sealed dispatch type.
//!
//! Six metric kinds cover the supported measurements:
//! - [`Counter`]: monotonic event count
//! - [`Gauge`]: last-written scalar
//! - [`Meter`]: count plus moving average event rates
//! - [`Histogram`]: count plus a reservoir of recorded magnitudes
//! - [`Timer`]: meter rates over a nanosecond duration histogram
//! - [`AggregateMetric`]: per-sub-key value/update-count records
//!
//! [`Metric`] wraps shared handles to each kind in one closed enum, so the
//! export layer dispatches exhaustively instead of downcasting.

pub mod aggregate;
pub mod counter;
pub mod gauge;
pub mod histogram;
pub mod meter;
pub mod snapshot;
pub mod timer;

pub use aggregate::{AggregateMetric, Update};
pub use counter::Counter;
pub use gauge::Gauge;
pub use histogram::Histogram;
pub use meter::Meter;
pub use snapshot::Snapshot;
pub use timer::{Timer, TimerGuard};

use std::sync::Arc;

/// A shared handle to a metric of any supported kind.
///
/// Cloning clones the handle, not the measurement; all clones observe the
/// same underlying state.
#[derive(Debug, Clone)]
pub enum Metric {
    /// Monotonic counter.
    Counter(Arc<Counter>),
    /// Last-written gauge.
    Gauge(Arc<Gauge>),
    /// Rate meter.
    Meter(Arc<Meter>),
    /// Magnitude histogram.
    Histogram(Arc<Histogram>),
    /// Duration timer.
    Timer(Arc<Timer>),
    /// Multi-key aggregate.
    Aggregate(Arc<AggregateMetric>),
}

impl Metric {
    /// Stable lowercase kind name, used in logs and error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Metric::Counter(_) => "counter",
            Metric::Gauge(_) => "gauge",
            Metric::Meter(_) => "meter",
            Metric::Histogram(_) => "histogram",
            Metric::Timer(_) => "timer",
            Metric::Aggregate(_) => "aggregate",
        }
    }
}

impl From<Arc<Counter>> for Metric {
    fn from(counter: Arc<Counter>) -> Self {
        Metric::Counter(counter)
    }
}

impl From<Arc<Gauge>> for Metric {
    fn from(gauge: Arc<Gauge>) -> Self {
        Metric::Gauge(gauge)
    }
}

impl From<Arc<Meter>> for Metric {
    fn from(meter: Arc<Meter>) -> Self {
        Metric::Meter(meter)
    }
}

impl From<Arc<Histogram>> for Metric {
    fn from(histogram: Arc<Histogram>) -> Self {
        Metric::Histogram(histogram)
    }
}

impl From<Arc<Timer>> for Metric {
    fn from(timer: Arc<Timer>) -> Self {
        Metric::Timer(timer)
    }
}

impl From<Arc<AggregateMetric>> for Metric {
    fn from(aggregate: Arc<AggregateMetric>) -> Self {
        Metric::Aggregate(aggregate)
    }
}
