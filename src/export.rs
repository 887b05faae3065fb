//! Conversion of live metrics into ordered key-value maps.
//!
//! Every metric kind flattens into a `serde_json::Map` with a stable field
//! schema. Compact mode keeps only count/rate summary fields; full mode adds
//! the detailed percentile statistics. Timer durations are recorded in
//! nanoseconds and exported in milliseconds; histogram magnitudes stay in
//! their native units.
//!
//! Field names are the wire schema consumed downstream (admin UIs, JSON
//! encoders) and must not change: `count`, `meanRate`, `1minRate`,
//! `5minRate`, `15minRate`, `min`/`max`/`mean`/`stddev`/`median`/`p75`/
//! `p95`/`p99`/`p999` (with an `_ms` suffix for timers), `value`,
//! `updateCount`, `values`.

use crate::filter::MetricSelector;
use crate::metrics::{AggregateMetric, Counter, Gauge, Histogram, Meter, Metric, Timer};
use crate::registry::MetricRegistry;
use serde_json::{Map, Value};
use tracing::trace;

/// An ordered mapping from field name to scalar or nested value.
pub type MetricMap = Map<String, Value>;

/// Convert nanoseconds to milliseconds.
///
/// Plain floating-point division; every duration field a timer exports goes
/// through here.
pub fn ns_to_ms(nanos: f64) -> f64 {
    nanos / 1_000_000.0
}

/// `{count}` for a counter.
pub fn counter_to_map(counter: &Counter) -> MetricMap {
    let mut map = MetricMap::new();
    map.insert("count".to_owned(), Value::from(counter.count()));
    map
}

/// `{value}` for a gauge.
pub fn gauge_to_map(gauge: &Gauge) -> MetricMap {
    let mut map = MetricMap::new();
    map.insert("value".to_owned(), Value::from(gauge.value()));
    map
}

/// `{count, meanRate, 1minRate, 5minRate, 15minRate}` for a meter.
pub fn meter_to_map(meter: &Meter) -> MetricMap {
    let mut map = MetricMap::new();
    insert_rates(
        &mut map,
        meter.count(),
        meter.mean_rate(),
        meter.one_minute_rate(),
        meter.five_minute_rate(),
        meter.fifteen_minute_rate(),
    );
    map
}

/// Count plus, unless `compact`, the nine snapshot statistics in the
/// histogram's native units.
pub fn histogram_to_map(histogram: &Histogram, compact: bool) -> MetricMap {
    let mut map = MetricMap::new();
    map.insert("count".to_owned(), Value::from(histogram.count()));
    if !compact {
        let snapshot = histogram.snapshot();
        map.insert("min".to_owned(), Value::from(snapshot.min()));
        map.insert("max".to_owned(), Value::from(snapshot.max()));
        map.insert("mean".to_owned(), Value::from(snapshot.mean()));
        map.insert("stddev".to_owned(), Value::from(snapshot.stddev()));
        map.insert("median".to_owned(), Value::from(snapshot.median()));
        map.insert("p75".to_owned(), Value::from(snapshot.p75()));
        map.insert("p95".to_owned(), Value::from(snapshot.p95()));
        map.insert("p99".to_owned(), Value::from(snapshot.p99()));
        map.insert("p999".to_owned(), Value::from(snapshot.p999()));
    }
    map
}

/// Rate fields plus, unless `compact`, the nine snapshot statistics
/// converted from nanoseconds to milliseconds.
///
/// Full mode is exactly 14 fields, compact mode exactly 5. The snapshot is
/// read once, so all statistic fields describe the same instant.
pub fn timer_to_map(timer: &Timer, compact: bool) -> MetricMap {
    let mut map = MetricMap::new();
    insert_rates(
        &mut map,
        timer.count(),
        timer.mean_rate(),
        timer.one_minute_rate(),
        timer.five_minute_rate(),
        timer.fifteen_minute_rate(),
    );
    if !compact {
        let snapshot = timer.snapshot();
        map.insert("min_ms".to_owned(), Value::from(ns_to_ms(snapshot.min())));
        map.insert("max_ms".to_owned(), Value::from(ns_to_ms(snapshot.max())));
        map.insert("mean_ms".to_owned(), Value::from(ns_to_ms(snapshot.mean())));
        map.insert("stddev_ms".to_owned(), Value::from(ns_to_ms(snapshot.stddev())));
        map.insert("median_ms".to_owned(), Value::from(ns_to_ms(snapshot.median())));
        map.insert("p75_ms".to_owned(), Value::from(ns_to_ms(snapshot.p75())));
        map.insert("p95_ms".to_owned(), Value::from(ns_to_ms(snapshot.p95())));
        map.insert("p99_ms".to_owned(), Value::from(ns_to_ms(snapshot.p99())));
        map.insert("p999_ms".to_owned(), Value::from(ns_to_ms(snapshot.p999())));
    }
    map
}

/// Distinct sub-key count plus, unless `compact`, the per-sub-key records
/// as a nested `values` map in first-seen order.
pub fn aggregate_to_map(aggregate: &AggregateMetric, compact: bool) -> MetricMap {
    let mut map = MetricMap::new();
    map.insert("count".to_owned(), Value::from(aggregate.count()));
    if !compact {
        let mut values = MetricMap::new();
        for (key, update) in aggregate.values() {
            let mut record = MetricMap::new();
            record.insert("value".to_owned(), Value::from(update.value));
            record.insert("updateCount".to_owned(), Value::from(update.update_count));
            values.insert(key, Value::Object(record));
        }
        map.insert("values".to_owned(), Value::Object(values));
    }
    map
}

/// Convert any metric by dispatching on its kind.
pub fn metric_to_map(metric: &Metric, compact: bool) -> MetricMap {
    match metric {
        Metric::Counter(counter) => counter_to_map(counter),
        Metric::Gauge(gauge) => gauge_to_map(gauge),
        Metric::Meter(meter) => meter_to_map(meter),
        Metric::Histogram(histogram) => histogram_to_map(histogram, compact),
        Metric::Timer(timer) => timer_to_map(timer, compact),
        Metric::Aggregate(aggregate) => aggregate_to_map(aggregate, compact),
    }
}

/// Convert every selected metric in the registry, feeding each map to the
/// consumer keyed by metric name.
///
/// Metrics are visited in the registry's lexicographic name order and the
/// consumer is invoked exactly once per selected metric. Handles are cloned
/// out of the registry first, so the consumer never runs under the registry
/// lock.
pub fn to_named_maps<F>(
    registry: &MetricRegistry,
    selector: &MetricSelector,
    compact: bool,
    mut consumer: F,
) where
    F: FnMut(&str, MetricMap),
{
    for (name, metric) in registry.sorted_entries() {
        if !selector.matches(&name, &metric) {
            trace!(name = name.as_str(), "metric filtered out of export");
            continue;
        }
        consumer(&name, metric_to_map(&metric, compact));
    }
}

fn insert_rates(
    map: &mut MetricMap,
    count: u64,
    mean_rate: f64,
    one_minute_rate: f64,
    five_minute_rate: f64,
    fifteen_minute_rate: f64,
) {
    map.insert("count".to_owned(), Value::from(count));
    map.insert("meanRate".to_owned(), Value::from(mean_rate));
    map.insert("1minRate".to_owned(), Value::from(one_minute_rate));
    map.insert("5minRate".to_owned(), Value::from(five_minute_rate));
    map.insert("15minRate".to_owned(), Value::from(fifteen_minute_rate));
}
