//! End-to-end export tests: registry in, named maps out.

use metricmap::{
    ns_to_ms, timer_to_map, to_named_maps, AcceptAll, MetricRegistry, MetricSelector, NamePrefix,
};
use pretty_assertions::assert_eq;
use serde_json::Value;
use std::sync::Once;
use std::time::Duration;

static TRACING: Once = Once::new();

/// Install an env-filtered subscriber once so registry and export events
/// show up under `RUST_LOG` when a test needs a closer look.
fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

#[test]
fn timer_snapshot_fields_match_one_read() {
    init_tracing();
    use rand::Rng;

    let registry = MetricRegistry::new();
    let timer = registry.timer("requests").unwrap();
    let mut rng = rand::thread_rng();
    let iterations = rng.gen_range(0..100);
    for _ in 0..iterations {
        timer.update(Duration::from_nanos(rng.gen_range(1..1_000_000_000)));
    }

    let map = timer_to_map(&timer, false);
    assert_eq!(map.len(), 14);
    assert_eq!(timer_to_map(&timer, true).len(), 5);

    // no further updates, so the map must agree with a fresh snapshot
    let snapshot = timer.snapshot();
    assert_eq!(map["5minRate"], Value::from(timer.five_minute_rate()));
    assert_eq!(map["15minRate"], Value::from(timer.fifteen_minute_rate()));
    assert_eq!(map["mean_ms"], Value::from(ns_to_ms(snapshot.mean())));
    assert_eq!(map["median_ms"], Value::from(ns_to_ms(snapshot.median())));
    assert_eq!(map["p75_ms"], Value::from(ns_to_ms(snapshot.p75())));
    assert_eq!(map["p95_ms"], Value::from(ns_to_ms(snapshot.p95())));
    assert_eq!(map["p99_ms"], Value::from(ns_to_ms(snapshot.p99())));
    assert_eq!(map["p999_ms"], Value::from(ns_to_ms(snapshot.p999())));
}

#[test]
fn registry_sweep_converts_every_kind() {
    init_tracing();
    let registry = MetricRegistry::new();

    let counter = registry.counter("counter").unwrap();
    counter.inc();

    let timer = registry.timer("timer").unwrap();
    {
        let guard = timer.time();
        std::thread::sleep(Duration::from_millis(110));
        guard.stop();
    }

    let meter = registry.meter("meter").unwrap();
    meter.mark();

    let gauge = registry.gauge("gauge").unwrap();
    gauge.set(42.0);

    let histogram = registry.histogram("histogram").unwrap();
    histogram.update(10.0);

    let aggregate = registry.aggregate("aggregate").unwrap();
    aggregate.set("foo", 10.0);
    aggregate.set("bar", 1.0);
    aggregate.set("bar", 2.0);

    let mut seen = Vec::new();
    to_named_maps(&registry, &MetricSelector::all(), false, |name, map| {
        seen.push(name.to_owned());
        match name {
            "counter" => {
                assert_eq!(map["count"], Value::from(1_u64));
            },
            "timer" => {
                assert_eq!(map["count"], Value::from(1_u64));
                assert!(map["min_ms"].as_f64().unwrap() > 100.0);
            },
            "meter" => {
                assert_eq!(map["count"], Value::from(1_u64));
            },
            "gauge" => {
                assert_eq!(map["value"], Value::from(42.0));
            },
            "histogram" => {
                assert_eq!(map["count"], Value::from(1_u64));
            },
            "aggregate" => {
                assert_eq!(map["count"], Value::from(2_u64));
                let values = map["values"].as_object().expect("values map");
                assert_eq!(values.len(), 2);
                assert_eq!(values["foo"]["value"], Value::from(10.0));
                assert_eq!(values["foo"]["updateCount"], Value::from(1_u64));
                assert_eq!(values["bar"]["value"], Value::from(2.0));
                assert_eq!(values["bar"]["updateCount"], Value::from(2_u64));
            },
            other => panic!("unexpected metric {other}"),
        }
    });

    // one callback per metric, in lexicographic registry order
    assert_eq!(seen, vec!["aggregate", "counter", "gauge", "histogram", "meter", "timer"]);
}

#[test]
fn selector_limits_the_sweep() {
    init_tracing();
    let registry = MetricRegistry::new();
    registry.counter("http.requests").unwrap();
    registry.counter("http.errors").unwrap();
    registry.counter("db.queries").unwrap();

    let selector = MetricSelector::new(
        vec![Box::new(NamePrefix::new("http."))],
        Box::new(AcceptAll),
    );
    let mut seen = Vec::new();
    to_named_maps(&registry, &selector, true, |name, _| seen.push(name.to_owned()));
    assert_eq!(seen, vec!["http.errors", "http.requests"]);

    // the must-match half vetoes independently of the name filters
    let selector = MetricSelector::new(
        vec![Box::new(NamePrefix::new("http."))],
        Box::new(NamePrefix::new("http.errors")),
    );
    let mut seen = Vec::new();
    to_named_maps(&registry, &selector, true, |name, _| seen.push(name.to_owned()));
    assert_eq!(seen, vec!["http.errors"]);
}

#[test]
fn compact_mode_trims_detail_fields() {
    init_tracing();
    let registry = MetricRegistry::new();
    registry.timer("t").unwrap().update(Duration::from_millis(1));
    registry.histogram("h").unwrap().update(1.0);
    registry.aggregate("a").unwrap().set("k", 1.0);

    to_named_maps(&registry, &MetricSelector::all(), true, |name, map| match name {
        "t" => assert_eq!(map.len(), 5),
        "h" => assert_eq!(map.len(), 1),
        "a" => {
            assert_eq!(map.len(), 1);
            assert!(!map.contains_key("values"));
        },
        other => panic!("unexpected metric {other}"),
    });
}

#[test]
fn empty_metrics_export_without_failing() {
    init_tracing();
    let registry = MetricRegistry::new();
    registry.timer("idle.timer").unwrap();
    registry.histogram("idle.histogram").unwrap();
    registry.aggregate("idle.aggregate").unwrap();

    let mut count = 0;
    to_named_maps(&registry, &MetricSelector::all(), false, |name, map| {
        count += 1;
        match name {
            "idle.timer" => {
                assert_eq!(map.len(), 14);
                assert_eq!(map["min_ms"], Value::from(0.0));
            },
            "idle.histogram" => {
                assert_eq!(map["count"], Value::from(0_u64));
                assert_eq!(map["p999"], Value::from(0.0));
            },
            "idle.aggregate" => {
                assert_eq!(map["count"], Value::from(0_u64));
                assert_eq!(map["values"].as_object().unwrap().len(), 0);
            },
            other => panic!("unexpected metric {other}"),
        }
    });
    assert_eq!(count, 3);
}
