//! Duration timer combining a meter with a nanosecond histogram.

use crate::metrics::histogram::Histogram;
use crate::metrics::meter::Meter;
use crate::metrics::snapshot::Snapshot;
use std::time::{Duration, Instant};

/// Times events and tracks both their rate and their duration distribution.
///
/// Durations are recorded in nanoseconds; the export layer converts them to
/// milliseconds at the output boundary.
#[derive(Debug)]
pub struct Timer {
    meter: Meter,
    histogram: Histogram,
}

impl Timer {
    /// Create a timer with default meter and reservoir settings.
    pub fn new() -> Self {
        Self {
            meter: Meter::new(),
            histogram: Histogram::new(),
        }
    }

    /// Create a timer from preconfigured parts.
    pub fn from_parts(meter: Meter, histogram: Histogram) -> Self {
        Self { meter, histogram }
    }

    /// Record a completed event of the given duration.
    pub fn update(&self, duration: Duration) {
        self.histogram.update(duration.as_nanos() as f64);
        self.meter.mark();
    }

    /// Start timing; the returned guard records the elapsed time when
    /// stopped or dropped.
    pub fn time(&self) -> TimerGuard<'_> {
        TimerGuard {
            timer: self,
            started: Instant::now(),
            stopped: false,
        }
    }

    /// Number of timed events.
    pub fn count(&self) -> u64 {
        self.meter.count()
    }

    /// Mean events per second since creation.
    pub fn mean_rate(&self) -> f64 {
        self.meter.mean_rate()
    }

    /// One-minute moving average rate.
    pub fn one_minute_rate(&self) -> f64 {
        self.meter.one_minute_rate()
    }

    /// Five-minute moving average rate.
    pub fn five_minute_rate(&self) -> f64 {
        self.meter.five_minute_rate()
    }

    /// Fifteen-minute moving average rate.
    pub fn fifteen_minute_rate(&self) -> f64 {
        self.meter.fifteen_minute_rate()
    }

    /// Snapshot of recorded durations, in nanoseconds.
    pub fn snapshot(&self) -> Snapshot {
        self.histogram.snapshot()
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

/// Scope guard returned by [`Timer::time`].
///
/// Records elapsed wall time into the timer exactly once, either at an
/// explicit [`stop`](TimerGuard::stop) or on drop.
#[derive(Debug)]
pub struct TimerGuard<'a> {
    timer: &'a Timer,
    started: Instant,
    stopped: bool,
}

impl TimerGuard<'_> {
    /// Stop timing and return the recorded duration.
    pub fn stop(mut self) -> Duration {
        let elapsed = self.started.elapsed();
        self.stopped = true;
        self.timer.update(elapsed);
        elapsed
    }
}

impl Drop for TimerGuard<'_> {
    fn drop(&mut self) {
        if !self.stopped {
            self.timer.update(self.started.elapsed());
        }
    }
}
