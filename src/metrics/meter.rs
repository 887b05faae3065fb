//! Event meter with exponentially weighted moving average rates.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// The 15-minute EWMA retains under e^-55 of its value after this many
/// windows, so catch-up ticking past it is pure busywork.
const MAX_CATCH_UP_TICKS: u128 = 10_000;

/// Exponentially weighted moving average over one rate window.
#[derive(Debug)]
struct Ewma {
    alpha: f64,
    rate: f64,
    uncounted: u64,
    initialized: bool,
}

impl Ewma {
    fn over_minutes(minutes: f64, tick: Duration) -> Self {
        Self {
            alpha: 1.0 - (-tick.as_secs_f64() / (60.0 * minutes)).exp(),
            rate: 0.0,
            uncounted: 0,
            initialized: false,
        }
    }

    fn update(&mut self, n: u64) {
        self.uncounted += n;
    }

    fn tick(&mut self, tick: Duration) {
        let instant_rate = self.uncounted as f64 / tick.as_secs_f64();
        self.uncounted = 0;
        if self.initialized {
            self.rate += self.alpha * (instant_rate - self.rate);
        } else {
            self.rate = instant_rate;
            self.initialized = true;
        }
    }

    fn rate(&self) -> f64 {
        self.rate
    }
}

#[derive(Debug)]
struct RateState {
    last_tick: Instant,
    m1: Ewma,
    m5: Ewma,
    m15: Ewma,
}

/// Measures the rate at which events occur.
///
/// Tracks a total count, the mean rate since creation, and 1/5/15 minute
/// moving average rates, decayed on a fixed tick interval. `mark` is cheap:
/// one atomic add plus a short critical section on the rate accumulators.
#[derive(Debug)]
pub struct Meter {
    count: AtomicU64,
    started: Instant,
    tick_interval: Duration,
    rates: Mutex<RateState>,
}

impl Meter {
    /// Create a meter with the default 5 second tick interval.
    pub fn new() -> Self {
        Self::with_tick_interval(Duration::from_secs(crate::core::config::DEFAULT_RATE_TICK_SECONDS))
    }

    /// Create a meter decaying its moving averages every `tick_interval`.
    ///
    /// A zero interval is bumped to one millisecond.
    pub fn with_tick_interval(tick_interval: Duration) -> Self {
        let tick_interval = tick_interval.max(Duration::from_millis(1));
        let now = Instant::now();
        Self {
            count: AtomicU64::new(0),
            started: now,
            tick_interval,
            rates: Mutex::new(RateState {
                last_tick: now,
                m1: Ewma::over_minutes(1.0, tick_interval),
                m5: Ewma::over_minutes(5.0, tick_interval),
                m15: Ewma::over_minutes(15.0, tick_interval),
            }),
        }
    }

    /// Record one event.
    pub fn mark(&self) {
        self.mark_n(1);
    }

    /// Record `n` events at once.
    pub fn mark_n(&self, n: u64) {
        self.count.fetch_add(n, Ordering::Relaxed);
        let mut state = self.rates.lock();
        self.tick_if_needed(&mut state);
        state.m1.update(n);
        state.m5.update(n);
        state.m15.update(n);
    }

    /// Total number of events recorded.
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    /// Mean events per second since the meter was created.
    pub fn mean_rate(&self) -> f64 {
        let count = self.count();
        if count == 0 {
            return 0.0;
        }
        let elapsed = self.started.elapsed().as_secs_f64();
        if elapsed == 0.0 {
            return 0.0;
        }
        count as f64 / elapsed
    }

    /// One-minute moving average rate, events per second.
    pub fn one_minute_rate(&self) -> f64 {
        let mut state = self.rates.lock();
        self.tick_if_needed(&mut state);
        state.m1.rate()
    }

    /// Five-minute moving average rate, events per second.
    pub fn five_minute_rate(&self) -> f64 {
        let mut state = self.rates.lock();
        self.tick_if_needed(&mut state);
        state.m5.rate()
    }

    /// Fifteen-minute moving average rate, events per second.
    pub fn fifteen_minute_rate(&self) -> f64 {
        let mut state = self.rates.lock();
        self.tick_if_needed(&mut state);
        state.m15.rate()
    }

    /// Catch the accumulators up on every whole tick interval elapsed since
    /// the last tick. Caller holds the rate lock.
    ///
    /// The tick count is kept at full width so an arbitrarily long idle
    /// period cannot truncate it; ticking itself is capped because the EWMAs
    /// are fully decayed long before `MAX_CATCH_UP_TICKS` windows, while
    /// `last_tick` still advances the whole way.
    fn tick_if_needed(&self, state: &mut RateState) {
        let now = Instant::now();
        let elapsed = now.duration_since(state.last_tick);
        let interval = self.tick_interval.as_nanos();
        let ticks = elapsed.as_nanos() / interval;
        if ticks == 0 {
            return;
        }
        for _ in 0..ticks.min(MAX_CATCH_UP_TICKS) {
            state.m1.tick(self.tick_interval);
            state.m5.tick(self.tick_interval);
            state.m15.tick(self.tick_interval);
        }
        // land on the most recent tick boundary: now minus the partial window
        let remainder = (elapsed.as_nanos() % interval) as u64;
        state.last_tick = now - Duration::from_nanos(remainder);
    }
}

impl Default for Meter {
    fn default() -> Self {
        Self::new()
    }
}
