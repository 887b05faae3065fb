//! Histogram of recorded magnitudes backed by a sliding reservoir.

use crate::core::config::DEFAULT_RESERVOIR_CAPACITY;
use crate::metrics::snapshot::Snapshot;
use parking_lot::RwLock;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

/// Records the distribution of a stream of values.
///
/// `count` covers every update ever made; the reservoir keeps only the most
/// recent `capacity` samples, so snapshots describe recent behavior while
/// staying bounded in memory. Units are caller-domain (bytes, nanoseconds,
/// whatever was recorded).
#[derive(Debug)]
pub struct Histogram {
    count: AtomicU64,
    capacity: usize,
    reservoir: RwLock<VecDeque<f64>>,
}

impl Histogram {
    /// Create a histogram with the default reservoir capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_RESERVOIR_CAPACITY)
    }

    /// Create a histogram keeping at most `capacity` samples.
    ///
    /// A zero capacity is bumped to one so updates always land somewhere.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            count: AtomicU64::new(0),
            capacity,
            reservoir: RwLock::new(VecDeque::with_capacity(capacity.min(1024))),
        }
    }

    /// Record a value.
    pub fn update(&self, value: f64) {
        self.count.fetch_add(1, Ordering::Relaxed);
        let mut reservoir = self.reservoir.write();
        if reservoir.len() == self.capacity {
            reservoir.pop_front();
        }
        reservoir.push_back(value);
    }

    /// Total number of values ever recorded.
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    /// Snapshot of the current reservoir contents.
    pub fn snapshot(&self) -> Snapshot {
        let reservoir = self.reservoir.read();
        Snapshot::new(reservoir.iter().copied().collect())
    }
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}
