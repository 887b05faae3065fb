//! Mergeable multi-key aggregate metric.
//!
//! An [`AggregateMetric`] tracks the latest value and update count for each
//! of any number of logical sub-keys, e.g. one entry per replica reporting
//! into a shared statistic. Producers call [`set`](AggregateMetric::set)
//! from any thread; a reporter reads the whole state during snapshot
//! conversion.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// The latest value and update count for one sub-key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Update {
    /// Most recently set value for the sub-key.
    pub value: f64,
    /// Number of times the sub-key has been set.
    pub update_count: u64,
}

#[derive(Debug)]
struct Slot {
    update: Update,
    /// Sequence assigned at first insert; orders `values()` output.
    first_seen: u64,
}

/// A metric aggregating per-sub-key updates from concurrent producers.
///
/// `set` overwrites the sub-key's value and bumps its update count by one;
/// values are never summed or averaged. [`count`](Self::count) reports the
/// number of distinct sub-keys seen so far. Each mutation runs under
/// the striped map's shard lock for that key, so concurrent `set` calls on
/// the same key never lose an increment and readers never observe a torn
/// record. Reads are weakly consistent across keys.
#[derive(Debug, Default)]
pub struct AggregateMetric {
    entries: DashMap<String, Slot>,
    seq: AtomicU64,
}

impl AggregateMetric {
    /// Create an empty aggregate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`, incrementing that key's update count.
    ///
    /// Any numeric value is accepted, including zero and negatives.
    pub fn set(&self, key: &str, value: f64) {
        match self.entries.entry(key.to_owned()) {
            Entry::Occupied(mut occupied) => {
                let slot = occupied.get_mut();
                slot.update.value = value;
                slot.update.update_count += 1;
            },
            Entry::Vacant(vacant) => {
                vacant.insert(Slot {
                    update: Update {
                        value,
                        update_count: 1,
                    },
                    first_seen: self.seq.fetch_add(1, Ordering::Relaxed),
                });
            },
        }
    }

    /// Number of distinct sub-keys observed at least once.
    ///
    /// This is the `count` the export layer emits; per-key update totals
    /// live in each [`Update`] record, and their sum is available via
    /// [`update_count_total`](Self::update_count_total).
    pub fn count(&self) -> u64 {
        self.entries.len() as u64
    }

    /// Sum of `set` calls across all sub-keys.
    pub fn update_count_total(&self) -> u64 {
        self.entries
            .iter()
            .map(|entry| entry.value().update.update_count)
            .sum()
    }

    /// Number of distinct sub-keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no sub-key has ever been set.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy of the current per-sub-key state, in first-seen insertion order.
    pub fn values(&self) -> Vec<(String, Update)> {
        let mut values: Vec<(u64, String, Update)> = self
            .entries
            .iter()
            .map(|entry| (entry.value().first_seen, entry.key().clone(), entry.value().update))
            .collect();
        values.sort_by_key(|(first_seen, _, _)| *first_seen);
        values.into_iter().map(|(_, key, update)| (key, update)).collect()
    }

    /// Current record for one sub-key, if it has been set.
    pub fn get(&self, key: &str) -> Option<Update> {
        self.entries.get(key).map(|entry| entry.update)
    }
}
