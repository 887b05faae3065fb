//! Last-written scalar gauge.

use std::sync::atomic::{AtomicU64, Ordering};

/// A point-in-time measurement holding the most recently set value.
///
/// The value is stored as raw `f64` bits in an atomic, so writers never
/// block and readers never observe a torn value.
#[derive(Debug)]
pub struct Gauge {
    bits: AtomicU64,
}

impl Gauge {
    /// Create a gauge reading zero.
    pub fn new() -> Self {
        Self {
            bits: AtomicU64::new(0.0_f64.to_bits()),
        }
    }

    /// Overwrite the gauge value.
    pub fn set(&self, value: f64) {
        self.bits.store(value.to_bits(), Ordering::Relaxed);
    }

    /// Most recently set value.
    pub fn value(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Relaxed))
    }
}

impl Default for Gauge {
    fn default() -> Self {
        Self::new()
    }
}
