//! Point-in-time statistical summaries of recorded samples.

/// An immutable, point-in-time view of a set of recorded samples.
///
/// Samples are sorted at construction; every statistic afterwards is a pure
/// read, so repeated queries on the same snapshot always agree. An empty
/// snapshot answers `0.0` for every statistic rather than NaN, which keeps
/// the exported maps JSON-friendly.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Sorted ascending.
    samples: Vec<f64>,
}

impl Snapshot {
    /// Build a snapshot from raw samples in any order.
    pub fn new(mut samples: Vec<f64>) -> Self {
        samples.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        Self { samples }
    }

    /// Number of samples in this snapshot.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the snapshot holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Smallest recorded sample.
    pub fn min(&self) -> f64 {
        self.samples.first().copied().unwrap_or(0.0)
    }

    /// Largest recorded sample.
    pub fn max(&self) -> f64 {
        self.samples.last().copied().unwrap_or(0.0)
    }

    /// Arithmetic mean of all samples.
    pub fn mean(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().sum::<f64>() / self.samples.len() as f64
    }

    /// Sample standard deviation (Bessel-corrected). Zero for fewer than
    /// two samples.
    pub fn stddev(&self) -> f64 {
        if self.samples.len() < 2 {
            return 0.0;
        }
        let mean = self.mean();
        let variance = self
            .samples
            .iter()
            .map(|s| {
                let diff = s - mean;
                diff * diff
            })
            .sum::<f64>()
            / (self.samples.len() - 1) as f64;
        variance.sqrt()
    }

    /// Median (50th percentile).
    pub fn median(&self) -> f64 {
        self.quantile(0.5)
    }

    /// 75th percentile.
    pub fn p75(&self) -> f64 {
        self.quantile(0.75)
    }

    /// 95th percentile.
    pub fn p95(&self) -> f64 {
        self.quantile(0.95)
    }

    /// 99th percentile.
    pub fn p99(&self) -> f64 {
        self.quantile(0.99)
    }

    /// 99.9th percentile.
    pub fn p999(&self) -> f64 {
        self.quantile(0.999)
    }

    /// Linearly interpolated quantile over the sorted samples.
    ///
    /// `q` is clamped to `[0, 1]`.
    pub fn quantile(&self, q: f64) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let q = q.clamp(0.0, 1.0);
        let position = q * (self.samples.len() - 1) as f64;
        let lower = position.floor() as usize;
        let upper = position.ceil() as usize;
        if lower == upper {
            return self.samples[lower];
        }
        let weight = position - lower as f64;
        self.samples[lower] * (1.0 - weight) + self.samples[upper] * weight
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
