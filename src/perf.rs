//! Timing instrumentation for dataset loads and chart builds.
//!
//! Requests are short and synchronous, so the tooling is deliberately small:
//! - **Scoped timers**: RAII-style timing that warns past a threshold
//! - **Aggregated statistics**: per-operation samples for the batch summary
//!
//! ```ignore
//! let _timer = ScopedTimer::new("build", config.slow_ms as f64);
//! let artifact = spec.build(&dataset)?;
//! ```

use std::collections::{BTreeMap, VecDeque};
use std::time::Instant;
use tracing::{info, warn};

/// Number of samples kept per operation
const STATS_SAMPLE_COUNT: usize = 100;

/// Statistics for a specific operation type.
#[derive(Debug, Clone)]
pub struct OperationStats {
    /// Recent timing samples in milliseconds
    samples: VecDeque<f64>,
    /// Total invocation count
    count: u64,
    /// Minimum observed time
    min_ms: f64,
    /// Maximum observed time
    max_ms: f64,
    /// Running sum over `samples`
    sum_ms: f64,
}

impl Default for OperationStats {
    fn default() -> Self {
        Self {
            samples: VecDeque::with_capacity(STATS_SAMPLE_COUNT),
            count: 0,
            min_ms: f64::MAX,
            max_ms: 0.0,
            sum_ms: 0.0,
        }
    }
}

impl OperationStats {
    /// Record a new timing sample.
    pub fn record(&mut self, ms: f64) {
        if self.samples.len() >= STATS_SAMPLE_COUNT {
            if let Some(old) = self.samples.pop_front() {
                self.sum_ms -= old;
            }
        }
        self.samples.push_back(ms);
        self.sum_ms += ms;
        self.count += 1;
        self.min_ms = self.min_ms.min(ms);
        self.max_ms = self.max_ms.max(ms);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn max(&self) -> f64 {
        self.max_ms
    }

    /// Get the average time over recent samples.
    pub fn average(&self) -> f64 {
        if self.samples.is_empty() {
            0.0
        } else {
            self.sum_ms / self.samples.len() as f64
        }
    }

    /// Get the p95 (95th percentile) time.
    pub fn p95(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let mut sorted: Vec<f64> = self.samples.iter().copied().collect();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let idx = ((sorted.len() as f64) * 0.95).floor() as usize;
        sorted.get(idx.min(sorted.len() - 1)).copied().unwrap_or(0.0)
    }
}

/// Named operation statistics, reported together at the end of a batch run.
#[derive(Debug, Default)]
pub struct StatsBook {
    operations: BTreeMap<&'static str, OperationStats>,
}

impl StatsBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, name: &'static str, elapsed_ms: f64) {
        self.operations.entry(name).or_default().record(elapsed_ms);
    }

    pub fn get(&self, name: &str) -> Option<&OperationStats> {
        self.operations.get(name)
    }

    /// Log one line per operation.
    pub fn log_summary(&self) {
        for (name, stats) in &self.operations {
            info!(
                operation = name,
                count = stats.count(),
                avg_ms = format!("{:.2}", stats.average()),
                p95_ms = format!("{:.2}", stats.p95()),
                max_ms = format!("{:.2}", stats.max()),
                "Timing summary"
            );
        }
    }
}

/// A scoped timer that warns on drop when its threshold was exceeded.
pub struct ScopedTimer {
    name: &'static str,
    start: Instant,
    threshold_ms: f64,
}

impl ScopedTimer {
    /// Create a new scoped timer with a warning threshold.
    pub fn new(name: &'static str, threshold_ms: f64) -> Self {
        Self {
            name,
            start: Instant::now(),
            threshold_ms,
        }
    }

    /// Get elapsed time without stopping the timer.
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        let elapsed_ms = self.elapsed_ms();
        if elapsed_ms > self.threshold_ms {
            warn!(
                operation = self.name,
                elapsed_ms = format!("{:.2}", elapsed_ms),
                threshold_ms = format!("{:.2}", self.threshold_ms),
                "Slow operation"
            );
        }
    }
}

/// Measure execution time of a closure and return both the result and elapsed time.
#[inline]
pub fn measure<T, F: FnOnce() -> T>(f: F) -> (T, f64) {
    let start = Instant::now();
    let result = f();
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    (result, elapsed_ms)
}
