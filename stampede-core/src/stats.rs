//! Latency statistics over a drained sample snapshot.
use serde::Serialize;
use std::time::Duration;

/// Average and tail latencies for one sample collection, in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatencySummary {
    pub count: usize,
    pub average_ms: f64,
    pub p50_ms: f64,
    pub p90_ms: f64,
    pub p95_ms: f64,
}

impl LatencySummary {
    /// Summarize an unordered collection of latency samples. An empty
    /// collection yields 0.0 for the average and every percentile.
    pub fn from_samples(samples: &[Duration]) -> Self {
        let mut sorted: Vec<f64> = samples.iter().map(|d| d.as_secs_f64() * 1_000.0).collect();
        sorted.sort_by(|a, b| a.total_cmp(b));
        Self {
            count: sorted.len(),
            average_ms: mean(&sorted),
            p50_ms: percentile(&sorted, 50.0),
            p90_ms: percentile(&sorted, 90.0),
            p95_ms: percentile(&sorted, 95.0),
        }
    }
}

/// Nearest-rank percentile over samples sorted ascending.
///
/// `index = ceil(p/100 * n) - 1`, clamped to `[0, n-1]`; no interpolation.
/// The exact formula is load-bearing: reported numbers must be comparable
/// across tool versions. Empty input yields 0.0.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let rank = (p / 100.0 * sorted.len() as f64).ceil() as i64 - 1;
    let index = rank.clamp(0, sorted.len() as i64 - 1) as usize;
    sorted[index]
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
