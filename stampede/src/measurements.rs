//! Concurrency-safe counters and latency collections for one run.
use metrics_util::AtomicBucket;
use stampede_core::Scenario;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Single point of truth for run counters and latency samples.
///
/// Shared by `Arc` across every session worker. Counters are atomic; sample
/// collections are lock-free append-only buckets. The endpoint key set is
/// frozen at construction (the scenario is immutable once the run starts), so
/// per-endpoint appends need no locking either.
///
/// Invariants: `completed == successful + failed`, and `successful` equals
/// the overall sample count. Both hold because `record_success` and
/// `record_failure` are the only write paths.
pub(crate) struct MetricsState {
    completed: AtomicU64,
    successful: AtomicU64,
    failed: AtomicU64,
    overall: AtomicBucket<Duration>,
    by_endpoint: Vec<(String, AtomicBucket<Duration>)>,
}

impl MetricsState {
    pub fn new(scenario: &Scenario) -> Self {
        let by_endpoint = scenario
            .endpoints()
            .into_iter()
            .map(|endpoint| (endpoint.to_string(), AtomicBucket::new()))
            .collect();
        Self {
            completed: AtomicU64::new(0),
            successful: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            overall: AtomicBucket::new(),
            by_endpoint,
        }
    }

    /// Record a terminal success: exactly one latency sample (the successful
    /// attempt's elapsed time) lands in the overall and endpoint collections.
    pub fn record_success(&self, endpoint: &str, latency: Duration) {
        self.completed.fetch_add(1, Ordering::Relaxed);
        self.successful.fetch_add(1, Ordering::Relaxed);
        self.overall.push(latency);
        if let Some((_, bucket)) = self.by_endpoint.iter().find(|(e, _)| e == endpoint) {
            bucket.push(latency);
        }
    }

    /// Record a terminal failure (retries exhausted). No sample is kept.
    pub fn record_failure(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Drain into an owned snapshot. Only call after every writer has
    /// finished or the scheduler has stopped waiting for them; reads during
    /// an in-flight run see no consistency guarantees.
    pub fn collect(&self) -> RunTotals {
        let mut overall = Vec::new();
        self.overall.clear_with(|samples| {
            overall.extend_from_slice(samples);
        });

        let per_endpoint = self
            .by_endpoint
            .iter()
            .map(|(endpoint, bucket)| {
                let mut samples = Vec::new();
                bucket.clear_with(|chunk| samples.extend_from_slice(chunk));
                (endpoint.clone(), samples)
            })
            .collect();

        RunTotals {
            completed: self.completed.load(Ordering::Relaxed),
            successful: self.successful.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            overall,
            per_endpoint,
        }
    }
}

pub(crate) struct RunTotals {
    pub completed: u64,
    pub successful: u64,
    pub failed: u64,
    pub overall: Vec<Duration>,
    pub per_endpoint: Vec<(String, Vec<Duration>)>,
}
