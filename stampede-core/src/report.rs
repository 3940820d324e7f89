use crate::LatencySummary;
use serde::Serialize;
use std::time::Duration;

/// Final summary of one load-generation run.
///
/// `total_attempted` is `total_sessions * scenario length`; when the waiting
/// phase times out, `completed` may fall short of it and `timed_out` is set
/// so partial runs are diagnosable.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub total_sessions: u32,
    pub total_attempted: u64,
    pub completed: u64,
    pub successful: u64,
    pub failed: u64,
    pub overall: LatencySummary,
    pub endpoints: Vec<EndpointReport>,
    pub duration_ms: u64,
    pub throughput_rps: f64,
    pub timed_out: bool,
}

/// Per-endpoint latency breakdown, in scenario first-appearance order.
#[derive(Debug, Clone, Serialize)]
pub struct EndpointReport {
    pub endpoint: String,
    pub latency: LatencySummary,
}

impl RunReport {
    /// Completed requests per second of wall clock. A zero-length run reports
    /// 0.0 rather than dividing by zero.
    pub fn throughput(completed: u64, duration: Duration) -> f64 {
        let secs = duration.as_secs_f64();
        if secs > 0.0 {
            completed as f64 / secs
        } else {
            0.0
        }
    }
}
