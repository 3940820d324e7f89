//! A scenario-replay HTTP load generator.
//!
//! `stampede` replays a fixed, ordered sequence of HTTP requests (a
//! [`Scenario`]) across many simulated concurrent user sessions, measures
//! per-request and per-endpoint latency, and reports throughput and
//! tail-latency statistics when the run finishes.
//!
//! ```no_run
//! use stampede::ErrorSink;
//! use stampede_core::{RequestStep, RunConfig, Scenario};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), stampede::Error> {
//!     let scenario = Scenario::new(vec![
//!         RequestStep::get("http://localhost:8000/front-page.html"),
//!         RequestStep::post("http://localhost:8000/api/login", r#"{"user": "test"}"#),
//!     ]);
//!
//!     let sink = ErrorSink::file("stampede_errors.log")?;
//!     let report = stampede::run(scenario, RunConfig::default(), sink).await?;
//!     println!("{:.2} req/s", report.throughput_rps);
//!     Ok(())
//! }
//! ```
mod executor;
mod measurements;
mod runner;
mod scheduler;
mod sink;

pub use sink::ErrorSink;

use crate::measurements::MetricsState;
use crate::scheduler::WaitOutcome;
use stampede_core::{
    EndpointReport, LatencySummary, RunConfig, RunReport, Scenario, CONNECT_TIMEOUT,
};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument, warn};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The run cannot proceed without somewhere to record failures.
    #[error("could not open error log {path:?}: {source}")]
    Sink {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("scenario contains no steps")]
    EmptyScenario,
    #[error("could not build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Drive one load-generation run to completion and assemble its report.
///
/// Launches `config.total_sessions` sessions over a pool of
/// `config.concurrent_users` workers, waits for them (bounded by
/// `config.max_wait`), then reads the quiesced metrics state. The report is
/// produced even when the waiting phase times out or is interrupted; the
/// `timed_out` flag distinguishes such partial runs.
#[instrument(skip_all, fields(
    sessions = config.total_sessions.get(),
    users = config.concurrent_users.get(),
))]
pub async fn run(
    scenario: Scenario,
    config: RunConfig,
    sink: ErrorSink,
) -> Result<RunReport, Error> {
    if scenario.is_empty() {
        return Err(Error::EmptyScenario);
    }

    // One shared client: a single connection pool reused by every worker.
    let client = reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .build()?;
    let metrics = Arc::new(MetricsState::new(&scenario));
    let sink = Arc::new(sink);

    info!(steps = scenario.len(), "starting load run");
    let start = Instant::now();
    let outcome = scheduler::launch(&scenario, &config, client, metrics.clone(), &sink).await;
    let elapsed = start.elapsed();

    let timed_out = match outcome {
        WaitOutcome::Completed => {
            info!(elapsed_ms = elapsed.as_millis() as u64, "all sessions finished");
            false
        }
        WaitOutcome::DeadlineExpired => {
            warn!(max_wait = ?config.max_wait, "not all sessions completed within the wait deadline");
            sink.record(&format!(
                "Warning: not all sessions completed within {:?}",
                config.max_wait
            ));
            true
        }
        WaitOutcome::Interrupted => {
            warn!("run interrupted while waiting for sessions; reporting what finished");
            sink.record("Warning: run interrupted while waiting for sessions");
            true
        }
    };

    // All writers have quiesced (or we stopped waiting for them); the drain
    // below is the run's single post-run read.
    let totals = metrics.collect();
    Ok(RunReport {
        total_sessions: config.total_sessions.get(),
        total_attempted: u64::from(config.total_sessions.get()) * scenario.len() as u64,
        completed: totals.completed,
        successful: totals.successful,
        failed: totals.failed,
        overall: LatencySummary::from_samples(&totals.overall),
        endpoints: totals
            .per_endpoint
            .into_iter()
            .map(|(endpoint, samples)| EndpointReport {
                latency: LatencySummary::from_samples(&samples),
                endpoint,
            })
            .collect(),
        duration_ms: elapsed.as_millis() as u64,
        throughput_rps: RunReport::throughput(totals.completed, elapsed),
        timed_out,
    })
}
