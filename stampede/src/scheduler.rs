//! Launches sessions over a bounded worker pool with staggered starts.
use crate::measurements::MetricsState;
use crate::runner;
use crate::sink::ErrorSink;
use reqwest::Client;
use stampede_core::{RunConfig, Scenario};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout_at, Instant};
use tracing::{debug, error};

/// How the waiting phase ended. The run report is produced for every
/// variant; only `Completed` guarantees `completed == total_attempted`.
pub(crate) enum WaitOutcome {
    Completed,
    DeadlineExpired,
    Interrupted,
}

/// Launch every session and wait for the run to drain, bounded by
/// `config.max_wait`.
///
/// Session `i` (0-based) is spawned immediately but sleeps until its start
/// offset elapses, then takes a pool permit. The offset timer runs regardless
/// of whether earlier sessions have finished (open-model arrival); the
/// semaphore alone bounds how many sessions execute steps at once.
pub(crate) async fn launch(
    scenario: &Scenario,
    config: &RunConfig,
    client: Client,
    metrics: Arc<MetricsState>,
    sink: &Arc<ErrorSink>,
) -> WaitOutcome {
    let pool = Arc::new(Semaphore::new(config.concurrent_users.get() as usize));
    let mut handles = Vec::with_capacity(config.total_sessions.get() as usize);

    for session in 1..=config.total_sessions.get() {
        let offset = start_offset(session - 1, config);
        let pool = pool.clone();
        let client = client.clone();
        let scenario = scenario.clone();
        let metrics = metrics.clone();
        let sink = sink.clone();

        handles.push(tokio::spawn(async move {
            sleep(offset).await;
            let Ok(_permit) = pool.acquire().await else {
                return;
            };
            runner::run_session(client, session, scenario, metrics, sink).await;
        }));
    }
    debug!(sessions = handles.len(), "all sessions submitted");

    wait_for_sessions(handles, config.max_wait).await
}

/// Target start offset for the 0-based session index:
/// `i * interval_ms / concurrent_users`, float division truncated to whole
/// milliseconds. The formula conflates per-user pacing with global arrival
/// spacing but is kept verbatim so runs stay comparable with earlier tooling.
fn start_offset(index: u32, config: &RunConfig) -> Duration {
    let millis = index as f64 * config.request_interval.as_millis() as f64
        / config.concurrent_users.get() as f64;
    Duration::from_millis(millis as u64)
}

/// Block until every session joins, the deadline passes, or ctrl-c arrives.
///
/// Expiry and interruption only stop the *waiting*: dropped handles detach
/// their tasks, so in-flight sessions run on in the background and are never
/// forcibly cancelled.
async fn wait_for_sessions(handles: Vec<JoinHandle<()>>, max_wait: Duration) -> WaitOutcome {
    let deadline = Instant::now() + max_wait;

    let drain = async {
        for handle in handles {
            match timeout_at(deadline, handle).await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => error!("session task panicked: {err}"),
                Err(_) => return WaitOutcome::DeadlineExpired,
            }
        }
        WaitOutcome::Completed
    };

    tokio::select! {
        outcome = drain => outcome,
        _ = tokio::signal::ctrl_c() => WaitOutcome::Interrupted,
    }
}
