use crate::executor;
use crate::measurements::MetricsState;
use crate::sink::ErrorSink;
use reqwest::Client;
use stampede_core::Scenario;
use std::sync::Arc;
use tracing::debug;

/// Replay the scenario's steps in order for one simulated user.
///
/// Step N+1 does not start until step N, including all its retries, has
/// reached a terminal outcome. A step that exhausts its retries does not
/// abort the session: the simulated user keeps navigating, and every step is
/// measured and counted independently.
pub(crate) async fn run_session(
    client: Client,
    session: u32,
    scenario: Scenario,
    metrics: Arc<MetricsState>,
    sink: Arc<ErrorSink>,
) {
    debug!(session, "session started");
    for (index, step) in scenario.steps().iter().enumerate() {
        executor::execute_step(&client, session, index + 1, step, &metrics, &sink).await;
    }
    debug!(session, "session finished");
}
