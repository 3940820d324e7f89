//! Executes one request step with bounded retry and exponential backoff.
use crate::measurements::MetricsState;
use crate::sink::ErrorSink;
use reqwest::{Client, StatusCode};
use stampede_core::{Method, RequestStep, ATTEMPT_TIMEOUT, INITIAL_RETRY_DELAY, MAX_RETRIES};
use std::fmt;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, warn};

/// Identifies one try of one step within one session. The rendered form is
/// the tag on every error-sink line.
struct AttemptId {
    session: u32,
    /// 1-based position of the step within the scenario.
    step: usize,
    retry: u32,
}

impl fmt::Display for AttemptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "User-{}-Req-{}-Retry-{}",
            self.session, self.step, self.retry
        )
    }
}

/// Execute one step to a terminal outcome.
///
/// A failed attempt (non-2xx status or transport fault) is retried up to
/// [`MAX_RETRIES`] times with exponential backoff, sleeping on the owning
/// worker only. A terminal success records the latency of the successful
/// attempt alone; exhausted retries record a failure and write one line to
/// the error sink.
pub(crate) async fn execute_step(
    client: &Client,
    session: u32,
    step_index: usize,
    step: &RequestStep,
    metrics: &MetricsState,
    sink: &ErrorSink,
) {
    let mut retry = 0;
    loop {
        let id = AttemptId {
            session,
            step: step_index,
            retry,
        };
        let start = Instant::now();
        let result = send(client, step).await;
        let elapsed = start.elapsed();

        let failure = match result {
            Ok(status) if status.is_success() => {
                debug!(%id, %status, elapsed_ms = elapsed.as_millis() as u64, url = %step.url, "request succeeded");
                metrics.record_success(&step.url, elapsed);
                #[cfg(feature = "metrics")]
                {
                    metrics::counter!("stampede.requests.success").increment(1);
                    metrics::histogram!("stampede.request.latency", "endpoint" => step.url.clone())
                        .record(elapsed.as_nanos() as f64);
                }
                return;
            }
            Ok(status) => format!("HTTP {status}"),
            Err(err) => err.to_string(),
        };

        if retry < MAX_RETRIES {
            let delay = backoff_delay(retry);
            debug!(%id, %failure, delay_ms = delay.as_millis() as u64, "attempt failed, backing off");
            sleep(delay).await;
            retry += 1;
        } else {
            warn!(%id, %failure, url = %step.url, "retries exhausted");
            metrics.record_failure();
            sink.record(&format!(
                "[{id}] FAILED ({failure}), max retries reached, {} ms",
                elapsed.as_millis()
            ));
            #[cfg(feature = "metrics")]
            {
                metrics::counter!("stampede.requests.error").increment(1);
            }
            return;
        }
    }
}

/// Issue one attempt: method, headers, body, and the per-attempt timeout.
/// The response body is drained so the connection returns to the pool.
async fn send(client: &Client, step: &RequestStep) -> Result<StatusCode, reqwest::Error> {
    let method = match step.method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    };

    let mut request = client
        .request(method, &step.url)
        .timeout(ATTEMPT_TIMEOUT);
    for (name, value) in &step.headers {
        request = request.header(name, value);
    }
    if let Some(body) = &step.body {
        request = request.body(body.clone());
    }

    let response = request.send().await?;
    let status = response.status();
    response.bytes().await?;
    Ok(status)
}

fn backoff_delay(retry: u32) -> Duration {
    INITIAL_RETRY_DELAY * (1u32 << retry)
}
