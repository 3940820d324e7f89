mod utils;
#[allow(unused)]
use utils::*;

use stampede_core::{RequestStep, RunConfig, Scenario, MAX_RETRIES};
use std::time::Duration;

#[tokio::test]
async fn all_sessions_succeed_and_are_counted_per_endpoint() {
    let addr = init().await;
    let url_a = format!("http://{addr}/delay/ms/10");
    let url_b = format!("http://{addr}/delay/ms/12");
    let scenario = Scenario::new(vec![
        RequestStep::get(&url_a),
        RequestStep::post(&url_b, r#"{"user": "test"}"#),
    ]);
    let config = RunConfig::new(nz(5), nz(2), Duration::ZERO);
    let (sink, buffer) = memory_sink();

    let report = stampede::run(scenario, config, sink).await.unwrap();

    assert_eq!(report.total_sessions, 5);
    assert_eq!(report.total_attempted, 10);
    assert_eq!(report.completed, 10);
    assert_eq!(report.successful, 10);
    assert_eq!(report.failed, 0);
    assert!(!report.timed_out);

    assert_eq!(report.overall.count, 10);
    assert_eq!(report.endpoints.len(), 2);
    assert_eq!(report.endpoints[0].endpoint, url_a);
    assert_eq!(report.endpoints[0].latency.count, 5);
    assert_eq!(report.endpoints[1].endpoint, url_b);
    assert_eq!(report.endpoints[1].latency.count, 5);

    // the mock sleeps 10ms/12ms per request
    assert!(report.overall.average_ms >= 10.0);
    assert!(report.overall.p50_ms >= 10.0);
    assert!(report.overall.p95_ms >= report.overall.p50_ms);

    assert!(report.throughput_rps > 0.0);
    assert!(sink_lines(&buffer).is_empty());
}

#[tokio::test]
async fn step_that_succeeds_on_third_attempt_contributes_one_sample() {
    let addr = init().await;
    let key = "succeeds-on-third";
    let scenario = Scenario::new(vec![RequestStep::get(format!(
        "http://{addr}/flaky/{key}/2"
    ))]);
    let config = RunConfig::new(nz(1), nz(1), Duration::ZERO);
    let (sink, buffer) = memory_sink();

    let report = stampede::run(scenario, config, sink).await.unwrap();

    assert_eq!(mock_hits(addr, key).await, 3);
    assert_eq!(report.completed, 1);
    assert_eq!(report.successful, 1);
    assert_eq!(report.failed, 0);
    assert_eq!(report.overall.count, 1);
    // The sample is the successful attempt's elapsed time only; the ~300ms of
    // backoff spent before it must not leak into the measurement.
    assert!(report.overall.average_ms < 100.0);
    assert!(sink_lines(&buffer).is_empty());
}

#[tokio::test]
async fn exhausted_retries_count_one_failure_and_log_one_line() {
    let addr = init().await;
    let key = "always-500";
    let scenario = Scenario::new(vec![RequestStep::get(format!(
        "http://{addr}/flaky/{key}/100000"
    ))]);
    let config = RunConfig::new(nz(1), nz(1), Duration::ZERO);
    let (sink, buffer) = memory_sink();

    let report = stampede::run(scenario, config, sink).await.unwrap();

    // initial attempt + MAX_RETRIES retries, nothing more
    assert_eq!(mock_hits(addr, key).await, u64::from(MAX_RETRIES) + 1);
    assert_eq!(report.completed, 1);
    assert_eq!(report.successful, 0);
    assert_eq!(report.failed, 1);
    assert_eq!(report.overall.count, 0);
    assert_eq!(report.overall.p95_ms, 0.0);
    assert_eq!(report.endpoints[0].latency.count, 0);

    let lines = sink_lines(&buffer);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains(&format!("User-1-Req-1-Retry-{MAX_RETRIES}")));
    assert!(lines[0].contains("FAILED"));
}

#[tokio::test]
async fn failed_step_does_not_abort_the_rest_of_the_session() {
    let addr = init().await;
    let url_ok = format!("http://{addr}/delay/ms/5");
    let scenario = Scenario::new(vec![
        RequestStep::get(format!("http://{addr}/flaky/never-recovers/100000")),
        RequestStep::get(&url_ok),
    ]);
    let config = RunConfig::new(nz(1), nz(1), Duration::ZERO);
    let (sink, buffer) = memory_sink();

    let report = stampede::run(scenario, config, sink).await.unwrap();

    assert_eq!(report.completed, 2);
    assert_eq!(report.successful, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(report.endpoints[1].endpoint, url_ok);
    assert_eq!(report.endpoints[1].latency.count, 1);
    assert_eq!(sink_lines(&buffer).len(), 1);
}

#[tokio::test]
async fn transport_failure_is_retried_then_counted() {
    let _ = init().await;
    // nothing listens here; every attempt is a connection error
    let scenario = Scenario::new(vec![RequestStep::get("http://127.0.0.1:1/unreachable")]);
    let config = RunConfig::new(nz(1), nz(1), Duration::ZERO);
    let (sink, buffer) = memory_sink();

    let report = stampede::run(scenario, config, sink).await.unwrap();

    assert_eq!(report.completed, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(report.overall.count, 0);
    let lines = sink_lines(&buffer);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("User-1-Req-1-Retry-3"));
}

#[tokio::test]
async fn active_sessions_never_exceed_the_worker_pool() {
    let addr = init().await;
    let key = "pool-bound";
    let scenario = Scenario::new(vec![RequestStep::get(format!(
        "http://{addr}/busy/{key}/ms/100"
    ))]);
    let config = RunConfig::new(nz(6), nz(2), Duration::ZERO);
    let (sink, _buffer) = memory_sink();

    let report = stampede::run(scenario, config, sink).await.unwrap();

    assert_eq!(report.successful, 6);
    assert!(mock_peak(addr, key).await <= 2);
}

#[tokio::test]
async fn deadline_expiry_still_produces_a_partial_report() {
    let addr = init().await;
    let scenario = Scenario::new(vec![RequestStep::get(format!(
        "http://{addr}/delay/ms/500"
    ))]);
    let config =
        RunConfig::new(nz(1), nz(1), Duration::ZERO).with_max_wait(Duration::from_millis(50));
    let (sink, buffer) = memory_sink();

    let report = stampede::run(scenario, config, sink).await.unwrap();

    assert!(report.timed_out);
    assert_eq!(report.total_attempted, 1);
    assert!(report.completed <= report.total_attempted);
    assert!(report.throughput_rps.is_finite());
    assert!(report.throughput_rps >= 0.0);
    let lines = sink_lines(&buffer);
    assert!(lines.iter().any(|line| line.contains("Warning")));
}

#[tokio::test]
async fn empty_scenario_is_rejected() {
    let (sink, _buffer) = memory_sink();
    let result = stampede::run(Scenario::new(vec![]), RunConfig::default(), sink).await;
    assert!(matches!(result, Err(stampede::Error::EmptyScenario)));
}
