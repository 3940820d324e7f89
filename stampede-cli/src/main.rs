//! Command-line front end for the stampede load generator.
use anyhow::Result;
use clap::error::ErrorKind;
use clap::Parser;
use stampede::ErrorSink;
use stampede_core::{
    RequestStep, RunConfig, RunReport, Scenario, DEFAULT_CONCURRENT_USERS,
    DEFAULT_TOTAL_SESSIONS,
};
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const DIVIDER: &str = "--------------------------------------------------";

/// Replay a fixed HTTP request scenario across many simulated concurrent
/// users and report latency and throughput statistics.
#[derive(Debug, Parser)]
#[command(name = "stampede", version, about)]
struct Args {
    /// Total simulated user sessions to run.
    #[arg(long, default_value_t = DEFAULT_TOTAL_SESSIONS)]
    sessions: NonZeroU32,

    /// Maximum sessions executing concurrently.
    #[arg(long, default_value_t = DEFAULT_CONCURRENT_USERS)]
    users: NonZeroU32,

    /// Session start spacing input, in milliseconds.
    #[arg(long, default_value_t = 100)]
    interval_ms: u64,

    /// Base URL the demo scenario is replayed against.
    #[arg(long, default_value = "http://localhost:8000")]
    target: String,

    /// File that terminal failures are appended to.
    #[arg(long, default_value = "stampede_errors.log")]
    error_log: PathBuf,

    /// How long to wait for all sessions before reporting what finished.
    #[arg(long, value_parser = humantime::parse_duration, default_value = "300s")]
    max_wait: Duration,

    /// Emit the report as JSON instead of the console summary.
    #[arg(long)]
    json: bool,
}

/// Malformed arguments fall back to the documented defaults rather than
/// failing the run; help and version requests are still honored.
fn parse_args() -> Args {
    Args::try_parse().unwrap_or_else(|err| {
        if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) {
            err.exit();
        }
        eprintln!("{err}");
        tracing::warn!("invalid arguments; continuing with defaults");
        Args::parse_from(["stampede"])
    })
}

/// The demo scenario every session replays: front page, JSON login, product
/// listing.
fn demo_scenario(target: &str) -> Scenario {
    let target = target.trim_end_matches('/');
    Scenario::new(vec![
        RequestStep::get(format!("{target}/front-page.html")),
        RequestStep::post(
            format!("{target}/api/login"),
            r#"{"username": "testuser", "password": "password123"}"#,
        )
        .with_header("Accept", "application/json"),
        RequestStep::get(format!("{target}/api/products?category=electronics")),
    ])
}

fn print_banner(args: &Args, scenario: &Scenario) {
    println!("Starting stampede load generator...");
    println!("Concurrent users: {}", args.users);
    println!("Total sessions: {}", args.sessions);
    println!("Session start interval: {} ms", args.interval_ms);
    println!("Error log: {}", args.error_log.display());
    println!("Scenario steps:");
    for step in scenario.steps() {
        let body = if step.body.is_some() { " (with body)" } else { "" };
        let headers = if step.headers.is_empty() {
            String::new()
        } else {
            let names: Vec<&str> = step.headers.iter().map(|(n, _)| n.as_str()).collect();
            format!(" (headers: {})", names.join(", "))
        };
        println!("  - {} {}{body}{headers}", step.method, step.url);
    }
    println!("{DIVIDER}");
}

fn print_report(report: &RunReport) {
    println!("\n{DIVIDER}");
    println!("Load run finished!");
    if report.timed_out {
        println!("Warning: not all sessions completed before the wait deadline; counts below are partial.");
    }
    println!("Total user sessions: {}", report.total_sessions);
    println!("Total requests attempted: {}", report.total_attempted);
    println!("Completed requests: {}", report.completed);
    println!("Successful requests (HTTP 2xx): {}", report.successful);
    println!("Failed requests (non-2xx or error): {}", report.failed);
    println!("Total duration: {} ms", report.duration_ms);

    if report.overall.count > 0 {
        println!(
            "Overall average response time: {:.2} ms",
            report.overall.average_ms
        );
        println!("Overall P50 response time: {:.2} ms", report.overall.p50_ms);
        println!("Overall P90 response time: {:.2} ms", report.overall.p90_ms);
        println!("Overall P95 response time: {:.2} ms", report.overall.p95_ms);
    } else {
        println!("No successful requests; skipping overall latency statistics.");
    }

    println!("\nPer endpoint:");
    for endpoint in &report.endpoints {
        if endpoint.latency.count == 0 {
            continue;
        }
        println!("  {} (count: {})", endpoint.endpoint, endpoint.latency.count);
        println!(
            "    avg: {:.2} ms, P50: {:.2} ms, P90: {:.2} ms, P95: {:.2} ms",
            endpoint.latency.average_ms,
            endpoint.latency.p50_ms,
            endpoint.latency.p90_ms,
            endpoint.latency.p95_ms,
        );
    }

    println!("\nThroughput: {:.2} requests/second", report.throughput_rps);
    println!("{DIVIDER}");
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("stampede=info")),
        )
        .init();

    let args = parse_args();
    let config = RunConfig::new(
        args.sessions,
        args.users,
        Duration::from_millis(args.interval_ms),
    )
    .with_max_wait(args.max_wait);
    let scenario = demo_scenario(&args.target);

    if !args.json {
        print_banner(&args, &scenario);
    }

    // No sink, no run: failures must land somewhere auditable.
    let sink = ErrorSink::file(&args.error_log)?;
    let report = stampede::run(scenario, config, sink).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}
