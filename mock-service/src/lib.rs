//! Target service for stampede's integration tests.
use axum::{
    debug_handler,
    extract::Path,
    http::StatusCode,
    routing::{any, get},
    Router,
};
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::debug;

pub fn router() -> Router {
    Router::new()
        .route("/delay/ms/:delay_ms", any(delay))
        .route("/status/:code", any(status))
        .route("/flaky/:key/:fails", any(flaky))
        .route("/hits/:key", get(hits))
        .route("/busy/:key/ms/:delay_ms", any(busy))
        .route("/peak/:key", get(peak))
}

pub async fn run(addr: SocketAddr) {
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, router()).await.unwrap();
}

/// Bind an ephemeral port and serve in the background; returns the address.
pub async fn spawn() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router()).await.unwrap();
    });
    addr
}

#[debug_handler]
async fn delay(Path(delay_ms): Path<u64>) {
    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
}

async fn status(Path(code): Path<u16>) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::OK)
}

lazy_static! {
    static ref HITS: Arc<Mutex<HashMap<String, u64>>> = Arc::new(Mutex::new(HashMap::new()));
}

/// Responds 500 to the first `fails` hits of `key`, then 200. The per-key
/// hit count is readable via `/hits/:key`.
async fn flaky(Path((key, fails)): Path<(String, u64)>) -> StatusCode {
    let hit = {
        let mut map = HITS.lock().unwrap();
        let entry = map.entry(key.clone()).or_insert(0);
        *entry += 1;
        *entry
    };
    if hit <= fails {
        debug!(key, hit, "flaky: failing");
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        debug!(key, hit, "flaky: succeeding");
        StatusCode::OK
    }
}

async fn hits(Path(key): Path<String>) -> String {
    HITS.lock().unwrap().get(&key).copied().unwrap_or(0).to_string()
}

lazy_static! {
    static ref INFLIGHT: Arc<Mutex<HashMap<String, (u64, u64)>>> =
        Arc::new(Mutex::new(HashMap::new()));
}

/// Sleeps like `/delay` while tracking the per-key (current, peak) in-flight
/// request counts, so tests can assert concurrency bounds via `/peak/:key`.
async fn busy(Path((key, delay_ms)): Path<(String, u64)>) {
    {
        let mut map = INFLIGHT.lock().unwrap();
        let entry = map.entry(key.clone()).or_insert((0, 0));
        entry.0 += 1;
        entry.1 = entry.1.max(entry.0);
    }
    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    let mut map = INFLIGHT.lock().unwrap();
    if let Some(entry) = map.get_mut(&key) {
        entry.0 -= 1;
    }
}

async fn peak(Path(key): Path<String>) -> String {
    INFLIGHT
        .lock()
        .unwrap()
        .get(&key)
        .map(|(_, peak)| *peak)
        .unwrap_or(0)
        .to_string()
}
