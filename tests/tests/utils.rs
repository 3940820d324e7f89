use stampede::ErrorSink;
use std::io::Write;
use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::sync::{Arc, Mutex, OnceLock};
use tracing_subscriber::EnvFilter;

static TRACING: OnceLock<()> = OnceLock::new();
static MOCK: OnceLock<SocketAddr> = OnceLock::new();

/// One-time test setup: tracing subscriber plus a single shared mock service
/// on an ephemeral port.
///
/// Each `#[tokio::test]` runs on its own current-thread runtime that is
/// dropped when the test ends, so the mock must not live on any one test's
/// runtime. It is hosted on a dedicated thread with a runtime kept alive for
/// the whole test binary, so every test sees the same live server.
#[allow(unused)]
pub async fn init() -> SocketAddr {
    TRACING.get_or_init(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("stampede=debug"))
            .with_test_writer()
            .try_init();
    });
    *MOCK.get_or_init(|| {
        let (tx, rx) = std::sync::mpsc::channel();
        std::thread::spawn(move || {
            let rt = tokio::runtime::Runtime::new().unwrap();
            rt.block_on(async move {
                let addr = mock_service::spawn().await;
                tx.send(addr).unwrap();
                // Keep this runtime alive so the spawned server keeps serving
                // for the lifetime of the test binary.
                std::future::pending::<()>().await;
            });
        });
        rx.recv().unwrap()
    })
}

#[allow(unused)]
pub fn nz(value: u32) -> NonZeroU32 {
    NonZeroU32::new(value).unwrap()
}

#[allow(unused)]
#[derive(Clone)]
pub struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// An error sink writing into a shared in-memory buffer the test can read
/// back.
#[allow(unused)]
pub fn memory_sink() -> (ErrorSink, Arc<Mutex<Vec<u8>>>) {
    let buffer = Arc::new(Mutex::new(Vec::new()));
    let sink = ErrorSink::from_writer(SharedBuf(buffer.clone()));
    (sink, buffer)
}

#[allow(unused)]
pub fn sink_lines(buffer: &Arc<Mutex<Vec<u8>>>) -> Vec<String> {
    let bytes = buffer.lock().unwrap();
    String::from_utf8(bytes.clone())
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

/// Read the mock service's per-key hit counter.
#[allow(unused)]
pub async fn mock_hits(addr: SocketAddr, key: &str) -> u64 {
    let body = reqwest::get(format!("http://{addr}/hits/{key}"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    body.parse().unwrap()
}

/// Read the mock service's per-key peak in-flight counter.
#[allow(unused)]
pub async fn mock_peak(addr: SocketAddr, key: &str) -> u64 {
    let body = reqwest::get(format!("http://{addr}/peak/{key}"))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    body.parse().unwrap()
}
