//! Append-only destination for terminal failure records.
use crate::Error;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use tracing::error;

/// Serialized line writer shared by every session worker.
///
/// Failures are expected output of a load run and must be auditable, so a
/// run refuses to start without an open sink. The writer is guarded by a
/// mutex: concurrent sessions never interleave within a line.
pub struct ErrorSink {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl ErrorSink {
    /// Open (or create) a log file in append mode.
    pub fn file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| Error::Sink {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::from_writer(BufWriter::new(file)))
    }

    /// Wrap an arbitrary writer; used by tests to capture sink lines.
    pub fn from_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    /// Append one line. Write failures are logged, not escalated: losing a
    /// log line mid-run must not take the run down.
    pub(crate) fn record(&self, line: &str) {
        let mut writer = self
            .writer
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Err(err) = writeln!(writer, "{line}").and_then(|_| writer.flush()) {
            error!("error sink write failed: {err}");
        }
    }
}
