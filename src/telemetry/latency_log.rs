//! Append-only latency log with one writer task.
//!
//! Samples from concurrent request handlers are funneled through an
//! unbounded channel into a single task owning the file handle, so lines
//! are never interleaved or truncated. Write failures are logged locally
//! and never surfaced to request handlers.

use std::path::PathBuf;

use tokio::fs::OpenOptions;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio::sync::mpsc;

struct Sample {
    method: &'static str,
    seconds: f64,
}

/// Sending half of the latency log. Cheap to clone.
#[derive(Clone)]
pub struct LatencyLog {
    tx: mpsc::UnboundedSender<Sample>,
}

impl LatencyLog {
    /// Spawn the writer task appending to `path`.
    pub fn spawn(path: PathBuf) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(write_loop(path, rx));
        Self { tx }
    }

    /// Queue one sample. Never blocks and never fails the caller; if the
    /// writer is gone the sample is dropped.
    pub fn append(&self, method: &'static str, seconds: f64) {
        let _ = self.tx.send(Sample { method, seconds });
    }
}

async fn write_loop(path: PathBuf, mut rx: mpsc::UnboundedReceiver<Sample>) {
    let file = match OpenOptions::new().create(true).append(true).open(&path).await {
        Ok(file) => file,
        Err(error) => {
            tracing::warn!(path = %path.display(), %error, "latency log unavailable, samples will be dropped");
            // Keep draining so senders never observe a closed channel mid-run.
            while rx.recv().await.is_some() {}
            return;
        }
    };
    let mut writer = BufWriter::new(file);

    while let Some(sample) = rx.recv().await {
        let line = format!(
            "Method: {}, Latency: {:.6} seconds\n",
            sample.method, sample.seconds
        );
        if let Err(error) = writer.write_all(line.as_bytes()).await {
            tracing::warn!(%error, "failed to append latency sample");
            continue;
        }
        if let Err(error) = writer.flush().await {
            tracing::warn!(%error, "failed to flush latency log");
        }
    }
}
