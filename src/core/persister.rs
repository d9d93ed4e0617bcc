//! Durable append-only persistence for triggered alerts.
//!
//! A single writer task consumes batches from a bounded queue, so concurrent
//! breaches can never interleave raw writes to the record file.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, error};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::alert::Alert;
use crate::error::Result;

/// Handle for queueing triggered alerts onto the persistence worker.
///
/// Cloneable; once every handle is dropped the worker drains the queue and
/// exits, which is how the controller flushes pending writes on stop.
#[derive(Clone)]
pub struct AlertPersister {
    tx: mpsc::Sender<Vec<Alert>>,
}

impl AlertPersister {
    /// Create a persister backed by a bounded queue without spawning the
    /// worker. Used by `spawn`, and by tests that inspect queued batches.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Vec<Alert>>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    /// Spawn the single writer task appending alert batches to `path`.
    pub fn spawn(
        handle: &tokio::runtime::Handle,
        path: PathBuf,
        capacity: usize,
    ) -> (Self, JoinHandle<()>) {
        let (persister, mut rx) = Self::channel(capacity);

        let worker = handle.spawn(async move {
            while let Some(batch) = rx.recv().await {
                if let Err(e) = append_batch(&path, &batch) {
                    error!(
                        "failed to append {} alert(s) to {}: {}",
                        batch.len(),
                        path.display(),
                        e
                    );
                }
            }
            debug!("alert persistence queue drained");
        });

        (persister, worker)
    }

    /// Queue a batch of triggered alerts for appending. Empty input is a
    /// no-op.
    ///
    /// Never blocks the caller: a full or closed queue drops the batch with
    /// a log entry instead of stalling the evaluate timer.
    pub fn append(&self, alerts: Vec<Alert>) {
        if alerts.is_empty() {
            debug!("no alerts to persist");
            return;
        }

        if let Err(e) = self.tx.try_send(alerts) {
            error!("dropping alert batch, persistence queue unavailable: {e}");
        }
    }
}

/// Serialize one batch as a JSON array and append it, newline terminated.
fn append_batch(path: &Path, batch: &[Alert]) -> Result<()> {
    let line = serde_json::to_string(batch)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(line.as_bytes())?;
    file.write_all(b"\n")?;

    Ok(())
}
