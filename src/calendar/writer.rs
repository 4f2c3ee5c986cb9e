//! Off-thread persistence.
//!
//! The store hands over a full-file snapshot per mutation and returns
//! immediately. A tokio task writes snapshots in order, skipping any that a
//! newer one has already replaced, and reports each write back.

use std::path::{Path, PathBuf};

use tokio::runtime::Handle;
use tokio::sync::mpsc;

use super::error::StoreError;
use super::store::temp_path;

struct Snapshot {
    generation: u64,
    contents: String,
}

#[derive(Debug)]
pub struct WriteOutcome {
    pub generation: u64,
    pub result: Result<(), StoreError>,
}

pub struct BackgroundWriter {
    snapshots: mpsc::UnboundedSender<Snapshot>,
    outcomes: mpsc::UnboundedReceiver<WriteOutcome>,
    submitted: u64,
    completed: u64,
}

impl BackgroundWriter {
    pub fn spawn(handle: &Handle, path: impl Into<PathBuf>) -> Self {
        let (snapshots, rx) = mpsc::unbounded_channel();
        let (tx, outcomes) = mpsc::unbounded_channel();
        handle.spawn(run(path.into(), rx, tx));
        Self {
            snapshots,
            outcomes,
            submitted: 0,
            completed: 0,
        }
    }

    /// Queues `contents` and returns its generation number.
    pub fn submit(&mut self, contents: String) -> Result<u64, StoreError> {
        let generation = self.submitted + 1;
        self.snapshots
            .send(Snapshot {
                generation,
                contents,
            })
            .map_err(|_| StoreError::WriterClosed)?;
        self.submitted = generation;
        Ok(generation)
    }

    pub fn try_outcome(&mut self) -> Option<WriteOutcome> {
        let outcome = self.outcomes.try_recv().ok()?;
        self.completed = self.completed.max(outcome.generation);
        Some(outcome)
    }

    pub fn is_idle(&self) -> bool {
        self.completed >= self.submitted
    }

    pub async fn flush(&mut self) -> Result<(), StoreError> {
        let mut first_error = None;
        while !self.is_idle() {
            let outcome = self.outcomes.recv().await.ok_or(StoreError::WriterClosed)?;
            self.record(outcome, &mut first_error);
        }
        first_error.map_or(Ok(()), Err)
    }

    pub fn flush_blocking(&mut self) -> Result<(), StoreError> {
        let mut first_error = None;
        while !self.is_idle() {
            let outcome = self.outcomes.blocking_recv().ok_or(StoreError::WriterClosed)?;
            self.record(outcome, &mut first_error);
        }
        first_error.map_or(Ok(()), Err)
    }

    fn record(&mut self, outcome: WriteOutcome, first_error: &mut Option<StoreError>) {
        self.completed = self.completed.max(outcome.generation);
        if let Err(e) = outcome.result {
            first_error.get_or_insert(e);
        }
    }
}

async fn run(
    path: PathBuf,
    mut snapshots: mpsc::UnboundedReceiver<Snapshot>,
    outcomes: mpsc::UnboundedSender<WriteOutcome>,
) {
    while let Some(mut snapshot) = snapshots.recv().await {
        while let Ok(newer) = snapshots.try_recv() {
            snapshot = newer;
        }

        let result = write_atomic(&path, &snapshot.contents).await;
        match &result {
            Ok(()) => log::debug!("background write #{} to {}", snapshot.generation, path.display()),
            Err(e) => log::error!("background write #{} failed: {}", snapshot.generation, e),
        }

        let outcome = WriteOutcome {
            generation: snapshot.generation,
            result,
        };
        if outcomes.send(outcome).is_err() {
            break;
        }
    }
}

async fn write_atomic(path: &Path, contents: &str) -> Result<(), StoreError> {
    let tmp = temp_path(path);
    tokio::fs::write(&tmp, contents)
        .await
        .map_err(|e| StoreError::io(&tmp, e))?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| StoreError::io(path, e))
}
