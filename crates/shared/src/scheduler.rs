//! Debounced snapshot writes.
//!
//! Rapid edits are coalesced: every scheduled snapshot replaces the pending
//! one and pushes the write back by the idle delay. Only the last settled
//! state has to reach the store. `flush` writes immediately and `shutdown`
//! always writes whatever is pending before the task stops.

use crate::error::TierListError;
use crate::models::Snapshot;
use crate::store::{SaveOutcome, SnapshotStore};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

/// Default idle delay before a scheduled snapshot is written
pub const DEFAULT_SAVE_DELAY: Duration = Duration::from_millis(500);

enum SaveCommand {
    Schedule(Snapshot),
    Clear,
    Flush(oneshot::Sender<()>),
    Shutdown,
}

/// Counters reported when the scheduler stops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveStats {
    pub scheduled: usize,
    pub written: usize,
    pub dropped: usize,
}

/// Cloneable handle used to queue snapshots
#[derive(Clone)]
pub struct SaveHandle {
    tx: mpsc::UnboundedSender<SaveCommand>,
}

impl SaveHandle {
    /// Replace the pending snapshot and restart the idle timer
    pub fn schedule(&self, snapshot: Snapshot) {
        if self.tx.send(SaveCommand::Schedule(snapshot)).is_err() {
            warn!("Save scheduler stopped, change will not be persisted");
        }
    }

    /// Drop any pending snapshot and remove the stored one
    pub fn clear(&self) {
        if self.tx.send(SaveCommand::Clear).is_err() {
            warn!("Save scheduler stopped, stored data was not cleared");
        }
    }
}

/// Background task owning the snapshot store
pub struct SaveScheduler {
    handle: SaveHandle,
    task: JoinHandle<SaveStats>,
}

impl SaveScheduler {
    /// Spawn the scheduler on the current tokio runtime
    pub fn spawn(store: SnapshotStore, delay: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(store, rx, delay));
        info!(delay_ms = delay.as_millis() as u64, "Save scheduler started");

        Self {
            handle: SaveHandle { tx },
            task,
        }
    }

    pub fn handle(&self) -> SaveHandle {
        self.handle.clone()
    }

    /// Write the pending snapshot now
    pub async fn flush(&self) -> Result<(), TierListError> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.handle
            .tx
            .send(SaveCommand::Flush(ack_tx))
            .map_err(|_| TierListError::Persistence("save scheduler stopped".into()))?;
        ack_rx
            .await
            .map_err(|_| TierListError::Persistence("save scheduler stopped".into()))
    }

    /// Write anything pending and stop the task
    pub async fn shutdown(self) -> Result<SaveStats, TierListError> {
        // The task may already be gone; awaiting it still yields its stats
        let _ = self.handle.tx.send(SaveCommand::Shutdown);
        self.task
            .await
            .map_err(|e| TierListError::Persistence(format!("save scheduler failed: {}", e)))
    }
}

async fn run(mut store: SnapshotStore, mut rx: mpsc::UnboundedReceiver<SaveCommand>, delay: Duration) -> SaveStats {
    let mut stats = SaveStats::default();
    let mut pending: Option<Snapshot> = None;
    let mut deadline: Option<Instant> = None;

    loop {
        tokio::select! {
            command = rx.recv() => match command {
                Some(SaveCommand::Schedule(snapshot)) => {
                    stats.scheduled += 1;
                    pending = Some(snapshot);
                    deadline = Some(Instant::now() + delay);
                }
                Some(SaveCommand::Clear) => {
                    pending = None;
                    deadline = None;
                    store.clear();
                }
                Some(SaveCommand::Flush(ack)) => {
                    write_pending(&mut store, &mut pending, &mut stats);
                    deadline = None;
                    let _ = ack.send(());
                }
                Some(SaveCommand::Shutdown) | None => {
                    write_pending(&mut store, &mut pending, &mut stats);
                    break;
                }
            },
            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                write_pending(&mut store, &mut pending, &mut stats);
                deadline = None;
            }
        }
    }

    info!(
        scheduled = stats.scheduled,
        written = stats.written,
        dropped = stats.dropped,
        "Save scheduler stopped"
    );
    stats
}

fn write_pending(store: &mut SnapshotStore, pending: &mut Option<Snapshot>, stats: &mut SaveStats) {
    let Some(snapshot) = pending.take() else {
        return;
    };

    match store.save(&snapshot) {
        SaveOutcome::Dropped => stats.dropped += 1,
        outcome => {
            stats.written += 1;
            debug!(outcome = ?outcome, "Wrote pending snapshot");
        }
    }
}
