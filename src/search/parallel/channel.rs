//! Result channel and shared signals for parallel search workers.

#![allow(dead_code)]

use crate::archive::ArchiveError;
use crossbeam_channel::{Receiver, Sender, bounded};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

/// Terminal report sent by a worker. Each worker sends exactly one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerMessage {
    /// Worker found the password.
    Found {
        worker_id: usize,
        password: String,
        index: u64,
        elapsed: Duration,
        extracted_to: Option<PathBuf>,
        candidates_evaluated: u64,
        /// True if this worker set the cancellation signal. False means the
        /// search had already been stopped by someone else.
        signalled_stop: bool,
    },
    /// Worker covered its whole range without a match.
    Exhausted {
        worker_id: usize,
        candidates_evaluated: u64,
    },
    /// Worker observed the cancellation signal and stopped early.
    Cancelled {
        worker_id: usize,
        candidates_evaluated: u64,
    },
    /// The archive became unusable for this worker.
    Corrupt {
        worker_id: usize,
        error: ArchiveError,
        candidates_evaluated: u64,
    },
    /// Worker panicked; its range is only partially searched.
    Crashed { worker_id: usize, message: String },
}

impl WorkerMessage {
    pub fn worker_id(&self) -> usize {
        match self {
            WorkerMessage::Found { worker_id, .. }
            | WorkerMessage::Exhausted { worker_id, .. }
            | WorkerMessage::Cancelled { worker_id, .. }
            | WorkerMessage::Corrupt { worker_id, .. }
            | WorkerMessage::Crashed { worker_id, .. } => *worker_id,
        }
    }

    /// Candidates the worker verified. A crashed worker's count is unknown.
    pub fn candidates_evaluated(&self) -> Option<u64> {
        match self {
            WorkerMessage::Found {
                candidates_evaluated,
                ..
            }
            | WorkerMessage::Exhausted {
                candidates_evaluated,
                ..
            }
            | WorkerMessage::Cancelled {
                candidates_evaluated,
                ..
            }
            | WorkerMessage::Corrupt {
                candidates_evaluated,
                ..
            } => Some(*candidates_evaluated),
            WorkerMessage::Crashed { .. } => None,
        }
    }
}

/// Shared stop flag. Set once, never cleared during a run.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal all workers to stop. Returns true only for the call that
    /// actually flipped the flag; later calls are no-ops.
    pub fn cancel(&self) -> bool {
        !self.flag.swap(true, Ordering::SeqCst)
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Running total of candidates tried across all workers.
#[derive(Debug, Clone, Default)]
pub struct ProgressCounter {
    tried: Arc<AtomicU64>,
}

impl ProgressCounter {
    pub fn add(&self, candidates: u64) {
        if candidates > 0 {
            self.tried.fetch_add(candidates, Ordering::Relaxed);
        }
    }

    pub fn get(&self) -> u64 {
        self.tried.load(Ordering::Relaxed)
    }
}

/// Channel endpoints for a worker.
pub struct WorkerChannels {
    /// Send the terminal report to the coordinator.
    pub to_coordinator: Sender<WorkerMessage>,
    /// Stop flag shared with every other worker and the coordinator.
    pub cancel: CancellationToken,
    /// Shared progress total, flushed in batches.
    pub progress: ProgressCounter,
}

/// Channel endpoints for the coordinator.
pub struct CoordinatorChannels {
    /// Receive terminal reports from workers.
    pub from_workers: Receiver<WorkerMessage>,
    pub cancel: CancellationToken,
    pub progress: ProgressCounter,
}

/// Create channels for parallel search with the given number of workers.
///
/// The result channel has one slot per worker, so a worker's single send
/// never blocks even if the coordinator has stopped reading.
pub fn create_channels(
    num_workers: usize,
    cancel: &CancellationToken,
) -> (CoordinatorChannels, Vec<WorkerChannels>) {
    let progress = ProgressCounter::default();
    let (worker_tx, coordinator_rx) = bounded(num_workers.max(1));

    let worker_channels = (0..num_workers)
        .map(|_| WorkerChannels {
            to_coordinator: worker_tx.clone(),
            cancel: cancel.clone(),
            progress: progress.clone(),
        })
        .collect();

    let coordinator = CoordinatorChannels {
        from_workers: coordinator_rx,
        cancel: cancel.clone(),
        progress,
    };

    (coordinator, worker_channels)
}
