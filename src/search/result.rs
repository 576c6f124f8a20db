//! Search result types and statistics

#![allow(dead_code)]

use crate::archive::ArchiveError;
use crate::keyspace::WorkerRange;
use std::path::PathBuf;
use std::time::Duration;

/// The recovered password and who found it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundPassword {
    pub password: String,
    /// Keyspace index of the password.
    pub index: u64,
    pub worker_id: usize,
    /// Time from the start of the search to the match.
    pub elapsed: Duration,
    /// Where the decrypted entry was written, if anywhere.
    pub extracted_to: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// Stopped from outside, e.g. Ctrl-C.
    Interrupted,
    /// The configured overall timeout expired.
    TimedOut,
}

impl std::fmt::Display for CancelReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CancelReason::Interrupted => write!(f, "interrupted"),
            CancelReason::TimedOut => write!(f, "timed out"),
        }
    }
}

/// Run-fatal failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error(transparent)]
    Corrupt(#[from] ArchiveError),
    #[error("worker {worker_id} crashed: {message}")]
    WorkerCrashed { worker_id: usize, message: String },
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Found(FoundPassword),
    /// Every candidate was tried.
    NotFound,
    /// Stopped before the keyspace was covered.
    Cancelled(CancelReason),
    Error(SearchError),
}

impl SearchOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found(_))
    }
}

/// Where a worker ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Running,
    Succeeded,
    Exhausted,
    Cancelled,
    /// Reported corruption or crashed.
    Failed,
    /// Still running when the grace period expired.
    Unresponsive,
}

impl std::fmt::Display for WorkerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkerState::Running => write!(f, "running"),
            WorkerState::Succeeded => write!(f, "succeeded"),
            WorkerState::Exhausted => write!(f, "exhausted"),
            WorkerState::Cancelled => write!(f, "cancelled"),
            WorkerState::Failed => write!(f, "failed"),
            WorkerState::Unresponsive => write!(f, "unresponsive"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerStatistics {
    pub range: WorkerRange,
    pub candidates_evaluated: u64,
    pub state: WorkerState,
}

impl WorkerStatistics {
    pub fn new(range: WorkerRange) -> Self {
        Self {
            range,
            candidates_evaluated: 0,
            state: WorkerState::Running,
        }
    }
}

/// Statistics from a search operation
#[derive(Debug, Clone, Default)]
pub struct SearchStatistics {
    /// Total number of candidates, `A^L`
    pub keyspace_size: u64,
    /// Number of worker threads actually started
    pub workers_started: usize,
    /// Number of candidates verified across all workers
    pub candidates_evaluated: u64,
    /// Wall-clock time of the whole run
    pub elapsed_time: Duration,
    /// Per-worker breakdown
    pub workers: Vec<WorkerStatistics>,
}

impl SearchStatistics {
    pub fn new(keyspace_size: u64) -> Self {
        Self {
            keyspace_size,
            ..Default::default()
        }
    }

    /// Get candidates evaluated per second
    pub fn throughput(&self) -> f64 {
        let secs = self.elapsed_time.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.candidates_evaluated as f64 / secs
        }
    }

    /// Fraction of the keyspace covered (0.0 to 1.0)
    pub fn coverage(&self) -> f64 {
        if self.keyspace_size == 0 {
            0.0
        } else {
            self.candidates_evaluated as f64 / self.keyspace_size as f64
        }
    }

    /// Format statistics as a human-readable string
    pub fn format_summary(&self) -> String {
        let mut s = String::new();
        s.push_str(&format!("Time: {:.2?}\n", self.elapsed_time));
        s.push_str(&format!("Workers: {}\n", self.workers_started));
        s.push_str(&format!(
            "Candidates evaluated: {} of {} ({:.2}%)\n",
            self.candidates_evaluated,
            self.keyspace_size,
            self.coverage() * 100.0
        ));
        s.push_str(&format!(
            "Throughput: {:.0} candidates/sec\n",
            self.throughput()
        ));
        for worker in &self.workers {
            s.push_str(&format!(
                "  worker {} {}: {} candidates, {}\n",
                worker.range.worker_id, worker.range, worker.candidates_evaluated, worker.state
            ));
        }
        s
    }
}

/// Terminal outcome of a run plus how it got there.
#[derive(Debug, Clone)]
pub struct SearchReport {
    pub outcome: SearchOutcome,
    pub statistics: SearchStatistics,
}

impl SearchReport {
    /// Report for a run that failed before any worker started.
    pub fn failed_before_start(error: SearchError, keyspace_size: u64) -> Self {
        Self {
            outcome: SearchOutcome::Error(error),
            statistics: SearchStatistics::new(keyspace_size),
        }
    }
}

impl std::fmt::Display for SearchReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.outcome {
            SearchOutcome::Found(found) => {
                writeln!(f, "Success! The password is: {}", found.password)?;
                writeln!(f, "Found by worker {} after {:.2?}", found.worker_id, found.elapsed)?;
                match &found.extracted_to {
                    Some(path) => writeln!(f, "Decrypted entry written to: {}", path.display())?,
                    None => writeln!(f, "Decrypted entry was not written")?,
                }
            }
            SearchOutcome::NotFound => {
                writeln!(
                    f,
                    "Password not found: all {} candidates tried.",
                    self.statistics.keyspace_size
                )?;
            }
            SearchOutcome::Cancelled(reason) => {
                writeln!(
                    f,
                    "Search aborted ({}) after {} of {} candidates.",
                    reason, self.statistics.candidates_evaluated, self.statistics.keyspace_size
                )?;
            }
            SearchOutcome::Error(error) => {
                writeln!(f, "Error: {}", error)?;
            }
        }
        Ok(())
    }
}
