//! Parallel search coordinator that manages worker threads.

use crate::archive::VerifierFactory;
use crate::keyspace::{Keyspace, KeyspaceError, partition};
use crate::search::parallel::channel::{
    CancellationToken, CoordinatorChannels, WorkerMessage, create_channels,
};
use crate::search::parallel::config::ParallelConfig;
use crate::search::parallel::worker::run_worker;
use crate::search::result::{
    CancelReason, FoundPassword, SearchError, SearchOutcome, SearchReport, SearchStatistics,
    WorkerState, WorkerStatistics,
};
use crossbeam_channel::RecvTimeoutError;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Upper bound on how long the coordinator blocks before re-checking the
/// cancellation signal, the timeout and the progress clock.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Search the whole keyspace with `config.num_workers` threads.
///
/// Returns once the outcome is decided and every worker has reported, or the
/// grace period after the decision has run out.
pub fn run_parallel_search<F>(
    factory: Arc<F>,
    keyspace: &Keyspace,
    config: &ParallelConfig,
    cancel: &CancellationToken,
) -> Result<SearchReport, KeyspaceError>
where
    F: VerifierFactory + 'static,
{
    let start_time = Instant::now();
    let ranges = partition(keyspace.size(), config.num_workers)?;
    let (coordinator_channels, worker_channels) = create_channels(ranges.len(), cancel);
    let keyspace = Arc::new(keyspace.clone());

    info!(
        workers = ranges.len(),
        keyspace = keyspace.size(),
        "starting parallel search"
    );

    let mut workers: Vec<WorkerStatistics> =
        ranges.iter().copied().map(WorkerStatistics::new).collect();
    let mut handles: Vec<Option<JoinHandle<()>>> = Vec::with_capacity(ranges.len());
    let mut spawn_failure = None;

    for (range, channels) in ranges.into_iter().zip(worker_channels) {
        let factory = Arc::clone(&factory);
        let keyspace = Arc::clone(&keyspace);
        let worker_id = range.worker_id;

        let spawned = thread::Builder::new()
            .name(format!("worker-{}", worker_id))
            .spawn(move || {
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                    run_worker(
                        range,
                        &keyspace,
                        factory.as_ref(),
                        &channels.cancel,
                        &channels.progress,
                        start_time,
                    )
                }));
                let message = outcome.unwrap_or_else(|payload| {
                    channels.cancel.cancel();
                    WorkerMessage::Crashed {
                        worker_id,
                        message: panic_message(payload.as_ref()),
                    }
                });
                // One slot per worker, so this never blocks.
                let _ = channels.to_coordinator.send(message);
            });

        match spawned {
            Ok(handle) => handles.push(Some(handle)),
            Err(e) => {
                cancel.cancel();
                workers[worker_id].state = WorkerState::Failed;
                spawn_failure.get_or_insert(SearchError::WorkerCrashed {
                    worker_id,
                    message: format!("failed to spawn thread: {}", e),
                });
                handles.push(None);
            }
        }
    }

    let workers_started = handles.iter().filter(|h| h.is_some()).count();
    let outcome = run_coordinator(
        coordinator_channels,
        &mut workers,
        config,
        start_time,
        keyspace.size(),
        spawn_failure.map(SearchOutcome::Error),
    );

    for (worker_id, handle) in handles.into_iter().enumerate() {
        let Some(handle) = handle else { continue };
        if handle.is_finished() {
            let _ = handle.join();
        } else {
            // Cannot kill a thread; it dies with the process.
            warn!(worker = worker_id, "worker did not stop within the grace period, detaching");
        }
    }

    let mut statistics = SearchStatistics::new(keyspace.size());
    statistics.workers_started = workers_started;
    statistics.candidates_evaluated = workers.iter().map(|w| w.candidates_evaluated).sum();
    statistics.elapsed_time = start_time.elapsed();
    statistics.workers = workers;

    info!(
        candidates = statistics.candidates_evaluated,
        elapsed = ?statistics.elapsed_time,
        "parallel search finished"
    );

    Ok(SearchReport {
        outcome,
        statistics,
    })
}

/// Coordinator loop: collect worker reports and decide the outcome.
///
/// The first decisive report wins; later reports only update statistics.
/// Once the cancellation signal is up (for any reason) the loop drains
/// reports until every worker has answered or the grace period ends. If
/// the signal was raised and no worker explains why, the run was
/// interrupted from outside.
fn run_coordinator(
    channels: CoordinatorChannels,
    workers: &mut [WorkerStatistics],
    config: &ParallelConfig,
    start_time: Instant,
    keyspace_size: u64,
    mut decision: Option<SearchOutcome>,
) -> SearchOutcome {
    let deadline = config.timeout.map(|t| start_time + t);
    let mut drain_deadline: Option<Instant> = None;
    let mut last_progress = Instant::now();

    loop {
        if drain_deadline.is_none() {
            if decision.is_none()
                && deadline.is_some_and(|d| Instant::now() >= d)
                && channels.cancel.cancel()
            {
                decision = Some(SearchOutcome::Cancelled(CancelReason::TimedOut));
            }
            if decision.is_some() || channels.cancel.is_cancelled() {
                drain_deadline = Some(Instant::now() + config.grace_period);
            }
        }

        if workers.iter().all(|w| w.state != WorkerState::Running) {
            break;
        }

        let mut wait = POLL_INTERVAL;
        if let Some(drain) = drain_deadline {
            let now = Instant::now();
            if now >= drain {
                break;
            }
            wait = wait.min(drain - now);
        }

        match channels.from_workers.recv_timeout(wait) {
            Ok(msg) => {
                if let Some(worker) = workers.get_mut(msg.worker_id()) {
                    worker.candidates_evaluated = msg.candidates_evaluated().unwrap_or(0);
                    worker.state = match &msg {
                        WorkerMessage::Found { .. } => WorkerState::Succeeded,
                        WorkerMessage::Exhausted { .. } => WorkerState::Exhausted,
                        WorkerMessage::Cancelled { .. } => WorkerState::Cancelled,
                        WorkerMessage::Corrupt { .. } | WorkerMessage::Crashed { .. } => {
                            WorkerState::Failed
                        }
                    };
                }

                let decided = handle_message(msg, &channels.cancel);
                if decision.is_none() {
                    decision = decided;
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                // All senders dropped, nobody else will report
                break;
            }
        }

        if last_progress.elapsed() >= config.progress_interval {
            log_progress(channels.progress.get(), keyspace_size, start_time);
            last_progress = Instant::now();
        }
    }

    for (worker_id, worker) in workers.iter_mut().enumerate() {
        if worker.state != WorkerState::Running {
            continue;
        }
        worker.state = WorkerState::Unresponsive;
        if decision.is_none() && !channels.cancel.is_cancelled() {
            // Exited without reporting: its range is not fully covered.
            channels.cancel.cancel();
            decision = Some(SearchOutcome::Error(SearchError::WorkerCrashed {
                worker_id,
                message: "worker exited without reporting".to_string(),
            }));
        }
    }

    decision.unwrap_or_else(|| {
        if channels.cancel.is_cancelled() {
            SearchOutcome::Cancelled(CancelReason::Interrupted)
        } else {
            SearchOutcome::NotFound
        }
    })
}

/// Map one worker report to a decision, if it is decisive.
fn handle_message(msg: WorkerMessage, cancel: &CancellationToken) -> Option<SearchOutcome> {
    match msg {
        WorkerMessage::Found {
            worker_id,
            password,
            index,
            elapsed,
            extracted_to,
            signalled_stop,
            ..
        } => {
            if !signalled_stop {
                // The search was stopped before this match landed.
                warn!(
                    worker = worker_id,
                    %password,
                    "password found after the search was stopped"
                );
                return None;
            }
            info!(worker = worker_id, elapsed = ?elapsed, "password found");
            Some(SearchOutcome::Found(FoundPassword {
                password,
                index,
                worker_id,
                elapsed,
                extracted_to,
            }))
        }
        WorkerMessage::Exhausted {
            worker_id,
            candidates_evaluated,
        } => {
            debug!(worker = worker_id, candidates = candidates_evaluated, "range exhausted");
            None
        }
        WorkerMessage::Cancelled {
            worker_id,
            candidates_evaluated,
        } => {
            debug!(worker = worker_id, candidates = candidates_evaluated, "worker cancelled");
            None
        }
        WorkerMessage::Corrupt {
            worker_id, error, ..
        } => {
            cancel.cancel();
            warn!(worker = worker_id, error = %error, "archive is corrupt, aborting search");
            Some(SearchOutcome::Error(SearchError::Corrupt(error)))
        }
        WorkerMessage::Crashed { worker_id, message } => {
            cancel.cancel();
            warn!(worker = worker_id, %message, "worker crashed, aborting search");
            Some(SearchOutcome::Error(SearchError::WorkerCrashed {
                worker_id,
                message,
            }))
        }
    }
}

fn log_progress(tried: u64, total: u64, start_time: Instant) {
    let secs = start_time.elapsed().as_secs_f64();
    let rate = if secs > 0.0 { tried as f64 / secs } else { 0.0 };
    let percent = if total > 0 {
        tried as f64 * 100.0 / total as f64
    } else {
        0.0
    };
    info!(
        tried,
        total,
        percent = format_args!("{:.2}", percent),
        rate = format_args!("{:.0}/s", rate),
        "progress"
    );
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
