//! A single search worker: walks its range and verifies every candidate.

use crate::archive::{Outcome, Verifier, VerifierFactory};
use crate::keyspace::{Keyspace, WorkerRange};
use crate::search::parallel::channel::{CancellationToken, ProgressCounter, WorkerMessage};
use std::time::Instant;
use tracing::debug;

/// Candidates verified between flushes of the shared progress counter.
const PROGRESS_BATCH: u64 = 256;

/// Open a private verifier and search `range`. Returns the worker's one
/// terminal report.
pub fn run_worker<F: VerifierFactory>(
    range: WorkerRange,
    keyspace: &Keyspace,
    factory: &F,
    cancel: &CancellationToken,
    progress: &ProgressCounter,
    started: Instant,
) -> WorkerMessage {
    debug!(worker = range.worker_id, range = %range, "worker started");

    let message = match factory.open() {
        Ok(mut verifier) => search_range(range, keyspace, &mut verifier, cancel, progress, started),
        Err(error) => {
            cancel.cancel();
            WorkerMessage::Corrupt {
                worker_id: range.worker_id,
                error,
                candidates_evaluated: 0,
            }
        }
    };

    debug!(
        worker = range.worker_id,
        candidates = message.candidates_evaluated().unwrap_or(0),
        "worker finished"
    );
    message
}

/// Verify every index of `range` in ascending order, checking `cancel`
/// before each candidate.
pub fn search_range<V: Verifier>(
    range: WorkerRange,
    keyspace: &Keyspace,
    verifier: &mut V,
    cancel: &CancellationToken,
    progress: &ProgressCounter,
    started: Instant,
) -> WorkerMessage {
    let worker_id = range.worker_id;
    let mut candidate = String::with_capacity(keyspace.length());
    let mut evaluated = 0u64;
    let mut unflushed = 0u64;

    let message = 'search: {
        for index in range.start..range.end {
            if cancel.is_cancelled() {
                break 'search WorkerMessage::Cancelled {
                    worker_id,
                    candidates_evaluated: evaluated,
                };
            }

            if let Err(e) = keyspace.decode_into(index, &mut candidate) {
                // Only reachable if the range was not built from this keyspace.
                break 'search WorkerMessage::Crashed {
                    worker_id,
                    message: e.to_string(),
                };
            }

            evaluated += 1;
            unflushed += 1;
            if unflushed == PROGRESS_BATCH {
                progress.add(unflushed);
                unflushed = 0;
            }

            match verifier.verify(&candidate) {
                Outcome::Mismatch => {}
                Outcome::Match => {
                    let elapsed = started.elapsed();
                    let signalled_stop = cancel.cancel();
                    // Losing the race to a stop means this match is not reported.
                    let extracted_to = if signalled_stop {
                        verifier.materialize()
                    } else {
                        None
                    };
                    break 'search WorkerMessage::Found {
                        worker_id,
                        password: candidate,
                        index,
                        elapsed,
                        extracted_to,
                        candidates_evaluated: evaluated,
                        signalled_stop,
                    };
                }
                Outcome::Corrupt(error) => {
                    cancel.cancel();
                    break 'search WorkerMessage::Corrupt {
                        worker_id,
                        error,
                        candidates_evaluated: evaluated,
                    };
                }
            }
        }

        WorkerMessage::Exhausted {
            worker_id,
            candidates_evaluated: evaluated,
        }
    };

    progress.add(unflushed);
    message
}
