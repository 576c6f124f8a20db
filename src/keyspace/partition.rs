//! Splitting the index space into per-worker ranges.

use crate::keyspace::KeyspaceError;

/// Half-open index range `[start, end)` owned by exactly one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerRange {
    pub worker_id: usize,
    pub start: u64,
    pub end: u64,
}

impl WorkerRange {
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, index: u64) -> bool {
        (self.start..self.end).contains(&index)
    }
}

impl std::fmt::Display for WorkerRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Divide `[0, total)` into `workers` contiguous, non-overlapping ranges.
///
/// Rank `r` gets `[floor(total*r/K), floor(total*(r+1)/K))`, and the last
/// rank always ends at `total`, so the ranges cover the space exactly once
/// whether or not `total` divides evenly. With more workers than indices some
/// ranges are empty.
pub fn partition(total: u64, workers: usize) -> Result<Vec<WorkerRange>, KeyspaceError> {
    if workers == 0 {
        return Err(KeyspaceError::NoWorkers);
    }

    let boundary = |rank: usize| -> u64 {
        // total * rank / workers <= total, so the narrowing cast is lossless
        ((total as u128 * rank as u128) / workers as u128) as u64
    };

    let ranges = (0..workers)
        .map(|rank| WorkerRange {
            worker_id: rank,
            start: boundary(rank),
            end: if rank == workers - 1 {
                total
            } else {
                boundary(rank + 1)
            },
        })
        .collect();

    Ok(ranges)
}
