//! Parallel keyspace search.
//!
//! This module runs one worker thread per keyspace partition and decides the
//! run's outcome from their reports.
//!
//! # Architecture
//!
//! The parallel search system consists of:
//! - A **coordinator** that partitions the keyspace, spawns workers and
//!   turns their reports into a single [`SearchOutcome`](crate::search::SearchOutcome)
//! - Multiple **workers**, each owning a disjoint index range and a private
//!   verifier handle
//! - A **result channel** with one slot per worker for terminal reports
//! - A shared **cancellation token** polled before every candidate
//!
//! # Example
//!
//! ```ignore
//! use zipsweep::search::parallel::{CancellationToken, ParallelConfig, run_parallel_search};
//!
//! let config = ParallelConfig::default()
//!     .with_workers(4)
//!     .with_grace_period(Duration::from_secs(2));
//!
//! let report = run_parallel_search(Arc::new(target), &keyspace, &config, &CancellationToken::new())?;
//! ```

pub mod channel;
pub mod config;
pub mod coordinator;
pub mod worker;

#[cfg(test)]
pub mod testing;

pub use channel::CancellationToken;
pub use config::ParallelConfig;
pub use coordinator::run_parallel_search;
