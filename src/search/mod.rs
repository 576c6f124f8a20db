//! Exhaustive password search over an encrypted zip entry
//!
//! This module ties the pieces together:
//! - Keyspace: which candidates exist and in what order
//! - Archive: how a single candidate is checked
//! - Parallel: how the keyspace is split across workers and how they stop

pub mod config;
pub mod parallel;
pub mod result;

pub use config::SearchConfig;
pub use parallel::{CancellationToken, ParallelConfig, run_parallel_search};
pub use result::{SearchOutcome, SearchReport};

use crate::archive::ZipTarget;
use crate::keyspace::KeyspaceError;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Recover the password of the first entry in the archive at `path`.
///
/// Structural problems with the archive are reported as
/// [`SearchOutcome::Error`] before any worker is started. Only an invalid
/// keyspace configuration is returned as `Err`.
pub fn crack_archive(
    path: &Path,
    search_config: &SearchConfig,
    parallel_config: &ParallelConfig,
    cancel: &CancellationToken,
) -> Result<SearchReport, KeyspaceError> {
    let keyspace = search_config.keyspace()?;

    let target = match ZipTarget::probe(path) {
        Ok(target) => target.with_extract_dir(search_config.extract_dir.clone()),
        Err(error) => {
            return Ok(SearchReport::failed_before_start(
                error.into(),
                keyspace.size(),
            ));
        }
    };

    info!(
        archive = %target.path().display(),
        entry = %target.entry_name(),
        alphabet = %keyspace.alphabet(),
        length = keyspace.length(),
        "searching for password"
    );

    run_parallel_search(Arc::new(target), &keyspace, parallel_config, cancel)
}
