//! Encrypted archive access.
//!
//! The archive is probed once up front so structural problems (missing file,
//! not a zip, no entries) end the run before any worker starts. Workers then
//! open their own read-only handles through [`VerifierFactory`].

pub mod target;
pub mod verifier;

#[cfg(test)]
pub mod fixtures;

pub use target::ZipTarget;
pub use verifier::{Outcome, Verifier, VerifierFactory};

use std::path::PathBuf;

/// Structural failures. No password can fix any of these.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArchiveError {
    #[error("archive {} does not exist", path.display())]
    Missing { path: PathBuf },
    #[error("archive {} could not be read: {reason}", path.display())]
    Unreadable { path: PathBuf, reason: String },
    #[error("not a valid zip archive: {reason}")]
    NotAnArchive { reason: String },
    #[error("archive contains no entries")]
    NoEntries,
    #[error("entry '{entry}' is not encrypted")]
    NotEncrypted { entry: String },
    #[error("entry '{entry}' is corrupt: {reason}")]
    EntryCorrupt { entry: String, reason: String },
}
