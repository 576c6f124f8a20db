//! Per-candidate password verification.

use crate::archive::ArchiveError;
use std::path::PathBuf;

/// Result of trying one candidate against the target entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The candidate decrypts the entry to a non-empty plaintext.
    Match,
    /// Wrong password. Expected for almost every candidate.
    Mismatch,
    /// The entry cannot be processed no matter which password is tried.
    Corrupt(ArchiveError),
}

/// Something that can test a password against one encrypted entry.
///
/// Implementations hold their own handle on the archive and are used by a
/// single worker thread, so they need not be `Send` or `Sync`.
pub trait Verifier {
    fn verify(&mut self, candidate: &str) -> Outcome;

    /// Write the plaintext of the last [`Outcome::Match`] somewhere durable and
    /// return where. Called at most once, by the worker that stopped the
    /// search.
    fn materialize(&self) -> Option<PathBuf> {
        None
    }
}

/// Opens independent [`Verifier`]s, one per worker.
pub trait VerifierFactory: Send + Sync {
    type Verifier: Verifier;

    /// Open a fresh, isolated verifier. Called from inside the worker thread.
    fn open(&self) -> Result<Self::Verifier, ArchiveError>;
}
