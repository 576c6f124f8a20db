//! Configuration for the candidate space and what to do with a match.

use crate::keyspace::{Alphabet, Keyspace, KeyspaceError};
use std::path::PathBuf;

/// Default candidate length.
pub const DEFAULT_LENGTH: usize = 6;

/// Main search configuration
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Symbols candidates are built from
    pub alphabet: Alphabet,
    /// Exact candidate length
    pub length: usize,
    /// Directory the decrypted entry is written to (None = do not extract)
    pub extract_dir: Option<PathBuf>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            alphabet: Alphabet::default(),
            length: DEFAULT_LENGTH,
            extract_dir: Some(PathBuf::from(".")),
        }
    }
}

impl SearchConfig {
    pub fn with_alphabet(mut self, alphabet: Alphabet) -> Self {
        self.alphabet = alphabet;
        self
    }

    pub fn with_length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }

    pub fn with_extract_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.extract_dir = dir;
        self
    }

    /// Build the keyspace this configuration describes.
    pub fn keyspace(&self) -> Result<Keyspace, KeyspaceError> {
        Keyspace::new(self.alphabet.clone(), self.length)
    }
}
