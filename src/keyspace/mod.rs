//! Candidate enumeration over a fixed alphabet and length.
//!
//! Every candidate password is addressed by an index in `[0, A^L)`. The index
//! is read as an `L`-digit base-`A` number, most-significant digit first, so
//! `decode` and `encode` form a bijection between indices and strings. Workers
//! never share an index, which is what keeps the search free of duplicate work.

#![allow(dead_code)]

pub mod alphabet;
pub mod partition;

pub use alphabet::{Alphabet, DEFAULT_ALPHABET};
pub use partition::{WorkerRange, partition};

/// Errors raised while building or addressing a keyspace.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyspaceError {
    #[error("alphabet must contain at least one symbol")]
    EmptyAlphabet,
    #[error("alphabet contains duplicate symbol '{0}'")]
    DuplicateSymbol(char),
    #[error("candidate length must be at least 1")]
    ZeroLength,
    #[error("keyspace of {alphabet}^{length} candidates does not fit in 64 bits")]
    TooLarge { alphabet: usize, length: usize },
    #[error("index {index} is outside the keyspace [0, {size})")]
    IndexOutOfRange { index: u64, size: u64 },
    #[error("candidate has length {actual}, expected {expected}")]
    WrongLength { expected: usize, actual: usize },
    #[error("symbol '{0}' is not part of the alphabet")]
    UnknownSymbol(char),
    #[error("at least one worker is required to partition the keyspace")]
    NoWorkers,
}

/// The set of all length-`L` strings over an alphabet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyspace {
    alphabet: Alphabet,
    length: usize,
    size: u64,
    /// Place value of the most significant digit, `A^(L-1)`.
    lead_weight: u64,
}

impl Keyspace {
    pub fn new(alphabet: Alphabet, length: usize) -> Result<Self, KeyspaceError> {
        if length == 0 {
            return Err(KeyspaceError::ZeroLength);
        }

        let too_large = KeyspaceError::TooLarge {
            alphabet: alphabet.len(),
            length,
        };
        let exponent = u32::try_from(length).map_err(|_| too_large.clone())?;
        let size = (alphabet.len() as u64)
            .checked_pow(exponent)
            .ok_or(too_large)?;
        // A^(L-1) <= A^L, which already fits
        let lead_weight = size / alphabet.len() as u64;

        Ok(Self {
            alphabet,
            length,
            size,
            lead_weight,
        })
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Total number of candidates, `A^L`.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Map an index to its candidate string.
    pub fn decode(&self, index: u64) -> Result<String, KeyspaceError> {
        let mut candidate = String::with_capacity(self.length);
        self.decode_into(index, &mut candidate)?;
        Ok(candidate)
    }

    /// Like [`Keyspace::decode`], but reuses `out` so the hot loop does not
    /// allocate. `out` is cleared first.
    pub fn decode_into(&self, index: u64, out: &mut String) -> Result<(), KeyspaceError> {
        if index >= self.size {
            return Err(KeyspaceError::IndexOutOfRange {
                index,
                size: self.size,
            });
        }

        let radix = self.alphabet.len() as u64;
        let mut rest = index;
        let mut weight = self.lead_weight;

        out.clear();
        for _ in 0..self.length {
            // digit < radix because rest < radix * weight
            if let Some(symbol) = self.alphabet.symbol((rest / weight) as usize) {
                out.push(symbol);
            }
            rest %= weight;
            weight = (weight / radix).max(1);
        }
        Ok(())
    }

    /// Map a candidate string back to its index.
    pub fn encode(&self, candidate: &str) -> Result<u64, KeyspaceError> {
        let actual = candidate.chars().count();
        if actual != self.length {
            return Err(KeyspaceError::WrongLength {
                expected: self.length,
                actual,
            });
        }

        let radix = self.alphabet.len() as u64;
        candidate.chars().try_fold(0u64, |acc, symbol| {
            let digit = self
                .alphabet
                .position(symbol)
                .ok_or(KeyspaceError::UnknownSymbol(symbol))?;
            // Cannot overflow: the result is below size, which fits in u64.
            Ok(acc * radix + digit as u64)
        })
    }
}
