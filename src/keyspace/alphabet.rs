//! Ordered symbol set that candidate passwords are drawn from.

use crate::keyspace::KeyspaceError;

/// Lowercase ASCII letters followed by decimal digits.
pub const DEFAULT_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz0123456789";

/// An ordered, duplicate-free set of symbols.
///
/// The position of a symbol is its digit value in the mixed-radix encoding,
/// so `"ab"` and `"ba"` describe different keyspaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<char>,
}

impl Alphabet {
    pub fn new(symbols: &str) -> Result<Self, KeyspaceError> {
        let mut seen = Vec::new();
        for symbol in symbols.chars() {
            if seen.contains(&symbol) {
                return Err(KeyspaceError::DuplicateSymbol(symbol));
            }
            seen.push(symbol);
        }

        if seen.is_empty() {
            return Err(KeyspaceError::EmptyAlphabet);
        }

        Ok(Self { symbols: seen })
    }

    /// Number of symbols (the radix `A`).
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Symbol for a digit value. `None` when `digit >= len()`.
    pub fn symbol(&self, digit: usize) -> Option<char> {
        self.symbols.get(digit).copied()
    }

    /// Digit value of a symbol, if it belongs to the alphabet.
    pub fn position(&self, symbol: char) -> Option<usize> {
        self.symbols.iter().position(|&s| s == symbol)
    }

    pub fn as_string(&self) -> String {
        self.symbols.iter().collect()
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_ALPHABET.chars().collect(),
        }
    }
}

impl std::fmt::Display for Alphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({} symbols)", self.as_string(), self.len())
    }
}

impl std::str::FromStr for Alphabet {
    type Err = KeyspaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
