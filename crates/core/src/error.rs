//! Error types

use core::fmt;

/// Accepted input lengths for an algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputRule {
    /// Any length, including empty
    Any,
    /// Exactly this many bytes
    Exact(usize),
    /// At least this many bytes; all of them are hashed
    AtLeast(usize),
    /// At least this many bytes; only the leading ones are hashed
    Prefix(usize),
}

impl InputRule {
    /// Check `len` against the rule and return the slice the algorithm reads
    pub fn apply<'a>(&self, algorithm: &'static str, input: &'a [u8]) -> Result<&'a [u8]> {
        let ok = match *self {
            InputRule::Any => true,
            InputRule::Exact(n) => input.len() == n,
            InputRule::AtLeast(n) | InputRule::Prefix(n) => input.len() >= n,
        };
        if !ok {
            return Err(Error::InvalidInput {
                algorithm,
                expected: *self,
                actual: input.len(),
            });
        }
        Ok(match *self {
            InputRule::Prefix(n) => &input[..n],
            _ => input,
        })
    }
}

impl fmt::Display for InputRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputRule::Any => f.write_str("any length"),
            InputRule::Exact(n) => write!(f, "exactly {n} bytes"),
            InputRule::AtLeast(n) => write!(f, "at least {n} bytes"),
            InputRule::Prefix(n) => write!(f, "at least {n} bytes, first {n} hashed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("invalid input for {algorithm}: expected {expected}, got {actual} bytes")]
    InvalidInput {
        algorithm: &'static str,
        expected: InputRule,
        actual: usize,
    },

    #[error("key derivation failed: {0}")]
    Kdf(&'static str),
}

pub type Result<T> = core::result::Result<T, Error>;
