//! Error types for the ctpack wire primitives.
//!
//! Reading and writing fail in disjoint ways, so each direction has its own enum.

use std::fmt;

/// Failures while reading raw wire bytes through a [`Cursor`](crate::Cursor).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The buffer ended before `needed` bytes could be read.
    UnexpectedEnd { needed: usize, remaining: usize },
    /// String bytes on the wire are not valid UTF-8.
    InvalidUtf8,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::UnexpectedEnd { needed, remaining } => write!(
                f,
                "unexpected end of buffer: needed {} bytes, {} remaining",
                needed, remaining
            ),
            DecodeError::InvalidUtf8 => write!(f, "string is not valid UTF-8"),
        }
    }
}

impl std::error::Error for DecodeError {}

/// Failures while writing wire bytes through an [`Encoder`](crate::Encoder).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// A string is longer than a `u32` length prefix can describe.
    BlobTooLarge(usize),
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::BlobTooLarge(len) => {
                write!(f, "string of {} bytes exceeds u32 length prefix", len)
            }
        }
    }
}

impl std::error::Error for EncodeError {}
