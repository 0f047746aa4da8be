//! # Error Types: Structured Error Hierarchy
//!
//! Defines the error types used throughout the accumulator. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - A proof that does not check out is a normal `Ok(false)`, never an error.
//!   Every variant here means the caller or a collaborator did something
//!   wrong, so callers can tell "proof invalid" from "engine malfunction".
//! - Store failures are carried through unchanged in [`MmrError::Store`].
//! - A missing node at a position the arithmetic says must exist is
//!   [`MmrError::NotFound`] and is not retryable: the store is corrupt.

use thiserror::Error;

/// Top-level error type for accumulator operations.
#[derive(Error, Debug)]
pub enum MmrError {
    /// Position is zero or beyond the current elements count.
    #[error("invalid position {position}: elements count is {elements_count}")]
    InvalidPosition {
        /// The requested element position.
        position: u64,
        /// The elements count the request was evaluated against.
        elements_count: u64,
    },

    /// A proof was requested for an internal node while the engine only
    /// proves leaves.
    #[error("position {0} is an internal node, not a leaf")]
    NotALeaf(u64),

    /// Malformed input shape: unreachable elements count, wrong number of
    /// siblings or peaks, and similar.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The store has no node at a position that must exist.
    #[error("no node stored at position {0}")]
    NotFound(u64),

    /// The store collaborator failed.
    #[error("store failure: {0}")]
    Store(#[from] StoreError),

    /// A value could not be reduced to its canonical 32-byte word.
    #[error("encoding error: {0}")]
    Encoding(#[from] EncodingError),
}

/// Errors raised by node store backends.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A write batch did not start right after the last stored position,
    /// or its positions were not contiguous.
    #[error("non-contiguous write: expected position {expected}, found {found}")]
    NonContiguous {
        /// The position the store expected next.
        expected: u64,
        /// The position that was supplied.
        found: u64,
    },

    /// The backend itself failed (I/O, database, driver).
    #[error("backend error: {0}")]
    Backend(String),

    /// Stored data could not be decoded.
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

/// Errors while encoding a value into a 32-byte word.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    /// Input was empty (or only a `0x` prefix).
    #[error("empty value")]
    Empty,

    /// A character that is not a decimal digit.
    #[error("invalid decimal digit {0:?}")]
    InvalidDigit(char),

    /// Hex input could not be decoded.
    #[error("invalid hex: {0}")]
    InvalidHex(String),

    /// Byte input had the wrong length.
    #[error("expected at most 32 bytes, got {0}")]
    InvalidLength(usize),

    /// Integer does not fit in 256 bits.
    #[error("value exceeds 2^256 - 1")]
    Overflow,
}
