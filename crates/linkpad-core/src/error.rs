//! Error taxonomy for linkpad-core.
//!
//! Every fallible operation in this crate either completes its documented
//! effect or returns one of these errors with the buffer left exactly as it
//! was before the call. There is no partial-success state.

use std::collections::TryReserveError;
use std::io;

use thiserror::Error;

/// Errors produced by buffer edits, scans, configuration, and stream I/O.
#[derive(Debug, Error)]
pub enum Error {
    /// An allocation failed while creating a chunk or growing a scratch
    /// array. Nothing was modified.
    #[error("out of memory")]
    OutOfMemory,

    /// A location refers to a chunk that is no longer in the chain, or to an
    /// offset past that chunk's length. Only a caller holding a location
    /// across a compaction it did not take part in can hit this.
    #[error("location does not refer to a live chunk position")]
    InvalidLocation,

    /// The scanner was given an empty keyword set.
    #[error("keyword set is empty")]
    NoKeywords,

    /// The scanner was given a zero-length keyword.
    #[error("keyword #{index} is empty")]
    EmptyKeyword { index: usize },

    /// An option directive named an unknown option or carried a bad value.
    #[error("invalid option `{name}`: {reason}")]
    InvalidOption { name: String, reason: String },

    /// Reading or writing a byte stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<TryReserveError> for Error {
    fn from(_: TryReserveError) -> Self {
        Self::OutOfMemory
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
