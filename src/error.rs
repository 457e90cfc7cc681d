//! Error types shared by the parsing and sweep stages.
//!
//! Parsing is tolerant of record shape (a short line is skipped with a
//! warning) but strict about numbers. Sweeps are strict about accounting:
//! any broken invariant aborts the computation for that contig.

use std::io;
use thiserror::Error;

/// Errors that can occur while reading intervals or sweeping events.
#[derive(Error, Debug)]
pub enum CoverageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A record without the three required fields. Readers log and skip
    /// these instead of returning them.
    #[error("Malformed record at line {line}: expected at least 3 fields, got {fields}")]
    MalformedRecord { line: usize, fields: usize },

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("Invalid interval {contig}:{start}-{end}: start > end")]
    InvalidInterval { contig: String, start: u64, end: u64 },

    #[error("Unbalanced events on {contig}: {message}")]
    UnbalancedEvents { contig: String, message: String },

    #[error("Position {position} on {contig} is past the contig end ({length})")]
    OutOfBounds {
        contig: String,
        position: u64,
        length: u64,
    },

    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, CoverageError>;

impl CoverageError {
    pub(crate) fn unbalanced(contig: &str, message: impl Into<String>) -> Self {
        CoverageError::UnbalancedEvents {
            contig: contig.to_string(),
            message: message.into(),
        }
    }
}
