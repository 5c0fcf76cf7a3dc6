//! Unified error types for sketchx.
//!
//! The variants follow the failure taxonomy of the pipeline: input rejection
//! and read failures stop one file, decode failures drop one payload entry,
//! write failures affect one output file.
use std::path::PathBuf;

use thiserror::Error;

use crate::sketch::extract::RejectReason;

/// Main error type for sketchx operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The input is not a supported container
    #[error("Input rejected: {0}")]
    InputRejected(RejectReason),

    /// The container database could not be opened or queried
    #[error("Read failure: {0}")]
    ReadFailure(String),

    /// An archived payload blob is malformed
    #[error("Decode failure: {0}")]
    DecodeFailure(String),

    /// An output file could not be written
    #[error("Write failure for '{}': {message}", .path.display())]
    WriteFailure { path: PathBuf, message: String },

    /// JSON or XML rendering failed
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Whether this error stops processing of the whole file.
    #[inline]
    pub fn is_file_level(&self) -> bool {
        matches!(
            self,
            Error::InputRejected(_) | Error::ReadFailure(_) | Error::Io(_)
        )
    }
}

/// Result type for sketchx operations.
pub type Result<T> = std::result::Result<T, Error>;
