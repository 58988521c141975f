//! Error types for dataset assembly.

use crate::compile::CompileError;
use std::io;
use thiserror::Error;

/// Result type for dataset operations.
pub type Result<T> = std::result::Result<T, AssembleError>;

/// Errors that abort a dataset build.
#[derive(Debug, Error)]
pub enum AssembleError {
    /// The compiler could not be run at all.
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// Two jobs share an id.
    #[error("Duplicate job id: {0}")]
    DuplicateJobId(String),

    /// A job definition is incomplete or malformed.
    #[error("Invalid job: {0}")]
    InvalidJob(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
