//! Error types for compiler invocation.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for compile operations.
pub type Result<T> = std::result::Result<T, CompileError>;

/// Errors that can occur while running the compiler.
///
/// A compiler that runs and rejects the source is not an error; see `CompileResult`.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The compiler executable could not be found.
    #[error("Compiler '{0}' not found. Install it or point the `compiler` setting at it.")]
    CompilerNotFound(String),

    /// Writing or removing the scratch source file failed.
    #[error("Scratch file error at {path}: {source}")]
    TempFileIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The compiler exists but could not be started.
    #[error("Failed to start compiler '{compiler}': {source}")]
    Spawn {
        compiler: String,
        #[source]
        source: io::Error,
    },
}

impl CompileError {
    /// True for errors that must abort a whole batch rather than a single job.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::CompilerNotFound(_) | Self::Spawn { .. })
    }
}
