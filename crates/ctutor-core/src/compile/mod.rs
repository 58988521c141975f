//! Compiler invocation: scratch files, the job runner and binary detection.

pub mod detection;
pub mod error;
pub mod runner;
pub mod scratch;

pub use detection::{is_available, probe_compiler};
pub use error::CompileError;
pub use runner::{CompileJobRunner, CompileResult, CompilerFlags, DEFAULT_FLAGS};
pub use scratch::ScratchFile;
