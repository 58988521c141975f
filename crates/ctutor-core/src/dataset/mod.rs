//! Dataset generation from labeled compile jobs.

pub mod assembler;
pub mod error;
pub mod jobs;

pub use assembler::{DatasetAssembler, DatasetBuild, SkipReason, SkippedJob};
pub use error::AssembleError;
pub use jobs::{builtin_jobs, load_jobs, validate_jobs, JobSpec};
