//! Compiler Tutor Core
//!
//! The diagnostic pipeline shared by dataset generation and live tutoring:
//! - Running a native compiler against scratch source files
//! - Normalizing its diagnostics into stable, path-free text
//! - Assembling labeled compile jobs into a dataset
//! - Explaining a failed compile with a trained model

pub mod compile;
pub mod config;
pub mod dataset;
pub mod diagnostics;
pub mod logging;
pub mod model;
pub mod tutor;

pub use compile::{CompileError, CompileJobRunner, CompileResult, CompilerFlags, ScratchFile};
pub use config::{ConfigError, TutorConfig};
pub use dataset::{builtin_jobs, load_jobs, AssembleError, DatasetAssembler, DatasetBuild, JobSpec};
pub use diagnostics::{target_filename_from_args, DiagnosticNormalizer};
pub use model::{BagOfWordsExplainer, ExplainerConfig};
pub use tutor::{explain_or_fallback, TutorOutcome, TutorSession};
