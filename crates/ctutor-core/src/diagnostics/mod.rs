//! Diagnostic text normalization.

pub mod normalizer;

pub use normalizer::{target_filename_from_args, DiagnosticNormalizer, SOURCE_EXTENSIONS};
