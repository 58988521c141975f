//! Configuration for the tutor binaries.

pub mod tutor_config;

pub use tutor_config::{ConfigError, ConfigResult, TrainingConfig, TutorConfig};
