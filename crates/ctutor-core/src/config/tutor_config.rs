//! Tutor configuration file support.
//!
//! Settings are layered: built-in defaults, `~/.ctutor/config.toml`,
//! `./.ctutorrc`, then `CTUTOR_*` environment variables. Command-line flags
//! are applied last by the binaries.

use crate::model::ExplainerConfig;
use ctutor_training::{PromptTemplate, TrainingHyperParams};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_COMPILER: &str = "g++";
pub const DEFAULT_MODEL_DIR: &str = "./fine_tuned_compiler_tutor";
pub const DEFAULT_DATASET_PATH: &str = "generated_dataset.json";
pub const DEFAULT_SOURCE_EXTENSION: &str = "cpp";

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found.
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    /// Failed to read or write configuration file.
    #[error("Failed to read configuration file: {0}")]
    Read(String),

    /// Failed to parse configuration file.
    #[error("Failed to parse configuration file: {0}")]
    Parse(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Training section (`[training]`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub epochs: Option<usize>,
    #[serde(default)]
    pub batch_size: Option<usize>,
    #[serde(default)]
    pub validation_fraction: Option<f64>,
    #[serde(default)]
    pub learning_rate: Option<f64>,
    /// Append the suggested fix description to every training target
    #[serde(default)]
    pub include_fix_description: Option<bool>,
    #[serde(default)]
    pub shuffle_each_epoch: Option<bool>,
}

impl TrainingConfig {
    pub fn merge(&mut self, other: &Self) {
        if other.seed.is_some() {
            self.seed = other.seed;
        }
        if other.epochs.is_some() {
            self.epochs = other.epochs;
        }
        if other.batch_size.is_some() {
            self.batch_size = other.batch_size;
        }
        if other.validation_fraction.is_some() {
            self.validation_fraction = other.validation_fraction;
        }
        if other.learning_rate.is_some() {
            self.learning_rate = other.learning_rate;
        }
        if other.include_fix_description.is_some() {
            self.include_fix_description = other.include_fix_description;
        }
        if other.shuffle_each_epoch.is_some() {
            self.shuffle_each_epoch = other.shuffle_each_epoch;
        }
    }
}

/// Tutor configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TutorConfig {
    /// Compiler executable
    #[serde(default)]
    pub compiler: Option<String>,

    /// Checkpoint directory written by `train` and read by the tutor
    #[serde(default)]
    pub model_dir: Option<PathBuf>,

    /// Dataset JSON written by `generate`
    #[serde(default)]
    pub dataset_path: Option<PathBuf>,

    /// Name substituted for scratch file paths in diagnostics
    #[serde(default)]
    pub placeholder_name: Option<String>,

    /// Extension given to scratch source files
    #[serde(default)]
    pub source_extension: Option<String>,

    /// Log level
    #[serde(default)]
    pub log_level: Option<String>,

    #[serde(default)]
    pub training: TrainingConfig,
}

impl TutorConfig {
    /// Load configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(format!("{}: {}", path.display(), e)))?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a TOML file.
    pub fn save_to_file(&self, path: &Path) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize: {}", e)))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Read(format!("Failed to create directory: {}", e)))?;
        }

        std::fs::write(path, content).map_err(|e| ConfigError::Read(format!("Failed to write file: {}", e)))
    }

    /// Get default global configuration file path.
    pub fn default_global_path() -> PathBuf {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(".ctutor")
            .join("config.toml")
    }

    /// Get default local configuration file path.
    pub fn default_local_path() -> PathBuf {
        PathBuf::from(".ctutorrc")
    }

    /// Discover and load configuration files, then apply environment overrides.
    ///
    /// An explicit `path` must exist and parse. Otherwise the global and local
    /// files are read if present; a broken discovered file is reported and skipped.
    pub fn discover_and_load(path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = path {
            config.merge(&Self::load_from_file(path)?);
        } else {
            for candidate in [Self::default_global_path(), Self::default_local_path()] {
                match Self::load_from_file(&candidate) {
                    Ok(found) => {
                        tracing::debug!(path = %candidate.display(), "loaded configuration");
                        config.merge(&found);
                    }
                    Err(ConfigError::NotFound(_)) => {}
                    Err(e) => tracing::warn!(error = %e, "ignoring configuration file"),
                }
            }
        }

        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Merge another configuration into this one.
    ///
    /// Values from `other` override values in `self` if they are Some.
    pub fn merge(&mut self, other: &Self) {
        if let Some(ref compiler) = other.compiler {
            self.compiler = Some(compiler.clone());
        }
        if let Some(ref model_dir) = other.model_dir {
            self.model_dir = Some(model_dir.clone());
        }
        if let Some(ref dataset_path) = other.dataset_path {
            self.dataset_path = Some(dataset_path.clone());
        }
        if let Some(ref placeholder_name) = other.placeholder_name {
            self.placeholder_name = Some(placeholder_name.clone());
        }
        if let Some(ref source_extension) = other.source_extension {
            self.source_extension = Some(source_extension.clone());
        }
        if let Some(ref log_level) = other.log_level {
            self.log_level = Some(log_level.clone());
        }
        self.training.merge(&other.training);
    }

    /// `CTUTOR_COMPILER` and `CTUTOR_MODEL_DIR` override file settings.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(compiler) = lookup("CTUTOR_COMPILER").filter(|v| !v.is_empty()) {
            self.compiler = Some(compiler);
        }
        if let Some(model_dir) = lookup("CTUTOR_MODEL_DIR").filter(|v| !v.is_empty()) {
            self.model_dir = Some(PathBuf::from(model_dir));
        }
    }

    pub fn compiler(&self) -> &str {
        self.compiler.as_deref().unwrap_or(DEFAULT_COMPILER)
    }

    pub fn model_dir(&self) -> PathBuf {
        self.model_dir.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_DIR))
    }

    pub fn dataset_path(&self) -> PathBuf {
        self.dataset_path.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_DATASET_PATH))
    }

    pub fn source_extension(&self) -> &str {
        self.source_extension.as_deref().unwrap_or(DEFAULT_SOURCE_EXTENSION)
    }

    /// Explicit placeholder, or `source.<source_extension>`.
    pub fn placeholder_name(&self) -> String {
        self.placeholder_name
            .clone()
            .unwrap_or_else(|| format!("source.{}", self.source_extension()))
    }

    pub fn hyperparams(&self) -> TrainingHyperParams {
        let defaults = TrainingHyperParams::default();
        let t = &self.training;
        TrainingHyperParams {
            seed: t.seed.unwrap_or(defaults.seed),
            epochs: t.epochs.unwrap_or(defaults.epochs),
            batch_size: t.batch_size.unwrap_or(defaults.batch_size),
            validation_fraction: t.validation_fraction.unwrap_or(defaults.validation_fraction),
            shuffle_each_epoch: t.shuffle_each_epoch.unwrap_or(defaults.shuffle_each_epoch),
        }
    }

    pub fn explainer_config(&self) -> ExplainerConfig {
        let defaults = ExplainerConfig::default();
        ExplainerConfig { learning_rate: self.training.learning_rate.unwrap_or(defaults.learning_rate) }
    }

    pub fn prompt(&self) -> PromptTemplate {
        let defaults = PromptTemplate::default();
        PromptTemplate {
            include_fix_description: self
                .training
                .include_fix_description
                .unwrap_or(defaults.include_fix_description),
            ..defaults
        }
    }
}
