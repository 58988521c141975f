//! CLI configuration loading.

use anyhow::Context;
use ctutor_core::config::TutorConfig;
use std::path::Path;

/// Load and merge configuration.
///
/// Configuration precedence:
/// 1. CLI arguments (applied by each command)
/// 2. Environment variables (`CTUTOR_COMPILER`, `CTUTOR_MODEL_DIR`)
/// 3. Explicit `--config` file, or local `./.ctutorrc` over global `~/.ctutor/config.toml`
/// 4. Defaults
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<TutorConfig> {
    TutorConfig::discover_and_load(explicit).context("Failed to load configuration")
}
