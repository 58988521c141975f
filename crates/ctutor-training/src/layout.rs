use crate::error::TrainingResult;
use std::path::{Path, PathBuf};

/// Filesystem layout of the single best-checkpoint directory.
///
/// The model writes its own files into `dir`; the controller adds `checkpoint.json`.
#[derive(Debug, Clone)]
pub struct CheckpointLayout {
    dir: PathBuf,
}

impl CheckpointLayout {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn metadata_path(&self) -> PathBuf {
        self.dir.join("checkpoint.json")
    }

    #[must_use]
    pub fn has_checkpoint(&self) -> bool {
        self.metadata_path().exists()
    }

    pub fn ensure_dir(&self) -> TrainingResult<()> {
        std::fs::create_dir_all(&self.dir)?;
        Ok(())
    }
}
