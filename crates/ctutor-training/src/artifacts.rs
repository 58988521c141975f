use crate::dataset::DatasetId;
use crate::error::{TrainingError, TrainingResult};
use crate::layout::CheckpointLayout;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointArtifact {
    pub path: PathBuf,
    pub sha256: String,
}

/// Written next to the best checkpoint. Epoch and best loss are enough to resume later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointMetadata {
    pub model_id: String,
    pub epoch: usize,
    pub validation_loss: f64,
    pub train_loss: f64,
    pub dataset_id: Option<DatasetId>,
    pub saved_at: DateTime<Utc>,
    pub artifacts: Vec<CheckpointArtifact>,
}

impl CheckpointMetadata {
    pub fn write(&self, layout: &CheckpointLayout) -> TrainingResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(layout.metadata_path(), json)?;
        Ok(())
    }

    pub fn read(layout: &CheckpointLayout) -> TrainingResult<Self> {
        let path = layout.metadata_path();
        let bytes = std::fs::read(&path).map_err(|e| {
            TrainingError::Checkpoint(format!("cannot read {}: {e}", path.display()))
        })?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

pub fn sha256_file(path: &Path) -> TrainingResult<String> {
    let bytes = std::fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hex::encode(hasher.finalize()))
}

pub fn make_artifact(path: PathBuf) -> TrainingResult<CheckpointArtifact> {
    if !path.exists() {
        return Err(TrainingError::Checkpoint(format!(
            "artifact path does not exist: {}",
            path.display()
        )));
    }

    let hash = sha256_file(&path)?;
    Ok(CheckpointArtifact { path, sha256: hash })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_make_artifact_requires_existing_file() {
        let temp = TempDir::new().unwrap();
        assert!(make_artifact(temp.path().join("missing.json")).is_err());

        let path = temp.path().join("model.json");
        std::fs::write(&path, "{}").unwrap();
        let artifact = make_artifact(path).unwrap();
        assert_eq!(
            artifact.sha256,
            "44136fa355b3678a1146ad16f7e8649e94fb4fc21fe77e8310c060f61caaff8a"
        );
    }
}
