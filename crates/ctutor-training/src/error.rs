use thiserror::Error;

pub type TrainingResult<T> = std::result::Result<T, TrainingError>;

pub type ModelResult<T> = std::result::Result<T, ModelError>;

#[derive(Debug, Error)]
pub enum TrainingError {
    #[error("invalid training configuration: {0}")]
    InvalidSpec(String),

    #[error("dataset error: {0}")]
    Dataset(String),

    #[error("checkpoint error: {0}")]
    Checkpoint(String),

    /// A single batch failed; the run is aborted and the last good checkpoint is left alone.
    #[error("batch {batch} of epoch {epoch} failed during {phase}: {source}")]
    BatchCompute {
        epoch: usize,
        batch: usize,
        phase: &'static str,
        #[source]
        source: ModelError,
    },

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Errors raised by a `ModelService` implementation.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to load model from {path}: {reason}")]
    Load { path: String, reason: String },

    #[error("model computation failed: {0}")]
    Compute(String),

    #[error("target is not part of the model's label set: {0}")]
    UnknownTarget(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
