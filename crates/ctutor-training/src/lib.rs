//! Compiler Tutor Training
//!
//! Backend-agnostic training primitives for:
//! - Representing labeled diagnostic records and the dataset artifact
//! - Deriving prompt/target examples from records
//! - Splitting examples into train/validation partitions
//! - Driving a `ModelService` through epochs and keeping the best checkpoint

pub mod artifacts;
pub mod controller;
pub mod dataset;
pub mod error;
pub mod hyperparams;
pub mod layout;
pub mod model;
pub mod progress;
pub mod split;

pub use artifacts::{make_artifact, sha256_file, CheckpointArtifact, CheckpointMetadata};
pub use controller::{ControllerStatus, EpochMetrics, TrainingLoopController, TrainingReport};
pub use dataset::{
    compute_dataset_id, read_dataset_file, validate_records, write_dataset_file, DatasetFile,
    DatasetId, DatasetRecord, PromptTemplate, SuggestedFix, TrainingExample,
};
pub use error::{ModelError, ModelResult, TrainingError, TrainingResult};
pub use hyperparams::TrainingHyperParams;
pub use layout::CheckpointLayout;
pub use model::ModelService;
pub use progress::{NullProgressSink, ProgressEvent, ProgressSink, StdoutProgressSink};
pub use split::{split_train_val, Split};
