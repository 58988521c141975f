//! Epoch loop that keeps only the best checkpoint on disk.

use crate::artifacts::{make_artifact, CheckpointMetadata};
use crate::dataset::{DatasetId, TrainingExample};
use crate::error::{ModelError, TrainingError, TrainingResult};
use crate::hyperparams::TrainingHyperParams;
use crate::layout::CheckpointLayout;
use crate::model::ModelService;
use crate::progress::{ProgressEvent, ProgressSink};
use crate::split::split_train_val;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::time::Instant;

#[derive(Debug, Clone, PartialEq)]
pub enum ControllerStatus {
    Idle,
    Training { epoch: usize },
    Validating { epoch: usize },
    Finished,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// 1-based.
    pub epoch: usize,
    pub train_loss: f64,
    pub validation_loss: f64,
    pub elapsed_ms: u64,
    /// True when this epoch produced a new checkpoint.
    pub improved: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingReport {
    pub train_examples: usize,
    pub validation_examples: usize,
    pub epochs: Vec<EpochMetrics>,
    pub best_epoch: usize,
    pub best_validation_loss: f64,
    pub checkpoint_writes: usize,
}

pub struct TrainingLoopController {
    hyperparams: TrainingHyperParams,
    layout: CheckpointLayout,
    dataset_id: Option<DatasetId>,
    status: ControllerStatus,
    best_validation_loss: f64,
}

impl TrainingLoopController {
    pub fn new(hyperparams: TrainingHyperParams, layout: CheckpointLayout) -> TrainingResult<Self> {
        hyperparams.validate()?;
        Ok(Self {
            hyperparams,
            layout,
            dataset_id: None,
            status: ControllerStatus::Idle,
            best_validation_loss: f64::INFINITY,
        })
    }

    /// Record which dataset produced the checkpoint in its metadata.
    #[must_use]
    pub fn with_dataset_id(mut self, dataset_id: DatasetId) -> Self {
        self.dataset_id = Some(dataset_id);
        self
    }

    #[must_use]
    pub fn status(&self) -> &ControllerStatus {
        &self.status
    }

    #[must_use]
    pub fn best_validation_loss(&self) -> f64 {
        self.best_validation_loss
    }

    #[must_use]
    pub fn layout(&self) -> &CheckpointLayout {
        &self.layout
    }

    /// Split `examples`, train for the configured number of epochs and persist the
    /// model whenever the mean validation loss strictly improves.
    ///
    /// Any batch failure aborts the run; a checkpoint written by an earlier epoch
    /// stays on disk untouched.
    pub fn run<M>(
        &mut self,
        model: &mut M,
        examples: Vec<TrainingExample>,
        progress: &dyn ProgressSink,
    ) -> TrainingResult<TrainingReport>
    where
        M: ModelService + ?Sized,
    {
        self.best_validation_loss = f64::INFINITY;
        let result = self.run_epochs(model, examples, progress);
        match &result {
            Ok(_) => self.status = ControllerStatus::Finished,
            Err(e) => {
                tracing::error!(error = %e, "training aborted");
                self.status = ControllerStatus::Failed(e.to_string());
            }
        }
        result
    }

    fn run_epochs<M>(
        &mut self,
        model: &mut M,
        examples: Vec<TrainingExample>,
        progress: &dyn ProgressSink,
    ) -> TrainingResult<TrainingReport>
    where
        M: ModelService + ?Sized,
    {
        let hp = self.hyperparams.clone();
        let total = examples.len();
        let split = split_train_val(examples, hp.validation_fraction, hp.seed);
        let mut train = split.train;
        let validation = split.validation;

        if train.is_empty() || validation.is_empty() {
            return Err(TrainingError::Dataset(format!(
                "{total} examples are not enough for a train/validation split \
                 ({} train, {} validation)",
                train.len(),
                validation.len()
            )));
        }

        tracing::info!(
            train = train.len(),
            validation = validation.len(),
            epochs = hp.epochs,
            batch_size = hp.batch_size,
            model = model.id(),
            "starting training"
        );
        progress.on_event(ProgressEvent::Started {
            train_examples: train.len(),
            validation_examples: validation.len(),
            epochs: hp.epochs,
        });

        let mut rng = StdRng::seed_from_u64(hp.seed.wrapping_add(1));
        let mut history = Vec::with_capacity(hp.epochs);
        let mut best_epoch = 0;
        let mut checkpoint_writes = 0;

        for epoch in 1..=hp.epochs {
            let started = Instant::now();

            self.status = ControllerStatus::Training { epoch };
            if hp.shuffle_each_epoch {
                train.shuffle(&mut rng);
            }
            let train_loss = mean_batch_loss(&train, hp.batch_size, epoch, "training", |batch| {
                model.train_step(batch)
            })?;

            self.status = ControllerStatus::Validating { epoch };
            let validation_loss =
                mean_batch_loss(&validation, hp.batch_size, epoch, "validation", |batch| {
                    model.evaluate(batch)
                })?;

            let improved = validation_loss < self.best_validation_loss;
            if improved {
                self.save_checkpoint(&*model, epoch, train_loss, validation_loss)?;
                self.best_validation_loss = validation_loss;
                best_epoch = epoch;
                checkpoint_writes += 1;
                progress.on_event(ProgressEvent::CheckpointSaved {
                    epoch,
                    validation_loss,
                    dir: self.layout.dir().to_path_buf(),
                });
            }

            let metrics = EpochMetrics {
                epoch,
                train_loss,
                validation_loss,
                elapsed_ms: started.elapsed().as_millis() as u64,
                improved,
            };
            tracing::info!(
                epoch,
                total_epochs = hp.epochs,
                train_loss,
                validation_loss,
                improved,
                "epoch complete"
            );
            progress.on_event(ProgressEvent::Epoch { total_epochs: hp.epochs, metrics: metrics.clone() });
            history.push(metrics);
        }

        progress.on_event(ProgressEvent::Finished {
            best_epoch,
            best_validation_loss: self.best_validation_loss,
        });

        Ok(TrainingReport {
            train_examples: train.len(),
            validation_examples: validation.len(),
            epochs: history,
            best_epoch,
            best_validation_loss: self.best_validation_loss,
            checkpoint_writes,
        })
    }

    fn save_checkpoint<M>(
        &self,
        model: &M,
        epoch: usize,
        train_loss: f64,
        validation_loss: f64,
    ) -> TrainingResult<()>
    where
        M: ModelService + ?Sized,
    {
        self.layout.ensure_dir()?;
        let written = model.save(self.layout.dir()).map_err(|e| {
            TrainingError::Checkpoint(format!(
                "failed to save model to {}: {e}",
                self.layout.dir().display()
            ))
        })?;

        let artifacts = written.into_iter().map(make_artifact).collect::<TrainingResult<Vec<_>>>()?;

        let metadata = CheckpointMetadata {
            model_id: model.id().to_string(),
            epoch,
            validation_loss,
            train_loss,
            dataset_id: self.dataset_id.clone(),
            saved_at: chrono::Utc::now(),
            artifacts,
        };
        metadata.write(&self.layout)?;

        tracing::info!(
            epoch,
            validation_loss,
            dir = %self.layout.dir().display(),
            "validation loss improved, checkpoint saved"
        );
        Ok(())
    }
}

fn mean_batch_loss<F>(
    examples: &[TrainingExample],
    batch_size: usize,
    epoch: usize,
    phase: &'static str,
    mut step: F,
) -> TrainingResult<f64>
where
    F: FnMut(&[TrainingExample]) -> Result<f64, ModelError>,
{
    let mut total = 0.0;
    let mut batches = 0usize;

    for (batch_idx, batch) in examples.chunks(batch_size).enumerate() {
        let loss = step(batch).map_err(|source| TrainingError::BatchCompute {
            epoch,
            batch: batch_idx,
            phase,
            source,
        })?;
        if !loss.is_finite() {
            return Err(TrainingError::BatchCompute {
                epoch,
                batch: batch_idx,
                phase,
                source: ModelError::Compute(format!("non-finite loss {loss}")),
            });
        }
        total += loss;
        batches += 1;
    }

    Ok(total / batches.max(1) as f64)
}
