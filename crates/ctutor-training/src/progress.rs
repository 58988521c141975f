use crate::controller::EpochMetrics;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEvent {
    Started { train_examples: usize, validation_examples: usize, epochs: usize },
    Epoch { total_epochs: usize, metrics: EpochMetrics },
    CheckpointSaved { epoch: usize, validation_loss: f64, dir: PathBuf },
    Finished { best_epoch: usize, best_validation_loss: f64 },
}

pub trait ProgressSink {
    fn on_event(&self, event: ProgressEvent);
}

/// Discards every event.
#[derive(Debug, Default)]
pub struct NullProgressSink;

impl ProgressSink for NullProgressSink {
    fn on_event(&self, _event: ProgressEvent) {}
}

#[derive(Debug, Default)]
pub struct StdoutProgressSink;

impl ProgressSink for StdoutProgressSink {
    fn on_event(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::Started { train_examples, validation_examples, epochs } => println!(
                "[train] training on {train_examples} examples, validating on {validation_examples} ({epochs} epochs)"
            ),
            ProgressEvent::Epoch { total_epochs, metrics } => println!(
                "[train] Epoch: {}/{} | Avg Train Loss: {:.4} | Avg Val Loss: {:.4}",
                metrics.epoch, total_epochs, metrics.train_loss, metrics.validation_loss
            ),
            ProgressEvent::CheckpointSaved { epoch, validation_loss, dir } => println!(
                "[train] validation loss improved to {validation_loss:.4} at epoch {epoch}, saved to {}",
                dir.display()
            ),
            ProgressEvent::Finished { best_epoch, best_validation_loss } => println!(
                "[train] finished, best validation loss {best_validation_loss:.4} (epoch {best_epoch})"
            ),
        }
    }
}
