use crate::dataset::TrainingExample;
use crate::error::ModelResult;
use std::path::Path;

/// A trainable diagnostic explainer.
///
/// The caller owns the instance: it is built or loaded once, handed to the
/// training controller or the tutor by reference, and dropped at process exit.
pub trait ModelService {
    fn id(&self) -> &'static str;

    /// Restore a model previously written with [`ModelService::save`].
    fn load(dir: &Path) -> ModelResult<Self>
    where
        Self: Sized;

    /// Apply one optimization step over `batch` and return its mean loss.
    fn train_step(&mut self, batch: &[TrainingExample]) -> ModelResult<f64>;

    /// Mean loss over `batch` without updating any parameter.
    fn evaluate(&self, batch: &[TrainingExample]) -> ModelResult<f64>;

    /// Explain an already-prompted input (see `PromptTemplate::input_for`).
    fn explain(&self, input: &str) -> ModelResult<String>;

    /// Persist weights and tokenizer state into `dir`, replacing what is there.
    fn save(&self, dir: &Path) -> ModelResult<Vec<std::path::PathBuf>>;
}
