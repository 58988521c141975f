//! `ctutor train`: fit the explainer and keep the best checkpoint.

use super::types::TrainArgs;
use anyhow::{Context, Result};
use colored::Colorize;
use ctutor_core::config::TutorConfig;
use ctutor_core::model::BagOfWordsExplainer;
use ctutor_training::{
    compute_dataset_id, read_dataset_file, validate_records, CheckpointLayout, StdoutProgressSink,
    TrainingLoopController,
};

pub fn execute(config: &TutorConfig, args: TrainArgs) -> Result<()> {
    let dataset_path = args.dataset.unwrap_or_else(|| config.dataset_path());
    let output_dir = args.output_dir.unwrap_or_else(|| config.model_dir());

    let mut hyperparams = config.hyperparams();
    if let Some(epochs) = args.epochs {
        hyperparams.epochs = epochs;
    }
    if let Some(batch_size) = args.batch_size {
        hyperparams.batch_size = batch_size;
    }
    if let Some(seed) = args.seed {
        hyperparams.seed = seed;
    }
    if let Some(fraction) = args.validation_fraction {
        hyperparams.validation_fraction = fraction;
    }
    let mut model_config = config.explainer_config();
    if let Some(learning_rate) = args.learning_rate {
        model_config.learning_rate = learning_rate;
    }

    println!("Loading data from {}...", dataset_path.display());
    let records = read_dataset_file(&dataset_path).with_context(|| {
        format!("Failed to read {}. Did you run `ctutor generate`?", dataset_path.display())
    })?;
    validate_records(&records)?;
    println!("Loaded {} total examples.", records.len());

    let examples = config.prompt().examples_for(&records);
    let mut model = BagOfWordsExplainer::new(&examples, model_config)?;

    let mut controller = TrainingLoopController::new(hyperparams, CheckpointLayout::new(&output_dir))?
        .with_dataset_id(compute_dataset_id(&records)?);
    let report = controller.run(&mut model, examples, &StdoutProgressSink)?;

    println!();
    println!("{}", "Training complete".bold().green());
    println!("  Best validation loss: {:.4} (epoch {})", report.best_validation_loss, report.best_epoch);
    println!("  Checkpoint: {}", output_dir.display().to_string().cyan());
    Ok(())
}
