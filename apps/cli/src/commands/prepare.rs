//! `ctutor prepare`: preview the examples a dataset produces.

use anyhow::{Context, Result};
use colored::Colorize;
use ctutor_core::config::TutorConfig;
use ctutor_training::{read_dataset_file, validate_records};
use std::path::PathBuf;

pub fn execute(config: &TutorConfig, dataset: Option<PathBuf>, batch_size: Option<usize>) -> Result<()> {
    let path = dataset.unwrap_or_else(|| config.dataset_path());
    let batch_size = batch_size.unwrap_or_else(|| config.hyperparams().batch_size);
    anyhow::ensure!(batch_size > 0, "--batch-size must be at least 1");

    let records = read_dataset_file(&path)
        .with_context(|| format!("Failed to read {}. Did you run `ctutor generate`?", path.display()))?;
    validate_records(&records)?;

    let examples = config.prompt().examples_for(&records);
    let batches = examples.len().div_ceil(batch_size);

    println!("Loaded {} examples from {}", examples.len(), path.display().to_string().cyan());
    println!("Batches of {}: {}", batch_size, batches);

    if let Some(first) = examples.first() {
        println!();
        println!("{}", "First example".bold());
        println!("  {} {}", "input: ".dimmed(), first.input);
        println!("  {} {}", "target:".dimmed(), first.target);
    }
    Ok(())
}
