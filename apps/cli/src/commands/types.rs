//! Argument types shared by the subcommands.

use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug, Clone, Default)]
pub struct GenerateArgs {
    /// Job catalog file (defaults to the built-in catalog)
    #[arg(long)]
    pub jobs: Option<PathBuf>,

    /// Where to write the dataset
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Compiler executable
    #[arg(long)]
    pub compiler: Option<String>,

    /// Print the build summary as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct TrainArgs {
    /// Dataset file
    #[arg(long)]
    pub dataset: Option<PathBuf>,

    /// Checkpoint directory
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    #[arg(long)]
    pub epochs: Option<usize>,

    #[arg(long)]
    pub batch_size: Option<usize>,

    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long)]
    pub learning_rate: Option<f64>,

    /// Fraction of examples held out for validation
    #[arg(long)]
    pub validation_fraction: Option<f64>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ExplainArgs {
    /// Diagnostic text
    pub text: Option<String>,

    /// Read the diagnostic from a file
    #[arg(long, conflicts_with = "text")]
    pub file: Option<PathBuf>,

    /// Compile this source file and explain its diagnostic
    #[arg(long, conflicts_with_all = ["text", "file"])]
    pub source: Option<PathBuf>,

    /// Checkpoint directory
    #[arg(long)]
    pub model_dir: Option<PathBuf>,
}
