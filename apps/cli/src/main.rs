//! Compiler Tutor CLI - dataset generation, training and explanation
//!
//! The `ctutor` binary drives the offline side of the tutor: it compiles the
//! labeled job catalog into a dataset, trains the explainer on it and explains
//! diagnostics against the resulting checkpoint. The live compiler wrapper is
//! the separate `tutor` binary.

mod commands;
mod config;

use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;

use commands::{explain, generate, jobs, prepare, train};
use commands::types::{ExplainArgs, GenerateArgs, TrainArgs};

/// Compiler Tutor - friendly explanations for C++ compiler errors
#[derive(Parser, Debug)]
#[command(
    name = "ctutor",
    author,
    version,
    about = "Compiler Tutor - dataset generation, training and explanation",
    long_about = "Compiles a catalog of deliberately broken C++ programs into a labeled dataset,\ntrains an explainer on it and explains new compiler diagnostics."
)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Configuration file (overrides ~/.ctutor/config.toml and ./.ctutorrc)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the labeled compile jobs
    Jobs {
        /// Job catalog file (defaults to the built-in catalog)
        #[arg(long)]
        jobs: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compile every job and write the dataset
    ///
    /// Jobs that compile cleanly are skipped with a warning. A missing
    /// compiler aborts before anything is written.
    Generate(GenerateArgs),

    /// Show the training examples derived from a dataset
    Prepare {
        /// Dataset file
        #[arg(long)]
        dataset: Option<PathBuf>,

        /// Batch size used to count batches
        #[arg(long)]
        batch_size: Option<usize>,
    },

    /// Train the explainer and keep the best checkpoint
    Train(TrainArgs),

    /// Explain a compiler diagnostic
    ///
    /// The diagnostic is taken from TEXT, from --file, or produced by
    /// compiling --source.
    Explain(ExplainArgs),
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = config::load_config(args.config.as_deref())?;

    let level_name = args.log_level.as_deref().or(config.log_level.as_deref()).unwrap_or("info");
    ctutor_core::logging::init(ctutor_core::logging::parse_level(level_name, Level::INFO))?;

    let command = if let Some(cmd) = args.command {
        cmd
    } else {
        Args::command().print_help()?;
        return Ok(());
    };

    match command {
        Command::Jobs { jobs: path, json } => jobs::execute(path, json),
        Command::Generate(generate_args) => generate::execute(&config, generate_args),
        Command::Prepare { dataset, batch_size } => prepare::execute(&config, dataset, batch_size),
        Command::Train(train_args) => train::execute(&config, train_args),
        Command::Explain(explain_args) => explain::execute(&config, explain_args),
    }
}
