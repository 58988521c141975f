//! `tutor <compiler-args...>`: run the compiler, explain what went wrong.
//!
//! Arguments are passed through to the compiler untouched, so this binary
//! does its own argument handling instead of going through clap.

use colored::Colorize;
use ctutor_core::compile::CompileJobRunner;
use ctutor_core::config::TutorConfig;
use ctutor_core::diagnostics::DiagnosticNormalizer;
use ctutor_core::logging;
use ctutor_core::model::BagOfWordsExplainer;
use ctutor_core::tutor::{TutorOutcome, TutorSession};
use ctutor_training::ModelService;
use std::process::ExitCode;
use tracing::Level;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.is_empty() {
        eprintln!("Usage: tutor <arguments_for_compiler>");
        eprintln!("Example: tutor main.cpp -o main");
        return ExitCode::from(1);
    }

    let config = match TutorConfig::discover_and_load(None) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            return ExitCode::from(1);
        }
    };

    let level = logging::parse_level(config.log_level.as_deref().unwrap_or("warn"), Level::WARN);
    if let Err(e) = logging::init(level) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        return ExitCode::from(1);
    }

    let runner = CompileJobRunner::new(config.compiler());
    let normalizer = DiagnosticNormalizer::new(config.placeholder_name());
    let prompt = config.prompt();
    let session = TutorSession::new(&runner, &normalizer, &prompt);
    let model_dir = config.model_dir();

    println!("--- Running compiler : {} ---", session.command_line(&args));

    let outcome = match session.run(&args, || BagOfWordsExplainer::load(&model_dir)) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            return ExitCode::from(1);
        }
    };

    match &outcome {
        TutorOutcome::Compiled(result) => {
            println!("--- Compile successful ---");
            if !result.stdout.is_empty() {
                print!("{}", result.stdout);
            }
            if !result.stderr.is_empty() {
                eprint!("{}", result.stderr);
            }
        }
        TutorOutcome::Failed { result, explanation, .. } => {
            println!("--- Original Compiler error ---");
            println!("{}", result.stderr.trim_end());
            if let Some(explanation) = explanation {
                println!("--- Friendly explanation ---");
                println!("{}", explanation);
            }
        }
    }

    ExitCode::from(u8::try_from(outcome.exit_code()).unwrap_or(1))
}
