//! `ctutor generate`: compile the job catalog into a dataset file.

use super::jobs::resolve_jobs;
use super::types::GenerateArgs;
use anyhow::{Context, Result};
use colored::Colorize;
use ctutor_core::compile::CompileJobRunner;
use ctutor_core::config::TutorConfig;
use ctutor_core::dataset::DatasetAssembler;
use ctutor_core::diagnostics::DiagnosticNormalizer;
use ctutor_training::write_dataset_file;
use serde_json::json;

pub fn execute(config: &TutorConfig, args: GenerateArgs) -> Result<()> {
    let jobs = resolve_jobs(args.jobs.as_deref())?;
    let compiler = args.compiler.unwrap_or_else(|| config.compiler().to_string());
    let output = args.output.unwrap_or_else(|| config.dataset_path());

    let runner = CompileJobRunner::new(&compiler).with_source_extension(config.source_extension());
    let version = runner
        .probe()
        .with_context(|| format!("Compiler '{}' not found. Install it or pass --compiler.", compiler))?;

    if !args.json {
        println!("Starting dataset generation with '{}' ({})...", compiler.cyan(), version.dimmed());
    }

    let normalizer = DiagnosticNormalizer::new(config.placeholder_name());
    let build = DatasetAssembler::new(&runner, &normalizer).build(&jobs)?;

    write_dataset_file(&output, &build.records)
        .with_context(|| format!("Failed to write dataset to {}", output.display()))?;

    if args.json {
        let summary = json!({
            "compiler": compiler,
            "output": output,
            "records": build.records.len(),
            "skipped": build.skipped,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    for skipped in &build.skipped {
        println!("  {} {}", "skipped".yellow(), skipped.id);
    }
    println!();
    println!("{}", format!("Successfully generated {} data points.", build.records.len()).bold().green());
    println!("  Dataset saved to '{}'", output.display());
    Ok(())
}
