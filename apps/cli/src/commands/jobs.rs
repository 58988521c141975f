//! `ctutor jobs`: list the labeled compile jobs.

use anyhow::{Context, Result};
use colored::Colorize;
use ctutor_core::compile::CompilerFlags;
use ctutor_core::dataset::{builtin_jobs, load_jobs, JobSpec};
use std::path::{Path, PathBuf};

/// Built-in catalog unless a file is given.
pub fn resolve_jobs(path: Option<&Path>) -> Result<Vec<JobSpec>> {
    match path {
        Some(path) => load_jobs(path).with_context(|| format!("Failed to load jobs from {}", path.display())),
        None => builtin_jobs().context("Built-in job catalog is invalid"),
    }
}

pub fn execute(path: Option<PathBuf>, json_output: bool) -> Result<()> {
    let jobs = resolve_jobs(path.as_deref())?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&jobs)?);
        return Ok(());
    }

    println!();
    println!("{}", format!("Compile Jobs ({})", jobs.len()).bold().cyan());
    println!();
    println!("{:<36} {:<10} {}", "ID", "Flags", "Error Type");
    println!("{}", "─".repeat(90));
    for job in &jobs {
        let flags = match &job.flags {
            CompilerFlags::Default => "default".to_string(),
            CompilerFlags::Override(flags) if flags.is_empty() => "link".to_string(),
            CompilerFlags::Override(flags) => flags.join(" "),
        };
        println!("{:<36} {:<10} {}", job.id.cyan(), flags.dimmed(), job.error_type);
    }
    println!();
    Ok(())
}
