//! Labeled compile jobs used to synthesize the dataset.

use super::error::{AssembleError, Result};
use crate::compile::CompilerFlags;
use ctutor_training::SuggestedFix;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

const BUILTIN_JOBS: &str = include_str!("../../data/jobs.json");

/// A deliberately broken source unit paired with its human-written explanation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSpec {
    pub id: String,
    pub error_type: String,
    pub source: String,
    #[serde(default)]
    pub flags: CompilerFlags,
    pub explanation: String,
    pub suggested_fix: SuggestedFix,
}

/// The labeled C++ jobs shipped with the tool.
pub fn builtin_jobs() -> Result<Vec<JobSpec>> {
    parse_jobs(BUILTIN_JOBS, "<builtin>")
}

/// Load jobs from a JSON array file.
pub fn load_jobs(path: &Path) -> Result<Vec<JobSpec>> {
    let content = std::fs::read_to_string(path)?;
    parse_jobs(&content, &path.display().to_string())
}

fn parse_jobs(content: &str, origin: &str) -> Result<Vec<JobSpec>> {
    let jobs: Vec<JobSpec> = serde_json::from_str(content)
        .map_err(|e| AssembleError::InvalidJob(format!("{origin}: {e}")))?;
    validate_jobs(&jobs)?;
    Ok(jobs)
}

/// Ids must be unique and every job needs source and an explanation.
pub fn validate_jobs(jobs: &[JobSpec]) -> Result<()> {
    let mut seen = HashSet::new();
    for job in jobs {
        if job.id.trim().is_empty() {
            return Err(AssembleError::InvalidJob("job id must not be empty".to_string()));
        }
        if !seen.insert(job.id.as_str()) {
            return Err(AssembleError::DuplicateJobId(job.id.clone()));
        }
        if job.source.trim().is_empty() {
            return Err(AssembleError::InvalidJob(format!("job '{}' has no source", job.id)));
        }
        if job.explanation.trim().is_empty() {
            return Err(AssembleError::InvalidJob(format!("job '{}' has no explanation", job.id)));
        }
    }
    Ok(())
}
