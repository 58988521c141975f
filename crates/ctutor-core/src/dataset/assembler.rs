//! Drives labeled jobs through the compiler and the normalizer.

use super::error::Result;
use super::jobs::{validate_jobs, JobSpec};
use crate::compile::CompileJobRunner;
use crate::diagnostics::DiagnosticNormalizer;
use ctutor_training::{DatasetFile, DatasetRecord};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// The job was expected to fail but compiled cleanly.
    EmptyDiagnostic,
    /// The scratch file could not be written or removed.
    ScratchIo { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedJob {
    pub id: String,
    #[serde(flatten)]
    pub reason: SkipReason,
}

/// Records in job order plus the jobs that produced none.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DatasetBuild {
    pub records: DatasetFile,
    pub skipped: Vec<SkippedJob>,
}

pub struct DatasetAssembler<'a> {
    runner: &'a CompileJobRunner,
    normalizer: &'a DiagnosticNormalizer,
}

impl<'a> DatasetAssembler<'a> {
    #[must_use]
    pub fn new(runner: &'a CompileJobRunner, normalizer: &'a DiagnosticNormalizer) -> Self {
        Self { runner, normalizer }
    }

    /// Compile every job in order and pair its normalized diagnostic with the labels.
    ///
    /// A missing compiler aborts the whole batch. Scratch-file failures and jobs
    /// that compile cleanly are skipped and reported in [`DatasetBuild::skipped`].
    pub fn build(&self, jobs: &[JobSpec]) -> Result<DatasetBuild> {
        validate_jobs(jobs)?;

        let mut build = DatasetBuild::default();
        for job in jobs {
            tracing::debug!(job = %job.id, "compiling job");

            let result = match self.runner.run(&job.source, &job.flags) {
                Ok(result) => result,
                Err(e) if !e.is_fatal() => {
                    tracing::error!(job = %job.id, error = %e, "scratch file failure, skipping job");
                    build.skipped.push(SkippedJob {
                        id: job.id.clone(),
                        reason: SkipReason::ScratchIo { message: e.to_string() },
                    });
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let error_message =
                self.normalizer.normalize(&result.stderr, result.source_path.as_deref(), None);

            if error_message.is_empty() {
                tracing::warn!(job = %job.id, "job produced no error, skipping");
                build.skipped.push(SkippedJob { id: job.id.clone(), reason: SkipReason::EmptyDiagnostic });
                continue;
            }

            build.records.push(DatasetRecord {
                id: job.id.clone(),
                compiler: self.runner.compiler().to_string(),
                error_type: job.error_type.clone(),
                error_message,
                explanation: job.explanation.clone(),
                suggested_fix: job.suggested_fix.clone(),
            });
        }

        tracing::info!(
            records = build.records.len(),
            skipped = build.skipped.len(),
            "dataset assembled"
        );
        Ok(build)
    }
}
