//! Runs the external compiler against a scratch source file.

use super::detection::probe_compiler;
use super::error::{CompileError, Result};
use super::scratch::ScratchFile;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{Duration, Instant};

/// Compile-only: no link step, so single-file diagnostics stay clean.
pub const DEFAULT_FLAGS: &[&str] = &["-c"];

/// Flags a job compiles with.
///
/// Jobs that need link-time diagnostics (undefined symbol, missing `main`)
/// use an override without `-c`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompilerFlags {
    #[default]
    Default,
    Override(Vec<String>),
}

/// Outcome of one compiler run. A failed compile is a normal result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompileResult {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
    pub duration: Duration,
    /// Scratch file the compiler was pointed at; already removed from disk.
    pub source_path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct CompileJobRunner {
    compiler: String,
    default_flags: Vec<String>,
    source_extension: String,
    scratch_root: Option<PathBuf>,
}

impl CompileJobRunner {
    #[must_use]
    pub fn new(compiler: impl Into<String>) -> Self {
        Self {
            compiler: compiler.into(),
            default_flags: DEFAULT_FLAGS.iter().map(|s| (*s).to_string()).collect(),
            source_extension: "cpp".to_string(),
            scratch_root: None,
        }
    }

    #[must_use]
    pub fn with_default_flags(mut self, flags: Vec<String>) -> Self {
        self.default_flags = flags;
        self
    }

    #[must_use]
    pub fn with_source_extension(mut self, extension: impl Into<String>) -> Self {
        self.source_extension = extension.into();
        self
    }

    /// Create scratch files under `root` instead of the system temp directory.
    #[must_use]
    pub fn with_scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.scratch_root = Some(root.into());
        self
    }

    #[must_use]
    pub fn compiler(&self) -> &str {
        &self.compiler
    }

    #[must_use]
    pub fn source_extension(&self) -> &str {
        &self.source_extension
    }

    #[must_use]
    pub fn resolve_flags(&self, flags: &CompilerFlags) -> Vec<String> {
        match flags {
            CompilerFlags::Default => self.default_flags.clone(),
            CompilerFlags::Override(custom) => custom.clone(),
        }
    }

    /// Fail early if the compiler cannot be started.
    pub fn probe(&self) -> Result<String> {
        probe_compiler(&self.compiler)
    }

    /// Compile `source` as `[compiler] + flags + [scratch file]`.
    ///
    /// The compiler runs inside the scratch directory, so object files and
    /// executables it produces are removed along with the source.
    pub fn run(&self, source: &str, flags: &CompilerFlags) -> Result<CompileResult> {
        let scratch = match &self.scratch_root {
            Some(root) => ScratchFile::acquire_in(root, source, &self.source_extension)?,
            None => ScratchFile::acquire(source, &self.source_extension)?,
        };

        let mut args = self.resolve_flags(flags);
        args.push(scratch.file_name().to_string());
        let source_path = scratch.path().to_path_buf();

        let outcome = self.execute(&args, Some(scratch.dir()));
        let released = scratch.release();

        let mut result = match (outcome, released) {
            (Err(e), released) => {
                if let Err(release_err) = released {
                    tracing::warn!(error = %release_err, "scratch cleanup failed after compiler error");
                }
                return Err(e);
            }
            (Ok(_), Err(release_err)) => return Err(release_err),
            (Ok(result), Ok(())) => result,
        };
        result.source_path = Some(source_path);
        Ok(result)
    }

    /// Run the compiler with caller-supplied arguments in the current directory.
    pub fn invoke(&self, args: &[String]) -> Result<CompileResult> {
        self.execute(args, None)
    }

    fn execute(&self, args: &[String], cwd: Option<&Path>) -> Result<CompileResult> {
        let mut cmd = Command::new(&self.compiler);
        cmd.args(args);

        if let Some(dir) = cwd {
            // Driver temporaries land next to the source and go away with it.
            cmd.current_dir(dir).env("TMPDIR", dir).env("TMP", dir).env("TEMP", dir);
        }

        tracing::debug!(compiler = %self.compiler, args = ?args, "running compiler");
        let started = Instant::now();
        let output = cmd.output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CompileError::CompilerNotFound(self.compiler.clone())
            } else {
                CompileError::Spawn { compiler: self.compiler.clone(), source: e }
            }
        })?;
        let duration = started.elapsed();

        let result = CompileResult {
            exit_code: output.status.code(),
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            duration,
            source_path: None,
        };
        tracing::debug!(
            exit_code = ?result.exit_code,
            stderr_bytes = result.stderr.len(),
            elapsed_ms = duration.as_millis() as u64,
            "compiler finished"
        );
        Ok(result)
    }
}
