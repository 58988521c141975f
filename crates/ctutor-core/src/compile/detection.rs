//! Compiler binary detection and version checking.

use super::error::{CompileError, Result};
use std::process::Command;

/// Checks if `compiler` can be started at all.
pub fn is_available(compiler: &str) -> bool {
    Command::new(compiler)
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

/// Runs `compiler --version` and returns the first line of its output.
///
/// Used before a dataset batch so a misconfigured environment fails once, up front.
///
/// # Errors
/// `CompilerNotFound` if the binary is missing or the version command fails.
pub fn probe_compiler(compiler: &str) -> Result<String> {
    let output = Command::new(compiler).arg("--version").output().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            CompileError::CompilerNotFound(compiler.to_string())
        } else {
            CompileError::Spawn { compiler: compiler.to_string(), source: e }
        }
    })?;

    if !output.status.success() {
        return Err(CompileError::CompilerNotFound(compiler.to_string()));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let version = stdout.lines().next().unwrap_or_default().trim().to_string();
    tracing::debug!(compiler, version = %version, "compiler detected");
    Ok(version)
}
