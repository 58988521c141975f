//! Per-call scratch source file.

use super::error::{CompileError, Result};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A source file written into its own uniquely named temporary directory.
///
/// Dropping the value removes the directory, so every exit path cleans up.
/// [`ScratchFile::release`] does the same but reports removal failures.
#[derive(Debug)]
pub struct ScratchFile {
    dir: TempDir,
    path: PathBuf,
}

impl ScratchFile {
    /// Write `content` to `<tmp>/ctutor-XXXX/ctutor_<uuid>.<extension>`.
    pub fn acquire(content: &str, extension: &str) -> Result<Self> {
        Self::acquire_in(&std::env::temp_dir(), content, extension)
    }

    /// Like [`ScratchFile::acquire`] but under `parent` instead of the system temp dir.
    pub fn acquire_in(parent: &Path, content: &str, extension: &str) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("ctutor-")
            .tempdir_in(parent)
            .map_err(|source| CompileError::TempFileIo { path: parent.to_path_buf(), source })?;

        let file_name = format!("ctutor_{}.{}", uuid::Uuid::new_v4().simple(), extension);
        let path = dir.path().join(file_name);
        std::fs::write(&path, content)
            .map_err(|source| CompileError::TempFileIo { path: path.clone(), source })?;

        tracing::trace!(path = %path.display(), "scratch file acquired");
        Ok(Self { dir, path })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Bare file name, as passed to the compiler.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.path.file_name().and_then(|n| n.to_str()).unwrap_or_default()
    }

    pub fn release(self) -> Result<()> {
        let dir_path = self.dir.path().to_path_buf();
        self.dir
            .close()
            .map_err(|source| CompileError::TempFileIo { path: dir_path.clone(), source })?;
        tracing::trace!(dir = %dir_path.display(), "scratch file released");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_acquire_writes_content() {
        let parent = TempDir::new().unwrap();
        let scratch = ScratchFile::acquire_in(parent.path(), "int main(){}", "cpp").unwrap();

        assert_eq!(std::fs::read_to_string(scratch.path()).unwrap(), "int main(){}");
        assert!(scratch.file_name().starts_with("ctutor_"));
        assert!(scratch.file_name().ends_with(".cpp"));
        assert!(scratch.path().starts_with(parent.path()));
    }

    #[test]
    fn test_release_removes_directory() {
        let parent = TempDir::new().unwrap();
        let scratch = ScratchFile::acquire_in(parent.path(), "x", "cpp").unwrap();
        let dir = scratch.dir().to_path_buf();

        scratch.release().unwrap();

        assert!(!dir.exists());
    }

    #[test]
    fn test_drop_removes_directory() {
        let parent = TempDir::new().unwrap();
        let dir = {
            let scratch = ScratchFile::acquire_in(parent.path(), "x", "cpp").unwrap();
            scratch.dir().to_path_buf()
        };
        assert!(!dir.exists());
    }

    #[test]
    fn test_concurrent_scratch_files_do_not_collide() {
        let parent = TempDir::new().unwrap();
        let a = ScratchFile::acquire_in(parent.path(), "a", "cpp").unwrap();
        let b = ScratchFile::acquire_in(parent.path(), "b", "cpp").unwrap();

        assert_ne!(a.path(), b.path());
        assert_eq!(std::fs::read_to_string(a.path()).unwrap(), "a");
        assert_eq!(std::fs::read_to_string(b.path()).unwrap(), "b");
    }

    #[test]
    fn test_acquire_in_missing_parent_is_temp_file_error() {
        let parent = TempDir::new().unwrap();
        let missing = parent.path().join("does-not-exist");
        let err = ScratchFile::acquire_in(&missing, "x", "cpp").unwrap_err();
        assert!(matches!(err, CompileError::TempFileIo { .. }));
    }
}
