//! Deterministic cleanup of compiler diagnostic text.

use regex::{Captures, Regex};
use std::path::Path;

const SCRATCH_DIR_PLACEHOLDER: &str = "<tmp>";

/// Source extensions recognised when looking for the file a user compiled.
pub const SOURCE_EXTENSIONS: &[&str] = &[".cpp", ".cc", ".cxx", ".c++", ".c"];

/// Scrubs volatile scratch paths and optionally focuses on one source file.
///
/// Filtering runs before scrubbing so lines are matched against the names the
/// compiler actually printed. If the filter keeps nothing (a pure linker error
/// never names the source file) the unfiltered text is used instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticNormalizer {
    placeholder: String,
}

impl Default for DiagnosticNormalizer {
    fn default() -> Self {
        Self::new("source.cpp")
    }
}

impl DiagnosticNormalizer {
    #[must_use]
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self { placeholder: placeholder.into() }
    }

    /// Placeholder named after `source.<extension>`.
    #[must_use]
    pub fn for_extension(extension: &str) -> Self {
        Self::new(format!("source.{extension}"))
    }

    #[must_use]
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Returns an empty string when `raw` holds no diagnostic at all.
    #[must_use]
    pub fn normalize(&self, raw: &str, scratch_path: Option<&Path>, target_filename: Option<&str>) -> String {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return String::new();
        }

        let focused = match target_filename.filter(|name| !name.is_empty()) {
            Some(name) => {
                let kept: Vec<&str> = trimmed.lines().filter(|line| line.contains(name)).collect();
                if kept.is_empty() {
                    tracing::debug!(target = name, "no diagnostic line names the target file, keeping all lines");
                    trimmed.to_string()
                } else {
                    kept.join("\n")
                }
            }
            None => trimmed.to_string(),
        };

        match scratch_path {
            Some(path) => self.scrub(&focused, path),
            None => focused,
        }
    }

    fn scrub(&self, text: &str, scratch_path: &Path) -> String {
        let mut out = text.to_string();

        let full = scratch_path.to_string_lossy();
        if !full.is_empty() {
            out = out.replace(full.as_ref(), &self.placeholder);
        }
        if let Some(dir) = scratch_path.parent().map(|d| d.to_string_lossy()).filter(|d| !d.is_empty()) {
            out = scrub_scratch_dir(&out, &dir);
        }
        if let Some(base) = scratch_path.file_name().map(|n| n.to_string_lossy()) {
            if !base.is_empty() {
                out = out.replace(base.as_ref(), &self.placeholder);
            }
        }
        out
    }
}

/// Driver temporaries (`ccXXXXXX.o` and friends) are created in the scratch
/// directory under random names; each becomes `<tmp>/tmp.<ext>`.
fn scrub_scratch_dir(text: &str, dir: &str) -> String {
    let pattern = format!(r#"{}[/\\]([^\s:'"`()]+)"#, regex::escape(dir));
    let Ok(re) = Regex::new(&pattern) else {
        return text.to_string();
    };
    re.replace_all(text, |caps: &Captures<'_>| match caps[1].rsplit_once('.') {
        Some((_, ext)) => format!("{SCRATCH_DIR_PLACEHOLDER}/tmp.{ext}"),
        None => format!("{SCRATCH_DIR_PLACEHOLDER}/tmp"),
    })
    .into_owned()
}

/// Basename of the last C/C++ source file in a compiler argument list.
///
/// Both `/` and `\` count as separators so Windows-style paths work everywhere.
#[must_use]
pub fn target_filename_from_args(args: &[String]) -> Option<String> {
    args.iter()
        .filter(|arg| !arg.starts_with('-'))
        .filter(|arg| {
            let lower = arg.to_ascii_lowercase();
            SOURCE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
        })
        .filter_map(|arg| arg.rsplit(['/', '\\']).next())
        .filter(|name| !name.is_empty())
        .last()
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const SCRATCH: &str = "/tmp/ctutor-Ab12/ctutor_5f0c.cpp";

    fn scratch() -> PathBuf {
        PathBuf::from(SCRATCH)
    }

    #[test]
    fn test_empty_input_normalizes_to_empty() {
        let n = DiagnosticNormalizer::default();
        assert_eq!(n.normalize("", Some(&scratch()), None), "");
        assert_eq!(n.normalize("  \n\t\n", Some(&scratch()), Some("main.cpp")), "");
    }

    #[test]
    fn test_scrubs_basename_and_full_path() {
        let n = DiagnosticNormalizer::default();
        let raw = "ctutor_5f0c.cpp: In function 'int main()':\n\
                   ctutor_5f0c.cpp:1:23: error: expected ',' or ';' before 'return'\n\
                   /tmp/ctutor-Ab12/ctutor_5f0c.cpp:1: note: see here\n";

        let out = n.normalize(raw, Some(&scratch()), None);

        assert!(!out.contains("ctutor_5f0c"));
        assert!(!out.contains(SCRATCH));
        assert!(out.starts_with("source.cpp: In function"));
        assert!(out.contains("source.cpp:1:23: error"));
        assert!(out.ends_with("source.cpp:1: note: see here"));
    }

    #[test]
    fn test_normalize_is_deterministic_across_scratch_names() {
        let n = DiagnosticNormalizer::default();
        let a = n.normalize("ctutor_aaaa.cpp:1:1: error: x", Some(Path::new("/tmp/d1/ctutor_aaaa.cpp")), None);
        let b = n.normalize("ctutor_bbbb.cpp:1:1: error: x", Some(Path::new("/tmp/d2/ctutor_bbbb.cpp")), None);
        assert_eq!(a, b);
    }

    #[test]
    fn test_scrubs_driver_temporaries_in_scratch_dir() {
        let n = DiagnosticNormalizer::default();
        let run = |dir: &str, obj: &str| {
            let raw = format!(
                "/usr/bin/ld: {dir}/{obj}: in function `main':\n\
                 ctutor_5f0c.cpp:(.text+0x9): undefined reference to `foo()'\n\
                 collect2: error: ld returned 1 exit status"
            );
            n.normalize(&raw, Some(&Path::new(dir).join("ctutor_5f0c.cpp")), None)
        };

        let a = run("/tmp/ctutor-Ab12", "ccU8sZB7.o");
        let b = run("/tmp/ctutor-Zz99", "cchTY14k.o");

        assert_eq!(a, b);
        assert!(a.starts_with("/usr/bin/ld: <tmp>/tmp.o: in function"));
        assert!(a.contains("source.cpp:(.text+0x9)"));
    }

    #[test]
    fn test_filters_to_target_file() {
        let n = DiagnosticNormalizer::default();
        let raw = "In file included from main.cpp:1:\n\
                   util.h:3:1: error: 'foo' does not name a type\n\
                   main.cpp:4:5: error: 'cout' was not declared in this scope\n\
                   4 |     cout << 1;\n";

        let out = n.normalize(raw, None, Some("main.cpp"));

        assert_eq!(
            out,
            "In file included from main.cpp:1:\nmain.cpp:4:5: error: 'cout' was not declared in this scope"
        );
    }

    #[test]
    fn test_filter_falls_back_when_nothing_matches() {
        let n = DiagnosticNormalizer::default();
        let raw = "/usr/bin/ld: /tmp/ccX.o: in function `main':\n\
                   undefined reference to `foo()'\n\
                   collect2: error: ld returned 1 exit status";

        let out = n.normalize(raw, None, Some("main.cpp"));

        assert_eq!(out, raw);
    }

    #[test]
    fn test_filter_matches_real_name_before_scrubbing() {
        let n = DiagnosticNormalizer::default();
        let raw = "ctutor_5f0c.cpp:1:1: error: a\nnote: unrelated\n";

        let out = n.normalize(raw, Some(&scratch()), Some("ctutor_5f0c.cpp"));

        assert_eq!(out, "source.cpp:1:1: error: a");
    }

    #[test]
    fn test_placeholder_follows_extension() {
        let n = DiagnosticNormalizer::for_extension("c");
        let out = n.normalize("ctutor_1.c:1: error", Some(Path::new("/tmp/x/ctutor_1.c")), None);
        assert_eq!(out, "source.c:1: error");
    }

    #[test]
    fn test_target_filename_from_args() {
        let args = |v: &[&str]| v.iter().map(|s| (*s).to_string()).collect::<Vec<_>>();

        assert_eq!(target_filename_from_args(&args(&["main.cpp", "-o", "main"])), Some("main.cpp".to_string()));
        assert_eq!(target_filename_from_args(&args(&["-Wall", "src/app/util.cc"])), Some("util.cc".to_string()));
        assert_eq!(target_filename_from_args(&args(&["C:\\work\\prog.c"])), Some("prog.c".to_string()));
        assert_eq!(target_filename_from_args(&args(&["a.cpp", "b.cpp"])), Some("b.cpp".to_string()));
        assert_eq!(target_filename_from_args(&args(&["main.o", "-o", "main"])), None);
    }
}
