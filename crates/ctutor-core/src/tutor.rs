//! Live tutoring: compile the user's command, explain the failure.

use crate::compile::error::Result;
use crate::compile::{CompileJobRunner, CompileResult};
use crate::diagnostics::{target_filename_from_args, DiagnosticNormalizer};
use ctutor_training::{ModelResult, ModelService, PromptTemplate};

/// What the tutor has to show for one compiler invocation.
#[derive(Debug, Clone)]
pub enum TutorOutcome {
    Compiled(CompileResult),
    Failed {
        result: CompileResult,
        /// Normalized diagnostic handed to the model.
        diagnostic: String,
        /// Model explanation, or the fallback message when the model could not answer.
        /// `None` when the compiler failed without printing a diagnostic.
        explanation: Option<String>,
    },
}

impl TutorOutcome {
    #[must_use]
    pub fn result(&self) -> &CompileResult {
        match self {
            Self::Compiled(result) | Self::Failed { result, .. } => result,
        }
    }

    /// Mirrors the compiler: its own exit code, or 1 when it was killed.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        let result = self.result();
        if result.success { 0 } else { result.exit_code.filter(|c| *c != 0).unwrap_or(1) }
    }
}

pub struct TutorSession<'a> {
    runner: &'a CompileJobRunner,
    normalizer: &'a DiagnosticNormalizer,
    prompt: &'a PromptTemplate,
}

impl<'a> TutorSession<'a> {
    #[must_use]
    pub fn new(
        runner: &'a CompileJobRunner,
        normalizer: &'a DiagnosticNormalizer,
        prompt: &'a PromptTemplate,
    ) -> Self {
        Self { runner, normalizer, prompt }
    }

    /// The command line as it will be shown to the user.
    #[must_use]
    pub fn command_line(&self, args: &[String]) -> String {
        std::iter::once(self.runner.compiler())
            .chain(args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run the compiler with `args`; on failure load a model and explain the diagnostic.
    ///
    /// `load_model` is only called when there is something to explain, so a
    /// missing compiler, a clean build or a silent failure never touches the checkpoint.
    pub fn run<M, F>(&self, args: &[String], load_model: F) -> Result<TutorOutcome>
    where
        M: ModelService,
        F: FnOnce() -> ModelResult<M>,
    {
        let result = self.runner.invoke(args)?;
        if result.success {
            return Ok(TutorOutcome::Compiled(result));
        }

        let target = target_filename_from_args(args);
        let diagnostic = self.normalizer.normalize(&result.stderr, None, target.as_deref());
        if diagnostic.is_empty() {
            tracing::debug!(exit_code = ?result.exit_code, "compiler failed without a diagnostic");
            return Ok(TutorOutcome::Failed { result, diagnostic, explanation: None });
        }
        let explanation = Some(explain_or_fallback(load_model(), self.prompt, &diagnostic));

        Ok(TutorOutcome::Failed { result, diagnostic, explanation })
    }
}

/// Explain `diagnostic` with the prompt prefix, degrading to a message on any model error.
pub fn explain_or_fallback<M: ModelService>(
    model: ModelResult<M>,
    prompt: &PromptTemplate,
    diagnostic: &str,
) -> String {
    match model.and_then(|m| m.explain(&prompt.input_for(diagnostic))) {
        Ok(explanation) => explanation,
        Err(e) => {
            tracing::warn!(error = %e, "model unavailable");
            format!("Error calling the model: {e}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctutor_training::{ModelError, TrainingExample};
    use std::cell::Cell;
    use std::path::{Path, PathBuf};

    /// Echoes the prompted input back so tests can see what the model received.
    struct EchoModel;

    impl ModelService for EchoModel {
        fn id(&self) -> &'static str {
            "echo"
        }

        fn load(_dir: &Path) -> ModelResult<Self> {
            Ok(Self)
        }

        fn train_step(&mut self, _batch: &[TrainingExample]) -> ModelResult<f64> {
            Ok(0.0)
        }

        fn evaluate(&self, _batch: &[TrainingExample]) -> ModelResult<f64> {
            Ok(0.0)
        }

        fn explain(&self, input: &str) -> ModelResult<String> {
            Ok(format!("echo: {input}"))
        }

        fn save(&self, _dir: &Path) -> ModelResult<Vec<PathBuf>> {
            Ok(Vec::new())
        }
    }

    fn args(script: &str, rest: &[&str]) -> Vec<String> {
        let mut args = vec!["-c".to_string(), script.to_string(), "fake-cc".to_string()];
        args.extend(rest.iter().map(|s| (*s).to_string()));
        args
    }

    fn prompt() -> PromptTemplate {
        PromptTemplate { prefix: "explain: ".to_string(), include_fix_description: true }
    }

    #[test]
    fn test_clean_compile_does_not_load_model() {
        let runner = CompileJobRunner::new("sh");
        let normalizer = DiagnosticNormalizer::default();
        let prompt = prompt();
        let session = TutorSession::new(&runner, &normalizer, &prompt);
        let loaded = Cell::new(false);

        let outcome = session
            .run(&args("echo built", &["main.cpp"]), || {
                loaded.set(true);
                Ok(EchoModel)
            })
            .unwrap();

        assert!(matches!(outcome, TutorOutcome::Compiled(_)));
        assert_eq!(outcome.result().stdout.trim(), "built");
        assert_eq!(outcome.exit_code(), 0);
        assert!(!loaded.get());
    }

    #[test]
    fn test_failure_is_filtered_on_source_argument() {
        let runner = CompileJobRunner::new("sh");
        let normalizer = DiagnosticNormalizer::default();
        let prompt = prompt();
        let session = TutorSession::new(&runner, &normalizer, &prompt);

        let script = "echo 'In file included from util.h:1:' >&2; \
                      echo 'main.cpp:3:5: error: boom' >&2; exit 4";
        let outcome = session.run(&args(script, &["src/main.cpp"]), || Ok(EchoModel)).unwrap();

        let TutorOutcome::Failed { diagnostic, explanation, .. } = &outcome else {
            panic!("expected a failed compile");
        };
        assert_eq!(diagnostic, "main.cpp:3:5: error: boom");
        assert_eq!(explanation.as_deref(), Some("echo: explain: main.cpp:3:5: error: boom"));
        assert_eq!(outcome.exit_code(), 4);
    }

    #[test]
    fn test_silent_failure_does_not_load_model() {
        let runner = CompileJobRunner::new("sh");
        let normalizer = DiagnosticNormalizer::default();
        let prompt = prompt();
        let session = TutorSession::new(&runner, &normalizer, &prompt);
        let loaded = Cell::new(false);

        let outcome = session
            .run(&args("exit 2", &["main.cpp"]), || {
                loaded.set(true);
                Ok(EchoModel)
            })
            .unwrap();

        let TutorOutcome::Failed { diagnostic, explanation, .. } = &outcome else {
            panic!("expected a failed compile");
        };
        assert!(diagnostic.is_empty());
        assert!(explanation.is_none());
        assert_eq!(outcome.exit_code(), 2);
        assert!(!loaded.get());
    }

    #[test]
    fn test_model_error_degrades_to_message() {
        let runner = CompileJobRunner::new("sh");
        let normalizer = DiagnosticNormalizer::default();
        let prompt = prompt();
        let session = TutorSession::new(&runner, &normalizer, &prompt);

        let outcome = session
            .run::<EchoModel, _>(&args("echo 'x.cpp: error' >&2; exit 1", &["x.cpp"]), || {
                Err(ModelError::Load { path: "model".to_string(), reason: "missing".to_string() })
            })
            .unwrap();

        let TutorOutcome::Failed { explanation: Some(explanation), .. } = outcome else {
            panic!("expected an explained failure");
        };
        assert!(explanation.starts_with("Error calling the model: "));
        assert!(explanation.contains("missing"));
    }

    #[test]
    fn test_missing_compiler_is_an_error() {
        let runner = CompileJobRunner::new("nonexistent_compiler_xyz123");
        let normalizer = DiagnosticNormalizer::default();
        let prompt = prompt();
        let session = TutorSession::new(&runner, &normalizer, &prompt);
        let loaded = Cell::new(false);

        let result = session.run(&["main.cpp".to_string()], || {
            loaded.set(true);
            Ok(EchoModel)
        });

        assert!(result.is_err());
        assert!(!loaded.get());
    }

    #[test]
    fn test_command_line() {
        let runner = CompileJobRunner::new("g++");
        let normalizer = DiagnosticNormalizer::default();
        let prompt = prompt();
        let session = TutorSession::new(&runner, &normalizer, &prompt);
        assert_eq!(
            session.command_line(&["main.cpp".to_string(), "-o".to_string(), "main".to_string()]),
            "g++ main.cpp -o main"
        );
    }
}
