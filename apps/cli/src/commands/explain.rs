//! `ctutor explain`: explain one diagnostic with the trained checkpoint.

use super::types::ExplainArgs;
use anyhow::{Context, Result};
use colored::Colorize;
use ctutor_core::compile::{CompileJobRunner, CompilerFlags};
use ctutor_core::config::TutorConfig;
use ctutor_core::diagnostics::DiagnosticNormalizer;
use ctutor_core::model::BagOfWordsExplainer;
use ctutor_core::tutor::explain_or_fallback;
use ctutor_training::ModelService;

pub fn execute(config: &TutorConfig, args: ExplainArgs) -> Result<()> {
    let normalizer = DiagnosticNormalizer::new(config.placeholder_name());

    let diagnostic = if let Some(source) = &args.source {
        let code = std::fs::read_to_string(source)
            .with_context(|| format!("Failed to read {}", source.display()))?;
        let runner = CompileJobRunner::new(config.compiler()).with_source_extension(config.source_extension());
        let result = runner.run(&code, &CompilerFlags::Default)?;
        normalizer.normalize(&result.stderr, result.source_path.as_deref(), None)
    } else if let Some(file) = &args.file {
        let raw = std::fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?;
        normalizer.normalize(&raw, None, None)
    } else if let Some(text) = &args.text {
        normalizer.normalize(text, None, None)
    } else {
        anyhow::bail!("Nothing to explain: pass diagnostic TEXT, --file or --source");
    };

    if diagnostic.is_empty() {
        println!("{}", "No compiler errors found.".green());
        return Ok(());
    }

    let model_dir = args.model_dir.unwrap_or_else(|| config.model_dir());
    let explanation = explain_or_fallback(BagOfWordsExplainer::load(&model_dir), &config.prompt(), &diagnostic);

    println!("{}", "Compiler error:".bold());
    println!("{}", diagnostic);
    println!();
    println!("{}", "Explanation:".bold());
    println!("{}", explanation);
    Ok(())
}
