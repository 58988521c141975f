//! Softmax bag-of-words explainer.
//!
//! Each distinct training target is a class; a diagnostic is explained by the
//! target whose weights score it highest. Small, deterministic and pure Rust,
//! so the training controller and the tutor run end to end without an ML runtime.

use super::tokenizer::Vocabulary;
use ctutor_training::{ModelError, ModelResult, ModelService, TrainingExample};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

const MODEL_FILE: &str = "model.json";
const TOKENIZER_FILE: &str = "tokenizer.json";
const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplainerConfig {
    pub learning_rate: f64,
}

impl Default for ExplainerConfig {
    fn default() -> Self {
        Self { learning_rate: 0.5 }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ModelFile {
    format_version: u32,
    config: ExplainerConfig,
    labels: Vec<String>,
    weights: Vec<Vec<f64>>,
    bias: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct BagOfWordsExplainer {
    config: ExplainerConfig,
    vocab: Vocabulary,
    labels: Vec<String>,
    label_index: HashMap<String, usize>,
    weights: Vec<Vec<f64>>,
    bias: Vec<f64>,
}

impl BagOfWordsExplainer {
    /// Fit the vocabulary and label set on `examples`; weights start at zero.
    ///
    /// Pass every example (train and validation) so validation targets are known labels.
    pub fn new(examples: &[TrainingExample], config: ExplainerConfig) -> ModelResult<Self> {
        if examples.is_empty() {
            return Err(ModelError::Compute("cannot build a model without examples".to_string()));
        }
        if !config.learning_rate.is_finite() || config.learning_rate <= 0.0 {
            return Err(ModelError::Compute("learning_rate must be > 0".to_string()));
        }

        let vocab = Vocabulary::fit(examples.iter().map(|e| e.input.as_str()));
        let labels: Vec<String> =
            examples.iter().map(|e| e.target.clone()).collect::<BTreeSet<_>>().into_iter().collect();

        Ok(Self::from_parts(config, vocab, labels, None, None))
    }

    fn from_parts(
        config: ExplainerConfig,
        vocab: Vocabulary,
        labels: Vec<String>,
        weights: Option<Vec<Vec<f64>>>,
        bias: Option<Vec<f64>>,
    ) -> Self {
        let label_index = labels.iter().enumerate().map(|(i, l)| (l.clone(), i)).collect();
        let weights = weights.unwrap_or_else(|| vec![vec![0.0; vocab.len()]; labels.len()]);
        let bias = bias.unwrap_or_else(|| vec![0.0; labels.len()]);
        Self { config, vocab, labels, label_index, weights, bias }
    }

    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    #[must_use]
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }

    fn label_of(&self, target: &str) -> ModelResult<usize> {
        self.label_index
            .get(target)
            .copied()
            .ok_or_else(|| ModelError::UnknownTarget(truncate(target, 60)))
    }

    fn probabilities(&self, features: &[(usize, f64)]) -> Vec<f64> {
        let logits: Vec<f64> = self
            .weights
            .iter()
            .zip(&self.bias)
            .map(|(row, b)| b + features.iter().map(|(j, x)| row[*j] * x).sum::<f64>())
            .collect();
        softmax(&logits)
    }

    /// Mean cross-entropy of `batch` and, when `with_gradients`, the per-class gradients.
    fn forward(
        &self,
        batch: &[TrainingExample],
        with_gradients: bool,
    ) -> ModelResult<(f64, Option<Gradients>)> {
        if batch.is_empty() {
            return Err(ModelError::Compute("empty batch".to_string()));
        }

        let mut loss = 0.0;
        let mut grads = with_gradients.then(|| Gradients::zeros(self.labels.len(), self.vocab.len()));

        for example in batch {
            let target = self.label_of(&example.target)?;
            let features = self.vocab.features(&example.input);
            let probs = self.probabilities(&features);
            loss -= probs[target].max(1e-12).ln();

            if let Some(grads) = grads.as_mut() {
                for (class, p) in probs.iter().enumerate() {
                    let delta = p - if class == target { 1.0 } else { 0.0 };
                    grads.bias[class] += delta;
                    for (j, x) in &features {
                        grads.weights[class][*j] += delta * x;
                    }
                }
            }
        }

        Ok((loss / batch.len() as f64, grads))
    }
}

struct Gradients {
    weights: Vec<Vec<f64>>,
    bias: Vec<f64>,
}

impl Gradients {
    fn zeros(classes: usize, features: usize) -> Self {
        Self { weights: vec![vec![0.0; features]; classes], bias: vec![0.0; classes] }
    }
}

fn softmax(logits: &[f64]) -> Vec<f64> {
    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|l| (l - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    if !sum.is_finite() || sum <= 0.0 {
        let uniform = 1.0 / logits.len().max(1) as f64;
        return vec![uniform; logits.len()];
    }
    exps.into_iter().map(|e| e / sum).collect()
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        format!("{}...", text.chars().take(max_chars).collect::<String>())
    }
}

fn load_error(dir: &Path, reason: impl std::fmt::Display) -> ModelError {
    ModelError::Load { path: dir.display().to_string(), reason: reason.to_string() }
}

impl ModelService for BagOfWordsExplainer {
    fn id(&self) -> &'static str {
        "bag-of-words"
    }

    fn load(dir: &Path) -> ModelResult<Self> {
        let model_bytes = std::fs::read(dir.join(MODEL_FILE)).map_err(|e| load_error(dir, e))?;
        let tokenizer_bytes = std::fs::read(dir.join(TOKENIZER_FILE)).map_err(|e| load_error(dir, e))?;

        let model: ModelFile = serde_json::from_slice(&model_bytes).map_err(|e| load_error(dir, e))?;
        let vocab: Vocabulary = serde_json::from_slice(&tokenizer_bytes).map_err(|e| load_error(dir, e))?;

        if model.format_version != FORMAT_VERSION {
            return Err(load_error(dir, format!("unsupported format version {}", model.format_version)));
        }
        if model.weights.len() != model.labels.len() || model.bias.len() != model.labels.len() {
            return Err(load_error(dir, "weight rows do not match the label set"));
        }
        if model.weights.iter().any(|row| row.len() != vocab.len()) {
            return Err(load_error(dir, "weight columns do not match the vocabulary"));
        }

        tracing::debug!(dir = %dir.display(), labels = model.labels.len(), vocab = vocab.len(), "model loaded");
        Ok(Self::from_parts(model.config, vocab, model.labels, Some(model.weights), Some(model.bias)))
    }

    fn train_step(&mut self, batch: &[TrainingExample]) -> ModelResult<f64> {
        let (loss, grads) = self.forward(batch, true)?;
        let Some(grads) = grads else {
            return Err(ModelError::Compute("gradients were not computed".to_string()));
        };

        let step = self.config.learning_rate / batch.len() as f64;
        for (row, grad_row) in self.weights.iter_mut().zip(&grads.weights) {
            for (w, g) in row.iter_mut().zip(grad_row) {
                *w -= step * g;
            }
        }
        for (b, g) in self.bias.iter_mut().zip(&grads.bias) {
            *b -= step * g;
        }
        Ok(loss)
    }

    fn evaluate(&self, batch: &[TrainingExample]) -> ModelResult<f64> {
        self.forward(batch, false).map(|(loss, _)| loss)
    }

    fn explain(&self, input: &str) -> ModelResult<String> {
        if self.labels.is_empty() {
            return Err(ModelError::Compute("model has no labels".to_string()));
        }
        let probs = self.probabilities(&self.vocab.features(input));
        let best = probs
            .iter()
            .enumerate()
            .fold(0, |best, (i, p)| if *p > probs[best] { i } else { best });
        Ok(self.labels[best].clone())
    }

    fn save(&self, dir: &Path) -> ModelResult<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)?;

        let model = ModelFile {
            format_version: FORMAT_VERSION,
            config: self.config.clone(),
            labels: self.labels.clone(),
            weights: self.weights.clone(),
            bias: self.bias.clone(),
        };
        let model_path = dir.join(MODEL_FILE);
        std::fs::write(&model_path, serde_json::to_vec(&model)?)?;

        let tokenizer_path = dir.join(TOKENIZER_FILE);
        std::fs::write(&tokenizer_path, serde_json::to_vec_pretty(&self.vocab)?)?;

        Ok(vec![model_path, tokenizer_path])
    }
}
