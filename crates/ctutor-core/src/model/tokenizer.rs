//! Word-level vocabulary used as the explainer's tokenizer state.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Lowercased runs of alphanumerics/underscores. Pure numbers (line and column
/// positions) carry no meaning across diagnostics and are dropped.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| !t.is_empty())
        .filter(|t| !t.chars().all(|c| c.is_ascii_digit()))
        .map(str::to_lowercase)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    tokens: BTreeMap<String, usize>,
}

impl Vocabulary {
    /// Build a vocabulary with stable (sorted) token ids.
    pub fn fit<'a>(texts: impl IntoIterator<Item = &'a str>) -> Self {
        let set: BTreeSet<String> = texts.into_iter().flat_map(tokenize).collect();
        let tokens = set.into_iter().enumerate().map(|(i, t)| (t, i)).collect();
        Self { tokens }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    #[must_use]
    pub fn id(&self, token: &str) -> Option<usize> {
        self.tokens.get(token).copied()
    }

    /// Sparse L2-normalised bag of known tokens, sorted by token id.
    /// Unknown tokens are ignored.
    #[must_use]
    pub fn features(&self, text: &str) -> Vec<(usize, f64)> {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for token in tokenize(text) {
            if let Some(id) = self.id(&token) {
                *counts.entry(id).or_insert(0.0) += 1.0;
            }
        }

        let norm = counts.values().map(|c| c * c).sum::<f64>().sqrt();
        let mut features: Vec<(usize, f64)> = counts.into_iter().map(|(id, c)| (id, c / norm)).collect();
        features.sort_unstable_by_key(|(id, _)| *id);
        features
    }
}
