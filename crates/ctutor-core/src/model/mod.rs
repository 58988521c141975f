//! The shipped `ModelService` implementation.

pub mod explainer;
pub mod tokenizer;

pub use explainer::{BagOfWordsExplainer, ExplainerConfig};
pub use tokenizer::{tokenize, Vocabulary};
