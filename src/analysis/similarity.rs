use super::text::{similarity_tokens, TokenSet};
use crate::config::ClusteringConfig;

/// `|A ∩ B| / |A ∪ B|`, or 0 when either side is empty.
pub fn jaccard(a: &TokenSet, b: &TokenSet) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let intersection = small.iter().filter(|token| large.contains(*token)).count();
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}

/// Tokenizes complaint text the same way for every comparison in a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tokenizer {
    min_token_length: usize,
    stem: bool,
}

impl Tokenizer {
    pub fn from_config(config: &ClusteringConfig) -> Self {
        Self {
            min_token_length: config.min_token_length,
            stem: config.stem_tokens,
        }
    }

    pub fn tokens(&self, text: &str) -> TokenSet {
        similarity_tokens(text, self.min_token_length, self.stem)
    }

    /// Jaccard similarity of two raw texts.
    pub fn similarity(&self, a: &str, b: &str) -> f64 {
        jaccard(&self.tokens(a), &self.tokens(b))
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::from_config(&ClusteringConfig::default())
    }
}
