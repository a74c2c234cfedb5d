//! Tokenizers shared by the sentiment scorer and the similarity measure.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").unwrap());

/// Token set used for Jaccard comparisons.
pub type TokenSet = HashSet<String>;

/// Whitespace tokens, lower-cased, keeping only alphanumerics and apostrophes.
///
/// Typographic apostrophes are folded to `'` so `don’t` matches `don't`.
pub fn sentiment_tokens(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|raw| {
            raw.chars()
                .map(|c| if c == '\u{2019}' { '\'' } else { c })
                .filter(|c| c.is_alphanumeric() || *c == '\'')
                .flat_map(char::to_lowercase)
                .collect::<String>()
        })
        .filter(|token| !token.is_empty())
        .collect()
}

/// Lower-cased word tokens with punctuation removed, dropping anything
/// shorter than `min_len` characters.
pub fn similarity_tokens(text: &str, min_len: usize, stem: bool) -> TokenSet {
    let lowered = text.to_lowercase();
    let cleaned = NON_WORD.replace_all(&lowered, "");
    cleaned
        .split_whitespace()
        .filter(|token| token.chars().count() >= min_len)
        .map(|token| {
            if stem {
                light_stem(token)
            } else {
                token.to_string()
            }
        })
        .collect()
}

/// Strip one common inflectional suffix so `crashes`/`crashing` share `crash`.
///
/// The remaining stem must keep at least three characters, and words ending
/// in `ss` are left alone (`access`, `less`).
pub fn light_stem(token: &str) -> String {
    if token.ends_with("ss") {
        return token.to_string();
    }
    for suffix in ["ing", "es", "ed", "s"] {
        if let Some(stem) = token.strip_suffix(suffix) {
            if stem.chars().count() >= 3 {
                return stem.to_string();
            }
        }
    }
    token.to_string()
}
