//! Lexicon-weighted sentiment with negation handling.
//!
//! Tokens are walked left to right. A negation word arms a flag; the next
//! weighted word has its weight inverted and disarms it. If no weighted word
//! shows up within `negation_window` tokens the flag decays. The raw sum is
//! squashed with `sum / (|sum| + damping)` and then held strictly inside
//! (-1, 1), since the quotient rounds to exactly one for very large sums.

use super::text::sentiment_tokens;
use crate::config::Lexicon;

/// Largest magnitude a normalized score can take.
const SCORE_LIMIT: f64 = 1.0 - f64::EPSILON;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentScorer<'a> {
    lexicon: &'a Lexicon,
    negation_window: usize,
    damping: f64,
}

impl<'a> SentimentScorer<'a> {
    pub fn new(lexicon: &'a Lexicon, negation_window: usize, damping: f64) -> Self {
        Self {
            lexicon,
            negation_window,
            damping,
        }
    }

    /// Normalized sentiment of `text` in (-1, 1).
    pub fn score(&self, text: &str) -> f64 {
        let sum = self.raw_sum(&sentiment_tokens(text));
        if sum.is_nan() {
            return 0.0;
        }
        if sum.is_infinite() {
            return SCORE_LIMIT.copysign(sum);
        }
        (sum / (sum.abs() + self.damping)).clamp(-SCORE_LIMIT, SCORE_LIMIT)
    }

    /// Unnormalized weighted sum over already tokenized text.
    pub fn raw_sum(&self, tokens: &[String]) -> f64 {
        let mut sum = 0.0;
        let mut negated = false;
        let mut pending = 0usize;

        for token in tokens {
            if self.lexicon.is_negation(token) {
                negated = true;
                pending = 0;
                continue;
            }

            if let Some(weight) = self.lexicon.weight(token) {
                sum += if negated { -weight } else { weight };
                negated = false;
                pending = 0;
            } else if negated {
                pending += 1;
                if pending >= self.negation_window {
                    negated = false;
                    pending = 0;
                }
            }
        }
        sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CategoryRule;
    use std::collections::BTreeMap;

    fn lexicon() -> Lexicon {
        let mut weights = BTreeMap::new();
        weights.insert("good".to_string(), 2.0);
        weights.insert("bad".to_string(), -2.0);
        Lexicon::new(
            vec![CategoryRule::new("x", &["bad"])],
            vec![],
            vec!["not".into(), "never".into(), "don't".into()],
            weights,
        )
        .unwrap()
    }

    fn sum(text: &str) -> f64 {
        let lexicon = lexicon();
        SentimentScorer::new(&lexicon, 3, 5.0).raw_sum(&sentiment_tokens(text))
    }

    #[test]
    fn test_plain_weights_add_up() {
        assert_eq!(sum("good good bad"), 2.0);
    }

    #[test]
    fn test_negation_inverts_next_weighted_word() {
        assert_eq!(sum("not good"), -2.0);
        assert_eq!(sum("never bad"), 2.0);
    }

    #[test]
    fn test_negation_consumed_once() {
        assert_eq!(sum("not good good"), 0.0);
    }

    #[test]
    fn test_negation_survives_short_gap() {
        assert_eq!(sum("don't think it's good"), -2.0);
    }

    #[test]
    fn test_negation_decays_after_window() {
        assert_eq!(sum("not at all really good"), 2.0);
    }

    #[test]
    fn test_second_negation_rearms() {
        assert_eq!(sum("not one two not good"), -2.0);
    }

    #[test]
    fn test_normalized_score_bounds() {
        let lexicon = lexicon();
        let scorer = SentimentScorer::new(&lexicon, 3, 5.0);
        assert_eq!(scorer.score("nothing weighted here"), 0.0);
        assert!((scorer.score("bad") - (-2.0 / 7.0)).abs() < 1e-12);
        let extreme = scorer.score(&"bad ".repeat(10_000));
        assert!(extreme > -1.0 && extreme < -0.99);
    }

    #[test]
    fn test_tiny_damping_stays_inside_open_interval() {
        let lexicon = lexicon();
        let scorer = SentimentScorer::new(&lexicon, 3, 1e-20);
        let negative = scorer.score("this app is bad");
        let positive = scorer.score("good good good");
        assert!(negative > -1.0 && negative < 0.0);
        assert!(positive < 1.0 && positive > 0.0);

        let saturated = scorer.score(&"bad ".repeat(1_000));
        assert!(saturated > -1.0);
    }
}
