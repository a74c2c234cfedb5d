//! Detector vocabulary.
//!
//! The [`Lexicon`] bundles everything the complaint detector matches against:
//! categorized indicator phrases, strongly negative terms, negation words and
//! the word→weight sentiment table. It is an explicit value handed to the
//! detector, so tests and `.complaintmap.toml` files can swap in their own.
//!
//! Category declaration order is part of the contract: when two categories
//! match the same number of phrases, the one declared first wins.

use crate::errors::AnalysisError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// A named group of indicator phrases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub name: String,
    pub phrases: Vec<String>,
}

impl CategoryRule {
    pub fn new(name: impl Into<String>, phrases: &[&str]) -> Self {
        Self {
            name: name.into(),
            phrases: phrases.iter().map(|p| p.to_string()).collect(),
        }
    }
}

const PRODUCT_ISSUE: &[&str] = &[
    "issue",
    "problem",
    "bug",
    "glitch",
    "broken",
    "error",
    "crash",
    "freezes",
    "freezing",
    "not working",
    "doesn't work",
    "doesn't load",
    "won't load",
    "defect",
];

const SERVICE_QUALITY: &[&str] = &[
    "customer service",
    "support",
    "no response",
    "never responds",
    "waiting",
    "unresponsive",
    "ignored",
    "rude",
    "ticket",
];

const PRICING: &[&str] = &[
    "overpriced",
    "expensive",
    "not worth",
    "waste of money",
    "refund",
    "charged",
    "price hike",
    "raising prices",
    "hidden fee",
];

const USER_EXPERIENCE: &[&str] = &[
    "confusing",
    "unintuitive",
    "annoying",
    "frustrating",
    "hard to find",
    "more clicks",
    "redesign",
    "cluttered",
    "laggy",
    "slow",
    "can't access",
    "can't use",
];

const RELIABILITY: &[&str] = &[
    "outage",
    "is down",
    "went down",
    "lost data",
    "lost all",
    "unreliable",
    "keeps crashing",
    "hangs",
    "logged out",
    "unusable",
];

const DISSATISFACTION: &[&str] = &[
    "disappointed",
    "dissatisfied",
    "unhappy",
    "upset",
    "terrible",
    "horrible",
    "awful",
    "worst",
    "sucks",
    "hate",
    "useless",
    "waste",
    "poor",
    "bad",
    "regret",
    "fix",
    "misleading",
    "deceptive",
];

const NEGATIVE_TERMS: &[&str] = &[
    "hate",
    "garbage",
    "scam",
    "fraud",
    "trash",
    "rip-off",
    "ripoff",
    "pathetic",
    "disgusting",
    "worst",
];

const NEGATION_WORDS: &[&str] = &[
    "not", "no", "never", "none", "nobody", "nothing", "neither", "nor", "cannot", "can't",
    "cant", "don't", "dont", "doesn't", "doesnt", "didn't", "didnt", "isn't", "isnt", "wasn't",
    "aren't", "weren't", "won't", "wont", "wouldn't", "shouldn't", "couldn't", "hasn't",
    "haven't", "hadn't", "ain't",
];

const SENTIMENT_WEIGHTS: &[(&str, f64)] = &[
    // negative
    ("bad", -2.0),
    ("worse", -2.0),
    ("worst", -3.0),
    ("terrible", -3.0),
    ("horrible", -3.0),
    ("awful", -3.0),
    ("hate", -3.0),
    ("hated", -3.0),
    ("broken", -2.0),
    ("broke", -2.0),
    ("crash", -2.0),
    ("crashes", -2.0),
    ("crashed", -2.0),
    ("crashing", -2.0),
    ("freeze", -2.0),
    ("freezes", -2.0),
    ("freezing", -2.0),
    ("bug", -1.0),
    ("bugs", -1.0),
    ("buggy", -2.0),
    ("slow", -1.0),
    ("laggy", -2.0),
    ("useless", -2.0),
    ("garbage", -3.0),
    ("trash", -3.0),
    ("scam", -3.0),
    ("fraud", -3.0),
    ("pathetic", -3.0),
    ("disappointed", -2.0),
    ("disappointing", -2.0),
    ("frustrating", -2.0),
    ("frustrated", -2.0),
    ("annoying", -2.0),
    ("confusing", -1.0),
    ("unusable", -3.0),
    ("overpriced", -2.0),
    ("expensive", -1.0),
    ("poor", -2.0),
    ("sucks", -3.0),
    ("problem", -1.0),
    ("problems", -1.0),
    ("issue", -1.0),
    ("issues", -1.0),
    ("fail", -2.0),
    ("fails", -2.0),
    ("failed", -2.0),
    ("error", -1.0),
    ("errors", -1.0),
    ("unacceptable", -3.0),
    ("ridiculous", -2.0),
    ("angry", -2.0),
    ("upset", -2.0),
    ("unhappy", -2.0),
    ("regret", -2.0),
    ("waste", -2.0),
    ("wasted", -2.0),
    ("ignored", -2.0),
    ("rude", -2.0),
    ("misleading", -2.0),
    ("lost", -1.0),
    // positive
    ("good", 2.0),
    ("great", 3.0),
    ("love", 3.0),
    ("loved", 3.0),
    ("excellent", 3.0),
    ("amazing", 3.0),
    ("awesome", 3.0),
    ("perfect", 3.0),
    ("perfectly", 2.0),
    ("best", 3.0),
    ("better", 2.0),
    ("happy", 2.0),
    ("glad", 2.0),
    ("satisfied", 2.0),
    ("nice", 2.0),
    ("helpful", 2.0),
    ("reliable", 2.0),
    ("recommend", 2.0),
    ("thanks", 2.0),
    ("thank", 2.0),
    ("improved", 2.0),
    ("fixed", 2.0),
    ("resolved", 2.0),
    ("smooth", 2.0),
    ("fast", 1.0),
    ("easy", 1.0),
    ("fine", 1.0),
    ("work", 1.0),
    ("works", 1.0),
    ("working", 1.0),
];

/// Built-in category table in declaration order.
pub fn default_categories() -> Vec<CategoryRule> {
    vec![
        CategoryRule::new("product-issue", PRODUCT_ISSUE),
        CategoryRule::new("service-quality", SERVICE_QUALITY),
        CategoryRule::new("pricing", PRICING),
        CategoryRule::new("user-experience", USER_EXPERIENCE),
        CategoryRule::new("reliability", RELIABILITY),
        CategoryRule::new("dissatisfaction", DISSATISFACTION),
    ]
}

pub fn default_negative_terms() -> Vec<String> {
    NEGATIVE_TERMS.iter().map(|t| t.to_string()).collect()
}

pub fn default_negation_words() -> Vec<String> {
    NEGATION_WORDS.iter().map(|t| t.to_string()).collect()
}

pub fn default_sentiment_weights() -> BTreeMap<String, f64> {
    SENTIMENT_WEIGHTS
        .iter()
        .map(|(word, weight)| (word.to_string(), *weight))
        .collect()
}

/// Resolved, lower-cased detector vocabulary.
#[derive(Debug, Clone, PartialEq)]
pub struct Lexicon {
    categories: Vec<CategoryRule>,
    vocabulary: Vec<String>,
    negative_terms: Vec<String>,
    negation_words: HashSet<String>,
    sentiment_weights: HashMap<String, f64>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::build(
            default_categories(),
            default_negative_terms(),
            default_negation_words(),
            default_sentiment_weights(),
        )
    }
}

/// Largest accepted magnitude for a single sentiment weight.
pub const MAX_SENTIMENT_WEIGHT: f64 = 1e3;

impl Lexicon {
    /// Build and validate a lexicon from raw tables.
    pub fn new(
        categories: Vec<CategoryRule>,
        negative_terms: Vec<String>,
        negation_words: Vec<String>,
        sentiment_weights: BTreeMap<String, f64>,
    ) -> Result<Self, AnalysisError> {
        let lexicon = Self::build(categories, negative_terms, negation_words, sentiment_weights);
        lexicon.validate()?;
        Ok(lexicon)
    }

    fn build(
        categories: Vec<CategoryRule>,
        negative_terms: Vec<String>,
        negation_words: Vec<String>,
        sentiment_weights: BTreeMap<String, f64>,
    ) -> Self {
        let categories: Vec<CategoryRule> = categories
            .into_iter()
            .map(|rule| CategoryRule {
                name: rule.name.trim().to_string(),
                phrases: lowered(rule.phrases),
            })
            .collect();

        let vocabulary: Vec<String> = {
            let mut seen = HashSet::new();
            categories
                .iter()
                .flat_map(|rule| rule.phrases.iter())
                .filter(|phrase| seen.insert(phrase.as_str()))
                .cloned()
                .collect()
        };

        Self {
            vocabulary,
            categories,
            negative_terms: lowered(negative_terms),
            negation_words: lowered(negation_words).into_iter().collect(),
            sentiment_weights: sentiment_weights
                .into_iter()
                .map(|(word, weight)| (word.trim().to_lowercase(), weight))
                .collect(),
        }
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.vocabulary.is_empty() {
            return Err(AnalysisError::config(
                "lexicon must define at least one indicator phrase",
            ));
        }

        let mut names = HashSet::new();
        for rule in &self.categories {
            if rule.name.is_empty() {
                return Err(AnalysisError::config("lexicon category names must not be empty"));
            }
            if !names.insert(rule.name.as_str()) {
                return Err(AnalysisError::config(format!(
                    "lexicon category `{}` is declared twice",
                    rule.name
                )));
            }
        }

        if let Some((word, weight)) = self
            .sentiment_weights
            .iter()
            .find(|(_, weight)| !weight.is_finite())
        {
            return Err(AnalysisError::config(format!(
                "sentiment weight for `{word}` is not finite ({weight})"
            )));
        }
        if let Some((word, weight)) = self
            .sentiment_weights
            .iter()
            .find(|(_, weight)| weight.abs() > MAX_SENTIMENT_WEIGHT)
        {
            return Err(AnalysisError::config(format!(
                "sentiment weight for `{word}` exceeds ±{MAX_SENTIMENT_WEIGHT} ({weight})"
            )));
        }
        Ok(())
    }

    pub fn categories(&self) -> &[CategoryRule] {
        &self.categories
    }

    /// All indicator phrases, de-duplicated, first occurrence wins.
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn negative_terms(&self) -> &[String] {
        &self.negative_terms
    }

    pub fn is_negation(&self, token: &str) -> bool {
        self.negation_words.contains(token)
    }

    pub fn weight(&self, token: &str) -> Option<f64> {
        self.sentiment_weights.get(token).copied()
    }
}

fn lowered(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|item| item.trim().to_lowercase())
        .filter(|item| !item.is_empty())
        .collect()
}

/// `[lexicon]` section: every table is optional and replaces the built-in
/// table of the same name when present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexiconConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<CategoryRule>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_terms: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negation_words: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment_weights: Option<BTreeMap<String, f64>>,
}

impl LexiconConfig {
    pub fn resolve(&self) -> Result<Lexicon, AnalysisError> {
        Lexicon::new(
            self.categories.clone().unwrap_or_else(default_categories),
            self.negative_terms
                .clone()
                .unwrap_or_else(default_negative_terms),
            self.negation_words
                .clone()
                .unwrap_or_else(default_negation_words),
            self.sentiment_weights
                .clone()
                .unwrap_or_else(default_sentiment_weights),
        )
    }
}
