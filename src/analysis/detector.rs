//! Complaint detection over posts and their reply trees.
//!
//! [`ComplaintDetector::detect`] scores one text: indicator phrase hits
//! (grouped into categories), strongly negative terms, and lexicon-weighted
//! sentiment. [`ComplaintDetector::extract`] applies it to every post and,
//! depth-first, to every comment beneath it. Each unit is judged on its own;
//! a reply can be a complaint under a post that is not, and vice versa.

use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info, warn};

use super::sentiment::SentimentScorer;
use crate::config::{DetectionConfig, Lexicon};
use crate::core::{Comment, Complaint, Detection, Post};
use crate::errors::{AnalysisError, PipelinePhase};
use crate::pipeline::stage::{guard_stage, Stage};
use crate::progress::ProgressSink;

pub const DETECTION_STAGE: &str = "Detecting complaints";

#[derive(Debug, Clone)]
pub struct ComplaintDetector {
    lexicon: Lexicon,
    config: DetectionConfig,
}

impl Default for ComplaintDetector {
    fn default() -> Self {
        Self {
            lexicon: Lexicon::default(),
            config: DetectionConfig::default(),
        }
    }
}

impl ComplaintDetector {
    pub fn new(lexicon: Lexicon, config: DetectionConfig) -> Result<Self, AnalysisError> {
        lexicon.validate()?;
        config.validate().map_err(AnalysisError::config)?;
        Ok(Self { lexicon, config })
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Classify a single text.
    pub fn detect(&self, text: &str) -> Detection {
        if text.chars().count() < self.config.min_text_length {
            return Detection::none();
        }

        let lower = text.to_lowercase();
        let hits = self.indicator_hits(&lower);
        let category = self.categorize(&lower);
        let contains_negative_terms = self
            .lexicon
            .negative_terms()
            .iter()
            .any(|term| lower.contains(term.as_str()));
        let sentiment = SentimentScorer::new(
            &self.lexicon,
            self.config.negation_window,
            self.config.sentiment_damping,
        )
        .score(text);

        let vocabulary_size = self.lexicon.vocabulary().len() as f64;
        let confidence =
            (hits as f64 / (vocabulary_size * self.config.confidence_scale)).clamp(0.0, 1.0);

        let is_complaint =
            hits > 0 || sentiment < self.config.sentiment_threshold || contains_negative_terms;

        Detection {
            is_complaint,
            confidence: if is_complaint {
                confidence.max(self.config.confidence_floor)
            } else {
                0.0
            },
            category,
            sentiment,
            contains_negative_terms,
        }
    }

    /// Number of distinct indicator phrases present in `lower`.
    fn indicator_hits(&self, lower: &str) -> usize {
        self.lexicon
            .vocabulary()
            .iter()
            .filter(|phrase| lower.contains(phrase.as_str()))
            .count()
    }

    /// Category with the most phrase hits; earlier declarations win ties.
    fn categorize(&self, lower: &str) -> Option<String> {
        let mut best: Option<(&str, usize)> = None;
        for rule in self.lexicon.categories() {
            let count = rule
                .phrases
                .iter()
                .filter(|phrase| lower.contains(phrase.as_str()))
                .count();
            if count > 0 && best.map_or(true, |(_, top)| count > top) {
                best = Some((rule.name.as_str(), count));
            }
        }
        best.map(|(name, _)| name.to_string())
    }

    /// Extract complaints from all posts; on any failure, log, warn through
    /// the sink and return nothing.
    pub fn extract(&self, posts: &[Post], sink: &dyn ProgressSink) -> Vec<Complaint> {
        guard_stage(PipelinePhase::Detection, sink, || self.try_extract(posts, sink)).items
    }

    /// Extract complaints, failing the whole batch on the first bad unit.
    pub fn try_extract(
        &self,
        posts: &[Post],
        sink: &dyn ProgressSink,
    ) -> Result<Vec<Complaint>, AnalysisError> {
        let total = posts.len();

        let per_post: Vec<Vec<Complaint>> = if self.config.parallel {
            let done = AtomicUsize::new(0);
            posts
                .par_iter()
                .map(|post| {
                    let found = self.extract_post(post);
                    let current = done.fetch_add(1, Ordering::Relaxed) + 1;
                    sink.report(&format!("Analyzing post {}/{}", current, total), current, total);
                    found
                })
                .collect::<Result<_, _>>()?
        } else {
            posts
                .iter()
                .enumerate()
                .map(|(i, post)| {
                    sink.report(&format!("Analyzing post {}/{}", i + 1, total), i + 1, total);
                    self.extract_post(post)
                })
                .collect::<Result<_, _>>()?
        };

        let complaints: Vec<Complaint> = per_post.into_iter().flatten().collect();
        info!(
            "Found {} complaints in {} posts",
            complaints.len(),
            posts.len()
        );
        Ok(complaints)
    }

    /// The post itself, then its comment tree in depth-first pre-order.
    fn extract_post(&self, post: &Post) -> Result<Vec<Complaint>, AnalysisError> {
        if post.id.is_empty() {
            return Err(AnalysisError::invalid_input(format!(
                "post titled {:?} has an empty id",
                post.title
            )));
        }

        let mut found = Vec::new();
        let detection = self.detect(&post.analysis_text());
        if detection.is_complaint {
            found.push(Complaint::from_detection(
                post.display_text(),
                post.source_ref(),
                detection,
            ));
        }

        self.walk_comments(post, &mut found)?;
        debug!(post = %post.id, complaints = found.len(), "post analyzed");
        Ok(found)
    }

    fn walk_comments(&self, post: &Post, found: &mut Vec<Complaint>) -> Result<(), AnalysisError> {
        let max_depth = self.config.max_reply_depth;
        let mut skipped = 0usize;
        let mut stack: Vec<(&Comment, usize)> =
            post.comments.iter().rev().map(|c| (c, 1)).collect();

        while let Some((comment, depth)) = stack.pop() {
            if comment.id.is_empty() {
                return Err(AnalysisError::invalid_input(format!(
                    "comment under post `{}` has an empty id",
                    post.id
                )));
            }

            let detection = self.detect(&comment.body);
            if detection.is_complaint {
                found.push(Complaint::from_detection(
                    comment.body.clone(),
                    comment.source_ref(),
                    detection,
                ));
            }

            if depth < max_depth {
                stack.extend(comment.replies.iter().rev().map(|reply| (reply, depth + 1)));
            } else if !comment.replies.is_empty() {
                skipped += comment.replies.len();
            }
        }

        if skipped > 0 {
            warn!(
                post = %post.id,
                skipped,
                max_depth,
                "reply tree deeper than the configured limit; deeper replies were not analyzed"
            );
        }
        Ok(())
    }
}

impl<'a> Stage<&'a [Post]> for ComplaintDetector {
    type Item = Complaint;

    fn phase(&self) -> PipelinePhase {
        PipelinePhase::Detection
    }

    fn name(&self) -> &str {
        DETECTION_STAGE
    }

    fn execute(&self, input: &'a [Post], sink: &dyn ProgressSink) -> Result<Vec<Complaint>, AnalysisError> {
        self.try_extract(input, sink)
    }
}
