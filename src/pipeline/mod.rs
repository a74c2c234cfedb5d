//! End-to-end complaint analysis.
//!
//! [`ComplaintPipeline`] runs detection, clustering and summarization in
//! strict sequence. Every stage goes through [`stage::run_stage`], so a
//! failing stage hands an empty collection to the next one and the failure
//! is recorded on the [`AnalysisOutcome`] instead of being returned as an
//! error.
//!
//! ```rust
//! use complaintmap::config::ComplaintmapConfig;
//! use complaintmap::core::Post;
//! use complaintmap::pipeline::ComplaintPipeline;
//! use complaintmap::progress::SilentProgressSink;
//!
//! let pipeline = ComplaintPipeline::new(&ComplaintmapConfig::default()).unwrap();
//! let posts = vec![Post {
//!     id: "abc".into(),
//!     title: "The app keeps crashing".into(),
//!     ..Default::default()
//! }];
//! let outcome = pipeline.run(&posts, &SilentProgressSink);
//! assert_eq!(outcome.clusters.len(), 1);
//! assert!(outcome.failures.is_empty());
//! ```

pub mod stage;

use tracing::info_span;

use crate::analysis::{ClusterSummarizer, ComplaintClusterer, ComplaintDetector};
use crate::config::ComplaintmapConfig;
use crate::core::{ComplaintCluster, Post};
use crate::errors::{AnalysisError, StageFailure};
use crate::progress::ProgressSink;
use stage::run_stage;

/// Result of one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutcome {
    /// Summarized clusters, frequency then total score descending
    pub clusters: Vec<ComplaintCluster>,
    /// Complaints handed to clustering
    pub complaint_count: usize,
    pub posts_analyzed: usize,
    /// Stages that failed and were replaced by an empty result
    pub failures: Vec<StageFailure>,
}

impl AnalysisOutcome {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ComplaintPipeline {
    detector: ComplaintDetector,
    clusterer: ComplaintClusterer,
    summarizer: ClusterSummarizer,
}

impl ComplaintPipeline {
    /// Build all three stages from a validated configuration.
    pub fn new(config: &ComplaintmapConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        Ok(Self {
            detector: ComplaintDetector::new(config.resolve_lexicon()?, config.detection.clone())?,
            clusterer: ComplaintClusterer::new(config.clustering.clone())?,
            summarizer: ClusterSummarizer::new(config.summary.clone())?,
        })
    }

    pub fn detector(&self) -> &ComplaintDetector {
        &self.detector
    }

    pub fn run(&self, posts: &[Post], sink: &dyn ProgressSink) -> AnalysisOutcome {
        let _span = info_span!("complaint_analysis", posts = posts.len()).entered();
        let mut failures = Vec::new();

        let detected = run_stage(&self.detector, posts, sink);
        failures.extend(detected.failure);
        let complaints = detected.items;
        let complaint_count = complaints.len();

        let clustered = run_stage(&self.clusterer, complaints, sink);
        failures.extend(clustered.failure);

        let summarized = run_stage(&self.summarizer, clustered.items, sink);
        failures.extend(summarized.failure);

        AnalysisOutcome {
            clusters: summarized.items,
            complaint_count,
            posts_analyzed: posts.len(),
            failures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{CLUSTERING_STAGE, DETECTION_STAGE, SUMMARY_STAGE};
    use crate::core::Comment;
    use crate::errors::PipelinePhase;
    use crate::progress::RecordingProgressSink;

    fn post(id: &str, title: &str, score: i64, comments: Vec<Comment>) -> Post {
        Post {
            id: id.into(),
            title: title.into(),
            score,
            comments,
            ..Default::default()
        }
    }

    fn comment(id: &str, body: &str, score: i64) -> Comment {
        Comment {
            id: id.into(),
            body: body.into(),
            score,
            ..Default::default()
        }
    }

    #[test]
    fn test_stages_run_in_order() {
        let sink = RecordingProgressSink::new();
        ComplaintPipeline::default().run(&[post("p", "The app is broken", 1, vec![])], &sink);
        assert_eq!(
            sink.stages(),
            vec![DETECTION_STAGE, CLUSTERING_STAGE, SUMMARY_STAGE]
        );
        assert_eq!(sink.completed_stages(), sink.stages());
    }

    #[test]
    fn test_summary_uses_highest_scored_member() {
        let posts = vec![post(
            "p",
            "Nice weather today",
            1,
            vec![
                comment("a", "The app keeps crashing and freezing", 2),
                comment("b", "App crashes constantly, freezes every day", 7),
            ],
        )];
        let outcome = ComplaintPipeline::default().run(&posts, &RecordingProgressSink::new());
        assert_eq!(outcome.complaint_count, 2);
        assert_eq!(outcome.clusters.len(), 1);
        assert_eq!(
            outcome.clusters[0].summary,
            "App crashes constantly, freezes every day"
        );
        assert_eq!(outcome.clusters[0].total_score, 9);
    }

    #[test]
    fn test_no_complaints_is_not_a_failure() {
        let outcome = ComplaintPipeline::default().run(
            &[post("p", "Great, I love this, works perfectly", 1, vec![])],
            &RecordingProgressSink::new(),
        );
        assert!(outcome.clusters.is_empty());
        assert!(outcome.is_complete());
        assert_eq!(outcome.posts_analyzed, 1);
    }

    #[test]
    fn test_detection_failure_propagates_as_empty_result() {
        let sink = RecordingProgressSink::new();
        let outcome = ComplaintPipeline::default().run(
            &[post("", "Everything is broken", 1, vec![])],
            &sink,
        );
        assert!(outcome.clusters.is_empty());
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].phase, PipelinePhase::Detection);
        assert_eq!(sink.stages().len(), 3);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = ComplaintmapConfig::default();
        config.summary.max_length = 0;
        assert!(ComplaintPipeline::new(&config).is_err());
    }
}
