//! Picks a representative text for each cluster.

use tracing::info;

use crate::config::SummaryConfig;
use crate::core::{Complaint, ComplaintCluster};
use crate::errors::{AnalysisError, PipelinePhase};
use crate::pipeline::stage::Stage;
use crate::progress::{ProgressSink, SilentProgressSink};

pub const SUMMARY_STAGE: &str = "Summarizing clusters";

#[derive(Debug, Clone, Default)]
pub struct ClusterSummarizer {
    config: SummaryConfig,
}

impl ClusterSummarizer {
    pub fn new(config: SummaryConfig) -> Result<Self, AnalysisError> {
        config.validate().map_err(AnalysisError::config)?;
        Ok(Self { config })
    }

    /// Highest-scored member; the earliest one wins ties.
    pub fn representative<'a>(&self, cluster: &'a ComplaintCluster) -> Option<&'a Complaint> {
        cluster
            .complaints
            .iter()
            .fold(None, |best: Option<&Complaint>, c| match best {
                Some(b) if b.score >= c.score => Some(b),
                _ => Some(c),
            })
    }

    /// Cut `text` to `max_length` characters, appending the ellipsis when cut.
    pub fn truncate(&self, text: &str) -> String {
        match text.char_indices().nth(self.config.max_length) {
            Some((byte_index, _)) => format!("{}{}", &text[..byte_index], self.config.ellipsis),
            None => text.to_string(),
        }
    }

    pub fn summarize(&self, clusters: &[ComplaintCluster]) -> Vec<ComplaintCluster> {
        self.summarize_with_progress(clusters, &SilentProgressSink)
    }

    /// Same clusters with `summary` replaced. Clusters without members keep
    /// their summary.
    pub fn summarize_with_progress(
        &self,
        clusters: &[ComplaintCluster],
        sink: &dyn ProgressSink,
    ) -> Vec<ComplaintCluster> {
        let total = clusters.len();
        let summarized: Vec<ComplaintCluster> = clusters
            .iter()
            .enumerate()
            .map(|(i, cluster)| {
                let mut out = cluster.clone();
                if let Some(best) = self.representative(cluster) {
                    out.summary = self.truncate(&best.text);
                }
                sink.report(&format!("Summarizing cluster {}/{}", i + 1, total), i + 1, total);
                out
            })
            .collect();
        info!("Summarized {} clusters", summarized.len());
        summarized
    }
}

impl Stage<Vec<ComplaintCluster>> for ClusterSummarizer {
    type Item = ComplaintCluster;

    fn phase(&self) -> PipelinePhase {
        PipelinePhase::Summarization
    }

    fn name(&self) -> &str {
        SUMMARY_STAGE
    }

    fn execute(
        &self,
        input: Vec<ComplaintCluster>,
        sink: &dyn ProgressSink,
    ) -> Result<Vec<ComplaintCluster>, AnalysisError> {
        Ok(self.summarize_with_progress(&input, sink))
    }
}
