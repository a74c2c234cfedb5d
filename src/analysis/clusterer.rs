//! Incremental greedy clustering of complaints.
//!
//! Complaints are visited in input order. Each one joins the first existing
//! cluster (in creation order) whose summary, or failing that any member,
//! reaches the similarity threshold; otherwise it founds a new cluster.
//! There is no best-match search, so the outcome depends on input order.

use std::collections::HashSet;
use tracing::{debug, info, warn};

use super::similarity::{jaccard, Tokenizer};
use super::text::TokenSet;
use crate::config::ClusteringConfig;
use crate::core::{Complaint, ComplaintCluster};
use crate::errors::{AnalysisError, PipelinePhase};
use crate::pipeline::stage::{guard_stage, Stage};
use crate::progress::ProgressSink;

pub const CLUSTERING_STAGE: &str = "Clustering complaints";

/// A cluster under construction with its token sets cached.
struct Candidate {
    cluster: ComplaintCluster,
    summary_tokens: TokenSet,
    member_tokens: Vec<TokenSet>,
}

impl Candidate {
    fn found(id: String, complaint: Complaint, tokens: TokenSet) -> Self {
        Self {
            cluster: ComplaintCluster::singleton(id, complaint),
            summary_tokens: tokens.clone(),
            member_tokens: vec![tokens],
        }
    }

    fn matches(&self, tokens: &TokenSet, threshold: f64) -> bool {
        jaccard(&self.summary_tokens, tokens) >= threshold
            || self
                .member_tokens
                .iter()
                .any(|member| jaccard(member, tokens) >= threshold)
    }

    fn absorb(&mut self, complaint: Complaint, tokens: TokenSet) -> Result<(), AnalysisError> {
        self.cluster.absorb(complaint)?;
        self.member_tokens.push(tokens);
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct ComplaintClusterer {
    config: ClusteringConfig,
    tokenizer: Tokenizer,
}

impl ComplaintClusterer {
    pub fn new(config: ClusteringConfig) -> Result<Self, AnalysisError> {
        config.validate().map_err(AnalysisError::config)?;
        let tokenizer = Tokenizer::from_config(&config);
        Ok(Self { config, tokenizer })
    }

    pub fn config(&self) -> &ClusteringConfig {
        &self.config
    }

    /// Cluster complaints; on failure, warn through the sink and return
    /// nothing.
    pub fn cluster(&self, complaints: Vec<Complaint>, sink: &dyn ProgressSink) -> Vec<ComplaintCluster> {
        guard_stage(PipelinePhase::Clustering, sink, || self.try_cluster(complaints, sink)).items
    }

    /// Cluster complaints, sorted by frequency then total score (both
    /// descending). Ties beyond that keep creation order.
    ///
    /// A complaint whose id was already seen is skipped with a warning.
    /// Non-finite scores or an overflowing cluster score are errors.
    pub fn try_cluster(
        &self,
        complaints: Vec<Complaint>,
        sink: &dyn ProgressSink,
    ) -> Result<Vec<ComplaintCluster>, AnalysisError> {
        let total = complaints.len();
        let threshold = self.config.similarity_threshold;
        let mut seen: HashSet<String> = HashSet::with_capacity(total);
        let mut candidates: Vec<Candidate> = Vec::new();

        for (index, complaint) in complaints.into_iter().enumerate() {
            check_complaint(&complaint)?;
            if !seen.insert(complaint.id.clone()) {
                let skipped = AnalysisError::duplicate_complaint(complaint.id);
                warn!("Skipping complaint: {}", skipped);
                sink.warn(&format!("Skipped {skipped}"));
                report_progress(sink, index, total);
                continue;
            }

            let tokens = self.tokenizer.tokens(&complaint.text);
            match candidates
                .iter_mut()
                .find(|candidate| candidate.matches(&tokens, threshold))
            {
                Some(candidate) => {
                    debug!(complaint = %complaint.id, cluster = %candidate.cluster.id, "joined cluster");
                    candidate.absorb(complaint, tokens)?;
                }
                None => {
                    let id = format!("cluster-{}", candidates.len() + 1);
                    debug!(complaint = %complaint.id, cluster = %id, "new cluster");
                    candidates.push(Candidate::found(id, complaint, tokens));
                }
            }

            report_progress(sink, index, total);
        }

        let mut clusters: Vec<ComplaintCluster> =
            candidates.into_iter().map(|c| c.cluster).collect();
        clusters.sort_by(|a, b| {
            b.frequency
                .cmp(&a.frequency)
                .then_with(|| b.total_score.cmp(&a.total_score))
        });

        info!("Grouped {} complaints into {} clusters", total, clusters.len());
        Ok(clusters)
    }
}

fn report_progress(sink: &dyn ProgressSink, index: usize, total: usize) {
    sink.report(
        &format!("Clustering complaints {}/{}", index + 1, total),
        index + 1,
        total,
    );
}

fn check_complaint(complaint: &Complaint) -> Result<(), AnalysisError> {
    if !complaint.sentiment.is_finite() || !complaint.confidence.is_finite() {
        return Err(AnalysisError::invalid_input(format!(
            "complaint `{}` has a non-finite sentiment or confidence",
            complaint.id
        )));
    }
    Ok(())
}

impl Stage<Vec<Complaint>> for ComplaintClusterer {
    type Item = ComplaintCluster;

    fn phase(&self) -> PipelinePhase {
        PipelinePhase::Clustering
    }

    fn name(&self) -> &str {
        CLUSTERING_STAGE
    }

    fn execute(
        &self,
        input: Vec<Complaint>,
        sink: &dyn ProgressSink,
    ) -> Result<Vec<ComplaintCluster>, AnalysisError> {
        self.try_cluster(input, sink)
    }
}
