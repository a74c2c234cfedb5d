use super::Complaint;
use crate::errors::AnalysisError;
use serde::{Deserialize, Serialize};

/// A group of lexically similar complaints with running aggregates.
///
/// Members are append-only and kept in discovery order. The aggregates are
/// only ever updated through [`ComplaintCluster::absorb`], which keeps
/// `frequency == complaints.len()` and `total_score == Σ score` in lockstep.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComplaintCluster {
    pub id: String,
    pub summary: String,
    pub complaints: Vec<Complaint>,
    pub frequency: usize,
    pub total_score: i64,
    pub avg_sentiment: f64,
    pub negative_terms_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl ComplaintCluster {
    /// Start a cluster from its first member. The summary is the raw text
    /// until the summarizer replaces it.
    pub fn singleton(id: impl Into<String>, complaint: Complaint) -> Self {
        Self {
            id: id.into(),
            summary: complaint.text.clone(),
            frequency: 1,
            total_score: complaint.score,
            avg_sentiment: complaint.sentiment,
            negative_terms_count: usize::from(complaint.contains_negative_terms),
            category: non_empty(&complaint.category),
            complaints: vec![complaint],
        }
    }

    /// Append a member and fold it into the aggregates.
    ///
    /// Fails without touching the cluster if the score total would overflow.
    pub fn absorb(&mut self, complaint: Complaint) -> Result<(), AnalysisError> {
        let total_score = self.total_score.checked_add(complaint.score).ok_or_else(|| {
            AnalysisError::invalid_input(format!(
                "score of complaint `{}` overflows the total of cluster `{}`",
                complaint.id, self.id
            ))
        })?;
        self.frequency += 1;
        self.total_score = total_score;

        let n = self.frequency as f64;
        self.avg_sentiment = (self.avg_sentiment * (n - 1.0) + complaint.sentiment) / n;

        if complaint.contains_negative_terms {
            self.negative_terms_count += 1;
        }
        if self.category.is_none() {
            self.category = non_empty(&complaint.category);
        }
        self.complaints.push(complaint);
        Ok(())
    }

    /// Whether the counted aggregates agree with the member list.
    pub fn is_consistent(&self) -> bool {
        self.frequency == self.complaints.len()
            && self
                .complaints
                .iter()
                .try_fold(0i64, |total, c| total.checked_add(c.score))
                == Some(self.total_score)
            && self.negative_terms_count
                == self
                    .complaints
                    .iter()
                    .filter(|c| c.contains_negative_terms)
                    .count()
    }

    pub fn contains(&self, complaint_id: &str) -> bool {
        self.complaints.iter().any(|c| c.id == complaint_id)
    }
}

fn non_empty(category: &Option<String>) -> Option<String> {
    category.as_ref().filter(|c| !c.is_empty()).cloned()
}
