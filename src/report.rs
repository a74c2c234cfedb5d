//! Read-only views over analysis results.
//!
//! Filtering and re-sorting here only ever borrows the clusters; the
//! aggregates computed by the pipeline are never touched.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::core::ComplaintCluster;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClusterFilter {
    /// Only clusters with at least one member containing a negative term
    pub negative_only: bool,
    pub category: Option<String>,
    pub min_frequency: usize,
}

impl ClusterFilter {
    pub fn matches(&self, cluster: &ComplaintCluster) -> bool {
        (!self.negative_only || cluster.negative_terms_count > 0)
            && cluster.frequency >= self.min_frequency
            && self
                .category
                .as_deref()
                .map_or(true, |wanted| cluster.category.as_deref() == Some(wanted))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Pipeline order: frequency, then total score
    #[default]
    Frequency,
    /// Total score, then frequency
    Score,
}

/// Filter, order and cap clusters for display.
pub fn project<'a>(
    clusters: &'a [ComplaintCluster],
    filter: &ClusterFilter,
    sort: SortKey,
    top: Option<usize>,
) -> Vec<&'a ComplaintCluster> {
    let mut view: Vec<&ComplaintCluster> = clusters.iter().filter(|c| filter.matches(c)).collect();
    match sort {
        SortKey::Frequency => view.sort_by(|a, b| {
            b.frequency
                .cmp(&a.frequency)
                .then_with(|| b.total_score.cmp(&a.total_score))
        }),
        SortKey::Score => view.sort_by(|a, b| {
            b.total_score
                .cmp(&a.total_score)
                .then_with(|| b.frequency.cmp(&a.frequency))
        }),
    }
    if let Some(n) = top {
        view.truncate(n);
    }
    view
}

/// Headline numbers for a set of clusters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisSummary {
    pub cluster_count: usize,
    pub complaint_count: usize,
    pub negative_complaints: usize,
    pub mean_sentiment: f64,
    pub categories: BTreeMap<String, usize>,
    pub dominant_category: Option<String>,
}

impl AnalysisSummary {
    pub fn from_clusters<'a, I>(clusters: I) -> Self
    where
        I: IntoIterator<Item = &'a ComplaintCluster>,
    {
        let mut summary = Self::default();
        let mut sentiment_sum = 0.0;

        for cluster in clusters {
            summary.cluster_count += 1;
            for complaint in &cluster.complaints {
                summary.complaint_count += 1;
                sentiment_sum += complaint.sentiment;
                if complaint.contains_negative_terms {
                    summary.negative_complaints += 1;
                }
                if let Some(category) = complaint.category.as_deref().filter(|c| !c.is_empty()) {
                    *summary.categories.entry(category.to_string()).or_insert(0) += 1;
                }
            }
        }

        if summary.complaint_count > 0 {
            summary.mean_sentiment = sentiment_sum / summary.complaint_count as f64;
        }
        // Largest count; alphabetical order breaks ties
        summary.dominant_category = summary
            .categories
            .iter()
            .fold(None, |best: Option<(&String, usize)>, (name, &count)| match best {
                Some((_, top)) if top >= count => best,
                _ => Some((name, count)),
            })
            .map(|(name, _)| name.clone());
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Complaint, SourceKind, SourceRef};
    use pretty_assertions::assert_eq;

    fn complaint(id: &str, score: i64, category: Option<&str>, negative: bool) -> Complaint {
        Complaint {
            id: id.into(),
            text: format!("text {id}"),
            score,
            confidence: 0.5,
            category: category.map(String::from),
            sentiment: -0.5,
            contains_negative_terms: negative,
            source: SourceRef {
                kind: SourceKind::Post,
                id: id.into(),
                author: String::new(),
                score,
                permalink: String::new(),
                created_utc: 0.0,
            },
        }
    }

    fn cluster(id: &str, members: Vec<Complaint>) -> ComplaintCluster {
        let mut iter = members.into_iter();
        let mut cluster = ComplaintCluster::singleton(id, iter.next().unwrap());
        iter.for_each(|c| cluster.absorb(c).unwrap());
        cluster
    }

    fn sample() -> Vec<ComplaintCluster> {
        vec![
            cluster(
                "big",
                vec![
                    complaint("a", 1, Some("pricing"), false),
                    complaint("b", 1, Some("pricing"), false),
                    complaint("c", 1, None, false),
                ],
            ),
            cluster("loud", vec![complaint("d", 50, Some("reliability"), true)]),
            cluster("quiet", vec![complaint("e", 2, None, false)]),
        ]
    }

    #[test]
    fn test_negative_only_filter() {
        let clusters = sample();
        let filter = ClusterFilter {
            negative_only: true,
            ..Default::default()
        };
        let ids: Vec<_> = project(&clusters, &filter, SortKey::Frequency, None)
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(ids, vec!["loud"]);
    }

    #[test]
    fn test_score_sort_and_top() {
        let clusters = sample();
        let ids: Vec<_> = project(&clusters, &ClusterFilter::default(), SortKey::Score, Some(2))
            .iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(ids, vec!["loud", "big"]);
    }

    #[test]
    fn test_category_and_min_frequency_filters() {
        let clusters = sample();
        let filter = ClusterFilter {
            category: Some("pricing".into()),
            min_frequency: 2,
            ..Default::default()
        };
        assert_eq!(project(&clusters, &filter, SortKey::Frequency, None).len(), 1);
    }

    #[test]
    fn test_projection_leaves_clusters_untouched() {
        let clusters = sample();
        let before = clusters.clone();
        let _ = project(&clusters, &ClusterFilter::default(), SortKey::Score, Some(1));
        assert_eq!(clusters, before);
    }

    #[test]
    fn test_summary_counts() {
        let summary = AnalysisSummary::from_clusters(&sample());
        assert_eq!(summary.cluster_count, 3);
        assert_eq!(summary.complaint_count, 5);
        assert_eq!(summary.negative_complaints, 1);
        assert_eq!(summary.categories.get("pricing"), Some(&2));
        assert_eq!(summary.dominant_category.as_deref(), Some("pricing"));
        assert!((summary.mean_sentiment - -0.5).abs() < 1e-12);
    }

    #[test]
    fn test_empty_summary() {
        let summary = AnalysisSummary::from_clusters(&[]);
        assert_eq!(summary, AnalysisSummary::default());
    }
}
