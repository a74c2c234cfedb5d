//! Complaint analysis: detection, clustering and summarization.

pub mod clusterer;
pub mod detector;
pub mod sentiment;
pub mod similarity;
pub mod summarizer;
pub mod text;

pub use clusterer::{ComplaintClusterer, CLUSTERING_STAGE};
pub use detector::{ComplaintDetector, DETECTION_STAGE};
pub use sentiment::SentimentScorer;
pub use similarity::{jaccard, Tokenizer};
pub use summarizer::{ClusterSummarizer, SUMMARY_STAGE};
pub use text::TokenSet;
