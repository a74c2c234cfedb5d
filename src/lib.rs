//! Complaint detection and clustering for social-media threads.
//!
//! The library runs a three-stage batch pipeline over posts and their reply
//! trees: lexical complaint detection, greedy Jaccard clustering, and
//! representative-text summarization. See [`pipeline::ComplaintPipeline`].

pub mod analysis;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod errors;
pub mod io;
pub mod pipeline;
pub mod progress;
pub mod report;

// Re-export commonly used types
pub use crate::core::{
    Comment, Complaint, ComplaintCluster, Dataset, Detection, Post, SourceKind, SourceRef,
};

pub use crate::analysis::{ClusterSummarizer, ComplaintClusterer, ComplaintDetector};

pub use crate::config::{ComplaintmapConfig, Lexicon};

pub use crate::errors::{AnalysisError, PipelinePhase, StageFailure};

pub use crate::pipeline::{AnalysisOutcome, ComplaintPipeline};

pub use crate::progress::{ProgressSink, SilentProgressSink};

pub use crate::report::{AnalysisSummary, ClusterFilter, SortKey};
