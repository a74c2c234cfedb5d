//! Error types for complaint analysis.
//!
//! Stage code returns [`AnalysisError`] through `Result`; the stage boundary in
//! [`crate::pipeline::stage`] turns any failure into a [`StageFailure`] record,
//! an empty collection, and a warning on the progress sink. Application edges
//! (CLI, file I/O) work with `anyhow::Result` and convert freely.
//!
//! # Example
//!
//! ```rust
//! use complaintmap::errors::{AnalysisError, PipelinePhase, StageFailure};
//!
//! let err = AnalysisError::invalid_input("post has an empty id");
//! let failure = StageFailure::new(PipelinePhase::Detection, err);
//! assert_eq!(
//!     failure.to_string(),
//!     "complaint detection failed: invalid input: post has an empty id"
//! );
//! ```

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The three stages of the complaint pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelinePhase {
    Detection,
    Clustering,
    Summarization,
}

impl PipelinePhase {
    /// Human-readable stage name used for progress and notifications.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Detection => "complaint detection",
            Self::Clustering => "complaint clustering",
            Self::Summarization => "cluster summarization",
        }
    }
}

impl fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error raised inside a pipeline stage or while preparing its input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// Malformed source data (empty ids, non-finite numbers, ...)
    #[error("invalid input: {message}")]
    InvalidInput { message: String },

    /// The same complaint id was seen twice in one clustering run
    #[error("duplicate complaint id `{id}`")]
    DuplicateComplaint { id: String },

    /// Configuration or lexicon problems
    #[error("configuration error: {message}")]
    Config {
        message: String,
        path: Option<PathBuf>,
    },

    /// File system errors while reading datasets or writing reports
    #[error("I/O error: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
    },

    /// A stage body panicked; the panic payload is kept as the message
    #[error("{phase} panicked: {message}")]
    StagePanic {
        phase: PipelinePhase,
        message: String,
    },
}

impl AnalysisError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn duplicate_complaint(id: impl Into<String>) -> Self {
        Self::DuplicateComplaint { id: id.into() }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            path: None,
        }
    }

    /// Create a configuration error tied to the file it came from.
    pub fn config_with_path(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Config {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    pub fn io_with_path(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    /// Build a panic error from a `catch_unwind` payload.
    pub fn from_panic(phase: PipelinePhase, payload: &(dyn std::any::Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic payload".to_string()
        };
        Self::StagePanic { phase, message }
    }

    /// The file this error refers to, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Config { path, .. } | Self::Io { path, .. } => path.as_ref(),
            _ => None,
        }
    }
}

impl From<std::io::Error> for AnalysisError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
            path: None,
        }
    }
}

impl From<serde_json::Error> for AnalysisError {
    fn from(err: serde_json::Error) -> Self {
        Self::invalid_input(format!("malformed JSON: {err}"))
    }
}

/// Outcome record for a stage that failed and returned no results.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{phase} failed: {error}")]
pub struct StageFailure {
    pub phase: PipelinePhase,
    #[source]
    pub error: AnalysisError,
}

impl StageFailure {
    pub fn new(phase: PipelinePhase, error: AnalysisError) -> Self {
        Self { phase, error }
    }
}

pub type Result<T, E = AnalysisError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_display() {
        let err = AnalysisError::invalid_input("comment has an empty id");
        assert_eq!(err.to_string(), "invalid input: comment has an empty id");
    }

    #[test]
    fn test_duplicate_display() {
        let err = AnalysisError::duplicate_complaint("post-abc");
        assert_eq!(err.to_string(), "duplicate complaint id `post-abc`");
    }

    #[test]
    fn test_config_with_path_keeps_path() {
        let err = AnalysisError::config_with_path("bad threshold", "/tmp/.complaintmap.toml");
        assert_eq!(
            err.path(),
            Some(&PathBuf::from("/tmp/.complaintmap.toml"))
        );
    }

    #[test]
    fn test_from_panic_with_str_payload() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("boom");
        let err = AnalysisError::from_panic(PipelinePhase::Clustering, payload.as_ref());
        assert_eq!(err.to_string(), "complaint clustering panicked: boom");
    }

    #[test]
    fn test_from_panic_with_string_payload() {
        let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("index out of range"));
        let err = AnalysisError::from_panic(PipelinePhase::Detection, payload.as_ref());
        assert!(matches!(
            err,
            AnalysisError::StagePanic { phase: PipelinePhase::Detection, ref message }
                if message == "index out of range"
        ));
    }

    #[test]
    fn test_stage_failure_display() {
        let failure = StageFailure::new(
            PipelinePhase::Clustering,
            AnalysisError::duplicate_complaint("comment-1"),
        );
        assert_eq!(
            failure.to_string(),
            "complaint clustering failed: duplicate complaint id `comment-1`"
        );
    }
}
