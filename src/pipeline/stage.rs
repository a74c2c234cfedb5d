//! Stage abstraction and the fail-fast stage boundary.
//!
//! Each pipeline component implements [`Stage`] for the input it consumes.
//! [`run_stage`] is the only way the pipeline executes a stage: it brackets
//! the work with progress notifications and routes it through
//! [`guard_stage`], which enforces the all-or-nothing policy. A stage either
//! returns its full output or an empty collection plus a [`StageFailure`];
//! partial output is never passed on.

use crate::errors::{AnalysisError, PipelinePhase, StageFailure};
use crate::progress::ProgressSink;
use std::panic::{self, AssertUnwindSafe};

/// A pipeline stage consuming `I` and producing a batch of items.
pub trait Stage<I> {
    type Item;

    /// Which pipeline phase this stage implements.
    fn phase(&self) -> PipelinePhase;

    /// Name announced through `start_stage` / `complete_stage`.
    fn name(&self) -> &str;

    /// Run the stage to completion or fail as a whole.
    fn execute(&self, input: I, sink: &dyn ProgressSink) -> Result<Vec<Self::Item>, AnalysisError>;
}

/// What a guarded stage produced.
#[derive(Debug, Clone, PartialEq)]
pub struct StageOutcome<T> {
    pub items: Vec<T>,
    pub failure: Option<StageFailure>,
}

/// Run `body`, converting errors and panics into an empty outcome.
///
/// Failures are logged and reported through [`ProgressSink::warn`].
pub fn guard_stage<T, F>(phase: PipelinePhase, sink: &dyn ProgressSink, body: F) -> StageOutcome<T>
where
    F: FnOnce() -> Result<Vec<T>, AnalysisError>,
{
    let result = panic::catch_unwind(AssertUnwindSafe(body))
        .unwrap_or_else(|payload| Err(AnalysisError::from_panic(phase, payload.as_ref())));

    match result {
        Ok(items) => StageOutcome {
            items,
            failure: None,
        },
        Err(error) => {
            tracing::error!(phase = %phase, error = %error, "stage failed, discarding its output");
            sink.warn(&format!("Failed to run {}: {}", phase, error));
            StageOutcome {
                items: Vec::new(),
                failure: Some(StageFailure::new(phase, error)),
            }
        }
    }
}

/// Execute a stage behind the stage boundary.
pub fn run_stage<I, S>(stage: &S, input: I, sink: &dyn ProgressSink) -> StageOutcome<S::Item>
where
    S: Stage<I> + ?Sized,
{
    sink.start_stage(stage.name());
    let outcome = guard_stage(stage.phase(), sink, || stage.execute(input, sink));
    sink.complete_stage(stage.name());
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::RecordingProgressSink;

    struct Doubler;

    impl Stage<Vec<i32>> for Doubler {
        type Item = i32;

        fn phase(&self) -> PipelinePhase {
            PipelinePhase::Summarization
        }

        fn name(&self) -> &str {
            "Doubling"
        }

        fn execute(&self, input: Vec<i32>, sink: &dyn ProgressSink) -> Result<Vec<i32>, AnalysisError> {
            let total = input.len();
            input
                .into_iter()
                .enumerate()
                .map(|(i, x)| {
                    sink.report("Doubling", i + 1, total);
                    if x < 0 {
                        Err(AnalysisError::invalid_input("negative"))
                    } else {
                        Ok(x * 2)
                    }
                })
                .collect()
        }
    }

    #[test]
    fn test_guard_passes_success_through() {
        let sink = RecordingProgressSink::new();
        let outcome = guard_stage(PipelinePhase::Detection, &sink, || Ok(vec![1, 2, 3]));
        assert_eq!(outcome.items, vec![1, 2, 3]);
        assert!(outcome.failure.is_none());
        assert!(sink.warnings().is_empty());
    }

    #[test]
    fn test_guard_turns_error_into_empty_result() {
        let sink = RecordingProgressSink::new();
        let outcome: StageOutcome<i32> = guard_stage(PipelinePhase::Clustering, &sink, || {
            Err(AnalysisError::duplicate_complaint("post-1"))
        });
        assert!(outcome.items.is_empty());
        assert_eq!(
            outcome.failure.map(|f| f.phase),
            Some(PipelinePhase::Clustering)
        );
        assert_eq!(sink.warnings().len(), 1);
        assert!(sink.warnings()[0].contains("post-1"));
    }

    #[test]
    fn test_guard_catches_panics() {
        let sink = RecordingProgressSink::new();
        let outcome: StageOutcome<i32> =
            guard_stage(PipelinePhase::Detection, &sink, || panic!("malformed tree"));
        assert!(outcome.items.is_empty());
        assert!(matches!(
            outcome.failure.map(|f| f.error),
            Some(AnalysisError::StagePanic { .. })
        ));
    }

    #[test]
    fn test_run_stage_brackets_with_notifications() {
        let sink = RecordingProgressSink::new();
        let outcome = run_stage(&Doubler, vec![1, 2], &sink);
        assert_eq!(outcome.items, vec![2, 4]);
        assert_eq!(sink.stages(), vec!["Doubling"]);
        assert_eq!(sink.completed_stages(), vec!["Doubling"]);
        assert_eq!(sink.reports().len(), 2);
    }

    #[test]
    fn test_run_stage_discards_partial_output() {
        let sink = RecordingProgressSink::new();
        let outcome = run_stage(&Doubler, vec![1, -1, 3], &sink);
        assert!(outcome.items.is_empty());
        assert!(outcome.failure.is_some());
        assert_eq!(sink.completed_stages(), vec!["Doubling"]);
    }
}
