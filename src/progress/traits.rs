//! Progress sink trait definitions.
//!
//! Every pipeline stage reports through a [`ProgressSink`]: one `report` per
//! unit of work (per post during detection, per complaint during clustering,
//! per cluster during summarization), bracketed by `start_stage` and
//! `complete_stage`. Stage failures are surfaced through `warn`, which is how
//! callers learn that an empty result was caused by an error.
//!
//! # Thread Safety
//!
//! Implementations must be `Send + Sync`; parallel detection reports from
//! rayon worker threads.
//!
//! # Example
//!
//! ```rust
//! use complaintmap::progress::traits::ProgressSink;
//!
//! struct LoggingProgressSink;
//!
//! impl ProgressSink for LoggingProgressSink {
//!     fn report(&self, stage: &str, current: usize, total: usize) {
//!         log::info!("{}: {}/{}", stage, current, total);
//!     }
//!
//!     fn start_stage(&self, name: &str) {
//!         log::info!("Starting: {}", name);
//!     }
//!
//!     fn complete_stage(&self, name: &str) {
//!         log::info!("Complete: {}", name);
//!     }
//!
//!     fn warn(&self, message: &str) {
//!         log::warn!("{}", message);
//!     }
//! }
//! ```

/// Progress sink abstraction - receives progress updates.
///
/// Methods must be cheap and must not panic on odd input such as
/// `current > total`; a slow sink stalls the pipeline.
pub trait ProgressSink: Send + Sync {
    /// Report progress for a unit of work.
    ///
    /// `current` is 1-based: the first post processed reports `1`.
    fn report(&self, stage: &str, current: usize, total: usize);

    /// A stage is about to run.
    fn start_stage(&self, name: &str);

    /// A stage finished, successfully or not.
    fn complete_stage(&self, name: &str);

    /// A non-fatal notification, e.g. a stage that failed and returned nothing.
    fn warn(&self, message: &str);
}

impl<T: ProgressSink + ?Sized> ProgressSink for &T {
    fn report(&self, stage: &str, current: usize, total: usize) {
        (**self).report(stage, current, total)
    }

    fn start_stage(&self, name: &str) {
        (**self).start_stage(name)
    }

    fn complete_stage(&self, name: &str) {
        (**self).complete_stage(name)
    }

    fn warn(&self, message: &str) {
        (**self).warn(message)
    }
}

impl<T: ProgressSink + ?Sized> ProgressSink for std::sync::Arc<T> {
    fn report(&self, stage: &str, current: usize, total: usize) {
        (**self).report(stage, current, total)
    }

    fn start_stage(&self, name: &str) {
        (**self).start_stage(name)
    }

    fn complete_stage(&self, name: &str) {
        (**self).complete_stage(name)
    }

    fn warn(&self, message: &str) {
        (**self).warn(message)
    }
}
