//! Progress sink implementations for different output modes.
//!
//! | Use Case | Implementation |
//! |----------|----------------|
//! | Library callers, tests | [`SilentProgressSink`], [`RecordingProgressSink`] |
//! | Plain callback `(current, total, stage)` | [`FnProgressSink`] |
//! | Non-TTY CLI | [`CliProgressSink`] |
//! | Interactive CLI | [`IndicatifProgressSink`] |
//!
//! # Example: Using RecordingProgressSink in Tests
//!
//! ```rust
//! use complaintmap::progress::implementations::{RecordingProgressSink, ProgressEvent};
//! use complaintmap::progress::traits::ProgressSink;
//!
//! let recorder = RecordingProgressSink::new();
//!
//! recorder.start_stage("Test Stage");
//! recorder.report("Test Stage", 1, 10);
//! recorder.complete_stage("Test Stage");
//!
//! let events = recorder.events();
//! assert_eq!(events.len(), 3);
//! assert!(matches!(events[0], ProgressEvent::StartStage { .. }));
//! ```

use super::traits::ProgressSink;
use super::ProgressManager;
use colored::Colorize;
use indicatif::ProgressBar;
use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;

/// No-op sink.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentProgressSink;

impl ProgressSink for SilentProgressSink {
    #[inline]
    fn report(&self, _stage: &str, _current: usize, _total: usize) {}

    #[inline]
    fn start_stage(&self, _name: &str) {}

    #[inline]
    fn complete_stage(&self, _name: &str) {}

    #[inline]
    fn warn(&self, _message: &str) {}
}

/// Adapts a `(current, total, stage)` callback.
///
/// Only `report` reaches the callback; warnings go to the log.
///
/// ```rust
/// use complaintmap::progress::implementations::FnProgressSink;
/// use complaintmap::progress::traits::ProgressSink;
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// let calls = AtomicUsize::new(0);
/// let sink = FnProgressSink::new(|_current, _total, _stage: &str| {
///     calls.fetch_add(1, Ordering::SeqCst);
/// });
/// sink.report("Analyzing post 1/1", 1, 1);
/// assert_eq!(calls.load(Ordering::SeqCst), 1);
/// ```
pub struct FnProgressSink<F> {
    callback: F,
}

impl<F> FnProgressSink<F>
where
    F: Fn(usize, usize, &str) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> ProgressSink for FnProgressSink<F>
where
    F: Fn(usize, usize, &str) + Send + Sync,
{
    fn report(&self, stage: &str, current: usize, total: usize) {
        (self.callback)(current, total, stage)
    }

    fn start_stage(&self, _name: &str) {}

    fn complete_stage(&self, _name: &str) {}

    fn warn(&self, message: &str) {
        tracing::warn!("{}", message);
    }
}

/// Simple stderr output for non-interactive terminals.
///
/// In quiet mode only warnings are printed.
#[derive(Clone, Debug, Default)]
pub struct CliProgressSink {
    quiet: bool,
}

impl CliProgressSink {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl ProgressSink for CliProgressSink {
    fn report(&self, stage: &str, _current: usize, _total: usize) {
        if !self.quiet {
            // Carriage return overwrites the previous report
            eprint!("\r{}", stage);
            let _ = std::io::stderr().flush();
        }
    }

    fn start_stage(&self, name: &str) {
        if !self.quiet {
            eprintln!("\n{}", name);
        }
    }

    fn complete_stage(&self, name: &str) {
        if !self.quiet {
            eprintln!("\n{} complete", name);
        }
    }

    fn warn(&self, message: &str) {
        eprintln!("\n{} {}", "Warning:".yellow().bold(), message);
    }
}

/// Drives one `indicatif` bar per stage.
pub struct IndicatifProgressSink {
    manager: ProgressManager,
    template: &'static str,
    bar: Mutex<Option<ProgressBar>>,
}

impl IndicatifProgressSink {
    pub fn new(manager: ProgressManager) -> Self {
        Self {
            manager,
            template: super::TEMPLATE_STAGE,
            bar: Mutex::new(None),
        }
    }
}

impl ProgressSink for IndicatifProgressSink {
    fn report(&self, stage: &str, current: usize, total: usize) {
        if let Some(bar) = self.bar.lock().as_ref() {
            bar.set_length(total as u64);
            bar.set_position(current as u64);
            bar.set_message(stage.to_string());
        }
    }

    fn start_stage(&self, name: &str) {
        let bar = self.manager.create_bar(0, self.template);
        bar.set_message(name.to_string());
        if let Some(previous) = self.bar.lock().replace(bar) {
            previous.finish_and_clear();
        }
    }

    fn complete_stage(&self, name: &str) {
        if let Some(bar) = self.bar.lock().take() {
            bar.finish_with_message(format!("{} complete", name));
        }
    }

    fn warn(&self, message: &str) {
        let line = format!("{} {}", "Warning:".yellow().bold(), message);
        match self.bar.lock().as_ref() {
            Some(bar) => bar.println(line),
            None => eprintln!("{}", line),
        }
    }
}

/// Progress event recorded by [`RecordingProgressSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Report {
        stage: String,
        current: usize,
        total: usize,
    },
    StartStage {
        name: String,
    },
    CompleteStage {
        name: String,
    },
    Warn {
        message: String,
    },
}

/// Captures every event for assertions.
///
/// Event order is not deterministic when parallel detection reports from
/// several threads.
#[derive(Clone, Debug, Default)]
pub struct RecordingProgressSink {
    events: Arc<Mutex<Vec<ProgressEvent>>>,
}

impl RecordingProgressSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().clone()
    }

    /// `(current, total, stage)` for every report, in arrival order.
    pub fn reports(&self) -> Vec<(usize, usize, String)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ProgressEvent::Report {
                    stage,
                    current,
                    total,
                } => Some((current, total, stage)),
                _ => None,
            })
            .collect()
    }

    pub fn stages(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ProgressEvent::StartStage { name } => Some(name),
                _ => None,
            })
            .collect()
    }

    pub fn completed_stages(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ProgressEvent::CompleteStage { name } => Some(name),
                _ => None,
            })
            .collect()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ProgressEvent::Warn { message } => Some(message),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl ProgressSink for RecordingProgressSink {
    fn report(&self, stage: &str, current: usize, total: usize) {
        self.events.lock().push(ProgressEvent::Report {
            stage: stage.to_string(),
            current,
            total,
        });
    }

    fn start_stage(&self, name: &str) {
        self.events.lock().push(ProgressEvent::StartStage {
            name: name.to_string(),
        });
    }

    fn complete_stage(&self, name: &str) {
        self.events.lock().push(ProgressEvent::CompleteStage {
            name: name.to_string(),
        });
    }

    fn warn(&self, message: &str) {
        self.events.lock().push(ProgressEvent::Warn {
            message: message.to_string(),
        });
    }
}
