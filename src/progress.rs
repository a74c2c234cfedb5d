//! Progress feedback for complaint analysis.
//!
//! Stage code only sees the [`traits::ProgressSink`] trait. The CLI picks an
//! implementation from [`implementations`]: progress bars through
//! `indicatif` on a TTY, plain stderr lines otherwise, nothing in quiet mode.
//!
//! # Progress Behavior
//!
//! - **Quiet Mode**: no progress output (`COMPLAINTMAP_QUIET` or `--quiet`)
//! - **Non-TTY**: bars are replaced by hidden bars in CI and piped output
//!
//! # Examples
//!
//! ```rust,no_run
//! use complaintmap::progress::{ProgressConfig, ProgressManager, TEMPLATE_STAGE};
//!
//! let manager = ProgressManager::new(ProgressConfig::from_env(false, 0));
//! let bar = manager.create_bar(100, TEMPLATE_STAGE);
//! bar.set_message("Analyzing posts");
//! for _ in 0..100 {
//!     bar.inc(1);
//! }
//! bar.finish_with_message("Analysis complete");
//! ```

pub mod implementations;
pub mod traits;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;

pub use implementations::{
    CliProgressSink, FnProgressSink, IndicatifProgressSink, ProgressEvent, RecordingProgressSink,
    SilentProgressSink,
};
pub use traits::ProgressSink;

pub const TEMPLATE_STAGE: &str = "{spinner} {msg} [{bar:30}] {pos}/{len} ({percent}%)";

/// Configuration for progress display behavior
#[derive(Debug, Clone, Default)]
pub struct ProgressConfig {
    /// Whether to suppress all progress output
    pub quiet_mode: bool,
    /// Verbosity level (0 = basic, 1 = detailed, 2 = very detailed)
    pub verbosity: u8,
}

impl ProgressConfig {
    /// Create progress configuration from environment and CLI arguments
    pub fn from_env(quiet: bool, verbosity: u8) -> Self {
        let env_quiet = std::env::var("COMPLAINTMAP_QUIET").is_ok();
        Self {
            quiet_mode: quiet || env_quiet,
            verbosity,
        }
    }

    /// Determine if progress bars should be displayed
    pub fn should_show_progress(&self) -> bool {
        if self.quiet_mode {
            return false;
        }

        use std::io::IsTerminal;
        std::io::stderr().is_terminal()
    }
}

/// Coordinates the bars of one CLI run.
#[derive(Clone)]
pub struct ProgressManager {
    multi: Arc<MultiProgress>,
    config: ProgressConfig,
}

impl ProgressManager {
    pub fn new(config: ProgressConfig) -> Self {
        Self {
            multi: Arc::new(MultiProgress::new()),
            config,
        }
    }

    pub fn config(&self) -> &ProgressConfig {
        &self.config
    }

    /// Create a progress bar with the given length and template
    ///
    /// Returns a hidden progress bar if progress should not be shown
    pub fn create_bar(&self, len: u64, template: &str) -> ProgressBar {
        if !self.config.should_show_progress() {
            return ProgressBar::hidden();
        }

        let pb = self.multi.add(ProgressBar::new(len));
        pb.set_style(
            ProgressStyle::default_bar()
                .template(template)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }
}
