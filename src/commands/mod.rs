//! CLI command implementations.
//!
//! - **analyze**: run the complaint pipeline over a dataset and render it
//! - **detect**: classify one text, useful when tuning a lexicon
//! - **init**: write a default `.complaintmap.toml`

pub mod analyze;
pub mod detect;
pub mod init;

pub use analyze::{handle_analyze, AnalyzeConfig};
pub use detect::handle_detect;
pub use init::init_config;
