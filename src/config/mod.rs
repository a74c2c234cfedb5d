//! Configuration for the complaint pipeline.
//!
//! Settings live in `.complaintmap.toml`, found by walking up from the
//! working directory, with a per-user fallback. Every section is optional.
//!
//! ```toml
//! [detection]
//! confidence_floor = 0.3
//!
//! [clustering]
//! similarity_threshold = 0.25
//!
//! [[lexicon.categories]]
//! name = "pricing"
//! phrases = ["overpriced", "refund"]
//! ```

mod core;
pub mod lexicon;
pub mod loader;
mod thresholds;

pub use self::core::ComplaintmapConfig;
pub use lexicon::{CategoryRule, Lexicon, LexiconConfig};
pub use loader::{
    default_config_toml, discover_config, load_config, load_config_from, ConfigSource,
    CONFIG_FILE_NAME,
};
pub use thresholds::{ClusteringConfig, DetectionConfig, SummaryConfig};
