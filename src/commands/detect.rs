use anyhow::{Context, Result};
use std::io::Write;
use std::path::PathBuf;

use crate::analysis::ComplaintDetector;
use crate::config::load_config;

pub fn handle_detect(text: &str, config: Option<PathBuf>) -> Result<()> {
    let (config, source) = load_config(config.as_deref()).context("Failed to load configuration")?;
    log::debug!("Using configuration from {:?}", source);

    let detector = ComplaintDetector::new(config.resolve_lexicon()?, config.detection)?;
    let detection = detector.detect(text);

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &detection)?;
    writeln!(stdout)?;
    Ok(())
}
