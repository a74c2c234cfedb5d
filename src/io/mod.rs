pub mod input;
pub mod output;

pub use input::{load_dataset, normalize_subreddit, parse_dataset, retain_subreddit, TimeWindow};
pub use output::{create_writer, AnalysisDocument, OutputFormat, OutputWriter};

use anyhow::{Context, Result};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

/// Buffered sink for `path`, or stdout when no path is given.
pub fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = fs::File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(std::io::stdout()))),
    }
}

pub fn file_exists(path: &Path) -> bool {
    path.exists() && path.is_file()
}
