use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::core::ComplaintmapConfig;
use crate::errors::AnalysisError;

/// File name searched for in the working directory and its ancestors
pub const CONFIG_FILE_NAME: &str = ".complaintmap.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Where the active configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Explicit(PathBuf),
    Discovered(PathBuf),
    User(PathBuf),
    Defaults,
}

pub(crate) fn read_config_file(path: &Path) -> Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Parse a TOML document and validate every section.
pub fn parse_and_validate_config(contents: &str) -> Result<ComplaintmapConfig, AnalysisError> {
    let config = toml::from_str::<ComplaintmapConfig>(contents)
        .map_err(|e| AnalysisError::config(format!("failed to parse {}: {}", CONFIG_FILE_NAME, e)))?;
    config.validate()?;
    Ok(config)
}

/// Load a configuration file the user named explicitly. Any problem is an error.
pub fn load_config_from(path: &Path) -> Result<ComplaintmapConfig, AnalysisError> {
    let contents = read_config_file(path).map_err(|e| {
        AnalysisError::config_with_path(format!("cannot read config: {e}"), path)
    })?;
    parse_and_validate_config(&contents).map_err(|e| match e {
        AnalysisError::Config { message, .. } => AnalysisError::config_with_path(message, path),
        other => other,
    })
}

/// Try a discovered config file; unreadable or invalid files are skipped.
pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<ComplaintmapConfig> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!(
                "Ignoring {}: {}. Using defaults.",
                config_path.display(),
                e
            );
            None
        }
    }
}

pub(crate) fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    // Missing files are the normal case during discovery
    if error.kind() != std::io::ErrorKind::NotFound {
        log::warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

/// `start` followed by its parents, at most `max_depth` entries.
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// `<config dir>/complaintmap/config.toml`, when the platform has one.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("complaintmap").join("config.toml"))
}

/// Search `start` and its ancestors, then the user config, then defaults.
pub fn discover_config(
    start: PathBuf,
    user_config: Option<PathBuf>,
) -> (ComplaintmapConfig, ConfigSource) {
    if let Some((path, config)) = directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path).map(|config| (path, config)))
    {
        return (config, ConfigSource::Discovered(path));
    }

    if let Some(path) = user_config {
        if let Some(config) = try_load_config_from_path(&path) {
            return (config, ConfigSource::User(path));
        }
    }

    log::debug!(
        "No config found after checking {} directories. Using default config.",
        MAX_TRAVERSAL_DEPTH
    );
    (ComplaintmapConfig::default(), ConfigSource::Defaults)
}

/// Resolve the active configuration for a CLI run.
pub fn load_config(explicit: Option<&Path>) -> Result<(ComplaintmapConfig, ConfigSource), AnalysisError> {
    if let Some(path) = explicit {
        let config = load_config_from(path)?;
        return Ok((config, ConfigSource::Explicit(path.to_path_buf())));
    }

    let current = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            log::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            return Ok((ComplaintmapConfig::default(), ConfigSource::Defaults));
        }
    };
    Ok(discover_config(current, user_config_path()))
}

/// The TOML written by `complaintmap init`.
pub fn default_config_toml() -> Result<String, AnalysisError> {
    let body = toml::to_string_pretty(&ComplaintmapConfig::default())
        .map_err(|e| AnalysisError::config(format!("failed to render default config: {e}")))?;
    Ok(format!(
        "# complaintmap configuration\n\n{body}\n\
         # Vocabulary overrides. Each table replaces the built-in one.\n\
         # [[lexicon.categories]]\n\
         # name = \"pricing\"\n\
         # phrases = [\"overpriced\", \"refund\"]\n\
         #\n\
         # [lexicon.sentiment_weights]\n\
         # lemon = -2.0\n"
    ))
}
