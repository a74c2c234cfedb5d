//! Loading post datasets and narrowing them to a subreddit and time window.

use anyhow::{Context, Result};
use chrono::{DateTime, Months, Utc};
use std::fs;
use std::path::Path;

use crate::core::{Dataset, Post};
use crate::errors::AnalysisError;

/// Read a JSON dataset: either a bare array of posts or
/// `{ "subreddit": ..., "posts": [...] }`.
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let content = fs::read_to_string(path)
        .map_err(|err| AnalysisError::io_with_path(err.to_string(), path))
        .with_context(|| format!("Failed to read dataset {}", path.display()))?;
    parse_dataset(&content).with_context(|| format!("Failed to parse dataset {}", path.display()))
}

pub fn parse_dataset(json: &str) -> Result<Dataset, AnalysisError> {
    Ok(serde_json::from_str(json)?)
}

/// Canonical subreddit name: trimmed, with any leading `r/` or `/r/` removed.
pub fn normalize_subreddit(name: &str) -> Result<String, AnalysisError> {
    let trimmed = name.trim();
    let bare = trimmed
        .strip_prefix("/r/")
        .or_else(|| trimmed.strip_prefix("r/"))
        .unwrap_or(trimmed)
        .trim_end_matches('/');

    if bare.is_empty() {
        return Err(AnalysisError::invalid_input("subreddit name is empty"));
    }
    if let Some(bad) = bare.chars().find(|c| !(c.is_ascii_alphanumeric() || *c == '_')) {
        return Err(AnalysisError::invalid_input(format!(
            "subreddit name `{bare}` contains invalid character {bad:?}"
        )));
    }
    Ok(bare.to_string())
}

/// Posts created within the last `months` calendar months.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    months: u32,
    cutoff: f64,
}

impl TimeWindow {
    /// `None` when `months` is zero or reaches past the earliest
    /// representable date; in both cases nothing is filtered out.
    pub fn last_months(months: u32, now: DateTime<Utc>) -> Option<Self> {
        if months == 0 {
            return None;
        }
        let start = now.checked_sub_months(Months::new(months))?;
        Some(Self {
            months,
            cutoff: start.timestamp() as f64,
        })
    }

    pub fn months(&self) -> u32 {
        self.months
    }

    /// Unix seconds; posts created earlier fall outside the window.
    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    pub fn contains(&self, post: &Post) -> bool {
        post.created_utc >= self.cutoff
    }

    /// Keep posts inside the window. Comments stay with their post.
    pub fn retain(&self, mut posts: Vec<Post>) -> Vec<Post> {
        let before = posts.len();
        posts.retain(|post| self.contains(post));
        tracing::debug!(
            kept = posts.len(),
            dropped = before - posts.len(),
            months = self.months,
            "applied time window"
        );
        posts
    }
}

/// Keep only posts whose permalink points into `subreddit`, when the
/// dataset records permalinks. Posts without one are kept.
pub fn retain_subreddit(posts: Vec<Post>, subreddit: &str) -> Vec<Post> {
    let needle = format!("/r/{}/", subreddit.to_lowercase());
    posts
        .into_iter()
        .filter(|post| post.permalink.is_empty() || post.permalink.to_lowercase().contains(&needle))
        .collect()
}
