use anyhow::{Context, Result};
use chrono::Utc;
use std::io::Write;
use std::path::PathBuf;

use crate::config::{load_config, ComplaintmapConfig};
use crate::core::Post;
use crate::io::{self, create_writer, normalize_subreddit, AnalysisDocument, TimeWindow};
use crate::pipeline::{AnalysisOutcome, ComplaintPipeline};
use crate::progress::{
    CliProgressSink, IndicatifProgressSink, ProgressConfig, ProgressManager, ProgressSink,
};
use crate::report::{self, AnalysisSummary, ClusterFilter, SortKey};

pub struct AnalyzeConfig {
    pub input: PathBuf,
    pub subreddit: Option<String>,
    pub months: u32,
    pub config: Option<PathBuf>,
    pub format: crate::cli::OutputFormat,
    pub output: Option<PathBuf>,
    pub top: Option<usize>,
    pub negative_only: bool,
    pub category: Option<String>,
    pub sort: crate::cli::SortOrder,
    pub parallel: bool,
    pub quiet: bool,
    pub verbosity: u8,
}

impl AnalyzeConfig {
    fn filter(&self) -> ClusterFilter {
        ClusterFilter {
            negative_only: self.negative_only,
            category: self.category.clone(),
            min_frequency: 0,
        }
    }
}

pub fn handle_analyze(config: AnalyzeConfig) -> Result<()> {
    let pipeline_config = resolve_pipeline_config(&config)?;
    let pipeline = ComplaintPipeline::new(&pipeline_config).context("Invalid configuration")?;

    let dataset = io::load_dataset(&config.input)?;
    let requested = config
        .subreddit
        .as_deref()
        .map(normalize_subreddit)
        .transpose()?;
    let subreddit = match &requested {
        Some(name) => Some(name.clone()),
        None => dataset.subreddit().map(normalize_subreddit).transpose()?,
    };

    let mut posts = dataset.into_posts();
    if let Some(name) = &requested {
        posts = io::retain_subreddit(posts, name);
    }
    let window = TimeWindow::last_months(config.months, Utc::now());
    if let Some(window) = &window {
        posts = window.retain(posts);
    }
    log::info!(
        "Analyzing {} posts ({} comments) from {}",
        posts.len(),
        posts.iter().map(Post::comment_count).sum::<usize>(),
        config.input.display()
    );

    let progress = ProgressConfig::from_env(config.quiet, config.verbosity);
    let sink: Box<dyn ProgressSink> = if progress.should_show_progress() {
        Box::new(IndicatifProgressSink::new(ProgressManager::new(progress)))
    } else {
        Box::new(CliProgressSink::new(progress.quiet_mode))
    };
    let outcome = pipeline.run(&posts, sink.as_ref());

    let document = build_document(&config, &outcome, subreddit, window.map(|w| w.months()));
    let mut out = io::open_output(config.output.as_deref())?;
    create_writer(config.format.into(), Box::new(&mut out)).write_document(&document)?;
    out.flush().context("Failed to flush output")?;
    Ok(())
}

fn resolve_pipeline_config(config: &AnalyzeConfig) -> Result<ComplaintmapConfig> {
    let (mut pipeline_config, source) = load_config(config.config.as_deref()).map_err(|err| {
        let context = match err.path() {
            Some(path) => format!("Failed to load configuration from {}", path.display()),
            None => "Failed to load configuration".to_string(),
        };
        anyhow::Error::new(err).context(context)
    })?;
    log::debug!("Using configuration from {:?}", source);
    if config.parallel {
        pipeline_config.detection.parallel = true;
    }
    Ok(pipeline_config)
}

fn build_document(
    config: &AnalyzeConfig,
    outcome: &AnalysisOutcome,
    subreddit: Option<String>,
    window_months: Option<u32>,
) -> AnalysisDocument {
    let sort: SortKey = config.sort.into();
    let shown = report::project(&outcome.clusters, &config.filter(), sort, config.top)
        .into_iter()
        .cloned()
        .collect();

    let mut document = AnalysisDocument::new(shown, outcome.posts_analyzed);
    document.summary = AnalysisSummary::from_clusters(&outcome.clusters);
    document.subreddit = subreddit;
    document.window_months = window_months;
    document.failures = outcome.failures.iter().map(|f| f.to_string()).collect();
    document
}
