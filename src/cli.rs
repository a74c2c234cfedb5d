use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "complaintmap")]
#[command(about = "Find and group complaints in social-media threads", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Detect, cluster and summarize complaints in a post dataset
    Analyze {
        /// JSON dataset: an array of posts or {"subreddit", "posts"}
        input: PathBuf,

        /// Subreddit to report on (`rust`, `r/rust`); posts with permalinks
        /// elsewhere are skipped
        #[arg(short, long)]
        subreddit: Option<String>,

        /// Only analyze posts from the last N calendar months (0 = all)
        #[arg(short, long, default_value = "0")]
        months: u32,

        /// Configuration file (skips discovery)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Show only the top N clusters
        #[arg(long = "top", visible_alias = "head")]
        top: Option<usize>,

        /// Only clusters containing strongly negative terms
        #[arg(long = "negative-only")]
        negative_only: bool,

        /// Only clusters of this category
        #[arg(long)]
        category: Option<String>,

        /// Cluster ordering
        #[arg(long, value_enum, default_value = "frequency")]
        sort: SortOrder,

        /// Detect complaints across posts in parallel
        #[arg(long)]
        parallel: bool,

        /// Suppress progress output (also COMPLAINTMAP_QUIET)
        #[arg(short, long)]
        quiet: bool,
    },

    /// Print the detection result for a single text as JSON
    Detect {
        /// Text to classify
        text: String,

        /// Configuration file (skips discovery)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Initialize configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Markdown,
    Terminal,
}

impl From<OutputFormat> for crate::io::output::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => crate::io::output::OutputFormat::Json,
            OutputFormat::Markdown => crate::io::output::OutputFormat::Markdown,
            OutputFormat::Terminal => crate::io::output::OutputFormat::Terminal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortOrder {
    /// Most frequent clusters first
    Frequency,
    /// Highest total score first
    Score,
}

impl From<SortOrder> for crate::report::SortKey {
    fn from(order: SortOrder) -> Self {
        match order {
            SortOrder::Frequency => crate::report::SortKey::Frequency,
            SortOrder::Score => crate::report::SortKey::Score,
        }
    }
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
