use anyhow::Result;
use complaintmap::cli::{self, Commands};
use complaintmap::commands::{self, AnalyzeConfig};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = cli::parse_args();
    init_tracing(cli.verbosity);

    match cli.command {
        Commands::Analyze {
            input,
            subreddit,
            months,
            config,
            format,
            output,
            top,
            negative_only,
            category,
            sort,
            parallel,
            quiet,
        } => commands::handle_analyze(AnalyzeConfig {
            input,
            subreddit,
            months,
            config,
            format,
            output,
            top,
            negative_only,
            category,
            sort,
            parallel,
            quiet,
            verbosity: cli.verbosity,
        }),
        Commands::Detect { text, config } => commands::handle_detect(&text, config),
        Commands::Init { force } => commands::init_config(force),
    }
}

/// Logs go to stderr. `RUST_LOG` wins over `-v`.
fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("complaintmap={level}")));

    // Also routes `log` records from the config loader.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
