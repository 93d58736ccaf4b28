//! Stepview CLI - Main Entry Point
//!
//! Replays recorded runner events into a step report and inspects finished
//! reports.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use stepview_cli::commands::{init, replay, summary};
use stepview_cli::output::{self, OutputFormat};
use stepview_report::ReporterConfig;

/// Stepview - step-by-step reports for acceptance test suites
#[derive(Parser)]
#[command(name = "stepview")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = "stepview.toml", env = "STEPVIEW_CONFIG", global = true)]
    config: PathBuf,

    /// Output format for listings
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init(init::InitArgs),

    /// Replay a recorded event stream into a report
    Replay(replay::ReplayArgs),

    /// Show per-feature totals of a finished report
    Summary(summary::SummaryArgs),

    /// Show version information
    Version,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so they never mix with the report on stdout
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            output::print_error(&format!("{:#}", e));
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Init(args) => init::execute(args, &cli.config)?,
        Commands::Replay(args) => {
            let mut config = load_config(&cli.config)?;
            args.apply(&mut config);
            if !config.color {
                colored::control::set_override(false);
            }

            let outcome = replay::execute(&args, &config)?;
            if outcome.events == 0 {
                output::print_warning("No events replayed");
            }
            if outcome.failed {
                return Ok(ExitCode::from(1));
            }
        }
        Commands::Summary(args) => {
            let path = match args.results {
                Some(path) => path,
                None => load_config(&cli.config)?.output_dir.join("results.json"),
            };
            summary::execute(&path, cli.format)?;
        }
        Commands::Version => {
            println!("stepview v{}", stepview_common::VERSION);
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// File, then environment
fn load_config(path: &Path) -> Result<ReporterConfig> {
    let mut config = ReporterConfig::load(path)
        .with_context(|| format!("loading {}", path.display()))?;
    config.apply_env().context("reading environment overrides")?;
    Ok(config)
}
