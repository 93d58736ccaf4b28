//! Replay a recorded runner event stream through the reporter

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use tracing::{debug, info, warn};

use stepview_report::events::SuiteFinished;
use stepview_report::{ReportFormatter, ReporterConfig, RunnerEvent, SuiteListener};

#[derive(Args, Debug, Default)]
pub struct ReplayArgs {
    /// Event stream, one JSON object per line ("-" reads stdin)
    pub events: PathBuf,

    /// Report output directory
    #[arg(short, long, env = "STEPVIEW_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Application public directory to copy next to the artifacts
    #[arg(long)]
    pub asset_root: Option<PathBuf>,

    /// Wrap exception messages at this width
    #[arg(long)]
    pub truncate: Option<usize>,

    /// Style overrides, e.g. "passed=blue:failed=red,bold"
    #[arg(long)]
    pub colors: Option<String>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Omit "# file:line" source comments
    #[arg(long)]
    pub no_source: bool,

    /// Omit snippets for undefined steps
    #[arg(long)]
    pub no_snippets: bool,

    /// Work in progress: passing scenarios are reported
    #[arg(long)]
    pub wip: bool,

    /// Hold step output until the step or table row finishes
    #[arg(long)]
    pub buffer_messages: bool,

    /// Runner profile repeated in rerun commands
    #[arg(short, long = "profile")]
    pub profiles: Vec<String>,

    /// Command printed in front of failing scenario locations
    #[arg(long)]
    pub rerun_command: Option<String>,
}

impl ReplayArgs {
    /// Flags override the file and environment
    pub fn apply(&self, config: &mut ReporterConfig) {
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(root) = &self.asset_root {
            config.asset_root = Some(root.clone());
        }
        if let Some(width) = self.truncate {
            config.truncate_width = Some(width).filter(|w| *w > 0);
        }
        if let Some(colors) = &self.colors {
            config.colors = Some(colors.clone());
        }
        if let Some(command) = &self.rerun_command {
            config.rerun_command = command.clone();
        }
        if !self.profiles.is_empty() {
            config.profiles = self.profiles.clone();
        }
        config.color &= !self.no_color;
        config.source &= !self.no_source;
        config.snippets &= !self.no_snippets;
        config.wip |= self.wip;
        config.buffer_messages |= self.buffer_messages;
    }
}

/// Outcome of a replay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayOutcome {
    pub events: usize,
    pub failed: bool,
    pub results: PathBuf,
}

pub fn execute(args: &ReplayArgs, config: &ReporterConfig) -> Result<ReplayOutcome> {
    let reader: Box<dyn BufRead> = if args.events.as_os_str() == "-" {
        Box::new(BufReader::new(io::stdin()))
    } else {
        let file = File::open(&args.events)
            .with_context(|| format!("opening {}", args.events.display()))?;
        Box::new(BufReader::new(file))
    };

    let stdout = io::stdout();
    replay(reader, stdout.lock(), config)
}

/// Feed every event of `reader` to a formatter printing to `out`
pub fn replay<R: BufRead, W: Write>(
    reader: R,
    out: W,
    config: &ReporterConfig,
) -> Result<ReplayOutcome> {
    let mut formatter =
        ReportFormatter::from_config(config, out).context("setting up the reporter")?;

    let mut events = 0;
    let mut finished = false;
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let event = RunnerEvent::from_json(&line)
            .with_context(|| format!("line {}: invalid event", index + 1))?;
        debug!("Event {}: {:?}", index + 1, event);
        formatter
            .dispatch(&event)
            .with_context(|| format!("line {}", index + 1))?;
        finished |= matches!(event, RunnerEvent::SuiteFinished(_));
        events += 1;
    }

    if !finished {
        warn!("Event stream ended without suite_finished; finishing the report now");
        formatter.after_suite(&SuiteFinished::default())?;
    }

    let results = formatter.correlator().layout().results_json();
    info!("Replayed {} event(s) into {}", events, results.display());
    Ok(ReplayOutcome {
        events,
        failed: formatter.has_failures(),
        results,
    })
}
