//! Replays a JSONL log of reply chunks through the stream reconciler and
//! prints one JSONL decision per chunk.

mod config;
mod replay;

use std::io::BufReader;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use stream_reconciler::{ObservabilityConfig, Reconciler, ReconcilerConfig, init_observability};
use tracing::info;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// JSONL file of `{"stage","runId","text"}` events. Reads stdin when omitted.
    #[arg(long, short = 'i', value_name = "FILE")]
    input: Option<PathBuf>,

    /// UTF-16 code units a streaming delta may shrink by before it is ignored.
    /// Overrides STREAM_RECONCILER_SHRINK_TOLERANCE.
    #[arg(long, short = 't', value_name = "UNITS")]
    tolerance: Option<usize>,

    /// Fail on the first malformed line instead of skipping it.
    #[arg(long)]
    strict: bool,

    /// Log filter, e.g. `stream_reconciler=trace` to see every ignored chunk.
    /// Overrides STREAM_RECONCILER_LOG_LEVEL.
    #[arg(long, value_name = "FILTER")]
    log_level: Option<String>,

    /// Write logs as JSONL to this file instead of stderr.
    /// Overrides STREAM_RECONCILER_JSON_LOG_PATH.
    #[arg(long, value_name = "FILE")]
    log_json: Option<PathBuf>,

    /// Disable logging entirely.
    #[arg(long, short = 'q')]
    quiet: bool,
}

impl Cli {
    fn observability(&self) -> ObservabilityConfig {
        let mut config = ObservabilityConfig::from_env();
        if let Some(filter) = &self.log_level {
            config = config.filter(filter.clone());
        }
        if let Some(path) = &self.log_json {
            config = config.json_log_path(path.clone());
        }
        if self.quiet {
            config = config.enabled(false);
        }
        config
    }
}

fn main() -> anyhow::Result<()> {
    config::init();
    let cli = Cli::parse();
    init_observability(&cli.observability());

    let mut settings = ReconcilerConfig::from_env()?;
    if let Some(tolerance) = cli.tolerance {
        settings = settings.shrink_tolerance(tolerance);
    }
    let mut reconciler = Reconciler::with_config(settings);

    let stdout = std::io::stdout();
    let summary = match &cli.input {
        Some(path) => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?;
            replay::replay(&mut reconciler, BufReader::new(file), stdout.lock(), cli.strict)?
        }
        None => replay::replay(
            &mut reconciler,
            std::io::stdin().lock(),
            stdout.lock(),
            cli.strict,
        )?,
    };

    info!(
        events = summary.events,
        new_bubbles = summary.new_bubbles,
        updated = summary.updated,
        finalized = summary.finalized,
        ignored = summary.ignored,
        skipped_lines = summary.skipped_lines,
        runs = reconciler.len(),
        "replay complete"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_flags_override_observability_env() {
        let cli = Cli::parse_from([
            "reconciler-replay",
            "--log-level",
            "stream_reconciler=trace",
            "--log-json",
            "out/replay.jsonl",
        ]);
        let config = cli.observability();
        assert!(config.enabled);
        assert_eq!(config.filter.as_deref(), Some("stream_reconciler=trace"));
        assert_eq!(
            config.json_log_path.as_deref(),
            Some(std::path::Path::new("out/replay.jsonl"))
        );
    }

    #[test]
    fn quiet_disables_logging() {
        let cli = Cli::parse_from(["reconciler-replay", "--quiet", "--strict"]);
        assert!(cli.strict);
        assert!(!cli.observability().enabled);
    }
}
