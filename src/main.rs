// RouteWatch - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Config loading and CLI overrides
// 3. Logging initialisation (debug mode support)
// 4. Running the filter from stdin to stdout, notifications to stderr or a file

use clap::error::ErrorKind;
use clap::Parser;
use routewatch::app::pipeline::Pipeline;
use routewatch::core::classifier::Classifier;
use routewatch::core::model::SaveLineMode;
use routewatch::core::rules::RuleSet;
use routewatch::platform::config::{load_config, PlatformPaths};
use routewatch::platform::fs::open_notify_sink;
use routewatch::util;
use routewatch::util::error::Result;
use std::io::{self, BufWriter};
use std::path::PathBuf;

/// RouteWatch - autorouter progress log filter.
///
/// Reads the router's log on stdin, echoes it to stdout, and writes a JSON
/// status record for every routing milestone to stderr (or --notify-file).
/// Save lines are replaced by a progress line carrying the iteration number
/// and the seconds since the previous save.
#[derive(Parser, Debug)]
#[command(name = "routewatch", version, about)]
struct Cli {
    /// Config file (defaults to config.toml in the platform config directory).
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Write notifications to this file (appended) instead of stderr.
    #[arg(short = 'n', long = "notify-file")]
    notify_file: Option<PathBuf>,

    /// Exact thread field of milestone lines, e.g. "[Thread-0]".
    #[arg(long = "thread-marker")]
    thread_marker: Option<String>,

    /// Regex the thread field must match; overrides --thread-marker.
    #[arg(long = "thread-pattern")]
    thread_pattern: Option<String>,

    /// Empty fields between the level and the message (2 for log4j %-6level).
    #[arg(long = "level-padding")]
    level_padding: Option<usize>,

    /// What to do with save lines: "replace" or "append".
    #[arg(long = "save-line")]
    save_line: Option<SaveLineMode>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() {
    // Help and version exit 0; every other argument error is a configuration
    // error and exits 1 like the rest.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    if let Err(e) = run(cli) {
        tracing::error!(error = %e, "RouteWatch stopped");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PlatformPaths::resolve().config_file);
    let (mut config, warnings) = load_config(&config_path);

    util::logging::init(
        cli.debug,
        config.log_level.as_deref(),
        config.log_file.as_deref(),
    );

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        config = %config_path.display(),
        "RouteWatch starting"
    );
    for warning in &warnings {
        tracing::warn!(warning = %warning, "Config warning");
    }

    // CLI > config file > defaults. An explicit marker on the CLI wins over
    // a pattern from the config file.
    if let Some(marker) = cli.thread_marker {
        config.set_thread_marker(marker)?;
        config.thread_pattern = None;
    }
    if let Some(pattern) = cli.thread_pattern {
        config.thread_pattern = Some(pattern);
    }
    if let Some(padding) = cli.level_padding {
        config.set_level_padding(padding)?;
    }
    if let Some(mode) = cli.save_line {
        config.save_line = mode;
    }
    if let Some(path) = cli.notify_file {
        config.notify_file = Some(path);
    }

    let rules = RuleSet::new(config.thread_matcher()?, config.level_padding);
    tracing::debug!(?config, "Effective configuration");

    let mut notify = open_notify_sink(config.notify_file.as_deref())?;
    let mut output = BufWriter::new(io::stdout().lock());
    let mut pipeline = Pipeline::new(Classifier::new(rules), config.save_line);

    pipeline.run(io::stdin().lock(), &mut output, &mut notify)?;
    Ok(())
}
