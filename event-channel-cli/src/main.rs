//! Event Channel CLI Application
//!
//! Command-line scenario runner for the event-channel library.
//! It loads a scenario file and:
//! - Registers the named listeners on one `EventChannel`
//! - Replays add/remove/invoke/clear steps in order
//! - Applies the re-entrant reactions listeners declare
//! - Reports every listener call (text or JSON)

use anyhow::{Context, Result};
use clap::Parser;
use config::OutputFormat;
use std::fs;
use std::path::PathBuf;

mod config;
mod error;
mod report;
mod runner;

/// Event Channel - Replay listener scenarios against an event channel
#[derive(Parser, Debug)]
#[command(name = "event-channel-cli")]
#[command(about = "Replay listener scenarios against an event channel", long_about = None)]
#[command(version)]
struct Args {
    /// Path to the scenario file (scenario.toml)
    #[arg(short, long, value_name = "FILE")]
    scenario: Option<PathBuf>,

    /// Report format (overrides the scenario's [output] section)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Output file for the report (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("Event Channel CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using event-channel library v{}", event_channel::VERSION);

    let Some(scenario_path) = &args.scenario else {
        // No arguments - show help
        println!("Event Channel CLI - No scenario specified");
        println!("\nQuick Start:");
        println!("  event-channel-cli --scenario scenarios/basic.toml");
        println!("  event-channel-cli --scenario scenarios/reentrant.toml --format json");
        println!("\nUse --help for more options");
        return Ok(());
    };

    log::info!("Loading scenario from: {:?}", scenario_path);
    let scenario = config::load_config(scenario_path)?;

    let outcome = runner::run(&scenario)
        .with_context(|| format!("Scenario failed: {:?}", scenario_path))?;

    let format = args.format.unwrap_or(scenario.output.format);
    let rendered = report::render(&outcome, format, chrono::Utc::now())?;

    match &args.output {
        Some(path) => {
            fs::write(path, rendered)
                .with_context(|| format!("Failed to write report: {:?}", path))?;
            log::info!("Report written to {:?}", path);
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
