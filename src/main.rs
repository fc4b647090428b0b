mod commands;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use mindvault::import::{ImportStats, import_items};
use mindvault::sources::DemoData;
use mindvault::{Config, Error, SecondBrain};

use commands::Commands;
use output::{ErrorResponse, print_json};

/// mindvault - A personal semantic memory with retrieval-grounded answers
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Demo data directory (habits.json, calendar.json, notes.txt)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// JSON file of {"text", "source"} items to ingest (repeatable)
    #[arg(long = "import", global = true)]
    imports: Vec<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            if cli.json {
                print_json(&ErrorResponse {
                    error: e.to_string(),
                });
            } else {
                eprintln!("Error: {}", e);
            }
            ExitCode::from(1)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<ExitCode, Error> {
    // `version` must work even when configuration is broken.
    if matches!(cli.command, Commands::Version) {
        return commands::handle_version(cli.json);
    }

    let config = Config::load()?;
    let brain = SecondBrain::from_config(&config)?;

    let demo = load_demo(cli, &config)?;
    let mut stats = ImportStats::default();
    if let Some(demo) = &demo {
        if demo.is_empty() {
            warn!("demo data directory holds no records");
        }
        stats.merge(&ImportStats::from_outcomes(&brain.add_bulk(&demo.items())));
        stats.merge(&ImportStats::skipped(demo.skipped));
    }
    for path in &cli.imports {
        let items = import_items(path)?;
        stats.merge(&ImportStats::from_outcomes(&brain.add_bulk(&items)));
    }

    if stats.failed > 0 {
        warn!(failed = stats.failed, total = stats.total, "some memories were skipped");
    }
    info!(stored = stats.stored, total = stats.total, "memories loaded");

    commands::execute(&cli.command, &brain, demo.as_ref(), &config, cli.json)
}

/// An explicit `--data` directory must exist; the configured one is optional.
fn load_demo(cli: &Cli, config: &Config) -> Result<Option<DemoData>, Error> {
    match &cli.data {
        Some(dir) => DemoData::load(dir).map(Some),
        None if config.data_dir.is_dir() => DemoData::load(&config.data_dir).map(Some),
        None => Ok(None),
    }
}
