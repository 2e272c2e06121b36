//! Laptop advisor CLI entry point.
//!
//! Exposes the preference operations for scripting and for driving a
//! single interview session from stdin.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::io::{self, BufRead, Read, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use laptop_advisor::agents::{agent_roster, handoff_for};
use laptop_advisor::config::Config;
use laptop_advisor::logging::{self, LoggingGuard};
use laptop_advisor::preferences::{build_search_text, decode_lenient, merge, PreferencePatch};
use laptop_advisor::session::PreferenceStore;
use laptop_advisor::tools::tool_definitions;

/// Laptop advisor — preference tools for a laptop buying assistant.
#[derive(Parser)]
#[command(name = "laptop-advisor", version, about)]
struct Cli {
    /// Path to config.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Also write JSON logs to this directory.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Available CLI subcommands.
#[derive(Subcommand)]
enum Command {
    /// Print the search text for a preferences JSON document ("-" reads stdin).
    SearchText {
        /// Preferences JSON.
        record: String,
    },
    /// Print the fields still missing from a preferences JSON document.
    Missing {
        /// Preferences JSON ("-" reads stdin).
        record: String,
    },
    /// Apply a patch to a preferences JSON document.
    Merge {
        /// Stored preferences JSON; empty or invalid starts fresh.
        #[arg(long, default_value = "")]
        record: String,
        /// Patch JSON object.
        #[arg(long, default_value = "{}")]
        patch: String,
    },
    /// Print the tool definitions as JSON.
    Tools,
    /// Print the agent roster as JSON.
    Agents,
    /// Read one patch per stdin line into a single session.
    Session,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    let _logging_guard = init_logging(cli.log_dir.as_deref(), &config.logging.level)?;

    match cli.command {
        Command::SearchText { record } => {
            let record = decode_lenient(&read_arg(record)?);
            println!("{}", build_search_text(&record));
        }
        Command::Missing { record } => {
            let record = decode_lenient(&read_arg(record)?);
            for field in record.missing_fields() {
                println!("{field}");
            }
        }
        Command::Merge { record, patch } => {
            let patch = PreferencePatch::from_json_str(&patch).context("invalid --patch")?;
            let outcome = merge(&record, &patch);
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        Command::Tools => {
            println!("{}", serde_json::to_string_pretty(&tool_definitions())?);
        }
        Command::Agents => {
            println!("{}", serde_json::to_string_pretty(&agent_roster(&config.models))?);
        }
        Command::Session => run_session(io::stdin().lock(), io::stdout().lock())?,
    }

    Ok(())
}

fn init_logging(
    log_dir: Option<&std::path::Path>,
    level: &str,
) -> anyhow::Result<Option<LoggingGuard>> {
    match log_dir {
        Some(dir) => Ok(Some(logging::init_production(dir, level)?)),
        None => {
            logging::init_cli(level)?;
            Ok(None)
        }
    }
}

/// Resolve "-" to the contents of stdin.
fn read_arg(value: String) -> anyhow::Result<String> {
    if value != "-" {
        return Ok(value);
    }
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .context("failed to read stdin")?;
    Ok(buf)
}

/// Apply each stdin line as a patch and print one outcome per line.
///
/// Invalid lines are reported and skipped. Once no field is missing, the
/// recommender handoff text goes to stderr.
fn run_session(input: impl BufRead, mut output: impl Write) -> anyhow::Result<()> {
    let store = PreferenceStore::new();
    let session = store.open()?;
    info!(session = %session, "interview session started");

    for (index, line) in input.lines().enumerate() {
        let line = line.context("failed to read stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        let patch = match PreferencePatch::from_json_str(&line) {
            Ok(patch) => patch,
            Err(e) => {
                warn!(line = index.saturating_add(1), error = %e, "skipping invalid patch");
                continue;
            }
        };

        let outcome = store.update(&session, &patch)?;
        writeln!(output, "{}", serde_json::to_string(&outcome)?)?;

        if let Some(handoff) = handoff_for(&outcome) {
            eprintln!("{handoff}");
        }
    }

    Ok(())
}
