//! `agenda` CLI — expand calendar events, encode recurrence rules, and parse tag
//! input from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Occurrences for the next year (stdin → stdout)
//! cat events.json | agenda query
//!
//! # Occurrences within an explicit window, from file to file
//! agenda query -i events.json --from 2024-03-01 --to 2024-03-31 -o march.json
//!
//! # Canonical rule for a category
//! agenda rule quarterly --until 2025-01-01
//!
//! # Tags from free text
//! agenda tags "#report #urgent"
//! ```
//!
//! Logs go to stderr; set `RUST_LOG=debug` for per-query summaries.

use std::io::{self, Read};

use agenda_engine::{EngineConfig, Event, RecurrenceCategory, Window};
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "agenda",
    version,
    about = "Calendar occurrence expansion and tag parsing"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand events (JSON array) into occurrences within a window
    Query {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Window start, RFC 3339 or YYYY-MM-DD (defaults to now)
        #[arg(long)]
        from: Option<String>,
        /// Window end, RFC 3339 or YYYY-MM-DD (defaults to one horizon after the start)
        #[arg(long)]
        to: Option<String>,
        /// Engine configuration file (JSON)
        #[arg(long)]
        config: Option<String>,
    },
    /// Print the canonical recurrence rule for a category
    Rule {
        /// Recurrence category (none, weekly, monthly, quarterly, semestrial, yearly)
        category: String,
        /// Last possible occurrence, RFC 3339 or YYYY-MM-DD
        #[arg(long)]
        until: Option<String>,
    },
    /// Parse free-text tag input into a JSON array
    Tags {
        /// Raw tag text
        text: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Query {
            input,
            output,
            from,
            to,
            config,
        } => {
            let config = load_config(config.as_deref())?;
            let raw = read_input(input.as_deref())?;
            let events: Vec<Event> =
                serde_json::from_str(&raw).context("Failed to parse events JSON")?;

            let start = from.as_deref().map(parse_instant).transpose()?;
            let end = to.as_deref().map(parse_instant).transpose()?;
            let window = Window::resolve(start, end, Utc::now(), &config)
                .context("Failed to resolve query window")?;
            debug!(events = events.len(), ?window, "running query");

            let occurrences = agenda_engine::query(&events, &window, &config);
            let pretty = serde_json::to_string_pretty(&occurrences)?;
            write_output(output.as_deref(), &pretty)?;
        }
        Commands::Rule { category, until } => {
            let category = RecurrenceCategory::from_label(&category);
            let until = until.as_deref().map(parse_instant).transpose()?;
            let rule = agenda_engine::try_encode(&category, until)
                .context("Failed to encode recurrence rule")?;
            if let Some(rule) = rule {
                println!("{}", rule);
            }
        }
        Commands::Tags { text } => {
            let tags = agenda_engine::parse_tags(&text);
            println!("{}", serde_json::to_string(&tags)?);
        }
    }

    Ok(())
}

fn load_config(path: Option<&str>) -> Result<EngineConfig> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path))?;
            EngineConfig::from_json_str(&raw)
                .with_context(|| format!("Invalid config file: {}", path))
        }
        None => Ok(EngineConfig::default()),
    }
}

/// Parse RFC 3339, or a bare `YYYY-MM-DD` as midnight UTC.
fn parse_instant(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("Invalid date or timestamp: '{}'", raw))?;
    date.and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
        .with_context(|| format!("Invalid date: '{}'", raw))
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
