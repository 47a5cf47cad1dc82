//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Chargebee tap: extracts billing data as Singer messages
#[derive(Parser, Debug)]
#[command(name = "tap-chargebee")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Inline config JSON (takes precedence over --config)
    #[arg(long, global = true)]
    pub config_json: Option<String>,

    /// State file (JSON), updated in place as streams complete
    #[arg(short, long, global = true)]
    pub state: Option<PathBuf>,

    /// Inline state JSON (takes precedence over --state)
    #[arg(long, global = true)]
    pub state_json: Option<String>,

    /// Output format for spec, discover and streams
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the configuration specification
    Spec,

    /// Test connection to the API
    Check,

    /// Discover available streams with their schemas
    Discover,

    /// List available stream names (lightweight, no schemas)
    Streams,

    /// Read records from streams
    Read {
        /// Streams to sync (comma-separated, empty = all)
        #[arg(long, conflicts_with = "catalog")]
        streams: Option<String>,

        /// Configured catalog file selecting streams and sync modes
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Maximum records per stream
        #[arg(long)]
        max_records: Option<usize>,

        /// Only emit STATE when a stream completes
        #[arg(long)]
        no_state_per_page: bool,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one document per line)
    Json,
    /// Human-readable output
    Pretty,
}

impl Cli {
    /// Log filter directive implied by the verbosity flag
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

/// Split a comma-separated stream list, ignoring blanks
pub fn parse_stream_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}
