//! CLI module
//!
//! Command-line interface for running the tap.
//!
//! # Commands
//!
//! - `spec` - Print the configuration schema
//! - `check` - Test connection to the API
//! - `discover` - Print the catalog
//! - `streams` - List stream names (lightweight)
//! - `read` - Extract records as Singer messages

mod commands;
mod runner;

pub use commands::{parse_stream_list, Cli, Commands, OutputFormat};
pub use runner::Runner;
