//! CLI runner - executes commands

use crate::catalog::ConfiguredCatalog;
use crate::cli::commands::{parse_stream_list, Cli, Commands, OutputFormat};
use crate::config::TapConfig;
use crate::engine::SyncConfig;
use crate::error::{Error, Result, ResultExt};
use crate::output::MessageWriter;
use crate::state::StateManager;
use crate::tap::Tap;
use serde_json::{json, Value};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Spec => self.spec(),
            Commands::Check => self.check().await,
            Commands::Discover => self.discover(),
            Commands::Streams => self.streams(),
            Commands::Read {
                streams,
                catalog,
                max_records,
                no_state_per_page,
            } => {
                self.read(
                    streams.as_deref(),
                    catalog.as_deref(),
                    *max_records,
                    !*no_state_per_page,
                )
                .await
            }
        }
    }

    /// Load configuration, inline JSON first
    fn load_config(&self) -> Result<TapConfig> {
        if let Some(json_str) = &self.cli.config_json {
            return TapConfig::from_json(json_str);
        }

        match &self.cli.config {
            Some(path) => TapConfig::from_file(path),
            None => Err(Error::config(
                "No configuration given (use --config or --config-json)",
            )),
        }
    }

    /// Load state, inline JSON first
    fn load_state(&self) -> Result<StateManager> {
        if let Some(state_json) = &self.cli.state_json {
            StateManager::from_json(state_json)
        } else if let Some(path) = &self.cli.state {
            StateManager::from_file(path)
        } else {
            Ok(StateManager::in_memory())
        }
    }

    /// Build the tap from configuration
    fn load_tap(&self) -> Result<Tap> {
        Tap::new(self.load_config()?)
    }

    /// Print the config spec
    fn spec(&self) -> Result<()> {
        self.output(&json!({ "connectionSpecification": TapConfig::spec() }))
    }

    /// Check connection
    async fn check(&self) -> Result<()> {
        let tap = self.load_tap()?;
        info!("Checking connection to site '{}'", tap.config().site());

        match tap.check().await {
            Ok(()) => self.output(&json!({
                "connectionStatus": {
                    "status": "SUCCEEDED",
                    "message": "Connection successful"
                }
            })),
            Err(e) => {
                self.output(&json!({
                    "connectionStatus": {
                        "status": "FAILED",
                        "message": format!("Connection failed: {e}")
                    }
                }))?;
                Err(e)
            }
        }
    }

    /// Print the discovered catalog
    fn discover(&self) -> Result<()> {
        let tap = self.load_tap()?;
        self.output(&serde_json::to_value(tap.catalog())?)
    }

    /// Print stream names
    fn streams(&self) -> Result<()> {
        let tap = self.load_tap()?;
        let streams: Vec<Value> = tap
            .resources()
            .iter()
            .map(|r| {
                json!({
                    "name": r.name,
                    "path": r.path,
                    "replication_key": r.replication_key,
                })
            })
            .collect();
        self.output(&json!({ "streams": streams }))
    }

    /// Sync streams and write Singer messages to stdout
    async fn read(
        &self,
        streams: Option<&str>,
        catalog: Option<&Path>,
        max_records: Option<usize>,
        state_per_page: bool,
    ) -> Result<()> {
        let tap = self.load_tap()?;
        let state = self.load_state()?;

        let sync_config = SyncConfig::new()
            .with_max_records(max_records.unwrap_or(0))
            .with_state_per_page(state_per_page);

        let stdout = io::stdout();
        let mut writer = MessageWriter::new(BufWriter::new(stdout.lock()));

        let stats = match catalog {
            Some(path) => {
                let catalog = ConfiguredCatalog::from_file(path)
                    .with_context(|| format!("Failed to load catalog {}", path.display()))?;
                tap.sync_catalog(&catalog, state, sync_config, &mut writer)
                    .await?
            }
            None => {
                let names = streams.map(parse_stream_list).unwrap_or_default();
                tap.sync(names.as_slice(), state, sync_config, &mut writer).await?
            }
        };

        info!(
            "Synced {} records from {} streams ({} pages) in {}ms",
            stats.records_synced, stats.streams_synced, stats.pages_fetched, stats.duration_ms
        );
        Ok(())
    }

    /// Write a document to stdout in the selected format
    fn output(&self, value: &Value) -> Result<()> {
        let rendered = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };

        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{rendered}")?;
        stdout.flush()?;
        Ok(())
    }
}
