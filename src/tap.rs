//! Tap entry point
//!
//! Owns the validated configuration and the resource table, and hands out
//! one [`ChargebeeStream`] per resource. Streams are synced one after
//! another through a single [`SyncEngine`].

use crate::auth::AuthConfig;
use crate::catalog::{Catalog, ConfiguredCatalog};
use crate::config::TapConfig;
use crate::engine::{SyncConfig, SyncEngine, SyncStats};
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::output::MessageSink;
use crate::resources::{load_resources, ResourceDefinition};
use crate::state::StateManager;
use crate::stream::ChargebeeStream;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Endpoint probed by [`Tap::check`]
pub const CHECK_PATH: &str = "/subscriptions";

/// The Chargebee tap
#[derive(Debug, Clone)]
pub struct Tap {
    config: Arc<TapConfig>,
    resources: Vec<ResourceDefinition>,
}

impl Tap {
    /// Validate the config and load the resource table
    pub fn new(config: TapConfig) -> Result<Self> {
        config.validate()?;
        let resources = load_resources()?;
        debug!("Loaded {} resource definitions", resources.len());

        Ok(Self {
            config: Arc::new(config),
            resources,
        })
    }

    /// Tap configuration
    pub fn config(&self) -> &TapConfig {
        &self.config
    }

    /// Resource definitions, in discovery order
    pub fn resources(&self) -> &[ResourceDefinition] {
        &self.resources
    }

    /// All streams, in discovery order
    pub fn discover_streams(&self) -> Vec<ChargebeeStream> {
        self.resources
            .iter()
            .cloned()
            .map(|definition| ChargebeeStream::new(definition, Arc::clone(&self.config)))
            .collect()
    }

    /// A single stream by name
    pub fn stream(&self, name: &str) -> Result<ChargebeeStream> {
        self.resources
            .iter()
            .find(|r| r.name == name)
            .cloned()
            .map(|definition| ChargebeeStream::new(definition, Arc::clone(&self.config)))
            .ok_or_else(|| Error::stream_not_found(name))
    }

    /// Streams by name, preserving the requested order.
    ///
    /// An empty selection means every stream.
    pub fn select_streams<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<ChargebeeStream>> {
        if names.is_empty() {
            return Ok(self.discover_streams());
        }
        names.iter().map(|name| self.stream(name.as_ref())).collect()
    }

    /// Discovered catalog
    pub fn catalog(&self) -> Catalog {
        Catalog::from_streams(&self.discover_streams())
    }

    /// HTTP client authenticated for this site
    pub fn http_client(&self) -> Result<HttpClient> {
        HttpClient::with_auth(
            self.config.http_client_config(),
            AuthConfig::api_key(self.config.api_key.clone()),
        )
    }

    /// Verify credentials and connectivity with a single one-record request
    pub async fn check(&self) -> Result<()> {
        let client = self.http_client()?;
        let url = format!("{}{CHECK_PATH}", self.config.url_base()?);
        let request = RequestConfig::new().query("limit", "1");

        client.get_json_with_config(&url, request).await?;
        info!("Connection check succeeded for site '{}'", self.config.site());
        Ok(())
    }

    /// Sync streams sequentially, all of them when `names` is empty
    pub async fn sync<S: AsRef<str>>(
        &self,
        names: &[S],
        state: StateManager,
        sync_config: SyncConfig,
        sink: &mut dyn MessageSink,
    ) -> Result<SyncStats> {
        let streams = self.select_streams(names)?;
        self.sync_streams(&streams, state, sync_config, sink).await
    }

    /// Sync the streams a configured catalog selects.
    ///
    /// Streams configured for full refresh drop their bookmark first.
    pub async fn sync_catalog(
        &self,
        catalog: &ConfiguredCatalog,
        state: StateManager,
        sync_config: SyncConfig,
        sink: &mut dyn MessageSink,
    ) -> Result<SyncStats> {
        let streams = self.select_streams(catalog.stream_names().as_slice())?;

        for configured in &catalog.streams {
            if !configured.is_incremental() {
                state.clear_stream(&configured.stream.name).await?;
            }
        }

        self.sync_streams(&streams, state, sync_config, sink).await
    }

    async fn sync_streams(
        &self,
        streams: &[ChargebeeStream],
        state: StateManager,
        sync_config: SyncConfig,
        sink: &mut dyn MessageSink,
    ) -> Result<SyncStats> {
        let start = Instant::now();
        let mut engine = SyncEngine::new(self.http_client()?, state).with_config(sync_config);

        for stream in streams {
            engine.sync_stream(stream, sink).await?;
        }

        let mut stats = engine.stats().clone();
        #[allow(clippy::cast_possible_truncation)]
        stats.set_duration(start.elapsed().as_millis() as u64);

        info!(
            "Sync complete: {} streams, {} records, {} pages in {}ms",
            stats.streams_synced, stats.records_synced, stats.pages_fetched, stats.duration_ms
        );
        Ok(stats)
    }
}
