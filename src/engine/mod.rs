//! Execution engine module
//!
//! Main read loop for a single stream.
//!
//! # Overview
//!
//! The engine module provides:
//! - `SyncEngine` - Pages through one stream at a time, emitting messages and
//!   advancing its bookmark
//! - `SyncConfig` - Configuration for sync operations
//! - `SyncStats` - Counters for a run

mod types;

pub use types::{SyncConfig, SyncStats};

use crate::error::Result;
use crate::http::HttpClient;
use crate::output::{Message, MessageSink};
use crate::pagination::{NextPage, PaginationState, Paginator};
use crate::state::{compare_cursor_values, StateManager};
use crate::stream::ChargebeeStream;
use crate::types::JsonValue;
use chrono::Utc;
use std::cmp::Ordering;
use std::time::Instant;
use tracing::{debug, info};

/// Sync engine for orchestrating data extraction
pub struct SyncEngine {
    /// HTTP client
    client: HttpClient,
    /// State manager
    state: StateManager,
    /// Sync configuration
    config: SyncConfig,
    /// Statistics
    stats: SyncStats,
}

impl SyncEngine {
    /// Create a new sync engine
    pub fn new(client: HttpClient, state: StateManager) -> Self {
        Self {
            client,
            state,
            config: SyncConfig::default(),
            stats: SyncStats::default(),
        }
    }

    /// Set sync configuration
    #[must_use]
    pub fn with_config(mut self, config: SyncConfig) -> Self {
        self.config = config;
        self
    }

    /// Get the state manager
    pub fn state(&self) -> &StateManager {
        &self.state
    }

    /// Get statistics accumulated across streams
    pub fn stats(&self) -> &SyncStats {
        &self.stats
    }

    /// Reset statistics
    pub fn reset_stats(&mut self) {
        self.stats = SyncStats::default();
    }

    /// Sync one stream to completion.
    ///
    /// Emits SCHEMA, then RECORDs page by page, then a final STATE. The
    /// bookmark is read once up front and only ever moves forward.
    pub async fn sync_stream(
        &mut self,
        stream: &ChargebeeStream,
        sink: &mut dyn MessageSink,
    ) -> Result<SyncStats> {
        let start = Instant::now();
        let name = stream.name();
        let mut stats = SyncStats::new();

        info!("Starting sync for stream: {name}");

        sink.emit(Message::schema(
            name,
            stream.schema().to_json(),
            stream.primary_keys().to_vec(),
            stream.replication_key().map(str::to_string).into_iter().collect(),
        ))?;

        let bookmark = self.state.bookmark_value(name).await;
        let starting_value = stream.starting_value(bookmark.as_ref());
        let lower_bound = stream.lower_bound(starting_value.as_ref());

        let url = stream.url()?;
        let paginator = stream.paginator();
        let mut pagination = PaginationState::new(name);

        loop {
            let request = stream.request_config(pagination.token(), lower_bound);
            let body = self.client.get_json_with_config(&url, request).await?;
            stats.add_page();

            let records = stream.parse_records(&body)?;
            let page_size = records.len();
            let time_extracted = Utc::now();
            let mut page_max: Option<JsonValue> = None;
            let mut limit_reached = false;

            for record in records {
                if let Some(value) = stream.replication_value(&record) {
                    let is_newer = page_max
                        .as_ref()
                        .map_or(true, |max| compare_cursor_values(&value, max) == Ordering::Greater);
                    if is_newer {
                        page_max = Some(value);
                    }
                }

                sink.emit(Message::record(name, record, time_extracted))?;
                stats.add_records(1);

                if self.config.limit_reached(stats.records_synced) {
                    limit_reached = true;
                    break;
                }
            }

            debug!(
                "{name} page {}: {page_size} records ({} total)",
                stats.pages_fetched, stats.records_synced
            );

            if let (Some(key), Some(value)) = (stream.replication_key(), page_max) {
                let moved = self.state.advance_bookmark(name, key, value).await?;
                if moved && self.config.emit_state_per_page {
                    sink.emit(Message::state(self.state.snapshot().await.to_value()))?;
                }
            }

            if limit_reached {
                info!(
                    "Reached max records ({}) for {name}",
                    self.config.max_records
                );
                break;
            }

            match paginator.process_response(&body, page_size, &mut pagination)? {
                NextPage::Continue { .. } => {}
                NextPage::Done => break,
            }
        }

        self.state.checkpoint().await?;
        sink.emit(Message::state(self.state.snapshot().await.to_value()))?;
        sink.flush()?;

        stats.add_stream();
        #[allow(clippy::cast_possible_truncation)]
        stats.set_duration(start.elapsed().as_millis() as u64);
        self.stats.merge(&stats);

        info!(
            "Completed sync for {name}: {} records in {} pages",
            stats.records_synced, stats.pages_fetched
        );

        Ok(stats)
    }
}
