//! Catalog types
//!
//! The discovered catalog lists every stream with its schema and keys. A
//! configured catalog is the subset a caller wants read, with a sync mode
//! per stream.

use crate::error::{Error, Result};
use crate::stream::ChargebeeStream;
use crate::types::{JsonValue, SyncMode};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Discovered catalog (available streams)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Available streams
    pub streams: Vec<CatalogStream>,
}

impl Catalog {
    /// Build a catalog from streams
    pub fn from_streams(streams: &[ChargebeeStream]) -> Self {
        Self {
            streams: streams.iter().map(CatalogStream::from_stream).collect(),
        }
    }

    /// Look up a stream by name
    pub fn get(&self, name: &str) -> Option<&CatalogStream> {
        self.streams.iter().find(|s| s.name == name)
    }

    /// Stream names, in catalog order
    pub fn stream_names(&self) -> Vec<&str> {
        self.streams.iter().map(|s| s.name.as_str()).collect()
    }

    /// Select every stream in its preferred sync mode
    pub fn configure_all(&self) -> ConfiguredCatalog {
        ConfiguredCatalog {
            streams: self
                .streams
                .iter()
                .cloned()
                .map(ConfiguredStream::new)
                .collect(),
        }
    }
}

/// Stream in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogStream {
    /// Stream name
    pub name: String,

    /// JSON schema for the stream
    #[serde(default)]
    pub json_schema: JsonValue,

    /// Supported sync modes
    #[serde(default)]
    pub supported_sync_modes: Vec<SyncMode>,

    /// Whether the tap picks the cursor field
    #[serde(default)]
    pub source_defined_cursor: bool,

    /// Default cursor field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_cursor_field: Option<Vec<String>>,

    /// Source-defined primary key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_defined_primary_key: Option<Vec<Vec<String>>>,
}

impl CatalogStream {
    /// Describe a stream
    pub fn from_stream(stream: &ChargebeeStream) -> Self {
        let definition = stream.definition();
        Self {
            name: definition.name.clone(),
            json_schema: stream.schema().to_json(),
            supported_sync_modes: definition.supported_sync_modes(),
            source_defined_cursor: definition.is_incremental(),
            default_cursor_field: definition
                .replication_key
                .as_ref()
                .map(|key| vec![key.clone()]),
            source_defined_primary_key: Some(
                definition
                    .primary_keys
                    .iter()
                    .map(|key| vec![key.clone()])
                    .collect(),
            ),
        }
    }

    /// Preferred sync mode: incremental when supported
    pub fn preferred_sync_mode(&self) -> SyncMode {
        if self.supported_sync_modes.contains(&SyncMode::Incremental) {
            SyncMode::Incremental
        } else {
            SyncMode::FullRefresh
        }
    }
}

/// Configured catalog (selected streams for sync)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfiguredCatalog {
    /// Selected streams
    pub streams: Vec<ConfiguredStream>,
}

impl ConfiguredCatalog {
    /// Parse a configured catalog from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a configured catalog file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Selected stream names, in catalog order
    pub fn stream_names(&self) -> Vec<&str> {
        self.streams.iter().map(|s| s.stream.name.as_str()).collect()
    }

    /// Look up a configured stream by name
    pub fn get(&self, name: &str) -> Option<&ConfiguredStream> {
        self.streams.iter().find(|s| s.stream.name == name)
    }
}

/// Configured stream for sync
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfiguredStream {
    /// Stream reference
    pub stream: CatalogStream,

    /// Selected sync mode
    #[serde(default)]
    pub sync_mode: SyncMode,

    /// Cursor field to use
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor_field: Option<Vec<String>>,
}

impl ConfiguredStream {
    /// Configure a stream in its preferred sync mode
    pub fn new(stream: CatalogStream) -> Self {
        let sync_mode = stream.preferred_sync_mode();
        let cursor_field = stream.default_cursor_field.clone();
        Self {
            stream,
            sync_mode,
            cursor_field,
        }
    }

    /// Whether the stream should resume from its bookmark
    pub fn is_incremental(&self) -> bool {
        self.sync_mode == SyncMode::Incremental
    }
}
