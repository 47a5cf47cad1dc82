//! Resource definition types

use crate::schema::{Field, JsonSchema};
use crate::types::SyncMode;
use serde::{Deserialize, Serialize};

/// Top-level shape of the embedded resource table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceTable {
    /// Resource declarations, in discovery order
    pub resources: Vec<ResourceDefinition>,
}

/// Declarative description of one Chargebee list endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDefinition {
    /// Stream name
    pub name: String,

    /// Endpoint path relative to the API base (e.g. `/invoices`)
    pub path: String,

    /// Primary key fields
    #[serde(default = "default_primary_keys")]
    pub primary_keys: Vec<String>,

    /// Incremental watermark field, if the resource supports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication_key: Option<String>,

    /// JSONPath selecting records in a list response
    pub records_path: String,

    /// Declared top-level fields, in order
    pub fields: Vec<Field>,
}

fn default_primary_keys() -> Vec<String> {
    vec!["id".to_string()]
}

impl ResourceDefinition {
    /// Whether the resource syncs incrementally
    pub fn is_incremental(&self) -> bool {
        self.replication_key.is_some()
    }

    /// Look up a declared field
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Whether a field is declared
    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Record schema built from the declared fields
    pub fn schema(&self) -> JsonSchema {
        JsonSchema::from_fields(&self.fields)
    }

    /// Sync modes the resource supports
    pub fn supported_sync_modes(&self) -> Vec<SyncMode> {
        if self.is_incremental() {
            vec![SyncMode::FullRefresh, SyncMode::Incremental]
        } else {
            vec![SyncMode::FullRefresh]
        }
    }
}
