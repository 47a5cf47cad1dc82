//! Chargebee stream
//!
//! Binds one resource definition to the tap configuration and turns it into
//! HTTP requests: base URL, Basic auth, headers, list query parameters and
//! record extraction. Every resource shares this behavior; the resources
//! themselves are data.
//!
//! # Query parameters
//!
//! Every request carries `include_deleted` and `limit`. Follow-up pages add
//! `offset` with the token from the previous response. Incremental resources
//! also send `sort_by=<replication_key>` and, once a starting value resolves
//! to an epoch, `<replication_key>[after]=<epoch>`.

use crate::auth::AuthConfig;
use crate::config::TapConfig;
use crate::cursor::{matching_parser, resolve_epoch};
use crate::decode::JsonDecoder;
use crate::error::Result;
use crate::http::RequestConfig;
use crate::pagination::OffsetTokenPaginator;
use crate::resources::ResourceDefinition;
use crate::schema::{conform_record, JsonSchema};
use crate::types::{JsonObject, JsonValue, StringMap};
use std::sync::Arc;
use tracing::{debug, warn};

/// A resource bound to the tap configuration
#[derive(Debug, Clone)]
pub struct ChargebeeStream {
    definition: ResourceDefinition,
    config: Arc<TapConfig>,
    schema: JsonSchema,
    decoder: JsonDecoder,
}

impl ChargebeeStream {
    /// Create a stream for a resource
    pub fn new(definition: ResourceDefinition, config: Arc<TapConfig>) -> Self {
        let schema = definition.schema();
        let decoder = JsonDecoder::with_path(definition.records_path.clone());
        Self {
            definition,
            config,
            schema,
            decoder,
        }
    }

    /// Stream name
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    /// Endpoint path
    pub fn path(&self) -> &str {
        &self.definition.path
    }

    /// The underlying resource definition
    pub fn definition(&self) -> &ResourceDefinition {
        &self.definition
    }

    /// Tap configuration
    pub fn config(&self) -> &TapConfig {
        &self.config
    }

    /// Primary key fields
    pub fn primary_keys(&self) -> &[String] {
        &self.definition.primary_keys
    }

    /// Replication key, if incremental
    pub fn replication_key(&self) -> Option<&str> {
        self.definition.replication_key.as_deref()
    }

    /// Record schema
    pub fn schema(&self) -> &JsonSchema {
        &self.schema
    }

    // ========================================================================
    // Request building
    // ========================================================================

    /// API root for the configured site
    pub fn url_base(&self) -> Result<String> {
        self.config.url_base()
    }

    /// Full list endpoint URL
    pub fn url(&self) -> Result<String> {
        Ok(format!("{}{}", self.url_base()?, self.definition.path))
    }

    /// Basic credentials: API key as username, empty password
    pub fn auth_config(&self) -> AuthConfig {
        AuthConfig::api_key(self.config.api_key.clone())
    }

    /// Extra request headers
    pub fn http_headers(&self) -> StringMap {
        let mut headers = StringMap::new();
        if let Some(agent) = self.config.user_agent() {
            headers.insert("User-Agent".to_string(), agent);
        }
        headers
    }

    /// Starting cursor value: the stored bookmark, else the configured start date
    pub fn starting_value(&self, bookmark: Option<&JsonValue>) -> Option<JsonValue> {
        self.replication_key()?;

        bookmark
            .filter(|v| !v.is_null())
            .cloned()
            .or_else(|| self.config.start_date().map(JsonValue::String))
    }

    /// Resolve a starting value into the `[after]` lower bound.
    ///
    /// Values no parser understands are logged and ignored. Non-positive
    /// epochs mean no bound.
    pub fn lower_bound(&self, starting_value: Option<&JsonValue>) -> Option<i64> {
        let value = starting_value.filter(|v| !v.is_null())?;

        match resolve_epoch(value) {
            Some(epoch) if epoch > 0 => {
                debug!(
                    stream = self.name(),
                    parser = matching_parser(value).unwrap_or_default(),
                    epoch,
                    "Resolved starting cursor"
                );
                Some(epoch)
            }
            Some(_) => None,
            None => {
                warn!(
                    stream = self.name(),
                    value = %value,
                    "Could not parse starting cursor value; syncing without a lower bound"
                );
                None
            }
        }
    }

    /// Query parameters for a page request
    pub fn url_params(
        &self,
        next_page_token: Option<&str>,
        starting_value: Option<&JsonValue>,
    ) -> StringMap {
        let lower_bound = if self.replication_key().is_some() {
            self.lower_bound(starting_value)
        } else {
            None
        };
        self.query_params(next_page_token, lower_bound)
    }

    /// Query parameters with an already resolved lower bound
    pub fn query_params(&self, next_page_token: Option<&str>, lower_bound: Option<i64>) -> StringMap {
        let mut params = StringMap::new();
        params.insert(
            "include_deleted".to_string(),
            self.config.include_deleted.to_string(),
        );
        params.insert("limit".to_string(), self.config.limit.to_string());

        if let Some(token) = next_page_token.filter(|t| !t.is_empty()) {
            params.insert("offset".to_string(), token.to_string());
        }

        if let Some(key) = self.replication_key() {
            if let Some(epoch) = lower_bound {
                params.insert(format!("{key}[after]"), epoch.to_string());
            }
            params.insert("sort_by".to_string(), key.to_string());
        }

        params
    }

    /// Full request config for a page
    pub fn request_config(&self, next_page_token: Option<&str>, lower_bound: Option<i64>) -> RequestConfig {
        RequestConfig {
            query: self.query_params(next_page_token, lower_bound),
            headers: self.http_headers(),
        }
    }

    // ========================================================================
    // Response handling
    // ========================================================================

    /// Extract and conform the records in a list response
    pub fn parse_records(&self, body: &JsonValue) -> Result<Vec<JsonObject>> {
        let raw = self.decoder.extract_records(body)?;
        let mut records = Vec::with_capacity(raw.len());

        for value in raw {
            let JsonValue::Object(record) = value else {
                warn!(stream = self.name(), "Skipping non-object record: {value}");
                continue;
            };

            let conformed = conform_record(record, &self.schema);
            if !conformed.dropped.is_empty() {
                debug!(
                    stream = self.name(),
                    "Dropped undeclared properties: {}",
                    conformed.dropped.join(", ")
                );
            }
            records.push(conformed.record);
        }

        Ok(records)
    }

    /// Paginator for this stream's list endpoint
    pub fn paginator(&self) -> OffsetTokenPaginator {
        OffsetTokenPaginator::default()
    }

    /// Replication-key value of a record, if any
    pub fn replication_value(&self, record: &JsonObject) -> Option<JsonValue> {
        let key = self.replication_key()?;
        record.get(key).filter(|v| !v.is_null()).cloned()
    }
}
