//! Tap configuration
//!
//! The tap is configured with a flat JSON object, read from a file or passed
//! inline on the command line:
//!
//! ```json
//! {
//!   "api_key": "test_abc123",
//!   "site_id": "acme-test",
//!   "start_date": "2023-01-01T00:00:00Z",
//!   "include_deleted": true,
//!   "limit": 100
//! }
//! ```

use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::types::{BackoffType, JsonValue, OptionStringExt};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

/// Chargebee site names, after trimming and lowercasing
static SITE_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9-]*$").unwrap());

/// Largest page size Chargebee accepts on list endpoints
pub const MAX_LIMIT: u32 = 100;

// ============================================================================
// Tap Config
// ============================================================================

/// Process-wide tap configuration
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TapConfig {
    /// Chargebee API key (secret)
    #[serde(default)]
    pub api_key: String,

    /// Chargebee site, the first label of `{site}.chargebee.com`
    #[serde(default)]
    pub site_id: String,

    /// Earliest record date to sync, used when no bookmark exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,

    /// Whether deleted records are included
    #[serde(default = "default_include_deleted")]
    pub include_deleted: bool,

    /// Page size
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Value for the `User-Agent` header
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,

    /// Override for the API base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Maximum retries for transient HTTP failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Client-side request rate cap
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requests_per_second: Option<u32>,

    /// Delay growth between retries
    #[serde(default)]
    pub backoff: BackoffType,

    /// Delay before the first retry, in milliseconds
    #[serde(default = "default_backoff_initial_ms")]
    pub backoff_initial_ms: u64,

    /// Upper bound on any retry delay, `Retry-After` included, in seconds
    #[serde(default = "default_backoff_max_secs")]
    pub backoff_max_secs: u64,
}

fn default_include_deleted() -> bool {
    true
}

fn default_limit() -> u32 {
    10
}

fn default_max_retries() -> u32 {
    3
}

fn default_request_timeout() -> u64 {
    30
}

fn default_backoff_initial_ms() -> u64 {
    500
}

fn default_backoff_max_secs() -> u64 {
    60
}

impl Default for TapConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            site_id: String::new(),
            start_date: None,
            include_deleted: default_include_deleted(),
            limit: default_limit(),
            user_agent: None,
            api_url: None,
            max_retries: default_max_retries(),
            request_timeout_secs: default_request_timeout(),
            requests_per_second: None,
            backoff: BackoffType::default(),
            backoff_initial_ms: default_backoff_initial_ms(),
            backoff_max_secs: default_backoff_max_secs(),
        }
    }
}

impl std::fmt::Debug for TapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TapConfig")
            .field("api_key", &"[REDACTED]")
            .field("site_id", &self.site_id)
            .field("start_date", &self.start_date)
            .field("include_deleted", &self.include_deleted)
            .field("limit", &self.limit)
            .field("user_agent", &self.user_agent)
            .field("api_url", &self.api_url)
            .field("max_retries", &self.max_retries)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("requests_per_second", &self.requests_per_second)
            .field("backoff", &self.backoff)
            .field("backoff_initial_ms", &self.backoff_initial_ms)
            .field("backoff_max_secs", &self.backoff_max_secs)
            .finish()
    }
}

impl TapConfig {
    /// Create a config with the two required settings
    pub fn new(api_key: impl Into<String>, site_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            site_id: site_id.into(),
            ..Default::default()
        }
    }

    /// Parse and validate a config from a JSON value
    pub fn from_value(value: JsonValue) -> Result<Self> {
        let config: Self = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a config from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Validate required settings and value ranges
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(Error::missing_field("api_key"));
        }

        let site = self.site();
        if site.is_empty() {
            return Err(Error::missing_field("site_id"));
        }

        if !SITE_ID_REGEX.is_match(&site) {
            return Err(Error::invalid_value(
                "site_id",
                format!(
                    "'{}' is not a Chargebee site name (letters, digits, dashes)",
                    self.site_id
                ),
            ));
        }

        if self.limit == 0 || self.limit > MAX_LIMIT {
            return Err(Error::invalid_value(
                "limit",
                format!("must be between 1 and {MAX_LIMIT}, got {}", self.limit),
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(Error::invalid_value(
                "request_timeout_secs",
                "must be greater than zero",
            ));
        }

        if self.backoff_max_secs == 0 {
            return Err(Error::invalid_value(
                "backoff_max_secs",
                "must be greater than zero",
            ));
        }

        if self.requests_per_second == Some(0) {
            return Err(Error::invalid_value(
                "requests_per_second",
                "must be greater than zero",
            ));
        }

        if let Some(api_url) = self.api_url.clone().none_if_empty() {
            let url = url::Url::parse(&api_url)?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(Error::invalid_value(
                    "api_url",
                    format!("unsupported scheme '{}'", url.scheme()),
                ));
            }
        }

        Ok(())
    }

    /// API base URL, without a trailing slash
    pub fn url_base(&self) -> Result<String> {
        if let Some(api_url) = self.api_url.clone().none_if_empty() {
            return Ok(api_url.trim_end_matches('/').to_string());
        }

        let site = self.site();
        if site.is_empty() {
            return Err(Error::missing_field("site_id"));
        }
        Ok(format!("https://{site}.chargebee.com/api/v2"))
    }

    /// Site id as used in the host name: trimmed and lowercased
    pub fn site(&self) -> String {
        self.site_id.trim().to_ascii_lowercase()
    }

    /// Configured user agent, ignoring blank values
    pub fn user_agent(&self) -> Option<String> {
        self.user_agent.clone().none_if_empty()
    }

    /// Configured start date, ignoring blank values
    pub fn start_date(&self) -> Option<String> {
        self.start_date.clone().none_if_empty()
    }

    /// HTTP client settings derived from this config
    pub fn http_client_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .timeout(Duration::from_secs(self.request_timeout_secs))
            .max_retries(self.max_retries)
            .backoff(
                self.backoff,
                Duration::from_millis(self.backoff_initial_ms),
                Duration::from_secs(self.backoff_max_secs),
            );

        if let Some(agent) = self.user_agent() {
            builder = builder.user_agent(agent);
        }

        if let Some(rps) = self.requests_per_second {
            builder = builder.rate_limit(RateLimiterConfig::per_second(rps));
        }

        builder.build()
    }

    /// JSON schema describing the accepted configuration
    pub fn spec() -> JsonValue {
        json!({
            "type": "object",
            "required": ["api_key", "site_id"],
            "properties": {
                "api_key": {
                    "type": "string",
                    "description": "Chargebee API key",
                    "secret": true
                },
                "site_id": {
                    "type": "string",
                    "description": "ID for your Chargebee site (first part of the URL)"
                },
                "start_date": {
                    "type": "string",
                    "format": "date-time",
                    "description": "The earliest record date to sync"
                },
                "include_deleted": {
                    "type": "boolean",
                    "description": "Whether or not to include deleted records",
                    "default": default_include_deleted()
                },
                "limit": {
                    "type": "integer",
                    "description": "Page size limit for API calls",
                    "default": default_limit(),
                    "minimum": 1,
                    "maximum": MAX_LIMIT
                },
                "user_agent": {
                    "type": "string",
                    "description": "User-Agent header sent with every request"
                },
                "api_url": {
                    "type": "string",
                    "format": "uri",
                    "description": "Override for the API base URL"
                },
                "max_retries": {
                    "type": "integer",
                    "description": "Retries for rate-limited or failed requests",
                    "default": default_max_retries()
                },
                "request_timeout_secs": {
                    "type": "integer",
                    "description": "Per-request timeout in seconds",
                    "default": default_request_timeout()
                },
                "requests_per_second": {
                    "type": "integer",
                    "description": "Client-side request rate cap"
                },
                "backoff": {
                    "type": "string",
                    "enum": ["constant", "linear", "exponential"],
                    "description": "How the delay grows between retries",
                    "default": "exponential"
                },
                "backoff_initial_ms": {
                    "type": "integer",
                    "description": "Delay before the first retry in milliseconds",
                    "default": default_backoff_initial_ms()
                },
                "backoff_max_secs": {
                    "type": "integer",
                    "description": "Upper bound on any retry delay in seconds, Retry-After included",
                    "default": default_backoff_max_secs(),
                    "minimum": 1
                }
            }
        })
    }
}
