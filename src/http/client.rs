//! HTTP client with retry and rate limiting
//!
//! Every request the tap makes is a GET against a fully built Chargebee URL.
//! A request is attempted, classified, and then either returned, retried
//! after a delay, or turned into an error. No retry waits longer than
//! `max_backoff`, including one requested by a 429's `Retry-After`.

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use crate::auth::{AuthConfig, Authenticator};
use crate::error::{is_retryable_status, Error, Result};
use crate::types::{BackoffType, JsonValue, StringMap};
use chrono::{DateTime, Utc};
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

/// Seconds to wait on a 429 without a usable `Retry-After` header
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

// ============================================================================
// Client Config
// ============================================================================

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout
    pub timeout: Duration,
    /// Maximum number of retries after the first attempt
    pub max_retries: u32,
    /// Initial delay for backoff
    pub initial_backoff: Duration,
    /// Maximum delay for any retry, `Retry-After` included
    pub max_backoff: Duration,
    /// Type of backoff strategy
    pub backoff_type: BackoffType,
    /// Rate limiter configuration
    pub rate_limit: Option<RateLimiterConfig>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(60),
            backoff_type: BackoffType::Exponential,
            rate_limit: None,
            user_agent: format!("{}/{}", crate::NAME, crate::VERSION),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }

    /// Delay before retry number `attempt` (zero-based)
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let delay = match self.backoff_type {
            BackoffType::Constant => self.initial_backoff,
            BackoffType::Linear => self.initial_backoff.saturating_mul(attempt + 1),
            BackoffType::Exponential => self
                .initial_backoff
                .saturating_mul(2u32.saturating_pow(attempt)),
        };
        delay.min(self.max_backoff)
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set max retries
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    /// Set backoff configuration
    pub fn backoff(mut self, backoff_type: BackoffType, initial: Duration, max: Duration) -> Self {
        self.config.backoff_type = backoff_type;
        self.config.initial_backoff = initial;
        self.config.max_backoff = max;
        self
    }

    /// Set rate limiter
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Query parameters and headers for one request
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Query parameters
    pub query: StringMap,
    /// Request headers
    pub headers: StringMap,
}

impl RequestConfig {
    /// Create a new request config
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }
}

// ============================================================================
// Client
// ============================================================================

/// What to do after one attempt
enum Outcome {
    /// A 2xx/3xx response
    Success(Response),
    /// Try again after the delay; the error is kept in case retries run out
    Retry(Duration, Error),
    /// Give up with this error
    Fail(Error),
}

/// Authenticated HTTP client with retry and rate limiting
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    authenticator: Authenticator,
    rate_limiter: Option<RateLimiter>,
}

impl HttpClient {
    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);

        Ok(Self {
            client,
            config,
            authenticator: Authenticator::default(),
            rate_limiter,
        })
    }

    /// Create a client with authentication
    pub fn with_auth(config: HttpClientConfig, auth_config: AuthConfig) -> Result<Self> {
        let mut client = Self::with_config(config)?;
        client.authenticator = Authenticator::new(auth_config);
        Ok(client)
    }

    /// Get the client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// GET a URL, retrying transient failures
    pub async fn get_with_config(&self, url: &str, request: RequestConfig) -> Result<Response> {
        let max_retries = self.config.max_retries;
        let mut attempt = 0;

        loop {
            if let Some(limiter) = &self.rate_limiter {
                limiter.wait().await;
            }

            match self.attempt(url, &request, attempt).await {
                Outcome::Success(response) => {
                    debug!("GET {url} -> {}", response.status().as_u16());
                    return Ok(response);
                }
                Outcome::Fail(error) => return Err(error),
                Outcome::Retry(_, error) if attempt >= max_retries => {
                    if max_retries > 0 {
                        warn!("Giving up on GET {url} after {} attempts", attempt + 1);
                    }
                    return Err(error);
                }
                Outcome::Retry(delay, error) => {
                    warn!(
                        "GET {url} failed ({error}), attempt {}/{}, retrying in {delay:?}",
                        attempt + 1,
                        max_retries + 1
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    /// GET a URL and parse the body as JSON
    pub async fn get_json_with_config(&self, url: &str, request: RequestConfig) -> Result<JsonValue> {
        let response = self.get_with_config(url, request).await?;
        let body = response
            .text()
            .await
            .map_err(|e| Error::decode(format!("Failed to read response body: {e}")))?;
        serde_json::from_str(&body)
            .map_err(|e| Error::decode(format!("Response is not valid JSON: {e}")))
    }

    async fn attempt(&self, url: &str, request: &RequestConfig, attempt: u32) -> Outcome {
        let mut builder = self.client.get(url);
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        builder = self.authenticator.apply(builder);

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                let error = Error::Timeout {
                    timeout_ms: self.config.timeout.as_millis() as u64,
                };
                return Outcome::Retry(self.config.backoff_delay(attempt), error);
            }
            Err(e) if e.is_connect() => {
                return Outcome::Retry(self.config.backoff_delay(attempt), Error::Http(e));
            }
            Err(e) => return Outcome::Fail(Error::Http(e)),
        };

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = retry_after_secs(&response, Utc::now());
            let delay = Duration::from_secs(retry_after).min(self.config.max_backoff);
            return Outcome::Retry(
                delay,
                Error::RateLimited {
                    retry_after_seconds: retry_after,
                },
            );
        }

        if !(status.is_client_error() || status.is_server_error()) {
            return Outcome::Success(response);
        }

        let body = response.text().await.unwrap_or_default();
        let error = Error::http_status(status.as_u16(), error_message(&body));
        if is_retryable_status(status.as_u16()) {
            Outcome::Retry(self.config.backoff_delay(attempt), error)
        } else {
            Outcome::Fail(error)
        }
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("authenticator", &self.authenticator)
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .finish_non_exhaustive()
    }
}

/// `Retry-After` in seconds
fn retry_after_secs(response: &Response, now: DateTime<Utc>) -> u64 {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| parse_retry_after(v, now))
        .unwrap_or(DEFAULT_RETRY_AFTER_SECS)
}

/// Parse either form of `Retry-After`: delay seconds or an HTTP date.
///
/// A date in the past means no wait.
pub(crate) fn parse_retry_after(value: &str, now: DateTime<Utc>) -> Option<u64> {
    let value = value.trim();
    if let Ok(seconds) = value.parse::<u64>() {
        return Some(seconds);
    }

    let at = DateTime::parse_from_rfc2822(value).ok()?.with_timezone(&Utc);
    Some((at - now).num_seconds().max(0) as u64)
}

/// Chargebee error bodies carry `message` and `api_error_code`; fall back to the raw body
pub(crate) fn error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<JsonValue>(body) else {
        return body.to_string();
    };

    match (
        value.get("api_error_code").and_then(JsonValue::as_str),
        value.get("message").and_then(JsonValue::as_str),
    ) {
        (Some(code), Some(message)) => format!("{code}: {message}"),
        (None, Some(message)) => message.to_string(),
        _ => body.to_string(),
    }
}
