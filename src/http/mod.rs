//! HTTP client module
//!
//! Provides the transport used by every stream.
//!
//! # Features
//!
//! - **Automatic Retries**: 429, 5xx, timeouts and connection errors with backoff
//! - **Rate Limiting**: Optional token bucket rate limiter using governor
//! - **Backoff Strategies**: Constant, linear, and exponential backoff
//! - **Authentication**: Basic auth applied to every request

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};

#[cfg(test)]
mod tests;
