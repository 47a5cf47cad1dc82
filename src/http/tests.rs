//! Tests for the HTTP client module

use super::client::{error_message, parse_retry_after};
use chrono::{TimeZone, Utc};
use super::*;
use crate::auth::AuthConfig;
use crate::error::Error;
use crate::types::BackoffType;
use serde_json::json;
use std::time::Duration;
use test_case::test_case;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_retry_config(max_retries: u32) -> HttpClientConfig {
    HttpClientConfig::builder()
        .max_retries(max_retries)
        .backoff(
            BackoffType::Constant,
            Duration::from_millis(10),
            Duration::from_secs(1),
        )
        .build()
}

fn client(max_retries: u32) -> HttpClient {
    HttpClient::with_config(fast_retry_config(max_retries)).unwrap()
}

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert_eq!(config.max_retries, 3);
    assert_eq!(config.backoff_type, BackoffType::Exponential);
    assert!(config.rate_limit.is_none());
    assert!(config.user_agent.starts_with("tap-chargebee/"));
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .timeout(Duration::from_secs(60))
        .max_retries(5)
        .backoff(
            BackoffType::Linear,
            Duration::from_millis(200),
            Duration::from_secs(30),
        )
        .rate_limit(RateLimiterConfig::per_second(2))
        .user_agent("acme-etl/1.0")
        .build();

    assert_eq!(config.timeout, Duration::from_secs(60));
    assert_eq!(config.max_retries, 5);
    assert_eq!(config.backoff_type, BackoffType::Linear);
    assert_eq!(config.rate_limit, Some(RateLimiterConfig::new(2, 2)));
    assert_eq!(config.user_agent, "acme-etl/1.0");
}

#[test]
fn test_request_config_builder() {
    let config = RequestConfig::new().query("limit", "10").query("offset", "abc");

    assert_eq!(config.query.get("limit").map(String::as_str), Some("10"));
    assert_eq!(config.query.get("offset").map(String::as_str), Some("abc"));
    assert!(config.headers.is_empty());
}

#[test]
fn test_parse_retry_after() {
    let now = Utc.with_ymd_and_hms(2015, 10, 21, 7, 27, 30).unwrap();

    assert_eq!(parse_retry_after("120", now), Some(120));
    assert_eq!(parse_retry_after(" 5 ", now), Some(5));
    assert_eq!(
        parse_retry_after("Wed, 21 Oct 2015 07:28:00 GMT", now),
        Some(30)
    );
    assert_eq!(
        parse_retry_after("Wed, 21 Oct 2015 07:00:00 GMT", now),
        Some(0)
    );
    assert_eq!(parse_retry_after("soon", now), None);
}

#[test_case(BackoffType::Constant, 0, 100 ; "constant first")]
#[test_case(BackoffType::Constant, 5, 100 ; "constant later")]
#[test_case(BackoffType::Linear, 0, 100 ; "linear first")]
#[test_case(BackoffType::Linear, 2, 300 ; "linear third")]
#[test_case(BackoffType::Exponential, 1, 200 ; "exponential second")]
#[test_case(BackoffType::Exponential, 2, 400 ; "exponential third")]
#[test_case(BackoffType::Exponential, 10, 500 ; "exponential capped")]
fn test_backoff_delay(backoff_type: BackoffType, attempt: u32, expected_ms: u64) {
    let config = HttpClientConfig::builder()
        .backoff(
            backoff_type,
            Duration::from_millis(100),
            Duration::from_millis(500),
        )
        .build();
    assert_eq!(
        config.backoff_delay(attempt),
        Duration::from_millis(expected_ms)
    );
}

#[test]
fn test_error_message_from_chargebee_body() {
    let body = json!({
        "message": "Sorry, authentication failed. Invalid api key",
        "type": "invalid_request",
        "api_error_code": "api_authentication_failed",
        "http_status_code": 401
    })
    .to_string();
    assert_eq!(
        error_message(&body),
        "api_authentication_failed: Sorry, authentication failed. Invalid api key"
    );
    assert_eq!(error_message(r#"{"message": "nope"}"#), "nope");
    assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
    assert_eq!(error_message(r#"{"error": 1}"#), r#"{"error": 1}"#);
}

#[tokio::test]
async fn test_get_json_with_query_and_auth() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/invoices"))
        .and(query_param("limit", "10"))
        .and(query_param("updated_at[after]", "1700000000"))
        .and(header("Authorization", "Basic a2V5Og=="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "list": [{"invoice": {"id": "inv_1"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::with_auth(fast_retry_config(0), AuthConfig::api_key("key")).unwrap();

    let body = client
        .get_json_with_config(
            &format!("{}/api/v2/invoices", server.uri()),
            RequestConfig::new()
                .query("limit", "10")
                .query("updated_at[after]", "1700000000"),
        )
        .await
        .unwrap();

    assert_eq!(body["list"][0]["invoice"]["id"], "inv_1");
}

#[tokio::test]
async fn test_request_headers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/customers"))
        .and(header("User-Agent", "acme-etl/1.0"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let response = client(0)
        .get_with_config(
            &format!("{}/customers", server.uri()),
            RequestConfig {
                headers: [("User-Agent".to_string(), "acme-etl/1.0".to_string())].into(),
                ..RequestConfig::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_client_error_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/subscriptions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Invalid api key",
            "api_error_code": "api_authentication_failed"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(3)
        .get_with_config(&format!("{}/subscriptions", server.uri()), RequestConfig::new())
        .await
        .unwrap_err();

    match err {
        Error::HttpStatus { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, "api_authentication_failed: Invalid api key");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_retry_on_500() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/events"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"list": []})))
        .mount(&server)
        .await;

    let body = client(3)
        .get_json_with_config(&format!("{}/events", server.uri()), RequestConfig::new())
        .await
        .unwrap();

    assert_eq!(body, json!({"list": []}));
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_rate_limit_retry() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/coupons"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("retry-after", "1")
                .set_body_string("api_request_limit_exceeded"),
        )
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/coupons"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"list": []})))
        .mount(&server)
        .await;

    let response = client(2)
        .get_with_config(&format!("{}/coupons", server.uri()), RequestConfig::new())
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_rate_limited_without_retries() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/coupons"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(0)
        .get_with_config(&format!("{}/coupons", server.uri()), RequestConfig::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::RateLimited {
            retry_after_seconds: 7
        }
    ));
}

#[tokio::test]
async fn test_max_retries_exceeded() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .expect(3)
        .mount(&server)
        .await;

    let err = client(2)
        .get_with_config(&format!("{}/orders", server.uri()), RequestConfig::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::HttpStatus { status: 503, ref body } if body == "maintenance"));
}

#[tokio::test]
async fn test_retry_after_capped_by_max_backoff() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "3600"))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"list": []})))
        .mount(&server)
        .await;

    let config = HttpClientConfig::builder()
        .max_retries(1)
        .backoff(
            BackoffType::Exponential,
            Duration::from_millis(10),
            Duration::from_millis(50),
        )
        .build();
    let client = HttpClient::with_config(config).unwrap();

    let start = std::time::Instant::now();
    let body = tokio::time::timeout(
        Duration::from_secs(5),
        client.get_json_with_config(&format!("{}/orders", server.uri()), RequestConfig::new()),
    )
    .await
    .expect("waited for the full Retry-After")
    .unwrap();

    assert_eq!(body, json!({"list": []}));
    assert!(start.elapsed() >= Duration::from_millis(50));
}

#[tokio::test]
async fn test_invalid_json_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/items"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client(0)
        .get_json_with_config(&format!("{}/items", server.uri()), RequestConfig::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Decode { .. }));
}

#[tokio::test]
async fn test_with_rate_limiter() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/items"))
        .respond_with(ResponseTemplate::new(200))
        .expect(3)
        .mount(&server)
        .await;

    let config = HttpClientConfig::builder()
        .rate_limit(RateLimiterConfig::new(100, 10))
        .build();

    let client = HttpClient::with_config(config).unwrap();
    assert!(client.config().rate_limit.is_some());

    for _ in 0..3 {
        let response = client
            .get_with_config(&format!("{}/items", server.uri()), RequestConfig::new())
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
    }
}

#[test]
fn test_http_client_debug_hides_credentials() {
    let client = HttpClient::with_auth(
        HttpClientConfig::default(),
        AuthConfig::api_key("live_secret"),
    )
    .unwrap();
    let debug_str = format!("{client:?}");
    assert!(debug_str.contains("HttpClient"));
    assert!(!debug_str.contains("live_secret"));
}
