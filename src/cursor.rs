//! Replication cursor parsing
//!
//! A starting cursor value can arrive as an epoch number (Chargebee bookmarks),
//! an ISO-8601 string (`start_date` from config) or some other datetime-like
//! string left behind by an older state file. Each shape is handled by a pure
//! parser; [`resolve_epoch`] tries them in order and takes the first hit.

use crate::types::JsonValue;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// A cursor parser: raw value in, epoch seconds out
pub type CursorParser = fn(&JsonValue) -> Option<i64>;

/// Parsers in the order they are attempted
pub const CURSOR_PARSERS: &[(&str, CursorParser)] = &[
    ("epoch", parse_epoch),
    ("iso8601", parse_iso8601),
    ("datetime", parse_datetime_like),
];

/// Exact format Chargebee and the tap config use for timestamps
pub const ISO8601_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Resolve a raw cursor value into epoch seconds.
///
/// Returns `None` when no parser recognizes the value.
pub fn resolve_epoch(value: &JsonValue) -> Option<i64> {
    CURSOR_PARSERS.iter().find_map(|(_, parse)| parse(value))
}

/// Name of the parser that accepted the value, if any
pub fn matching_parser(value: &JsonValue) -> Option<&'static str> {
    CURSOR_PARSERS
        .iter()
        .find(|(_, parse)| parse(value).is_some())
        .map(|(name, _)| *name)
}

/// Numeric epoch: JSON integers, floats (truncated) and digit-only strings
pub fn parse_epoch(value: &JsonValue) -> Option<i64> {
    match value {
        JsonValue::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        JsonValue::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// `YYYY-MM-DDTHH:MM:SSZ`, read as UTC
pub fn parse_iso8601(value: &JsonValue) -> Option<i64> {
    let s = value.as_str()?;
    NaiveDateTime::parse_from_str(s.trim(), ISO8601_FORMAT)
        .ok()
        .map(|dt| dt.and_utc().timestamp())
}

/// Looser datetime strings: RFC 3339 with offsets or fractions, naive
/// datetimes (assumed UTC) and bare dates (midnight UTC)
pub fn parse_datetime_like(value: &JsonValue) -> Option<i64> {
    let s = value.as_str()?.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp());
    }

    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.and_utc().timestamp());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test]
    fn test_iso8601_start_date() {
        assert_eq!(
            resolve_epoch(&json!("2023-01-01T00:00:00Z")),
            Some(1_672_531_200)
        );
    }

    #[test_case(json!(1700000000), Some(1_700_000_000); "integer")]
    #[test_case(json!(1700000000.75), Some(1_700_000_000); "float truncates")]
    #[test_case(json!("1700000000"), Some(1_700_000_000); "digit string")]
    #[test_case(json!("2024-02-29T12:30:00Z"), Some(1_709_209_800); "iso8601")]
    #[test_case(json!("2024-02-29T12:30:00+02:00"), Some(1_709_202_600); "rfc3339 offset")]
    #[test_case(json!("2024-02-29T12:30:00.123Z"), Some(1_709_209_800); "rfc3339 fraction")]
    #[test_case(json!("2024-02-29T12:30:00"), Some(1_709_209_800); "naive datetime")]
    #[test_case(json!("2024-02-29 12:30:00"), Some(1_709_209_800); "space separated")]
    #[test_case(json!("2024-02-29"), Some(1_709_164_800); "bare date")]
    #[test_case(json!("last tuesday"), None; "garbage")]
    #[test_case(json!(""), None; "empty string")]
    #[test_case(json!(null), None; "null")]
    #[test_case(json!(true), None; "boolean")]
    #[test_case(json!({"at": 1}), None; "object")]
    fn test_resolve_epoch(value: JsonValue, expected: Option<i64>) {
        assert_eq!(resolve_epoch(&value), expected);
    }

    #[test]
    fn test_parser_order() {
        assert_eq!(matching_parser(&json!(42)), Some("epoch"));
        assert_eq!(matching_parser(&json!("42")), Some("epoch"));
        assert_eq!(
            matching_parser(&json!("2023-01-01T00:00:00Z")),
            Some("iso8601")
        );
        assert_eq!(
            matching_parser(&json!("2023-01-01T00:00:00.5Z")),
            Some("datetime")
        );
        assert_eq!(matching_parser(&json!("nope")), None);
    }

    #[test]
    fn test_iso8601_is_strict() {
        assert_eq!(parse_iso8601(&json!("2023-01-01T00:00:00+00:00")), None);
        assert_eq!(parse_iso8601(&json!("2023-01-01")), None);
        assert_eq!(parse_iso8601(&json!(1_672_531_200)), None);
    }

    #[test]
    fn test_epoch_rejects_dates() {
        assert_eq!(parse_epoch(&json!("2023-01-01")), None);
        assert_eq!(parse_epoch(&json!(null)), None);
    }
}
