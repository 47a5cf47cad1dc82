//! Top-level record conformance
//!
//! Records are shaped to their declared schema one level deep: undeclared keys
//! are dropped and primitive values are coerced toward the declared type when
//! the conversion is lossless. Nested objects and arrays are left untouched.

use super::types::{JsonSchema, JsonType};
use crate::types::{JsonObject, JsonValue};
use serde_json::Number;

/// Outcome of conforming a single record
#[derive(Debug, Clone, PartialEq)]
pub struct Conformed {
    /// The conformed record
    pub record: JsonObject,
    /// Top-level keys that were not declared and got dropped
    pub dropped: Vec<String>,
}

/// Conform a record to the top level of a schema
pub fn conform_record(record: JsonObject, schema: &JsonSchema) -> Conformed {
    let mut conformed = JsonObject::new();
    let mut dropped = Vec::new();

    for (key, value) in record {
        match schema.get_property(&key).and_then(|p| p.primary_type()) {
            Some(json_type) => {
                conformed.insert(key, coerce_value(value, json_type));
            }
            None if schema.has_property(&key) => {
                conformed.insert(key, value);
            }
            None => dropped.push(key),
        }
    }

    Conformed {
        record: conformed,
        dropped,
    }
}

/// Coerce a primitive toward the declared type, leaving it alone when that
/// would lose information
pub fn coerce_value(value: JsonValue, json_type: JsonType) -> JsonValue {
    match (json_type, value) {
        (JsonType::Boolean, JsonValue::Number(n)) => match n.as_f64() {
            Some(f) => JsonValue::Bool(f != 0.0),
            None => JsonValue::Number(n),
        },
        (JsonType::Boolean, JsonValue::String(s)) => {
            match s.trim().to_ascii_lowercase().as_str() {
                "true" => JsonValue::Bool(true),
                "false" => JsonValue::Bool(false),
                _ => JsonValue::String(s),
            }
        }
        (JsonType::Integer, JsonValue::String(s)) => match s.trim().parse::<i64>() {
            Ok(i) => JsonValue::from(i),
            Err(_) => JsonValue::String(s),
        },
        (JsonType::Integer, JsonValue::Number(n)) => match n.as_f64() {
            Some(f) if !n.is_i64() && !n.is_u64() && f.fract() == 0.0 && f.abs() < 9.0e15 => {
                JsonValue::from(f as i64)
            }
            _ => JsonValue::Number(n),
        },
        (JsonType::Number, JsonValue::String(s)) => {
            match s.trim().parse::<f64>().ok().and_then(Number::from_f64) {
                Some(n) => JsonValue::Number(n),
                None => JsonValue::String(s),
            }
        }
        (_, value) => value,
    }
}
