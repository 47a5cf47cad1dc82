//! JSON decoder and path helpers

use crate::error::{Error, Result};
use serde_json::Value;

/// JSON decoder with optional record path extraction
#[derive(Debug, Clone, Default)]
pub struct JsonDecoder {
    /// JSONPath to extract records
    record_path: Option<String>,
}

impl JsonDecoder {
    /// Create a new JSON decoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a JSON decoder with a record path
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            record_path: Some(path.into()),
        }
    }

    /// Configured record path
    pub fn record_path(&self) -> Option<&str> {
        self.record_path.as_deref()
    }

    /// Parse a raw body and extract its records
    pub fn decode(&self, body: &str) -> Result<Vec<Value>> {
        let value: Value = serde_json::from_str(body).map_err(|e| Error::Decode {
            message: format!("Failed to parse JSON: {e}"),
        })?;
        self.extract_records(&value)
    }

    /// Extract records from a parsed response body.
    ///
    /// Null matches are skipped, so list entries missing the resource key do
    /// not turn into empty records.
    pub fn extract_records(&self, value: &Value) -> Result<Vec<Value>> {
        let records = match &self.record_path {
            Some(path) if path.contains('*') => extract_with_jsonpath(value, path)?,
            Some(path) => match extract_simple_path(value, path) {
                Some(Value::Array(arr)) => arr,
                Some(v) => vec![v],
                None => vec![],
            },
            None => match value {
                Value::Array(arr) => arr.clone(),
                _ => vec![value.clone()],
            },
        };

        Ok(records.into_iter().filter(|r| !r.is_null()).collect())
    }
}

/// Extract a scalar at a dot path as a string.
///
/// Strings come back as-is, numbers and booleans are stringified, anything
/// else (missing, null, containers) is `None`.
pub fn extract_scalar(value: &Value, path: &str) -> Option<String> {
    match extract_simple_path(value, path)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Walk a dot-notation path with optional `[index]` segments
fn extract_simple_path(value: &Value, path: &str) -> Option<Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);

    let mut current = value;
    for part in path.split('.') {
        match part.find('[') {
            Some(bracket_pos) => {
                let name = &part[..bracket_pos];
                let index = part[bracket_pos + 1..].strip_suffix(']')?;

                if !name.is_empty() {
                    current = current.get(name)?;
                }
                current = current.get(index.parse::<usize>().ok()?)?;
            }
            None => current = current.get(part)?,
        }
    }

    Some(current.clone())
}

/// Extract records using jsonpath-rust
fn extract_with_jsonpath(value: &Value, path: &str) -> Result<Vec<Value>> {
    use jsonpath_rust::JsonPath;

    let jp = JsonPath::try_from(path).map_err(|e| Error::JsonPath {
        message: format!("Invalid JSONPath '{path}': {e}"),
    })?;

    match jp.find(value) {
        Value::Array(arr) => Ok(arr),
        Value::Null => Ok(vec![]),
        other => Ok(vec![other]),
    }
}
