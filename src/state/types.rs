//! State types for tracking sync progress
//!
//! The state document uses the Singer bookmark layout and is persisted
//! between runs:
//!
//! ```json
//! {"bookmarks": {"invoices": {"replication_key": "updated_at", "replication_key_value": 1700000000}}}
//! ```
//!
//! Keys the tap does not model, at the top level or inside a bookmark, are
//! carried through unchanged when the state is written back.

use crate::cursor::resolve_epoch;
use crate::types::{JsonObject, JsonValue};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Complete state for the tap
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct State {
    /// Per-stream bookmarks
    #[serde(default)]
    pub bookmarks: BTreeMap<String, Bookmark>,

    /// Other top-level keys (`currently_syncing`, ...)
    #[serde(flatten)]
    pub extra: JsonObject,
}

impl State {
    /// Create a new empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the bookmark for a stream
    pub fn get_bookmark(&self, stream: &str) -> Option<&Bookmark> {
        self.bookmarks.get(stream)
    }

    /// Get the stored watermark for a stream
    pub fn bookmark_value(&self, stream: &str) -> Option<&JsonValue> {
        self.bookmarks.get(stream)?.value()
    }

    /// Set a stream's watermark, keeping any other keys in its bookmark
    pub fn set_bookmark(&mut self, stream: &str, replication_key: &str, value: JsonValue) {
        let bookmark = self.bookmarks.entry(stream.to_string()).or_default();
        bookmark.replication_key = replication_key.to_string();
        bookmark.replication_key_value = Some(value);
    }

    /// Raise a stream's watermark to `value` unless it is already at or past it.
    ///
    /// Returns whether the bookmark moved.
    pub fn advance_bookmark(&mut self, stream: &str, replication_key: &str, value: JsonValue) -> bool {
        if value.is_null() {
            return false;
        }

        if let Some(current) = self.bookmark_value(stream) {
            if compare_cursor_values(&value, current) != Ordering::Greater {
                return false;
            }
        }

        self.set_bookmark(stream, replication_key, value);
        true
    }

    /// Remove a stream's bookmark
    pub fn clear_bookmark(&mut self, stream: &str) -> Option<Bookmark> {
        self.bookmarks.remove(stream)
    }

    /// State as a JSON value, for STATE messages
    pub fn to_value(&self) -> JsonValue {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Watermark for a single stream
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bookmark {
    /// Field the watermark was taken from
    #[serde(default)]
    pub replication_key: String,

    /// Last-seen value of that field
    #[serde(default)]
    pub replication_key_value: Option<JsonValue>,

    /// Other per-stream keys (`progress_markers`, ...)
    #[serde(flatten)]
    pub extra: JsonObject,
}

impl Bookmark {
    /// Create a bookmark
    pub fn new(replication_key: impl Into<String>, value: JsonValue) -> Self {
        Self {
            replication_key: replication_key.into(),
            replication_key_value: Some(value),
            extra: JsonObject::new(),
        }
    }

    /// The watermark, falling back to the one recorded in `progress_markers`
    /// by an interrupted run
    pub fn value(&self) -> Option<&JsonValue> {
        let progress = || {
            self.extra
                .get("progress_markers")?
                .get("replication_key_value")
        };

        self.replication_key_value
            .as_ref()
            .filter(|v| !v.is_null())
            .or_else(|| progress().filter(|v| !v.is_null()))
    }
}

/// Order two cursor values.
///
/// Values that both resolve to an epoch compare numerically; anything else
/// falls back to comparing their string forms.
pub fn compare_cursor_values(a: &JsonValue, b: &JsonValue) -> Ordering {
    match (resolve_epoch(a), resolve_epoch(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        _ => cursor_string(a).cmp(&cursor_string(b)),
    }
}

fn cursor_string(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}
