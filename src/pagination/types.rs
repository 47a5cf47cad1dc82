//! Pagination types and traits
//!
//! Defines the core pagination abstractions used by all strategies.

use crate::error::Result;
use serde_json::Value;

/// Result of the next page computation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    /// More pages available, request the next one with this token
    Continue {
        /// Opaque page token sent back as `offset`
        token: String,
    },
    /// No more pages
    Done,
}

impl NextPage {
    /// Create a continuation
    pub fn with_token(token: impl Into<String>) -> Self {
        Self::Continue {
            token: token.into(),
        }
    }

    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Check if this is a continue result
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue { .. })
    }
}

/// Tracks pagination state for one stream during one run.
///
/// Tokens are never persisted across runs.
#[derive(Debug, Clone, Default)]
pub struct PaginationState {
    /// Stream being paginated
    pub stream: String,
    /// Token for the next request (None on the first page)
    pub token: Option<String>,
    /// Pages processed so far
    pub pages: u32,
    /// Total records fetched so far
    pub total_fetched: u64,
    /// Is pagination complete?
    pub done: bool,
}

impl PaginationState {
    /// Create a new pagination state for a stream
    pub fn new(stream: impl Into<String>) -> Self {
        Self {
            stream: stream.into(),
            ..Default::default()
        }
    }

    /// Current page token, if any
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Mark pagination as complete
    pub fn mark_done(&mut self) {
        self.done = true;
    }

    /// Record a processed page
    pub fn add_page(&mut self, records: usize) {
        self.pages += 1;
        self.total_fetched += records as u64;
    }

    /// Set the token for the next request
    pub fn set_token(&mut self, token: String) {
        self.token = Some(token);
    }
}

/// Core trait for pagination strategies
pub trait Paginator: Send + Sync {
    /// Process a response body and determine if there's a next page
    fn process_response(
        &self,
        body: &Value,
        records_count: usize,
        state: &mut PaginationState,
    ) -> Result<NextPage>;
}
