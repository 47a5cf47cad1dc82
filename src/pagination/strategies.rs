//! Pagination strategy implementations

use super::types::{NextPage, PaginationState, Paginator};
use crate::decode::extract_scalar;
use crate::error::{Error, Result};
use serde_json::Value;

/// JSONPath of the page token in Chargebee list responses
pub const NEXT_OFFSET_PATH: &str = "$.next_offset";

/// Token pagination driven by a value in the response body.
///
/// Chargebee list endpoints return `next_offset` while more pages remain and
/// omit it on the last page. The token is opaque and sent back verbatim as
/// the `offset` query parameter.
#[derive(Debug, Clone)]
pub struct OffsetTokenPaginator {
    /// JSONPath to extract the token from the response
    pub token_path: String,
}

impl Default for OffsetTokenPaginator {
    fn default() -> Self {
        Self::new(NEXT_OFFSET_PATH)
    }
}

impl OffsetTokenPaginator {
    /// Create a new token paginator
    pub fn new(token_path: impl Into<String>) -> Self {
        Self {
            token_path: token_path.into(),
        }
    }

    /// Read the next page token from a response body
    pub fn next_token(&self, body: &Value) -> Option<String> {
        extract_scalar(body, &self.token_path).filter(|t| !t.is_empty())
    }
}

impl Paginator for OffsetTokenPaginator {
    fn process_response(
        &self,
        body: &Value,
        records_count: usize,
        state: &mut PaginationState,
    ) -> Result<NextPage> {
        state.add_page(records_count);

        let Some(token) = self.next_token(body) else {
            state.mark_done();
            return Ok(NextPage::Done);
        };

        if state.token() == Some(token.as_str()) {
            return Err(Error::pagination(
                &state.stream,
                format!("API returned the same next_offset twice ({token})"),
            ));
        }

        state.set_token(token.clone());
        Ok(NextPage::with_token(token))
    }
}
