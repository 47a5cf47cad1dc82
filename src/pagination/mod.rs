//! Pagination module
//!
//! Chargebee pages list endpoints with an opaque `next_offset` token. Its
//! presence in a response means more pages remain; its absence ends the
//! stream. A token repeated back-to-back is treated as a pagination loop.

mod strategies;
mod types;

pub use strategies::{OffsetTokenPaginator, NEXT_OFFSET_PATH};
pub use types::{NextPage, PaginationState, Paginator};
