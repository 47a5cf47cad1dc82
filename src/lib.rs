// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # tap-chargebee
//!
//! Extracts billing data from a Chargebee site and writes it to stdout as
//! Singer messages (SCHEMA, RECORD, STATE), one JSON object per line.
//!
//! ## Features
//!
//! - **18 Resources**: Subscriptions, invoices, customers, events and more,
//!   declared in `resources/chargebee.yaml`
//! - **Incremental Sync**: `updated_at`/`occurred_at` bookmarks that never move backwards
//! - **Offset Pagination**: Follows `next_offset` until the API stops returning one
//! - **Retry and Rate Limiting**: Exponential backoff on 429/5xx, optional requests-per-second cap
//! - **Resumable State**: Bookmarks checkpointed to a state file after every stream
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tap_chargebee::{SyncConfig, StateManager, Tap, TapConfig, MessageWriter};
//!
//! #[tokio::main]
//! async fn main() -> tap_chargebee::Result<()> {
//!     let tap = Tap::new(TapConfig::new("live_...", "acme"))?;
//!     tap.check().await?;
//!
//!     let state = StateManager::from_file("state.json")?;
//!     let mut writer = MessageWriter::new(std::io::stdout().lock());
//!     tap.sync(&["invoices"], state, SyncConfig::default(), &mut writer).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                             Tap                                 │
//! │  check() → ()    catalog() → Catalog    sync(streams, state)    │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────┬───────────┬───────┴───────┬───────────┬─────────────┐
//! │ Resources│  Stream   │    Engine     │   State   │   Output    │
//! ├──────────┼───────────┼───────────────┼───────────┼─────────────┤
//! │ YAML     │ URL/params│ Page loop     │ Bookmarks │ SCHEMA      │
//! │ Fields   │ Lower     │ next_offset   │ Checkpoint│ RECORD      │
//! │ Keys     │  bound    │ Max records   │ Atomic    │ STATE       │
//! │          │ Conform   │               │  save     │             │
//! └──────────┴───────────┴───────────────┴───────────┴─────────────┘
//!         HTTP: Basic auth · Retry · Backoff · Rate limit
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Authentication
pub mod auth;

/// HTTP client with retry and rate limiting
pub mod http;

/// Pagination
pub mod pagination;

/// Response decoding
pub mod decode;

/// Cursor value parsing
pub mod cursor;

/// JSON schemas and record conformance
pub mod schema;

/// Resource definitions
pub mod resources;

/// Bookmark state and checkpointing
pub mod state;

/// Singer message output
pub mod output;

/// Tap configuration
pub mod config;

/// Per-resource stream behavior
pub mod stream;

/// Sync engine
pub mod engine;

/// Discovered and configured catalogs
pub mod catalog;

/// Tap entry point
pub mod tap;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use catalog::{Catalog, ConfiguredCatalog};
pub use config::TapConfig;
pub use engine::{SyncConfig, SyncEngine, SyncStats};
pub use output::{Message, MessageSink, MessageWriter};
pub use state::StateManager;
pub use stream::ChargebeeStream;
pub use tap::Tap;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
