//! Output module
//!
//! Singer message framing. Every message is one JSON object on its own line:
//!
//! ```text
//! {"type":"SCHEMA","stream":"invoices","schema":{...},"key_properties":["id"],"bookmark_properties":["updated_at"]}
//! {"type":"RECORD","stream":"invoices","record":{...},"time_extracted":"2024-05-01T12:00:00Z"}
//! {"type":"STATE","value":{"bookmarks":{...}}}
//! ```
//!
//! Logs never go to stdout; this module owns it.

mod message;
mod writer;

pub use message::Message;
pub use writer::{MessageSink, MessageWriter};
