//! Response decoder module
//!
//! Chargebee list responses wrap each record under its resource name:
//! `{"list": [{"invoice": {...}}, ...], "next_offset": "..."}`. The decoder
//! pulls the records out with a JSONPath such as `$.list[*].invoice`.

mod decoders;

pub use decoders::{extract_scalar, JsonDecoder};
