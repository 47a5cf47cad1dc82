//! Record schema module
//!
//! Declared field schemas for resources and top-level record conformance.
//!
//! # Features
//!
//! - **Field Declarations**: Ordered `name → type` lists loaded from the resource table
//! - **JSON Schema Output**: Nullable JSON Schema documents for SCHEMA messages and discovery
//! - **Conformance**: Drops undeclared keys and coerces primitives at the top level only

mod conform;
mod types;

pub use conform::{coerce_value, conform_record, Conformed};
pub use types::{Field, JsonSchema, JsonType, JsonTypeOrArray, SchemaProperty};
