//! Resource definitions
//!
//! The Chargebee resources this tap extracts are plain data: a name, a list
//! endpoint, keys, a records path and a declared field list. They live in an
//! embedded YAML table and are parsed once when the tap starts.

mod parser;
mod types;

pub use parser::{load_resources, load_resources_from_str, RESOURCES_YAML};
pub use types::{ResourceDefinition, ResourceTable};

#[cfg(test)]
mod tests;
