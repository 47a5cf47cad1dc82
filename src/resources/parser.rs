//! YAML parser for the resource table

use super::types::{ResourceDefinition, ResourceTable};
use crate::error::{Error, Result};
use std::collections::HashSet;

/// The built-in Chargebee resource table
pub const RESOURCES_YAML: &str = include_str!("../../resources/chargebee.yaml");

/// Load the built-in resource definitions
pub fn load_resources() -> Result<Vec<ResourceDefinition>> {
    load_resources_from_str(RESOURCES_YAML)
}

/// Load resource definitions from a YAML string
pub fn load_resources_from_str(yaml: &str) -> Result<Vec<ResourceDefinition>> {
    let table: ResourceTable = serde_yaml::from_str(yaml)?;

    let mut seen = HashSet::new();
    for resource in &table.resources {
        if !seen.insert(resource.name.as_str()) {
            return Err(Error::invalid_resource(
                &resource.name,
                "duplicate stream name",
            ));
        }
        validate_resource(resource)?;
    }

    Ok(table.resources)
}

/// Validate a single resource definition
fn validate_resource(resource: &ResourceDefinition) -> Result<()> {
    let invalid = |message: String| Error::invalid_resource(&resource.name, message);

    if resource.name.is_empty() {
        return Err(Error::config("Resource name cannot be empty"));
    }

    if !resource.path.starts_with('/') {
        return Err(invalid(format!(
            "path must start with '/', got '{}'",
            resource.path
        )));
    }

    if !resource.records_path.starts_with('$') {
        return Err(invalid(format!(
            "records_path must be a JSONPath, got '{}'",
            resource.records_path
        )));
    }

    if resource.fields.is_empty() {
        return Err(invalid("no fields declared".to_string()));
    }

    if resource.primary_keys.is_empty() {
        return Err(invalid("no primary key declared".to_string()));
    }

    for key in &resource.primary_keys {
        if !resource.has_field(key) {
            return Err(invalid(format!("primary key '{key}' is not a declared field")));
        }
    }

    if let Some(key) = &resource.replication_key {
        if !resource.has_field(key) {
            return Err(invalid(format!(
                "replication key '{key}' is not a declared field"
            )));
        }
    }

    Ok(())
}
