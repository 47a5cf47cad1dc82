//! Tests for the resource table

use super::*;
use crate::error::Error;
use crate::schema::JsonType;
use crate::types::SyncMode;
use pretty_assertions::assert_eq;

// ============================================================================
// Built-in Table Tests
// ============================================================================

#[test]
fn test_builtin_table_has_all_resources() {
    let resources = load_resources().unwrap();
    let names: Vec<&str> = resources.iter().map(|r| r.name.as_str()).collect();

    assert_eq!(
        names,
        vec![
            "business_entities",
            "coupons",
            "credit_notes",
            "customers",
            "events",
            "gifts",
            "invoiced_unbilled_charges",
            "invoices",
            "items",
            "item_families",
            "item_prices",
            "orders",
            "payment_sources",
            "promotional_credits",
            "subscriptions",
            "transactions",
            "unbilled_charges",
            "virtual_bank_accounts",
        ]
    );
}

#[test]
fn test_builtin_primary_keys_declared() {
    for resource in load_resources().unwrap() {
        assert_eq!(resource.primary_keys, vec!["id".to_string()], "{}", resource.name);
        assert_eq!(
            resource.field("id").map(|f| f.field_type),
            Some(JsonType::String),
            "{}",
            resource.name
        );
    }
}

#[test]
fn test_builtin_replication_keys() {
    let resources = load_resources().unwrap();
    let key = |name: &str| {
        resources
            .iter()
            .find(|r| r.name == name)
            .and_then(|r| r.replication_key.clone())
    };

    assert_eq!(key("invoices").as_deref(), Some("updated_at"));
    assert_eq!(key("events").as_deref(), Some("occurred_at"));
    assert_eq!(key("promotional_credits").as_deref(), Some("created_at"));
    assert_eq!(key("subscriptions"), None);
    assert_eq!(key("customers"), None);
    assert_eq!(key("unbilled_charges"), None);
}

#[test]
fn test_builtin_records_paths() {
    for resource in load_resources().unwrap() {
        assert!(
            resource.records_path.starts_with("$.list[*]."),
            "{}: {}",
            resource.name,
            resource.records_path
        );
    }
}

#[test]
fn test_invoiced_unbilled_charges_shares_endpoint() {
    let resources = load_resources().unwrap();
    let find = |name: &str| resources.iter().find(|r| r.name == name).unwrap();

    let invoiced = find("invoiced_unbilled_charges");
    let unbilled = find("unbilled_charges");
    assert_eq!(invoiced.path, unbilled.path);
    assert_eq!(invoiced.records_path, "$.list[*].unbilled_charge");
}

#[test]
fn test_subscriptions_schema() {
    let resources = load_resources().unwrap();
    let subscriptions = resources.iter().find(|r| r.name == "subscriptions").unwrap();
    let schema = subscriptions.schema();

    assert_eq!(schema.properties.len(), subscriptions.fields.len());
    assert_eq!(
        schema.get_property("mrr").and_then(|p| p.primary_type()),
        Some(JsonType::Number)
    );
    assert_eq!(
        schema
            .get_property("subscription_items")
            .and_then(|p| p.items.as_ref())
            .and_then(|i| i.primary_type()),
        Some(JsonType::Object)
    );
}

#[test]
fn test_supported_sync_modes() {
    let resources = load_resources().unwrap();
    let modes = |name: &str| {
        resources
            .iter()
            .find(|r| r.name == name)
            .unwrap()
            .supported_sync_modes()
    };

    assert_eq!(
        modes("coupons"),
        vec![SyncMode::FullRefresh, SyncMode::Incremental]
    );
    assert_eq!(modes("gifts"), vec![SyncMode::FullRefresh]);
}

// ============================================================================
// Validation Tests
// ============================================================================

#[test]
fn test_default_primary_key() {
    let yaml = r#"
resources:
  - name: widgets
    path: /widgets
    records_path: "$.list[*].widget"
    fields:
      - { name: id, type: string }
"#;
    let resources = load_resources_from_str(yaml).unwrap();
    assert_eq!(resources[0].primary_keys, vec!["id".to_string()]);
    assert!(!resources[0].is_incremental());
}

#[test]
fn test_rejects_unknown_replication_key() {
    let yaml = r#"
resources:
  - name: widgets
    path: /widgets
    replication_key: modified_at
    records_path: "$.list[*].widget"
    fields:
      - { name: id, type: string }
      - { name: updated_at, type: integer }
"#;
    let err = load_resources_from_str(yaml).unwrap_err();
    assert!(
        matches!(err, Error::InvalidResource { ref resource, ref message }
            if resource == "widgets" && message.contains("modified_at"))
    );
}

#[test]
fn test_rejects_unknown_primary_key() {
    let yaml = r#"
resources:
  - name: widgets
    path: /widgets
    primary_keys: [widget_id]
    records_path: "$.list[*].widget"
    fields:
      - { name: id, type: string }
"#;
    assert!(matches!(
        load_resources_from_str(yaml),
        Err(Error::InvalidResource { .. })
    ));
}

#[test]
fn test_rejects_duplicate_names() {
    let yaml = r#"
resources:
  - name: widgets
    path: /widgets
    records_path: "$.list[*].widget"
    fields:
      - { name: id, type: string }
  - name: widgets
    path: /widgets_v2
    records_path: "$.list[*].widget"
    fields:
      - { name: id, type: string }
"#;
    let err = load_resources_from_str(yaml).unwrap_err();
    assert!(err.to_string().contains("duplicate"));
}

#[test]
fn test_rejects_relative_path() {
    let yaml = r#"
resources:
  - name: widgets
    path: widgets
    records_path: "$.list[*].widget"
    fields:
      - { name: id, type: string }
"#;
    assert!(load_resources_from_str(yaml).is_err());
}

#[test]
fn test_rejects_unknown_field_type() {
    let yaml = r#"
resources:
  - name: widgets
    path: /widgets
    records_path: "$.list[*].widget"
    fields:
      - { name: id, type: uuid }
"#;
    assert!(matches!(
        load_resources_from_str(yaml),
        Err(Error::YamlParse(_))
    ));
}
