//! Tests for StateManager

use super::*;
use crate::error::Error;
use serde_json::json;
use tempfile::tempdir;

// ============================================================================
// Construction Tests
// ============================================================================

#[test]
fn test_state_manager_new() {
    let manager = StateManager::new("/tmp/test-state.json");
    assert!(!manager.is_in_memory());
    assert_eq!(manager.path().to_str().unwrap(), "/tmp/test-state.json");
}

#[test]
fn test_state_manager_in_memory() {
    let manager = StateManager::in_memory();
    assert!(manager.is_in_memory());
}

#[tokio::test]
async fn test_from_json() {
    let manager = StateManager::from_json(
        r#"{"bookmarks": {"events": {"replication_key": "occurred_at", "replication_key_value": 1690000000}}}"#,
    )
    .unwrap();

    assert!(manager.is_in_memory());
    assert_eq!(
        manager.bookmark_value("events").await,
        Some(json!(1_690_000_000))
    );
}

#[test]
fn test_from_invalid_json() {
    let err = StateManager::from_json("{not json").unwrap_err();
    assert!(matches!(err, Error::State { .. }));
}

#[tokio::test]
async fn test_from_blank_json() {
    let manager = StateManager::from_json("  ").unwrap();
    assert!(manager.snapshot().await.bookmarks.is_empty());
}

// ============================================================================
// Bookmark Tests
// ============================================================================

#[tokio::test]
async fn test_advance_bookmark() {
    let manager = StateManager::in_memory();

    assert!(manager.bookmark_value("invoices").await.is_none());
    assert!(manager
        .advance_bookmark("invoices", "updated_at", json!(1_700_000_000))
        .await
        .unwrap());
    assert!(!manager
        .advance_bookmark("invoices", "updated_at", json!(1_600_000_000))
        .await
        .unwrap());

    let bookmark = manager.get_bookmark("invoices").await.unwrap();
    assert_eq!(bookmark.replication_key, "updated_at");
    assert_eq!(bookmark.replication_key_value, Some(json!(1_700_000_000)));
}

#[tokio::test]
async fn test_clones_share_state() {
    let manager = StateManager::in_memory();
    let clone = manager.clone();

    clone
        .advance_bookmark("coupons", "updated_at", json!(10))
        .await
        .unwrap();

    assert_eq!(manager.bookmark_value("coupons").await, Some(json!(10)));
}

#[tokio::test]
async fn test_clear_stream() {
    let manager = StateManager::in_memory();
    manager
        .advance_bookmark("orders", "updated_at", json!(1))
        .await
        .unwrap();
    manager
        .advance_bookmark("items", "updated_at", json!(2))
        .await
        .unwrap();

    manager.clear_stream("orders").await.unwrap();

    assert!(manager.get_bookmark("orders").await.is_none());
    assert!(manager.get_bookmark("items").await.is_some());
}

// ============================================================================
// Persistence Tests
// ============================================================================

#[tokio::test]
async fn test_file_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");

    let manager = StateManager::from_file(&path).unwrap();
    manager
        .advance_bookmark("transactions", "updated_at", json!(1_700_000_500))
        .await
        .unwrap();

    // auto-save wrote the file on the bookmark change
    assert!(path.exists());
    assert!(!path.with_extension("tmp").exists());

    let reloaded = StateManager::from_file(&path).unwrap();
    assert_eq!(
        reloaded.bookmark_value("transactions").await,
        Some(json!(1_700_000_500))
    );
}

#[tokio::test]
async fn test_rewrite_keeps_unknown_keys() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(
        &path,
        r#"{
            "currently_syncing": "invoices",
            "bookmarks": {
                "invoices": {
                    "replication_key": "updated_at",
                    "replication_key_value": 1700000000,
                    "starting_replication_value": 1600000000
                }
            }
        }"#,
    )
    .unwrap();

    let manager = StateManager::from_file(&path).unwrap();
    assert!(manager
        .advance_bookmark("invoices", "updated_at", json!(1_700_000_500))
        .await
        .unwrap());

    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(
        saved,
        json!({
            "currently_syncing": "invoices",
            "bookmarks": {
                "invoices": {
                    "replication_key": "updated_at",
                    "replication_key_value": 1_700_000_500,
                    "starting_replication_value": 1_600_000_000
                }
            }
        })
    );
}

#[tokio::test]
async fn test_resumes_from_progress_markers() {
    let manager = StateManager::from_json(
        r#"{"bookmarks": {"invoices": {"progress_markers": {"replication_key": "updated_at", "replication_key_value": 1700000000}}}}"#,
    )
    .unwrap();

    assert_eq!(
        manager.bookmark_value("invoices").await,
        Some(json!(1_700_000_000))
    );
}

#[tokio::test]
async fn test_without_auto_save_needs_checkpoint() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");

    let manager = StateManager::without_auto_save(&path);
    manager
        .advance_bookmark("events", "occurred_at", json!(42))
        .await
        .unwrap();
    assert!(!path.exists());

    manager.checkpoint().await.unwrap();
    let contents = std::fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(
        value,
        json!({"bookmarks": {"events": {"replication_key": "occurred_at", "replication_key_value": 42}}})
    );
}

#[tokio::test]
async fn test_from_missing_file_starts_empty() {
    let dir = tempdir().unwrap();
    let manager = StateManager::from_file(dir.path().join("absent.json")).unwrap();
    assert!(manager.snapshot().await.bookmarks.is_empty());
}

#[test]
fn test_from_corrupt_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, "{\"bookmarks\": ").unwrap();

    assert!(matches!(
        StateManager::from_file(&path),
        Err(Error::State { .. })
    ));
}

#[tokio::test]
async fn test_in_memory_save_is_noop() {
    let manager = StateManager::in_memory();
    manager.save().await.unwrap();
    assert_eq!(manager.to_json().await.unwrap(), r#"{"bookmarks":{}}"#);
}
