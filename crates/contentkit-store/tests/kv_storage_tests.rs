#![allow(clippy::unwrap_used, clippy::expect_used)]

use contentkit_core::analytics::MemoryAnalyticsSink;
use contentkit_core::identity::StorageIdentity;
use contentkit_core::storage::{assignment_key, KeyValueStorage, MemoryStorage};
use contentkit_core::{AbTest, VariantAssigner};
use contentkit_store::migrations::{applied_migrations, apply_migrations, get_migrations};
use contentkit_store::SqliteStorage;
use rusqlite::Connection;
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

#[test]
fn test_values_persist_across_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state").join("contentkit.db");

    let storage = SqliteStorage::open(&path).unwrap();
    storage.set("analytics_user_id", "user_123").unwrap();
    storage.set("analytics_user_id", "user_456").unwrap();
    drop(storage);

    let reopened = SqliteStorage::open(&path).unwrap();
    assert_eq!(
        reopened.get("analytics_user_id").unwrap().as_deref(),
        Some("user_456")
    );
    reopened.remove("analytics_user_id").unwrap();
    assert_eq!(reopened.get("analytics_user_id").unwrap(), None);
}

#[test]
fn test_assignment_sticks_across_processes() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("contentkit.db");
    let test: AbTest = serde_json::from_value(json!({
        "id": "cta",
        "name": "CTA wording",
        "variants": [
            {"id": "a", "name": "A", "weight": 1},
            {"id": "b", "name": "B", "weight": 1}
        ]
    }))
    .unwrap();

    let run = || {
        let durable: Arc<dyn KeyValueStorage> = Arc::new(SqliteStorage::open(&path).unwrap());
        let identity = StorageIdentity::new(durable.clone(), Arc::new(MemoryStorage::new()));
        VariantAssigner::new(durable, Arc::new(identity), Arc::new(MemoryAnalyticsSink::new()))
            .get_variant(&test)
            .unwrap()
            .unwrap()
            .id
    };

    let first = run();
    let second = run();
    assert_eq!(first, second);

    let storage = SqliteStorage::open(&path).unwrap();
    assert_eq!(storage.get(&assignment_key("cta")).unwrap(), Some(first));
}

#[test]
fn test_migrations_record_checksums() {
    let mut conn = Connection::open_in_memory().unwrap();
    apply_migrations(&mut conn).unwrap();

    let ids = applied_migrations(&conn).unwrap();
    let expected: Vec<String> = get_migrations().iter().map(|m| m.id.to_string()).collect();
    assert_eq!(ids, expected);

    let checksum: String = conn
        .query_row(
            "SELECT checksum FROM schema_version WHERE migration_id = '001_kv_store'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(checksum.len(), 64);
}

#[test]
fn test_tampered_checksum_is_rejected() {
    let mut conn = Connection::open_in_memory().unwrap();
    apply_migrations(&mut conn).unwrap();
    conn.execute(
        "UPDATE schema_version SET checksum = 'deadbeef' WHERE migration_id = '001_kv_store'",
        [],
    )
    .unwrap();

    let err = apply_migrations(&mut conn).unwrap_err();
    assert!(err.message().contains("Checksum mismatch"));
}
