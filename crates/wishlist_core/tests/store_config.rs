use std::path::PathBuf;
use std::time::Duration;
use wishlist_core::{RepoError, SchemaPolicy, StoreConfig, StoreLocation, WishlistApp};

#[test]
fn store_config_deserializes_with_defaults() {
    let config: StoreConfig =
        serde_json::from_str(r#"{"location": {"kind": "file", "path": "/tmp/wish.db"}}"#).unwrap();
    assert_eq!(
        config.location,
        StoreLocation::File(PathBuf::from("/tmp/wish.db"))
    );
    assert_eq!(config.busy_timeout_ms, 5_000);
    assert_eq!(config.schema_policy, SchemaPolicy::BestEffort);

    let config: StoreConfig = serde_json::from_str(
        r#"{"location": {"kind": "memory"}, "busy_timeout_ms": 50, "schema_policy": "atomic"}"#,
    )
    .unwrap();
    assert_eq!(config.location, StoreLocation::Memory);
    assert_eq!(config.busy_timeout(), Duration::from_millis(50));
    assert_eq!(config.schema_policy, SchemaPolicy::Atomic);
}

#[test]
fn locked_store_times_out_instead_of_blocking() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shared.db");

    let mut holder = WishlistApp::open(&StoreConfig::file(&path)).unwrap();
    holder.ensure_schema().unwrap();
    let report = holder.seed_initial_data().unwrap();

    let config = StoreConfig::file(&path).with_busy_timeout(Duration::from_millis(50));
    let mut contender = WishlistApp::open(&config).unwrap();
    contender.ensure_schema().unwrap();

    holder
        .store()
        .connection()
        .unwrap()
        .execute_batch("BEGIN IMMEDIATE;")
        .unwrap();

    let err = contender
        .toggle_membership(report.wishlist_id.unwrap(), report.product_ids[0], false)
        .unwrap_err();
    assert!(matches!(err, RepoError::Transaction(_)));

    holder
        .store()
        .connection()
        .unwrap()
        .execute_batch("ROLLBACK;")
        .unwrap();
    assert!(contender
        .toggle_membership(report.wishlist_id.unwrap(), report.product_ids[0], false)
        .unwrap()
        .mutated());
}
