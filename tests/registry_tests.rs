use datapact::{
    AccountId, DbOperations, GoverningAuthority, PactError, RecordingMeter, RegistryNode,
    ResourceMeter,
};
use std::sync::Arc;

const AUTHORITY: AccountId = AccountId(1);
const APP: AccountId = AccountId(100);

fn registry() -> (tempfile::TempDir, RegistryNode, Arc<RecordingMeter>) {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = Arc::new(DbOperations::open(dir.path()).expect("open db"));
    let meter = Arc::new(RecordingMeter::new());
    let node = RegistryNode::new(db, Arc::new(GoverningAuthority::new(AUTHORITY)))
        .with_meter(meter.clone() as Arc<dyn ResourceMeter>);
    (dir, node, meter)
}

#[test]
fn register_is_an_idempotent_upsert() {
    let (_dir, registry, _) = registry();

    registry
        .register_or_update(AUTHORITY, APP, "pointer-one".to_string())
        .unwrap();
    registry
        .register_or_update(AUTHORITY, APP, "pointer-two".to_string())
        .unwrap();

    let rows = registry.list_apps().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].content_pointer, "pointer-two");
    assert!(rows[0].is_valid);
}

#[test]
fn register_revalidates_an_invalidated_app() {
    let (_dir, registry, _) = registry();

    registry
        .register_or_update(AUTHORITY, APP, "pointer".to_string())
        .unwrap();
    registry.invalidate(AUTHORITY, APP).unwrap();
    assert!(!registry.is_app_valid(APP).unwrap());

    registry
        .register_or_update(AUTHORITY, APP, "pointer".to_string())
        .unwrap();
    assert!(registry.is_app_valid(APP).unwrap());
}

#[test]
fn invalidation_keeps_the_row() {
    let (_dir, registry, _) = registry();

    registry
        .register_or_update(AUTHORITY, APP, "pointer".to_string())
        .unwrap();
    registry.invalidate(AUTHORITY, APP).unwrap();

    let row = registry.get_app(APP).unwrap().expect("row retained");
    assert!(!row.is_valid);
    assert_eq!(row.content_pointer, "pointer");

    registry.approve(AUTHORITY, APP).unwrap();
    assert!(registry.is_app_valid(APP).unwrap());
}

#[test]
fn approve_and_invalidate_require_an_existing_row() {
    let (_dir, registry, _) = registry();

    let err = registry.approve(AUTHORITY, APP).unwrap_err();
    assert!(matches!(err, PactError::NotFound(_)));

    let err = registry.invalidate(AUTHORITY, APP).unwrap_err();
    assert!(matches!(err, PactError::NotFound(_)));
}

#[test]
fn unknown_app_is_not_valid() {
    let (_dir, registry, _) = registry();
    assert!(!registry.is_app_valid(APP).unwrap());
}

#[test]
fn only_the_governing_authority_mutates_the_registry() {
    let (_dir, registry, _) = registry();
    let outsider = AccountId(99);

    assert!(registry
        .register_or_update(outsider, APP, "pointer".to_string())
        .unwrap_err()
        .is_unauthorized());

    registry
        .register_or_update(AUTHORITY, APP, "pointer".to_string())
        .unwrap();
    assert!(registry.approve(outsider, APP).unwrap_err().is_unauthorized());
    assert!(registry
        .invalidate(outsider, APP)
        .unwrap_err()
        .is_unauthorized());
    assert!(registry
        .record_build(outsider, 1, "v1.0".to_string(), 1, "hash".to_string())
        .unwrap_err()
        .is_unauthorized());
}

#[test]
fn build_catalog_appends_sequential_ids() {
    let (_dir, registry, _) = registry();

    let first = registry
        .record_build(AUTHORITY, 1, "v1.0".to_string(), 1, "hash-a".to_string())
        .unwrap();
    let second = registry
        .record_build(AUTHORITY, 2, "v2.0".to_string(), 2, "hash-b".to_string())
        .unwrap();
    assert_eq!((first, second), (0, 1));

    let record = registry.get_build(1).unwrap().unwrap();
    assert_eq!(record.version_code, "v2.0");
    assert_eq!(record.binary_hash, "hash-b");
    assert!(registry.get_build(2).unwrap().is_none());
}

#[test]
fn registry_storage_bills_the_authority() {
    let (_dir, registry, meter) = registry();

    registry
        .register_or_update(AUTHORITY, APP, "pointer".to_string())
        .unwrap();
    registry
        .record_build(AUTHORITY, 1, "v1.0".to_string(), 1, "hash".to_string())
        .unwrap();

    assert_eq!(meter.payers_for("valid_apps"), vec![AUTHORITY]);
    assert_eq!(meter.payers_for("build_records"), vec![AUTHORITY]);
}
