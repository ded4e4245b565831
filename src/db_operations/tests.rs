use super::DbOperations;
use crate::auth::AccountId;
use crate::catalog::{RequestRecord, RequestType, Schedule, SchemaRecord, SchemaVersion};
use crate::permissions::{ConsumerLink, PermissionRecord};
use crate::registry::AppValidity;

fn test_db() -> (tempfile::TempDir, DbOperations) {
    let dir = tempfile::tempdir().expect("tempdir");
    let ops = DbOperations::open(dir.path()).expect("open db");
    (dir, ops)
}

#[test]
fn app_validity_upsert_overwrites() {
    let (_dir, ops) = test_db();
    let app = AccountId(10);

    ops.store_app_validity(&AppValidity {
        app,
        content_pointer: "p1".to_string(),
        is_valid: true,
    })
    .unwrap();
    ops.store_app_validity(&AppValidity {
        app,
        content_pointer: "p2".to_string(),
        is_valid: true,
    })
    .unwrap();

    let rows = ops.list_app_validities().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].content_pointer, "p2");
}

#[test]
fn permission_rows_are_scope_partitioned() {
    let (_dir, ops) = test_db();
    let user = AccountId(5);

    ops.store_permission(
        AccountId(1),
        &PermissionRecord {
            user,
            granted_level: 1,
        },
    )
    .unwrap();
    ops.store_permission(
        AccountId(2),
        &PermissionRecord {
            user,
            granted_level: 9,
        },
    )
    .unwrap();

    assert_eq!(
        ops.get_permission(AccountId(1), user).unwrap().unwrap().granted_level,
        1
    );
    assert_eq!(
        ops.get_permission(AccountId(2), user).unwrap().unwrap().granted_level,
        9
    );
    assert_eq!(ops.list_permissions_in_scope(AccountId(1)).unwrap().len(), 1);
}

#[test]
fn catalog_ids_are_sequential_from_zero() {
    let (_dir, ops) = test_db();

    let schema = |id| SchemaRecord {
        id,
        descriptor_pointer: "Qm".to_string(),
        version: SchemaVersion::Dev,
        schedule: Schedule::Daily,
        scheduled_price: 1,
        adhoc_price: 2,
    };
    let (first, _) = ops.insert_schema(schema).unwrap();
    let (second, _) = ops.insert_schema(schema).unwrap();
    assert_eq!((first, second), (0, 1));
    assert_eq!(ops.list_schemas().unwrap().len(), 2);
}

#[test]
fn request_rollback_restores_row_and_counter() {
    let (_dir, ops) = test_db();

    let request = |id| RequestRecord {
        id,
        provider: AccountId(3),
        schema_id: 0,
        request_type: RequestType::Scheduled,
        query_payload: "q".to_string(),
        price: 5,
        result_hash: String::new(),
        aggregation_pointer: String::new(),
        ts_created: None,
        ts_updated: None,
    };
    let (id, _) = ops.insert_request(request).unwrap();
    assert_eq!(ops.peek_next_request_id().unwrap(), id + 1);

    ops.rollback_request_insert(id).unwrap();
    assert!(ops.get_request(id).unwrap().is_none());
    assert_eq!(ops.peek_next_request_id().unwrap(), id);

    // The released id is handed out again
    let (reused, _) = ops.insert_request(request).unwrap();
    assert_eq!(reused, id);
}

#[test]
fn consumer_link_roundtrip() {
    let (_dir, ops) = test_db();
    let link = ConsumerLink {
        consumer: AccountId(42),
        data_pointer: "d".to_string(),
        merkle_root: "m".to_string(),
    };
    ops.store_consumer_link(&link).unwrap();
    assert_eq!(ops.get_consumer_link(AccountId(42)).unwrap().unwrap(), link);
    assert!(ops.get_consumer_link(AccountId(43)).unwrap().is_none());
}
