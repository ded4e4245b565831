use datapact::{AccountId, AppNode, DbOperations, InMemoryDirectory, NodeConfig};
use std::sync::Arc;

#[test]
fn node_built_from_config_applies_the_deployment_variant() {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("store");
    let config_path = dir.path().join("node.toml");

    std::fs::write(
        &config_path,
        format!(
            r#"
            db_path = "{}"
            app_account = 100
            governing_authority = 100
            consent_mode = "owner_managed"
            schema_delegates = [7]
            "#,
            db_path.display()
        ),
    )
    .unwrap();

    let config = NodeConfig::load(&config_path).unwrap();
    let db = Arc::new(DbOperations::open(&config.db_path).unwrap());
    let node = AppNode::new(&config, db, Arc::new(InMemoryDirectory::new())).unwrap();

    let owner = AccountId(100);
    let user = AccountId(5);
    let scope = AccountId(200);

    // Owner-managed consent came from the config
    node.set_permission(owner, user, scope, 2).unwrap();
    assert_eq!(
        node.get_permission(user, scope).unwrap().unwrap().granted_level,
        2
    );

    // So did the schema delegation
    let id = node
        .add_schema(AccountId(7), "Qm".to_string(), 0, 1, 10, 50)
        .unwrap();
    assert_eq!(id, 0);
}

#[test]
fn missing_config_file_is_an_error() {
    assert!(NodeConfig::load("/nonexistent/node.toml").is_err());
}
