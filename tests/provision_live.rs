//! End-to-end provisioning tests against a real MySQL endpoint.
//!
//! These tests are ignored by default because they need a reachable
//! server. To run them, point the `STAYDB_TEST_*` variables at a
//! disposable database and pass `--ignored`:
//!
//! ```text
//! STAYDB_TEST_HOST=... STAYDB_TEST_USER=... STAYDB_TEST_PASSWORD=... \
//! STAYDB_TEST_DATABASE=... STAYDB_TEST_SSL_CA=... \
//! cargo test --test provision_live -- --ignored
//! ```

use staydb::database::{check_status, initialize, ConnectionManager, SchemaStatus, TABLE_NAMES};
use staydb::StaydbConfig;

fn test_config() -> StaydbConfig {
    let get = |key: &str| {
        std::env::var(key)
            .unwrap_or_else(|_| panic!("{key} must be set for live provisioning tests"))
    };
    StaydbConfig {
        host: get("STAYDB_TEST_HOST"),
        port: std::env::var("STAYDB_TEST_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3306),
        user: get("STAYDB_TEST_USER"),
        password: get("STAYDB_TEST_PASSWORD"),
        database: get("STAYDB_TEST_DATABASE"),
        ssl_ca_path: get("STAYDB_TEST_SSL_CA"),
    }
}

#[tokio::test]
#[ignore = "requires a reachable MySQL endpoint, see module docs"]
async fn provisioning_is_idempotent_and_complete() {
    let mut manager = ConnectionManager::new(test_config());

    // applying the full ordered statement list twice must not error
    let first = initialize(&mut manager).await;
    let second = initialize(&mut manager).await;

    let mut tables_present = Vec::new();
    for table in TABLE_NAMES {
        tables_present.push((table, manager.table_exists(table).await));
    }
    let status = check_status(&mut manager).await;

    manager.disconnect().await;
    assert!(!manager.is_connected());

    first.unwrap();
    second.unwrap();
    for (table, present) in tables_present {
        assert!(
            present.unwrap(),
            "table `{table}` missing after provisioning"
        );
    }
    assert_eq!(status.unwrap(), SchemaStatus::Current);
}

#[tokio::test]
#[ignore = "requires a reachable MySQL endpoint, see module docs"]
async fn connect_is_idempotent() {
    let mut manager = ConnectionManager::new(test_config());

    let first = manager.connect().await;
    let second = manager.connect().await;

    manager.disconnect().await;

    first.unwrap();
    second.unwrap();
}
