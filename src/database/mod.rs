//! Database functionality: connection management, schema definitions,
//! and the provisioning sequence.

pub mod connection;
pub mod provisioner;
pub mod schema;

pub use connection::{ConnectionManager, META_TABLE_NAME};
pub use provisioner::{check_status, initialize, provision, StatementExecutor};
pub use schema::{SchemaDefinitions, SchemaStatus, SCHEMA_VERSION, TABLE_NAMES};

/// Collapse whitespace and truncate a SQL statement for log output.
pub fn sql_preview(sql: &str) -> String {
    const MAX_LEN: usize = 80;
    let flat = sql.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() > MAX_LEN {
        let truncated: String = flat.chars().take(MAX_LEN - 3).collect();
        format!("{truncated}...")
    } else {
        flat
    }
}
