//! Schema provisioning
//!
//! Applies the ordered table-creation statements and reports schema
//! status. Execution goes through the [`StatementExecutor`] seam so the
//! sequencing logic can be exercised without a live database.

use crate::database::connection::{ConnectionManager, META_TABLE_NAME};
use crate::database::schema::{SchemaDefinitions, SchemaStatus, SCHEMA_VERSION, TABLE_NAMES};
use crate::database::sql_preview;
use crate::error::ProvisionError;
use async_trait::async_trait;
use tracing::info;

/// Anything that can run a single DDL statement.
#[async_trait]
pub trait StatementExecutor {
    async fn execute_statement(&mut self, sql: &str) -> Result<(), ProvisionError>;
}

#[async_trait]
impl StatementExecutor for ConnectionManager {
    async fn execute_statement(&mut self, sql: &str) -> Result<(), ProvisionError> {
        ConnectionManager::execute_statement(self, sql).await
    }
}

/// Apply `statements` one by one, in the exact order given.
///
/// Order matters: each table must be created after every table it
/// references. The first failure propagates immediately; statements
/// after it are not attempted, and there is no rollback of statements
/// already committed. Success is "no error across the full sequence".
pub async fn provision<E>(executor: &mut E, statements: &[&str]) -> Result<(), ProvisionError>
where
    E: StatementExecutor + Send,
{
    let total = statements.len();
    for (idx, sql) in statements.iter().enumerate() {
        executor.execute_statement(sql).await?;
        info!("executed statement {}/{}: {}", idx + 1, total, sql_preview(sql));
    }
    Ok(())
}

/// Provision the full reservation schema and record the schema version.
///
/// Safe to run repeatedly: every statement is `CREATE TABLE IF NOT
/// EXISTS` and the version write is an upsert.
pub async fn initialize(manager: &mut ConnectionManager) -> Result<(), ProvisionError> {
    provision(manager, SchemaDefinitions::ordered_statements()).await?;
    manager
        .set_meta("schema_version", &SCHEMA_VERSION.to_string())
        .await?;
    info!("schema provisioned at version {}", SCHEMA_VERSION);
    Ok(())
}

/// Check the current schema status
pub async fn check_status(manager: &mut ConnectionManager) -> Result<SchemaStatus, ProvisionError> {
    if !manager.table_exists(META_TABLE_NAME).await? {
        return Ok(SchemaStatus::NotInitialized);
    }

    let current_version = manager.schema_version().await?;
    if current_version < SCHEMA_VERSION {
        return Ok(SchemaStatus::NeedsMigration {
            from: current_version,
            to: SCHEMA_VERSION,
        });
    }
    if current_version > SCHEMA_VERSION {
        return Ok(SchemaStatus::Incompatible {
            database_version: current_version,
            required_version: SCHEMA_VERSION,
        });
    }

    // version matches; verify every table is actually present
    for table in TABLE_NAMES {
        if !manager.table_exists(table).await? {
            return Ok(SchemaStatus::Corrupted);
        }
    }
    Ok(SchemaStatus::Current)
}
