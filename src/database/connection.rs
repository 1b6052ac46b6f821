//! Database connection management
//!
//! This module provides the connection wrapper used for schema
//! provisioning: one TLS connection to the MySQL endpoint, opened
//! lazily and owned for the duration of the run.

use crate::config::StaydbConfig;
use crate::database::sql_preview;
use crate::error::ProvisionError;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlSslMode};
use sqlx::{Connection, Executor};
use std::path::Path;
use tracing::{info, warn};

/// Name of the key/value metadata table
pub const META_TABLE_NAME: &str = "staydb_meta";

/// Manages the single connection to the reservation database.
///
/// The manager moves between two states: disconnected (initial) and
/// connected. `connect` is idempotent, `disconnect` is a no-op when
/// already closed, and a failed connect never leaves a half-open
/// handle behind.
pub struct ConnectionManager {
    config: StaydbConfig,
    conn: Option<MySqlConnection>,
}

impl ConnectionManager {
    pub fn new(config: StaydbConfig) -> Self {
        Self { config, conn: None }
    }

    /// Establish the database connection.
    ///
    /// No-op when an open connection is still healthy (verified with a
    /// ping); a stale handle is discarded and reopened. The TLS trust
    /// file must exist on disk before any network activity, otherwise
    /// this fails with a `Configuration` error naming the path.
    pub async fn connect(&mut self) -> Result<(), ProvisionError> {
        self.active_conn().await.map(|_| ())
    }

    /// Close the connection if one is open; no-op otherwise.
    pub async fn disconnect(&mut self) {
        if let Some(conn) = self.conn.take() {
            if let Err(e) = conn.close().await {
                warn!("error while closing database connection: {}", e);
            }
            info!("database connection closed");
        }
    }

    /// Whether a connection handle is currently held
    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    /// Execute a single DDL statement, connecting first if necessary.
    ///
    /// MySQL commits each DDL statement on its own; no transaction ever
    /// spans statements, so a prior statement stays committed even when
    /// a later one fails.
    pub async fn execute_statement(&mut self, sql: &str) -> Result<(), ProvisionError> {
        let conn = self.active_conn().await?;
        conn.execute(sql).await.map_err(|e| ProvisionError::Statement {
            preview: sql_preview(sql),
            source: e,
        })?;
        Ok(())
    }

    /// Check if a table exists in the configured database
    pub async fn table_exists(&mut self, table: &str) -> Result<bool, ProvisionError> {
        let database = self.config.database.clone();
        let conn = self.active_conn().await?;
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM information_schema.tables \
             WHERE table_schema = ? AND table_name = ?",
        )
        .bind(&database)
        .bind(table)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| ProvisionError::Statement {
            preview: format!("table existence check for `{table}`"),
            source: e,
        })?;
        Ok(count > 0)
    }

    /// Set a metadata value
    pub async fn set_meta(&mut self, key: &str, value: &str) -> Result<(), ProvisionError> {
        let conn = self.active_conn().await?;
        sqlx::query(
            "INSERT INTO staydb_meta (meta_key, meta_value) VALUES (?, ?) \
             ON DUPLICATE KEY UPDATE meta_value = VALUES(meta_value)",
        )
        .bind(key)
        .bind(value)
        .execute(&mut *conn)
        .await
        .map_err(|e| ProvisionError::Statement {
            preview: format!("meta write for `{key}`"),
            source: e,
        })?;
        Ok(())
    }

    /// Get a metadata value
    pub async fn get_meta(&mut self, key: &str) -> Result<Option<String>, ProvisionError> {
        let conn = self.active_conn().await?;
        sqlx::query_scalar("SELECT meta_value FROM staydb_meta WHERE meta_key = ?")
            .bind(key)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| ProvisionError::Statement {
                preview: format!("meta read for `{key}`"),
                source: e,
            })
    }

    /// Get the schema version recorded in the meta table (0 when unset)
    pub async fn schema_version(&mut self) -> Result<u32, ProvisionError> {
        let version = self.get_meta("schema_version").await?.unwrap_or_default();
        Ok(version.parse().unwrap_or(0))
    }

    /// Return the open connection, establishing it first if needed.
    async fn active_conn(&mut self) -> Result<&mut MySqlConnection, ProvisionError> {
        let conn = match self.conn.take() {
            Some(mut conn) => {
                if conn.ping().await.is_ok() {
                    conn
                } else {
                    // stale handle, reopen
                    let _ = conn.close().await;
                    self.open().await?
                }
            }
            None => self.open().await?,
        };
        Ok(self.conn.insert(conn))
    }

    /// Open a fresh TLS connection, verifying preconditions first
    async fn open(&self) -> Result<MySqlConnection, ProvisionError> {
        let ca_path = Path::new(&self.config.ssl_ca_path);
        if !ca_path.is_file() {
            return Err(ProvisionError::Configuration(format!(
                "TLS trust file not found: {}",
                self.config.ssl_ca_path
            )));
        }

        let options = MySqlConnectOptions::new()
            .host(&self.config.host)
            .port(self.config.port)
            .username(&self.config.user)
            .password(&self.config.password)
            .database(&self.config.database)
            .ssl_mode(MySqlSslMode::VerifyCa)
            .ssl_ca(ca_path);

        let conn = MySqlConnection::connect_with(&options)
            .await
            .map_err(ProvisionError::Connection)?;
        info!(
            "connected to database {} at {}:{}",
            self.config.database, self.config.host, self.config.port
        );
        Ok(conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_ca(ssl_ca_path: &str) -> StaydbConfig {
        StaydbConfig {
            host: "db.invalid".to_string(),
            port: 3306,
            user: "app".to_string(),
            password: "secret".to_string(),
            database: "stayapp".to_string(),
            ssl_ca_path: ssl_ca_path.to_string(),
        }
    }

    #[tokio::test]
    async fn test_connect_fails_before_network_when_ca_missing() {
        // host is unresolvable, so reaching the network would surface a
        // Connection error; the Configuration kind proves the trust-file
        // check fired first.
        let mut manager = ConnectionManager::new(config_with_ca("/nonexistent/ca.pem"));
        let err = manager.connect().await.unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("/nonexistent/ca.pem"));
        assert!(!manager.is_connected());
    }

    #[tokio::test]
    async fn test_execute_statement_surfaces_connect_precondition() {
        let mut manager = ConnectionManager::new(config_with_ca("/nonexistent/ca.pem"));
        let err = manager
            .execute_statement("CREATE TABLE IF NOT EXISTS t (id INT)")
            .await
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[tokio::test]
    async fn test_disconnect_is_noop_when_closed() {
        let mut manager = ConnectionManager::new(config_with_ca("/nonexistent/ca.pem"));
        manager.disconnect().await;
        manager.disconnect().await;
        assert!(!manager.is_connected());
    }

    #[tokio::test]
    async fn test_failed_connect_leaves_no_handle() {
        let mut manager = ConnectionManager::new(config_with_ca("/nonexistent/ca.pem"));
        let _ = manager.connect().await;
        assert!(!manager.is_connected());
        // cleanup after a failed connect must not error or hang
        manager.disconnect().await;
    }
}
