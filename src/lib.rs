#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

//! staydb - schema provisioning for the stay-reservation application
//!
//! staydb connects to a managed MySQL endpoint over TLS and applies the
//! fixed, ordered set of `CREATE TABLE IF NOT EXISTS` statements that
//! make up the reservation schema (users, properties, rooms,
//! reservations, reviews, notifications). It can be used as a
//! command-line application or as a library.
//!
//! # Architecture
//!
//! - **[`config`]**: externally supplied connection settings (TOML file
//!   layered under `STAYDB_*` environment variables)
//! - **[`database`]**: connection management, schema definitions, and
//!   the provisioning sequence
//! - **[`error`]**: the three provisioning error kinds
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use staydb::database::{initialize, ConnectionManager};
//! use staydb::StaydbConfig;
//!
//! let config = StaydbConfig::new(&None)?;
//! let mut manager = ConnectionManager::new(config);
//!
//! let result = initialize(&mut manager).await;
//! // release the connection on every exit path
//! manager.disconnect().await;
//! result?;
//! ```

pub mod config;
pub mod database;
pub mod error;

pub use config::StaydbConfig;
pub use error::ProvisionError;

pub use database::{
    check_status, initialize, provision, ConnectionManager, SchemaDefinitions, SchemaStatus,
    StatementExecutor, SCHEMA_VERSION, TABLE_NAMES,
};
