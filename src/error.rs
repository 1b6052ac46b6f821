//! Typed error kinds for schema provisioning.
//!
//! Every failure in a provisioning run falls into one of three kinds:
//! a bad or missing external input (caught before any network activity),
//! a failure to establish the database connection, or a failed DDL
//! statement. There is no local recovery; callers propagate these up.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProvisionError {
    /// A required configuration key or external file (such as the TLS
    /// trust anchor) is missing. Raised before any connection attempt.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Transport or authentication failure while establishing the
    /// database connection. The driver error is preserved as the cause.
    #[error("connection error: {0}")]
    Connection(#[source] sqlx::Error),

    /// A DDL statement failed against an open connection. Carries a
    /// truncated preview of the statement text for the operator.
    #[error("statement failed ({preview}): {source}")]
    Statement {
        preview: String,
        #[source]
        source: sqlx::Error,
    },
}

impl ProvisionError {
    /// True when the error was raised before any network activity.
    pub fn is_configuration(&self) -> bool {
        matches!(self, ProvisionError::Configuration(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_names_the_input() {
        let err =
            ProvisionError::Configuration("TLS trust file not found: /tmp/ca.pem".to_string());
        assert!(err.is_configuration());
        assert!(err.to_string().contains("/tmp/ca.pem"));
    }

    #[test]
    fn test_statement_error_carries_preview() {
        let err = ProvisionError::Statement {
            preview: "CREATE TABLE IF NOT EXISTS users ...".to_string(),
            source: sqlx::Error::RowNotFound,
        };
        assert!(!err.is_configuration());
        assert!(err.to_string().contains("CREATE TABLE IF NOT EXISTS users"));
    }
}
