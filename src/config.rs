use crate::error::ProvisionError;
use config::Config;
use std::collections::HashMap;
use std::path::Path;

/// Connection settings for the target database.
///
/// All values are supplied externally, never embedded in the binary:
/// a TOML configuration file layered under `STAYDB_*` environment
/// variables. Credentials have no defaults.
#[derive(Debug, Clone)]
pub struct StaydbConfig {
    /// Database server hostname
    pub host: String,

    /// Database server port (default: 3306)
    pub port: u16,

    /// Account used to authenticate
    pub user: String,

    /// Password for the account
    pub password: String,

    /// Name of the database holding the reservation schema
    pub database: String,

    /// Path to the certificate-authority file used to verify the
    /// server identity during TLS setup
    pub ssl_ca_path: String,
}

const EMPTY_CONFIG: &str = r#"### staydb configuration file

### every value can also be supplied via a STAYDB_* environment variable,
### e.g. STAYDB_PASSWORD overrides `password`

# host = "example.mysql.database.azure.com"
# port = 3306
# user = "staydb"
# password = ""
# database = "stayapp"
# ssl_ca_path = "/etc/ssl/certs/DigiCertGlobalRootCA.crt.pem"
"#;

const DEFAULT_PORT: u16 = 3306;

impl StaydbConfig {
    /// Load configuration from a TOML file and the environment.
    ///
    /// When `path` is `None`, `$HOME/.staydb/staydb.toml` is used; a
    /// commented template is written there on first run. Environment
    /// variables with the `STAYDB_` prefix override file values.
    pub fn new(path: &Option<String>) -> Result<StaydbConfig, ProvisionError> {
        let mut builder = Config::builder();

        match path {
            Some(p) => {
                let path = Path::new(p.as_str());
                if !path.exists() {
                    return Err(ProvisionError::Configuration(format!(
                        "config file not found: {p}"
                    )));
                }
                builder = builder.add_source(config::File::with_name(p.as_str()));
            }
            None => {
                let staydb_dir = Self::config_dir()?;
                std::fs::create_dir_all(staydb_dir.as_str()).map_err(|e| {
                    ProvisionError::Configuration(format!(
                        "unable to create config directory {staydb_dir}: {e}"
                    ))
                })?;
                let p = format!("{staydb_dir}/staydb.toml");
                if Path::new(p.as_str()).exists() {
                    builder = builder.add_source(config::File::with_name(p.as_str()));
                } else {
                    std::fs::write(p.as_str(), EMPTY_CONFIG).map_err(|e| {
                        ProvisionError::Configuration(format!(
                            "unable to create config file {p}: {e}"
                        ))
                    })?;
                }
            }
        }

        // Settings from the environment (with a prefix of STAYDB) take
        // precedence over the file, e.g. `STAYDB_HOST=db.internal staydb provision`
        builder = builder.add_source(config::Environment::with_prefix("STAYDB"));

        let settings = builder.build().map_err(|e| {
            ProvisionError::Configuration(format!("failed to build configuration: {e}"))
        })?;

        let values = settings
            .try_deserialize::<HashMap<String, String>>()
            .map_err(|e| {
                ProvisionError::Configuration(format!("failed to deserialize configuration: {e}"))
            })?;

        let port = match values.get("port") {
            Some(p) => p.parse::<u16>().map_err(|_| {
                ProvisionError::Configuration(format!("port is not a valid number: {p}"))
            })?,
            None => DEFAULT_PORT,
        };

        Ok(StaydbConfig {
            host: required(&values, "host")?,
            port,
            user: required(&values, "user")?,
            password: required(&values, "password")?,
            database: required(&values, "database")?,
            ssl_ca_path: required(&values, "ssl_ca_path")?,
        })
    }

    /// Get the default config file path
    pub fn config_file_path() -> String {
        let home_dir = dirs::home_dir()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|| "~".to_string());
        format!("{home_dir}/.staydb/staydb.toml")
    }

    fn config_dir() -> Result<String, ProvisionError> {
        let home_dir = dirs::home_dir()
            .ok_or_else(|| ProvisionError::Configuration("could not find home directory".into()))?;
        let home_str = home_dir.to_str().ok_or_else(|| {
            ProvisionError::Configuration("could not convert home directory path to string".into())
        })?;
        Ok(format!("{home_str}/.staydb"))
    }

    /// Display configuration summary with the password redacted
    pub fn summary(&self) -> String {
        let lines = vec![
            format!("Host:           {}", self.host),
            format!("Port:           {}", self.port),
            format!("User:           {}", self.user),
            "Password:       ********".to_string(),
            format!("Database:       {}", self.database),
            format!("TLS trust file: {}", self.ssl_ca_path),
        ];
        lines.join("\n")
    }
}

fn required(values: &HashMap<String, String>, key: &str) -> Result<String, ProvisionError> {
    values.get(key).cloned().ok_or_else(|| {
        ProvisionError::Configuration(format!("missing required configuration key: {key}"))
    })
}
