//! Configuration schema for the `server_config` demo.
//!
//! Every keyed scalar below is settable as a flag (`--server-port`), an
//! environment variable (`SERVER_PORT`) or a key in `config.yml`
//! (`server.port`). `motd` has no key tag, so only the file can set it.

use serde::{Deserialize, Serialize};
use tagflag::{Loader, Schema};

pub mod error;

use error::{Result, ValidationError};

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Schema)]
pub struct Server {
    /// Port to listen on.
    #[serde(rename = "port")]
    #[tagflag(default = "8080")]
    pub port: u16,
    /// Key presented to upstream services.
    #[serde(rename = "passport_key")]
    pub key: String,
    /// Seconds to drain connections on shutdown.
    #[serde(rename = "grace_seconds")]
    #[tagflag(default = "30", usage = "seconds to drain connections on shutdown")]
    pub grace_seconds: u32,
    /// Serve HTTPS.
    #[serde(rename = "tls")]
    #[tagflag(usage = "serve HTTPS")]
    pub tls: bool,
}

/// Database connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Schema)]
pub struct Db {
    /// Database host name or address.
    #[serde(rename = "host")]
    #[tagflag(default = "localhost")]
    pub host: String,
    /// Maximum pooled connections.
    #[serde(rename = "pool_size")]
    #[tagflag(default = "8")]
    pub pool_size: u32,
}

/// Settings shared by every service, flattened into the top level.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Schema)]
pub struct Logging {
    /// Default `tracing` filter when `RUST_LOG` is unset.
    #[serde(rename = "log_level")]
    #[tagflag(default = "info")]
    pub log_level: String,
}

/// Top-level demo configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Schema)]
pub struct ServerConfig {
    /// Listener settings.
    #[serde(rename = "server")]
    pub server: Server,
    /// Database settings.
    #[serde(rename = "db")]
    pub db: Db,
    /// Logging settings.
    #[serde(flatten)]
    pub logging: Logging,
    /// Banner printed at start-up; file only.
    pub motd: String,
}

impl ServerConfig {
    /// Reject settings that decode but cannot run.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.server.port == 0 {
            return Err(ValidationError::ZeroPort);
        }
        if self.db.host.trim().is_empty() {
            return Err(ValidationError::BlankDbHost);
        }
        if self.db.pool_size == 0 {
            return Err(ValidationError::EmptyPool);
        }
        Ok(())
    }
}

/// Loader shared by the demo binaries.
#[must_use]
pub fn loader() -> Loader {
    Loader::new("server_config")
        .about("Loads server settings from flags, environment and config.yml")
        .version(env!("CARGO_PKG_VERSION"))
}

/// Load and validate the configuration from the process environment.
///
/// # Errors
///
/// Returns configuration or validation failures.
pub fn load() -> Result<ServerConfig> {
    let config: ServerConfig = loader().load()?;
    config.validate()?;
    Ok(config)
}
