//! Shared schema for integration tests.
//!
//! Mirrors a small service configuration: a listener and a database, each
//! under its own key tag.

use serde::Deserialize;
use tagflag::Schema;

/// Listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Schema)]
pub struct Server {
    #[serde(rename = "port")]
    #[tagflag(default = "8080", usage = "listen port")]
    pub port: i64,
    #[serde(rename = "passport_key")]
    pub key: String,
}

/// Database settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Schema)]
pub struct Db {
    #[serde(rename = "host")]
    #[tagflag(default = "localhost")]
    pub host: String,
}

/// The end-to-end schema.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Schema)]
pub struct Config {
    #[serde(rename = "server")]
    pub server: Server,
    #[serde(rename = "db")]
    pub db: Db,
}

impl Config {
    /// The value decoded with nothing but declared defaults.
    pub fn defaults() -> Self {
        Self {
            server: Server {
                port: 8080,
                key: String::new(),
            },
            db: Db {
                host: "localhost".to_owned(),
            },
        }
    }
}
