//! Attribute-driven command-line flags layered over environment variables
//! and a configuration file.
//!
//! Derive [`Schema`] alongside `serde::Deserialize` on a configuration
//! struct. Every scalar field with a key tag (`#[serde(rename = "...")]`)
//! becomes a long flag named after its dotted key path, with dots and
//! underscores turned into dashes. Nested structs extend the path.
//!
//! ```rust,no_run
//! use serde::Deserialize;
//! use tagflag::Schema;
//!
//! #[derive(Debug, Deserialize, Schema)]
//! struct Server {
//!     #[serde(rename = "port")]
//!     #[tagflag(default = "8080", usage = "listen port")]
//!     port: u16,
//!     #[serde(rename = "passport_key")]
//!     key: String,
//! }
//!
//! #[derive(Debug, Deserialize, Schema)]
//! struct Config {
//!     #[serde(rename = "server")]
//!     server: Server,
//! }
//!
//! // --server-port, --server-passport-key, SERVER_PORT, SERVER_PASSPORT_KEY,
//! // and `server.port` / `server.passport_key` in config.yml.
//! let config: Config = tagflag::load()?;
//! # Ok::<(), tagflag::TagflagError>(())
//! ```
//!
//! Values are resolved with `figment`, lowest precedence first: declared
//! defaults, the configuration file (`--config`, default `config.yml`),
//! environment variables, then flags given on the command line.

extern crate self as tagflag;

mod binding;
pub mod docs;
mod env;
mod error;
mod field;
mod file;
mod key;
mod layer;
mod loader;
mod parsed;
mod registrar;
mod scalar;
mod walker;

pub use binding::FlagBinding;
pub use env::BoundEnv;
pub use error::{TagflagError, TagflagResult, is_display_request};
pub use field::{FieldSpec, Schema, SchemaField};
pub use file::{ConfigFile, FileStatus, load_config_file};
pub use key::KeyPath;
pub use loader::{DEFAULT_CONFIG_FLAG, DEFAULT_CONFIG_PATH, Loaded, Loader, load};
pub use parsed::ParsedFlags;
pub use registrar::FlagRegistrar;
pub use scalar::{Scalar, ScalarParseError};
pub use walker::SchemaWalker;

pub use tagflag_macros::Schema;

pub use clap;
pub use figment;
