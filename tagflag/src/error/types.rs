//! Primary error enum for the flag walk and the load pipeline.

use figment::Error as FigmentError;
use thiserror::Error;

use crate::scalar::ScalarParseError;

/// Convenience alias for results returned by this crate.
pub type TagflagResult<T> = Result<T, TagflagError>;

/// Errors that can occur while walking a schema or loading configuration.
///
/// Every variant aborts the load; the only recoverable condition (a missing
/// configuration file) is reported through
/// [`FileStatus::NotFound`](crate::FileStatus::NotFound) instead.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TagflagError {
    /// A schema attribute or loader setting is malformed.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// Human-readable explanation of the rejected input.
        message: String,
    },

    /// A schema field has a kind outside the supported scalar/record set.
    #[error("unsupported type `{type_name}` for field `{field}`")]
    UnsupportedType {
        /// Dotted path of the offending field.
        field: String,
        /// Rust type name of the offending field.
        type_name: &'static str,
    },

    /// A declared default does not parse into the field's primitive type.
    #[error("invalid default for `{key}`: {source}")]
    Parse {
        /// Canonical key of the field carrying the default.
        key: String,
        /// Underlying parse failure.
        #[source]
        source: ScalarParseError,
    },

    /// A flag could not be bound to its canonical key.
    #[error("cannot bind flag `--{flag}` to `{key}`: {reason}")]
    Bind {
        /// Dash-joined flag name.
        flag: String,
        /// Dot-joined canonical key.
        key: String,
        /// Why the binding was rejected.
        reason: String,
    },

    /// The command line was rejected by `clap`.
    #[error("failed to parse command-line arguments: {0}")]
    CliParsing(#[from] Box<clap::Error>),

    /// The configuration file exists but could not be read or parsed.
    #[error("configuration file error in '{path}': {source}")]
    FileRead {
        /// Path of the configuration file.
        path: std::path::PathBuf,
        /// Underlying read or parse failure.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The merged values could not be decoded into the destination type.
    #[error("failed to decode configuration: {0}")]
    Decode(#[from] Box<FigmentError>),
}
