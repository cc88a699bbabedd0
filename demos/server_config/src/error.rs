//! Error types for the `server_config` demo.

use thiserror::Error;

/// Errors raised by the demo.
#[derive(Debug, Error)]
pub enum DemoError {
    /// Loading the configuration failed.
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] tagflag::TagflagError),
    /// The configuration decoded but cannot be used.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Writing the result failed.
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Settings rejected after decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Port 0 asks the OS for a random port.
    #[error("server.port must not be 0")]
    ZeroPort,
    /// Database host collapsed to nothing after trimming.
    #[error("db.host must contain visible characters")]
    BlankDbHost,
    /// The pool could never hand out a connection.
    #[error("db.pool_size must be greater than zero")]
    EmptyPool,
}

/// Result alias for the demo.
pub type Result<T, E = DemoError> = std::result::Result<T, E>;
