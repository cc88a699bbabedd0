//! Error types produced while registering flags and loading configuration.

mod constructors;
mod helpers;
mod types;

pub use helpers::is_display_request;
pub use types::{TagflagError, TagflagResult};
