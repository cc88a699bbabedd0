//! Test helpers shared across the tagflag workspace.
//!
//! [`Scenario`] runs a test body in an isolated working directory and
//! environment; [`argv`] builds command lines for tests that need no
//! isolation.

pub mod args;
pub mod scenario;

pub use args::argv;
pub use scenario::Scenario;
