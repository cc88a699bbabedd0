//! Helpers for classifying errors surfaced by `clap`.

use clap::{Error as ClapError, error::ErrorKind};

/// Returns `true` when a [`clap::Error`] corresponds to `--help` or
/// `--version`.
///
/// Clap reports these requests as errors; entry points should hand them to
/// [`clap::Error::exit`] so the output is printed with a zero exit status.
#[must_use]
pub fn is_display_request(err: &ClapError) -> bool {
    matches!(
        err.kind(),
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
    )
}
