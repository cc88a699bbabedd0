//! Command-line builders.

use std::ffi::OsString;

/// Binary name placed in front of every argument list built here.
pub const BIN: &str = "app";

/// Prepend [`BIN`] to `args`, producing a full argument vector.
///
/// ```
/// let argv = tagflag_test_helpers::argv(&["--server-port=9090"]);
/// assert_eq!(argv.len(), 2);
/// ```
#[must_use]
pub fn argv(args: &[&str]) -> Vec<OsString> {
    std::iter::once(BIN)
        .chain(args.iter().copied())
        .map(OsString::from)
        .collect()
}
