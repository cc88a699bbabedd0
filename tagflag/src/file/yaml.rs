//! YAML parsing backed by `serde-saphyr`.

use figment::value::Value;
use serde_saphyr::Options;

/// Parse YAML contents into a `figment` value using strict boolean
/// semantics, so `yes` and `on` stay strings.
pub(super) fn parse_value(contents: &str) -> Result<Value, serde_saphyr::Error> {
    serde_saphyr::from_str_with_options(
        contents,
        Options {
            strict_booleans: true,
            ..Options::default()
        },
    )
}
