//! Format-specific parsing of configuration file contents.

use std::path::Path;

use figment::value::{Dict, Value};

use crate::{TagflagError, TagflagResult};

/// Parse `contents` according to the extension of `path`.
///
/// Blank files yield an empty table.
pub(super) fn parse_by_format(path: &Path, contents: &str) -> TagflagResult<Dict> {
    if contents.trim().is_empty() {
        return Ok(Dict::new());
    }
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let value = match ext.as_deref() {
        Some("json") => parse_json(path, contents)?,
        Some("toml") => parse_toml(path, contents)?,
        _ => parse_yaml(path, contents)?,
    };
    let actual = value.to_actual();
    value.into_dict().ok_or_else(|| {
        TagflagError::file_read(
            path,
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("expected a mapping at the top level, found {actual}"),
            ),
        )
    })
}

#[cfg(not(all(feature = "yaml", feature = "json", feature = "toml")))]
fn feature_disabled(path: &Path, feature: &str) -> TagflagError {
    TagflagError::file_read(
        path,
        std::io::Error::other(format!(
            "{feature} feature disabled: enable the '{feature}' feature to read this file"
        )),
    )
}

#[cfg(feature = "yaml")]
fn parse_yaml(path: &Path, contents: &str) -> TagflagResult<Value> {
    super::yaml::parse_value(contents).map_err(|err| TagflagError::file_read(path, err.to_string()))
}

#[cfg(not(feature = "yaml"))]
fn parse_yaml(path: &Path, _contents: &str) -> TagflagResult<Value> {
    Err(feature_disabled(path, "yaml"))
}

#[cfg(feature = "json")]
fn parse_json(path: &Path, contents: &str) -> TagflagResult<Value> {
    serde_json::from_str(contents).map_err(|err| TagflagError::file_read(path, err))
}

#[cfg(not(feature = "json"))]
fn parse_json(path: &Path, _contents: &str) -> TagflagResult<Value> {
    Err(feature_disabled(path, "json"))
}

#[cfg(feature = "toml")]
fn parse_toml(path: &Path, contents: &str) -> TagflagResult<Value> {
    toml::from_str(contents).map_err(|err| TagflagError::file_read(path, err))
}

#[cfg(not(feature = "toml"))]
fn parse_toml(path: &Path, _contents: &str) -> TagflagResult<Value> {
    Err(feature_disabled(path, "toml"))
}
