//! Reading the configuration file into a `figment` layer.
//!
//! A missing file is not an error: [`load_config_file`] returns `Ok(None)`
//! and the caller continues with flags and environment only. Any other
//! failure (permissions, a directory in place of a file, malformed content)
//! is a [`TagflagError::FileRead`](crate::TagflagError::FileRead).

mod parser;
#[cfg(feature = "yaml")]
mod yaml;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use figment::value::{Dict, Map};
use figment::{Metadata, Profile, Provider};

use crate::{TagflagError, TagflagResult};

/// Outcome of looking for the configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    /// The file was read and merged.
    Found(PathBuf),
    /// The file does not exist; only flags and environment were used.
    NotFound(PathBuf),
}

impl FileStatus {
    /// Path that was looked up.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Found(path) | Self::NotFound(path) => path,
        }
    }

    /// Whether the file was found.
    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// A parsed configuration file, usable as a `figment` provider.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    path: PathBuf,
    dict: Dict,
}

impl ConfigFile {
    /// Path the file was read from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Top-level table of the file.
    #[must_use]
    pub const fn values(&self) -> &Dict {
        &self.dict
    }
}

impl Provider for ConfigFile {
    fn metadata(&self) -> Metadata {
        Metadata::from("configuration file", self.path.as_path())
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        Ok(Profile::Default.collect(self.dict.clone()))
    }
}

/// Read and parse the configuration file at `path`.
///
/// The format follows the extension: `.json` and `.toml` when their features
/// are enabled, YAML otherwise.
///
/// Returns `Ok(None)` when the file does not exist.
///
/// # Errors
///
/// Returns [`TagflagError::FileRead`] when the file exists but cannot be
/// read or parsed, or when its top level is not a mapping.
pub fn load_config_file(path: &Path) -> TagflagResult<Option<ConfigFile>> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(TagflagError::file_read(path, err)),
    };
    let dict = parser::parse_by_format(path, &contents)?;
    Ok(Some(ConfigFile {
        path: path.to_path_buf(),
        dict,
    }))
}

#[cfg(test)]
mod tests;
