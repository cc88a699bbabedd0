//! Constructors for `TagflagError`.

use std::error::Error;
use std::path::Path;

use figment::Error as FigmentError;

use super::TagflagError;

impl TagflagError {
    /// Construct an [`TagflagError::InvalidInput`] from a message.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagflag::TagflagError;
    /// let e = TagflagError::invalid_input("empty key tag");
    /// assert!(matches!(e, TagflagError::InvalidInput { .. }));
    /// ```
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Construct a [`TagflagError::Bind`] for a flag/key pair.
    #[must_use]
    pub fn bind(flag: &str, key: &str, reason: impl Into<String>) -> Self {
        Self::Bind {
            flag: flag.to_owned(),
            key: key.to_owned(),
            reason: reason.into(),
        }
    }

    /// Construct a [`TagflagError::FileRead`] for a configuration path.
    #[must_use]
    pub fn file_read(path: &Path, source: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        Self::FileRead {
            path: path.to_path_buf(),
            source: source.into(),
        }
    }

    /// Construct a [`TagflagError::Decode`] from a [`figment::Error`].
    ///
    /// # Examples
    ///
    /// ```
    /// use tagflag::TagflagError;
    /// let e = TagflagError::decode(figment::Error::from("boom"));
    /// assert!(matches!(e, TagflagError::Decode(_)));
    /// ```
    #[must_use]
    pub fn decode(source: FigmentError) -> Self {
        Self::Decode(Box::new(source))
    }

    /// Construct a [`TagflagError::CliParsing`] from a [`clap::Error`].
    #[must_use]
    pub fn cli(source: clap::Error) -> Self {
        Self::CliParsing(Box::new(source))
    }

    /// Returns the inner [`clap::Error`] when the failure came from the
    /// command line.
    ///
    /// Binaries use this to let `clap` print `--help` output and exit.
    #[must_use]
    pub fn as_clap(&self) -> Option<&clap::Error> {
        match self {
            Self::CliParsing(err) => Some(err),
            _ => None,
        }
    }
}
