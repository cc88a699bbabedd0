//! Result of parsing the command line against registered flags.

use std::path::PathBuf;

use clap::ArgMatches;
use clap::parser::ValueSource;
use figment::value::Dict;

use crate::binding::FileOnlyDefault;
use crate::layer::insert_path;
use crate::{FlagBinding, TagflagError, TagflagResult};

/// Parsed command line together with the bindings it was parsed against.
#[derive(Debug, Clone)]
pub struct ParsedFlags {
    matches: ArgMatches,
    bindings: Vec<FlagBinding>,
    file_only: Vec<FileOnlyDefault>,
}

impl ParsedFlags {
    pub(crate) const fn new(
        matches: ArgMatches,
        bindings: Vec<FlagBinding>,
        file_only: Vec<FileOnlyDefault>,
    ) -> Self {
        Self {
            matches,
            bindings,
            file_only,
        }
    }

    /// Raw `clap` matches.
    #[must_use]
    pub const fn matches(&self) -> &ArgMatches {
        &self.matches
    }

    /// Bindings in registration order.
    #[must_use]
    pub fn bindings(&self) -> &[FlagBinding] {
        &self.bindings
    }

    /// Consume the parse result, keeping only the bindings.
    #[must_use]
    pub fn into_bindings(self) -> Vec<FlagBinding> {
        self.bindings
    }

    /// Whether `flag` was given explicitly on the command line.
    #[must_use]
    pub fn is_explicit(&self, flag: &str) -> bool {
        matches!(
            self.matches.value_source(flag),
            Some(ValueSource::CommandLine)
        )
    }

    /// Defaults of every binding and every file-only field, nested by key.
    ///
    /// This is the lowest-precedence layer.
    #[must_use]
    pub fn defaults_layer(&self) -> Dict {
        let mut dict = Dict::new();
        for seeded in &self.file_only {
            insert_path(&mut dict, seeded.key.segments(), seeded.value.clone());
        }
        for binding in &self.bindings {
            insert_path(&mut dict, binding.key.segments(), binding.default.clone());
        }
        dict
    }

    /// Values of flags supplied on the command line, nested by canonical key.
    ///
    /// Flags left at their default are absent, so they never mask values from
    /// the file or the environment.
    ///
    /// # Errors
    ///
    /// Returns [`TagflagError::Bind`] if a parsed value cannot be read back
    /// at its registered type.
    pub fn overrides_layer(&self) -> TagflagResult<Dict> {
        let mut dict = Dict::new();
        for binding in self.bindings.iter().filter(|b| self.is_explicit(&b.flag)) {
            let matched = binding
                .codec
                .matched(&self.matches, &binding.flag)
                .map_err(|err| {
                    TagflagError::bind(&binding.flag, &binding.canonical, err.to_string())
                })?;
            if let Some(value) = matched {
                insert_path(&mut dict, binding.key.segments(), value);
            }
        }
        Ok(dict)
    }

    /// Path value of a reserved argument such as `--config`.
    ///
    /// # Errors
    ///
    /// Returns [`TagflagError::Bind`] when `id` was not registered as a path
    /// argument.
    pub fn path(&self, id: &str) -> TagflagResult<Option<PathBuf>> {
        self.matches
            .try_get_one::<PathBuf>(id)
            .map(|path| path.cloned())
            .map_err(|err| TagflagError::bind(id, id, err.to_string()))
    }
}
