//! Recursive walk over a schema's fields.

use std::ffi::OsString;

use clap::Command;

use crate::{
    FieldSpec, FlagBinding, FlagRegistrar, KeyPath, ParsedFlags, Scalar, Schema, TagflagResult,
};

/// Drives a [`FlagRegistrar`] over a schema type.
///
/// Fields are visited in declaration order. Scalars become flags; nested
/// records recurse under their key tag; a `#[serde(flatten)]` record merges
/// into the current level. A record with neither is still walked, but in
/// file-only mode: its leaves seed defaults under their serde names and
/// register no flags.
///
/// ```
/// use serde::Deserialize;
/// use tagflag::{Schema, SchemaWalker};
///
/// #[derive(Deserialize, Schema)]
/// struct Server {
///     #[serde(rename = "port")]
///     #[tagflag(default = "8080")]
///     port: u16,
/// }
///
/// #[derive(Deserialize, Schema)]
/// struct Config {
///     #[serde(rename = "server")]
///     server: Server,
/// }
///
/// let mut walker = SchemaWalker::new();
/// walker.walk::<Config>()?;
/// assert_eq!(walker.bindings()[0].flag_name(), "server-port");
/// # Ok::<(), tagflag::TagflagError>(())
/// ```
#[derive(Debug, Default)]
pub struct SchemaWalker {
    registrar: FlagRegistrar,
    file_only_depth: usize,
}

impl SchemaWalker {
    /// Walker with an empty registrar.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Walker continuing from an existing registrar.
    #[must_use]
    pub const fn with_registrar(registrar: FlagRegistrar) -> Self {
        Self {
            registrar,
            file_only_depth: 0,
        }
    }

    /// Visit every field of `T` from the schema root.
    ///
    /// Stops at the first failing field; flags registered before it remain.
    ///
    /// # Errors
    ///
    /// Propagates the first registration or type error.
    pub fn walk<T: Schema>(&mut self) -> TagflagResult<()> {
        T::walk(self, &KeyPath::root())
    }

    /// Walk `T` and then parse `args` once against the collected flags.
    ///
    /// # Errors
    ///
    /// Returns the walk error, or [`TagflagError::CliParsing`] when the
    /// command line is rejected.
    ///
    /// [`TagflagError::CliParsing`]: crate::TagflagError::CliParsing
    pub fn parse<T, I, A>(mut self, command: Command, args: I) -> TagflagResult<ParsedFlags>
    where
        T: Schema,
        I: IntoIterator<Item = A>,
        A: Into<OsString> + Clone,
    {
        self.walk::<T>()?;
        self.registrar.parse(command, args)
    }

    /// Register a scalar leaf, or seed its default inside a file-only record.
    ///
    /// # Errors
    ///
    /// See [`FlagRegistrar::register`].
    pub fn leaf<S: Scalar>(&mut self, prefix: &KeyPath, field: &FieldSpec) -> TagflagResult<()> {
        if self.in_file_only() {
            return self.registrar.file_only::<S>(prefix, field);
        }
        self.registrar.register::<S>(prefix, field)
    }

    /// Descend into a nested record.
    ///
    /// # Errors
    ///
    /// Propagates errors from the nested walk, or
    /// [`TagflagError::InvalidInput`](crate::TagflagError::InvalidInput) for a
    /// malformed key tag.
    pub fn record<T: Schema>(&mut self, prefix: &KeyPath, field: &FieldSpec) -> TagflagResult<()> {
        if field.flatten {
            return T::walk(self, prefix);
        }
        match field.key {
            Some(tag) => {
                let nested = prefix.child(tag)?;
                T::walk(self, &nested)
            }
            None => {
                let nested = prefix.child(field.ident)?;
                tracing::debug!(
                    field = %nested,
                    "record without key tag or flatten marker is file-only"
                );
                self.file_only_depth += 1;
                let result = T::walk(self, &nested);
                self.file_only_depth -= 1;
                result
            }
        }
    }

    /// Whether the walk is currently inside an unkeyed record.
    #[must_use]
    pub const fn in_file_only(&self) -> bool {
        self.file_only_depth > 0
    }

    /// Bindings registered so far.
    #[must_use]
    pub fn bindings(&self) -> &[FlagBinding] {
        self.registrar.bindings()
    }

    /// Mutable access to the registrar, for reserving extra flags.
    pub const fn registrar_mut(&mut self) -> &mut FlagRegistrar {
        &mut self.registrar
    }

    /// Consume the walker, returning its registrar.
    #[must_use]
    pub fn into_registrar(self) -> FlagRegistrar {
        self.registrar
    }
}
