//! Flag registration for scalar leaves.
//!
//! The registrar accumulates one [`clap::Arg`] and one [`FlagBinding`] per
//! keyed leaf, plus a seeded default for each file-only leaf. It owns all
//! registration state, so two registrars never see each other's flags.

use std::collections::HashSet;
use std::ffi::OsString;

use clap::{Arg, Command};

use crate::binding::FileOnlyDefault;
use crate::scalar::ScalarCodec;
use crate::{
    FieldSpec, FlagBinding, KeyPath, ParsedFlags, Scalar, TagflagError, TagflagResult,
};

/// Builder that turns scalar fields into command-line flags.
#[derive(Debug, Default)]
pub struct FlagRegistrar {
    args: Vec<Arg>,
    bindings: Vec<FlagBinding>,
    file_only: Vec<FileOnlyDefault>,
    keys: HashSet<String>,
    flags: HashSet<String>,
}

impl FlagRegistrar {
    /// Create an empty registrar.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a flag name for something other than a schema field, such as
    /// `clap`'s built-in `--help`.
    ///
    /// # Errors
    ///
    /// Returns [`TagflagError::Bind`] when the name is already taken.
    pub fn reserve_name(&mut self, name: &str) -> TagflagResult<()> {
        if !self.flags.insert(name.to_owned()) {
            return Err(TagflagError::bind(name, name, "flag name already reserved"));
        }
        Ok(())
    }

    /// Add a non-schema argument (for example `--config`), claiming its long
    /// name.
    ///
    /// # Errors
    ///
    /// Returns [`TagflagError::InvalidInput`] when `arg` has no long name, or
    /// [`TagflagError::Bind`] when the name is already taken.
    pub fn reserve(&mut self, arg: Arg) -> TagflagResult<()> {
        let Some(long) = arg.get_long() else {
            return Err(TagflagError::invalid_input(format!(
                "reserved argument `{}` needs a long flag name",
                arg.get_id()
            )));
        };
        self.reserve_name(long)?;
        self.args.push(arg);
        Ok(())
    }

    /// Register the scalar field `field` found under `prefix`.
    ///
    /// Fields without a key tag get no flag and are handed to
    /// [`FlagRegistrar::file_only`]. The declared default is parsed at the
    /// exact width of `S`; a missing default becomes `S::zero()`.
    ///
    /// # Errors
    ///
    /// - [`TagflagError::InvalidInput`] for a malformed key tag;
    /// - [`TagflagError::Parse`] when the default does not parse;
    /// - [`TagflagError::Bind`] when the canonical key or flag name is
    ///   already registered.
    pub fn register<S: Scalar>(
        &mut self,
        prefix: &KeyPath,
        field: &FieldSpec,
    ) -> TagflagResult<()> {
        let Some(tag) = field.key else {
            return self.file_only::<S>(prefix, field);
        };
        let key = prefix.child(tag)?;
        let canonical = key.canonical();
        let flag = key.flag_name();
        let default = initial_value::<S>(&canonical, field)?;

        if self.keys.contains(&canonical) {
            return Err(TagflagError::bind(&flag, &canonical, "duplicate canonical key"));
        }
        if self.flags.contains(&flag) {
            return Err(TagflagError::bind(
                &flag,
                &canonical,
                "flag name already registered",
            ));
        }

        let mut arg = S::configure(Arg::new(flag.clone()).long(flag.clone()))
            .value_name(S::TYPE_NAME);
        if let Some(usage) = field.usage {
            arg = arg.help(usage);
        }
        if field.default.is_some() {
            arg = arg.default_value(default.render());
        }

        tracing::debug!(
            flag = %flag,
            key = %canonical,
            r#type = S::TYPE_NAME,
            "registered configuration flag"
        );

        self.keys.insert(canonical.clone());
        self.flags.insert(flag.clone());
        self.args.push(arg);
        self.bindings.push(FlagBinding {
            key,
            canonical,
            flag,
            default: default.to_value(),
            declared_default: field.default,
            usage: field.usage,
            codec: ScalarCodec::of::<S>(),
        });
        Ok(())
    }

    /// Seed the default of a scalar that only the configuration file sets.
    ///
    /// No flag or binding is created. The value lands under the field's
    /// serde name (its key tag, else its identifier) so that decoding
    /// succeeds when the file is absent or omits the field.
    ///
    /// # Errors
    ///
    /// - [`TagflagError::InvalidInput`] for a malformed key tag;
    /// - [`TagflagError::Parse`] when the declared default does not parse.
    pub fn file_only<S: Scalar>(
        &mut self,
        prefix: &KeyPath,
        field: &FieldSpec,
    ) -> TagflagResult<()> {
        let key = prefix.child(field.key.unwrap_or(field.ident))?;
        let value = initial_value::<S>(&key.canonical(), field)?;
        tracing::trace!(key = %key, "seeded file-only default");
        self.file_only.push(FileOnlyDefault {
            key,
            value: value.to_value(),
        });
        Ok(())
    }

    /// Bindings registered so far, in walk order.
    #[must_use]
    pub fn bindings(&self) -> &[FlagBinding] {
        &self.bindings
    }

    /// Consume the registrar, keeping only its bindings.
    #[must_use]
    pub fn into_bindings(self) -> Vec<FlagBinding> {
        self.bindings
    }

    /// Attach every registered argument to `command`.
    #[must_use]
    pub fn command(&self, command: Command) -> Command {
        command.args(self.args.iter().cloned())
    }

    /// Parse `args` against the registered flags.
    ///
    /// The first item of `args` is the binary name, as with
    /// [`Command::try_get_matches_from`].
    ///
    /// # Errors
    ///
    /// Returns [`TagflagError::CliParsing`] when `clap` rejects the command
    /// line, including `--help` and `--version` requests.
    pub fn parse<I, A>(self, command: Command, args: I) -> TagflagResult<ParsedFlags>
    where
        I: IntoIterator<Item = A>,
        A: Into<OsString> + Clone,
    {
        let matches = command
            .args(self.args)
            .try_get_matches_from(args)
            .map_err(TagflagError::cli)?;
        Ok(ParsedFlags::new(matches, self.bindings, self.file_only))
    }
}

fn initial_value<S: Scalar>(canonical: &str, field: &FieldSpec) -> TagflagResult<S> {
    match field.default {
        Some(raw) => S::parse_str(raw).map_err(|source| TagflagError::Parse {
            key: canonical.to_owned(),
            source,
        }),
        None => Ok(S::zero()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, anyhow, ensure};
    use rstest::{fixture, rstest};

    #[fixture]
    fn server() -> KeyPath {
        KeyPath::root().child("server").unwrap_or_default()
    }

    #[rstest]
    fn registers_dashed_flag_for_dotted_key(server: KeyPath) -> Result<()> {
        let mut registrar = FlagRegistrar::new();
        let field = FieldSpec::new("key").key("passport_key").usage("signing key");
        registrar.register::<String>(&server, &field)?;
        let [binding] = registrar.bindings() else {
            return Err(anyhow!("expected one binding"));
        };
        ensure!(binding.canonical_key() == "server.passport_key");
        ensure!(binding.flag_name() == "server-passport-key");
        ensure!(binding.usage() == "signing key");
        ensure!(binding.default_value().as_str() == Some(""));
        Ok(())
    }

    #[rstest]
    fn unkeyed_fields_get_no_flag_but_a_seeded_default(server: KeyPath) -> Result<()> {
        let mut registrar = FlagRegistrar::new();
        registrar.register::<u16>(&server, &FieldSpec::new("port"))?;
        ensure!(registrar.bindings().is_empty());
        ensure!(registrar.args.is_empty());
        let [seeded] = registrar.file_only.as_slice() else {
            return Err(anyhow!("expected one seeded default"));
        };
        ensure!(seeded.key.canonical() == "server.port");
        ensure!(seeded.value.to_u128() == Some(0));
        Ok(())
    }

    #[rstest]
    fn file_only_keeps_key_tag_and_declared_default(server: KeyPath) -> Result<()> {
        let mut registrar = FlagRegistrar::new();
        let field = FieldSpec::new("grace").key("grace_seconds").default_value("30");
        registrar.file_only::<u32>(&server, &field)?;
        ensure!(registrar.bindings().is_empty());
        let seeded = registrar
            .file_only
            .first()
            .ok_or_else(|| anyhow!("missing seeded default"))?;
        ensure!(seeded.key.canonical() == "server.grace_seconds");
        ensure!(seeded.value.to_u128() == Some(30));
        let bad = FieldSpec::new("level").default_value("200");
        let err = registrar.file_only::<i8>(&server, &bad);
        ensure!(
            matches!(&err, Err(TagflagError::Parse { key, .. }) if key == "server.level"),
            "unexpected: {err:?}"
        );
        Ok(())
    }

    #[rstest]
    fn rejects_default_outside_field_width(server: KeyPath) {
        let mut registrar = FlagRegistrar::new();
        let field = FieldSpec::new("level").key("level").default_value("200");
        let err = registrar.register::<i8>(&server, &field);
        assert!(
            matches!(&err, Err(TagflagError::Parse { key, .. }) if key == "server.level"),
            "unexpected: {err:?}"
        );
        assert!(registrar.bindings().is_empty());
    }

    #[rstest]
    fn parses_default_at_field_width(server: KeyPath) -> Result<()> {
        let mut registrar = FlagRegistrar::new();
        let field = FieldSpec::new("level").key("level").default_value("127");
        registrar.register::<i8>(&server, &field)?;
        let binding = registrar
            .bindings()
            .first()
            .ok_or_else(|| anyhow!("missing binding"))?;
        ensure!(binding.default_value().to_i128() == Some(127));
        ensure!(binding.declared_default() == Some("127"));
        ensure!(binding.type_name() == "i8");
        Ok(())
    }

    #[rstest]
    fn rejects_duplicate_canonical_keys(server: KeyPath) -> Result<()> {
        let mut registrar = FlagRegistrar::new();
        let field = FieldSpec::new("port").key("port");
        registrar.register::<u16>(&server, &field)?;
        let err = registrar.register::<u32>(&server, &field);
        ensure!(matches!(err, Err(TagflagError::Bind { .. })), "unexpected: {err:?}");
        Ok(())
    }

    #[rstest]
    fn rejects_colliding_flag_names() -> Result<()> {
        let mut registrar = FlagRegistrar::new();
        let db = KeyPath::root().child("db")?;
        registrar.register::<String>(&db, &FieldSpec::new("user_name").key("user_name"))?;
        let nested = db.child("user")?;
        let err = registrar.register::<String>(&nested, &FieldSpec::new("name").key("name"));
        ensure!(
            matches!(&err, Err(TagflagError::Bind { flag, .. }) if flag == "db-user-name"),
            "unexpected: {err:?}"
        );
        Ok(())
    }

    #[rstest]
    fn reserved_names_block_schema_flags() -> Result<()> {
        let mut registrar = FlagRegistrar::new();
        registrar.reserve(Arg::new("config").long("config"))?;
        let err =
            registrar.register::<String>(&KeyPath::root(), &FieldSpec::new("c").key("config"));
        ensure!(matches!(err, Err(TagflagError::Bind { .. })), "unexpected: {err:?}");
        ensure!(registrar.reserve_name("config").is_err());
        Ok(())
    }

    #[rstest]
    fn reserve_requires_long_name() {
        let mut registrar = FlagRegistrar::new();
        let err = registrar.reserve(Arg::new("positional"));
        assert!(matches!(err, Err(TagflagError::InvalidInput { .. })));
    }

    #[rstest]
    fn parse_reads_supplied_flags(server: KeyPath) -> Result<()> {
        let mut registrar = FlagRegistrar::new();
        let port = FieldSpec::new("port").key("port").default_value("8080");
        registrar.register::<u16>(&server, &port)?;
        registrar.register::<bool>(&server, &FieldSpec::new("tls").key("tls"))?;
        let parsed = registrar.parse(
            Command::new("demo"),
            ["demo", "--server-port=9090", "--server-tls"],
        )?;
        let overrides = parsed.overrides_layer()?;
        let server_dict = overrides
            .get("server")
            .and_then(|v| v.as_dict())
            .ok_or_else(|| anyhow!("missing server table"))?;
        ensure!(server_dict.get("port").and_then(figment::value::Value::to_u128) == Some(9090));
        ensure!(server_dict.get("tls").and_then(figment::value::Value::to_bool) == Some(true));
        Ok(())
    }

    #[rstest]
    fn parse_rejects_out_of_range_flag_values(server: KeyPath) -> Result<()> {
        let mut registrar = FlagRegistrar::new();
        registrar.register::<u8>(&server, &FieldSpec::new("workers").key("workers"))?;
        let err = registrar.parse(Command::new("demo"), ["demo", "--server-workers=300"]);
        ensure!(matches!(err, Err(TagflagError::CliParsing(_))), "unexpected: {err:?}");
        Ok(())
    }
}
