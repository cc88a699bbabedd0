//! Load pipeline: walk, parse, read the file, layer and decode.
//!
//! Layers, lowest precedence first:
//!
//! 1. defaults of every registered flag;
//! 2. the configuration file;
//! 3. environment variables;
//! 4. flags given explicitly on the command line.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{Arg, ArgAction, Command};
use figment::Figment;
use serde::de::DeserializeOwned;

use crate::docs::{ConfigDocs, FieldDoc};
use crate::env::BoundEnv;
use crate::file::{FileStatus, load_config_file};
use crate::layer::FlagLayer;
use crate::{FlagBinding, Schema, SchemaWalker, TagflagError, TagflagResult};

/// Configuration file read when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "config.yml";

/// Default long name of the flag selecting the configuration file.
pub const DEFAULT_CONFIG_FLAG: &str = "config";

/// A decoded configuration together with how it was produced.
#[derive(Debug, Clone)]
pub struct Loaded<T> {
    /// The decoded configuration.
    pub config: T,
    /// Whether the configuration file was found.
    pub file: FileStatus,
    /// Flags registered for the schema, in declaration order.
    pub bindings: Vec<FlagBinding>,
}

/// Builder for a configuration load.
///
/// ```rust,no_run
/// use serde::Deserialize;
/// use tagflag::{Loader, Schema};
///
/// #[derive(Debug, Deserialize, Schema)]
/// struct Config {
///     /// Port to listen on.
///     #[serde(rename = "port")]
///     #[tagflag(default = "8080")]
///     port: u16,
/// }
///
/// let config: Config = Loader::new("server").env_prefix("SERVER").load()?;
/// # Ok::<(), tagflag::TagflagError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Loader {
    name: String,
    about: Option<String>,
    version: Option<String>,
    args: Option<Vec<OsString>>,
    env_prefix: Option<String>,
    config_flag: String,
    config_default: PathBuf,
    config_path: Option<PathBuf>,
}

impl Default for Loader {
    fn default() -> Self {
        Self::new("app")
    }
}

impl Loader {
    /// Loader for an application called `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            about: None,
            version: None,
            args: None,
            env_prefix: None,
            config_flag: DEFAULT_CONFIG_FLAG.to_owned(),
            config_default: PathBuf::from(DEFAULT_CONFIG_PATH),
            config_path: None,
        }
    }

    /// Description shown by `--help`.
    #[must_use]
    pub fn about(mut self, about: impl Into<String>) -> Self {
        self.about = Some(about.into());
        self
    }

    /// Version reported by `--version`; without one the flag is absent.
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Parse these arguments instead of the process arguments.
    ///
    /// The first item is the binary name.
    #[must_use]
    pub fn args<I, A>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<OsString>,
    {
        self.args = Some(args.into_iter().map(Into::into).collect());
        self
    }

    /// Prefix environment variable names, e.g. `APP` → `APP_DB_HOST`.
    #[must_use]
    pub fn env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// Rename the configuration flag and change its default path.
    #[must_use]
    pub fn config_flag(mut self, long: impl Into<String>, default: impl Into<PathBuf>) -> Self {
        self.config_flag = long.into();
        self.config_default = default.into();
        self
    }

    /// Read this file regardless of the configuration flag.
    #[must_use]
    pub fn config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Load `T`.
    ///
    /// # Errors
    ///
    /// Returns the first failure of the pipeline; see [`TagflagError`].
    pub fn load<T>(&self) -> TagflagResult<T>
    where
        T: Schema + DeserializeOwned,
    {
        self.load_detailed().map(|loaded| loaded.config)
    }

    /// Load `T` into an existing value.
    ///
    /// `dest` is only overwritten when the whole load succeeds.
    ///
    /// # Errors
    ///
    /// As for [`Loader::load`].
    pub fn load_into<T>(&self, dest: &mut T) -> TagflagResult<()>
    where
        T: Schema + DeserializeOwned,
    {
        *dest = self.load()?;
        Ok(())
    }

    /// Load `T`, also reporting the file status and the bindings.
    ///
    /// # Errors
    ///
    /// As for [`Loader::load`].
    pub fn load_detailed<T>(&self) -> TagflagResult<Loaded<T>>
    where
        T: Schema + DeserializeOwned,
    {
        let prefix = self.validated_prefix()?;
        let walker = self.prepared_walker()?;
        let parsed = walker.parse::<T, _, _>(self.command(), self.arguments())?;
        tracing::debug!(
            stage = "flags_registered",
            flags = parsed.bindings().len(),
            "parsed command line"
        );

        let path = match &self.config_path {
            Some(path) => path.clone(),
            None => parsed
                .path(&self.config_flag)?
                .unwrap_or_else(|| self.config_default.clone()),
        };
        if path.as_os_str().is_empty() {
            return Err(TagflagError::invalid_input(
                "configuration path must not be empty",
            ));
        }

        let mut figment = Figment::from(FlagLayer::new("flag defaults", parsed.defaults_layer()));
        let file = match load_config_file(&path)? {
            Some(file) => {
                figment = figment.merge(file);
                FileStatus::Found(path)
            }
            None => {
                tracing::warn!(
                    path = %path.display(),
                    "configuration file not found; using flags and environment only"
                );
                FileStatus::NotFound(path)
            }
        };
        tracing::debug!(
            stage = "file_attempted",
            found = file.is_found(),
            path = %file.path().display()
        );

        let figment = figment
            .merge(BoundEnv::new(parsed.bindings(), prefix))
            .merge(FlagLayer::new("command-line flags", parsed.overrides_layer()?));
        tracing::debug!(stage = "merged", "layered flag defaults, file, environment and flags");

        let config = figment.extract::<T>().map_err(TagflagError::decode)?;
        tracing::debug!(stage = "decoded", "configuration loaded");

        Ok(Loaded {
            config,
            file,
            bindings: parsed.into_bindings(),
        })
    }

    /// Describe the flags, variables and keys `T` exposes, without parsing
    /// arguments or reading any file.
    ///
    /// # Errors
    ///
    /// Returns walk errors such as [`TagflagError::UnsupportedType`].
    pub fn describe<T: Schema>(&self) -> TagflagResult<ConfigDocs> {
        let prefix = self.validated_prefix()?;
        let mut walker = self.prepared_walker()?;
        walker.walk::<T>()?;
        Ok(ConfigDocs {
            app_name: self.name.clone(),
            config_flag: format!("--{}", self.config_flag),
            default_config_path: self.config_default.display().to_string(),
            env_prefix: prefix.map(str::to_owned),
            fields: walker
                .bindings()
                .iter()
                .map(|binding| FieldDoc::from_binding(binding, prefix))
                .collect(),
        })
    }

    fn validated_prefix(&self) -> TagflagResult<Option<&str>> {
        let Some(prefix) = self.env_prefix.as_deref() else {
            return Ok(None);
        };
        if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(TagflagError::invalid_input(format!(
                "environment prefix `{prefix}` must be ASCII letters, digits or underscores"
            )));
        }
        Ok(Some(prefix))
    }

    fn prepared_walker(&self) -> TagflagResult<SchemaWalker> {
        let flag = self.config_flag.as_str();
        if flag.is_empty()
            || flag.starts_with('-')
            || !flag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(TagflagError::invalid_input(format!(
                "configuration flag `{flag}` must be ASCII letters, digits or inner dashes"
            )));
        }
        if self.config_default.as_os_str().is_empty() {
            return Err(TagflagError::invalid_input(
                "default configuration path must not be empty",
            ));
        }
        let mut walker = SchemaWalker::new();
        let registrar = walker.registrar_mut();
        registrar.reserve_name("help")?;
        if self.version.is_some() {
            registrar.reserve_name("version")?;
        }
        registrar.reserve(
            Arg::new(flag.to_owned())
                .long(flag.to_owned())
                .value_name("PATH")
                .help("Configuration file path")
                .action(ArgAction::Set)
                .value_parser(clap::value_parser!(PathBuf))
                .default_value(self.config_default.to_string_lossy().into_owned()),
        )?;
        Ok(walker)
    }

    fn command(&self) -> Command {
        let mut command = Command::new(self.name.clone());
        if let Some(about) = &self.about {
            command = command.about(about.clone());
        }
        if let Some(version) = &self.version {
            command = command.version(version.clone());
        }
        command
    }

    fn arguments(&self) -> Vec<OsString> {
        self.args
            .clone()
            .unwrap_or_else(|| std::env::args_os().collect())
    }
}

/// Load `T` from the process arguments, environment and `config.yml` with
/// default [`Loader`] settings.
///
/// # Errors
///
/// As for [`Loader::load`].
pub fn load<T>() -> TagflagResult<T>
where
    T: Schema + DeserializeOwned,
{
    Loader::default().load()
}
