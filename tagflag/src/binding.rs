//! Flag bindings: the link between a registered flag and its canonical key.

use figment::value::Value;

use crate::KeyPath;
use crate::scalar::ScalarCodec;

/// Association between a registered flag and the dotted key it feeds.
///
/// One binding exists per keyed scalar leaf. The binding also carries what
/// later stages need: the parsed default for the lowest layer, the parser
/// for environment values, and the help text for documentation.
#[derive(Debug, Clone)]
pub struct FlagBinding {
    pub(crate) key: KeyPath,
    pub(crate) canonical: String,
    pub(crate) flag: String,
    pub(crate) default: Value,
    pub(crate) declared_default: Option<&'static str>,
    pub(crate) usage: Option<&'static str>,
    pub(crate) codec: ScalarCodec,
}

impl FlagBinding {
    /// Key path of the bound field.
    #[must_use]
    pub const fn key(&self) -> &KeyPath {
        &self.key
    }

    /// Dot-joined canonical key, e.g. `server.passport_key`.
    #[must_use]
    pub fn canonical_key(&self) -> &str {
        &self.canonical
    }

    /// Flag name without leading dashes, e.g. `server-passport-key`.
    #[must_use]
    pub fn flag_name(&self) -> &str {
        &self.flag
    }

    /// Environment variable consulted for this key.
    #[must_use]
    pub fn env_name(&self, prefix: Option<&str>) -> String {
        self.key.env_name(prefix)
    }

    /// Default value fed to the lowest layer: the parsed declared default,
    /// or the type's zero value.
    #[must_use]
    pub const fn default_value(&self) -> &Value {
        &self.default
    }

    /// Default exactly as declared on the field, if any.
    #[must_use]
    pub const fn declared_default(&self) -> Option<&'static str> {
        self.declared_default
    }

    /// Help text registered with the flag.
    #[must_use]
    pub fn usage(&self) -> &str {
        self.usage.unwrap_or_default()
    }

    /// Rust name of the field's scalar type.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.codec.type_name
    }
}

/// Zero value (or declared default) of a field that only the file can set.
///
/// Seeded into the defaults layer so a missing file still decodes.
#[derive(Debug, Clone)]
pub(crate) struct FileOnlyDefault {
    pub(crate) key: KeyPath,
    pub(crate) value: Value,
}
