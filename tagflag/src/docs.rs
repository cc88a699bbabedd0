//! Serialisable description of the flags, variables and file keys a schema
//! exposes, for help generators and other external tooling.

use serde::Serialize;

use crate::FlagBinding;

/// Everything a user can set for one schema.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ConfigDocs {
    /// Application name shown in help output.
    pub app_name: String,
    /// Long name of the flag selecting the configuration file.
    pub config_flag: String,
    /// Configuration file read when the flag is not given.
    pub default_config_path: String,
    /// Prefix applied to environment variable names.
    pub env_prefix: Option<String>,
    /// One entry per bound field, in declaration order.
    pub fields: Vec<FieldDoc>,
}

/// How one configuration key can be set.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldDoc {
    /// Dotted key, as used in the configuration file.
    pub key: String,
    /// Command-line flag, including the leading dashes.
    pub flag: String,
    /// Environment variable name.
    pub env: String,
    /// Rust type of the value.
    pub value_type: String,
    /// Default as declared on the field.
    pub default: Option<String>,
    /// Help text.
    pub usage: Option<String>,
}

impl FieldDoc {
    pub(crate) fn from_binding(binding: &FlagBinding, env_prefix: Option<&str>) -> Self {
        Self {
            key: binding.canonical_key().to_owned(),
            flag: format!("--{}", binding.flag_name()),
            env: binding.env_name(env_prefix),
            value_type: binding.type_name().to_owned(),
            default: binding.declared_default().map(str::to_owned),
            usage: Some(binding.usage())
                .filter(|usage| !usage.is_empty())
                .map(str::to_owned),
        }
    }
}
