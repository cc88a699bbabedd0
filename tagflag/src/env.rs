//! Environment provider keyed by the registered flag bindings.
//!
//! Only variables that correspond to a bound key are read. Each canonical key
//! maps to one variable name (`db.host` → `DB_HOST`, optionally prefixed),
//! matched without regard to case. Values are parsed with the binding's own
//! scalar parser, so `SERVER_PORT=9090` lands as a number and a malformed
//! value is reported against the variable that carried it.

use std::collections::HashMap;
use std::sync::Arc;

use figment::providers::Env;
use figment::value::{Dict, Map};
use figment::{Metadata, Profile, Provider};

use crate::FlagBinding;
use crate::KeyPath;
use crate::layer::insert_path;
use crate::scalar::ScalarCodec;

#[derive(Debug)]
struct EnvEntry {
    var: String,
    key: KeyPath,
    codec: ScalarCodec,
}

/// `figment` provider reading one environment variable per binding.
#[derive(Debug, Clone)]
pub struct BoundEnv {
    entries: Arc<[EnvEntry]>,
    lookup: Arc<HashMap<String, usize>>,
}

impl BoundEnv {
    /// Build a provider for `bindings`, naming variables with `prefix`.
    #[must_use]
    pub fn new(bindings: &[FlagBinding], prefix: Option<&str>) -> Self {
        let entries: Arc<[EnvEntry]> = bindings
            .iter()
            .map(|binding| EnvEntry {
                var: binding.env_name(prefix),
                key: binding.key.clone(),
                codec: binding.codec,
            })
            .collect();
        let lookup = entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| (entry.var.clone(), idx))
            .collect();
        Self {
            entries,
            lookup: Arc::new(lookup),
        }
    }

    /// Variable names this provider consults, in binding order.
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.var.as_str())
    }

    fn entry_for(&self, name: &str) -> Option<&EnvEntry> {
        self.lookup
            .get(&name.to_ascii_uppercase())
            .and_then(|idx| self.entries.get(*idx))
    }
}

impl Provider for BoundEnv {
    fn metadata(&self) -> Metadata {
        Metadata::named("environment variable(s)")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        let mut dict = Dict::new();
        for (name, raw) in Env::raw().iter() {
            // An empty variable counts as unset.
            if raw.is_empty() {
                continue;
            }
            let Some(entry) = self.entry_for(name.as_str()) else {
                continue;
            };
            let value = entry.codec.parse(&raw).map_err(|err| {
                figment::Error::from(format!(
                    "environment variable `{}` for `{}`: {err}",
                    entry.var, entry.key
                ))
            })?;
            tracing::debug!(var = %entry.var, key = %entry.key, "using environment override");
            insert_path(&mut dict, entry.key.segments(), value);
        }
        Ok(Profile::Default.collect(dict))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FieldSpec, FlagRegistrar};
    use anyhow::{Result, anyhow, ensure};
    use rstest::rstest;
    use test_helpers::Scenario;

    fn bindings() -> Result<Vec<FlagBinding>> {
        let server = KeyPath::root().child("server")?;
        let mut registrar = FlagRegistrar::new();
        registrar.register::<u16>(&server, &FieldSpec::new("port").key("port"))?;
        registrar.register::<String>(&server, &FieldSpec::new("key").key("passport_key"))?;
        Ok(registrar.into_bindings())
    }

    #[rstest]
    #[case(None, ["SERVER_PORT", "SERVER_PASSPORT_KEY"])]
    #[case(Some("svc"), ["SVC_SERVER_PORT", "SVC_SERVER_PASSPORT_KEY"])]
    fn names_one_variable_per_binding(
        #[case] prefix: Option<&str>,
        #[case] expected: [&str; 2],
    ) -> Result<()> {
        let env = BoundEnv::new(&bindings()?, prefix);
        ensure!(env.variables().eq(expected));
        Ok(())
    }

    #[rstest]
    fn reads_typed_values_and_ignores_unbound_variables() -> Result<()> {
        let bound = bindings()?;
        let mut data = Scenario::new()
            .env("server_port", "9090")
            .env("SERVER_PASSPORT_KEY", "")
            .env("SERVER_OTHER", "x")
            .run(|_| BoundEnv::new(&bound, None).data())??;
        let dict = data.remove(&Profile::Default).unwrap_or_default();
        let server = dict
            .get("server")
            .and_then(figment::value::Value::as_dict)
            .ok_or_else(|| anyhow!("missing server table: {dict:?}"))?;
        ensure!(server.get("port").and_then(figment::value::Value::to_u128) == Some(9090));
        ensure!(!server.contains_key("passport_key"));
        ensure!(!server.contains_key("other"));
        Ok(())
    }

    #[rstest]
    fn malformed_value_names_the_variable() -> Result<()> {
        let bound = bindings()?;
        let outcome = Scenario::new()
            .env("SERVER_PORT", "70000")
            .run(|_| BoundEnv::new(&bound, None).data())?;
        let message = outcome
            .err()
            .map(|err| err.to_string())
            .ok_or_else(|| anyhow!("out-of-range port was accepted"))?;
        ensure!(message.contains("SERVER_PORT"), "message: {message}");
        Ok(())
    }
}
