//! In-memory `figment` providers for the flag layers.

use figment::value::{Dict, Map, Value};
use figment::{Metadata, Profile, Provider};

/// Insert `value` under the nested path `segments`, creating intermediate
/// tables as needed.
///
/// Sibling keys sharing a prefix land in the same table, so `server.port`
/// and `server.passport_key` both end up under `server`.
pub(crate) fn insert_path(dict: &mut Dict, segments: &[&str], value: Value) {
    match segments {
        [] => {}
        [leaf] => {
            dict.insert((*leaf).to_owned(), value);
        }
        [head, rest @ ..] => {
            let entry = dict
                .entry((*head).to_owned())
                .or_insert_with(|| Value::from(Dict::new()));
            if !matches!(entry, Value::Dict(..)) {
                *entry = Value::from(Dict::new());
            }
            if let Value::Dict(_, inner) = entry {
                insert_path(inner, rest, value);
            }
        }
    }
}

/// A named, fully materialised layer of values.
#[derive(Debug, Clone)]
pub(crate) struct FlagLayer {
    name: &'static str,
    dict: Dict,
}

impl FlagLayer {
    pub(crate) const fn new(name: &'static str, dict: Dict) -> Self {
        Self { name, dict }
    }
}

impl Provider for FlagLayer {
    fn metadata(&self) -> Metadata {
        Metadata::named(self.name)
    }

    fn data(&self) -> Result<Map<Profile, Dict>, figment::Error> {
        Ok(Profile::Default.collect(self.dict.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, anyhow, ensure};
    use rstest::rstest;

    fn table<'a>(dict: &'a Dict, key: &str) -> Result<&'a Dict> {
        dict.get(key)
            .and_then(Value::as_dict)
            .ok_or_else(|| anyhow!("missing table `{key}`"))
    }

    #[rstest]
    fn siblings_share_parent_table() -> Result<()> {
        let mut dict = Dict::new();
        insert_path(&mut dict, &["server", "port"], Value::from(8080_u16));
        insert_path(&mut dict, &["server", "passport_key"], Value::from(String::from("k")));
        insert_path(&mut dict, &["db", "host"], Value::from(String::from("localhost")));
        let server = table(&dict, "server")?;
        ensure!(server.len() == 2, "server table: {server:?}");
        ensure!(table(&dict, "db")?.contains_key("host"));
        Ok(())
    }

    #[rstest]
    fn deeper_key_replaces_scalar_parent() -> Result<()> {
        let mut dict = Dict::new();
        insert_path(&mut dict, &["a"], Value::from(1_u8));
        insert_path(&mut dict, &["a", "b"], Value::from(2_u8));
        ensure!(table(&dict, "a")?.contains_key("b"));
        Ok(())
    }

    #[rstest]
    fn layer_emits_default_profile() -> Result<()> {
        let mut dict = Dict::new();
        insert_path(&mut dict, &["k"], Value::from(true));
        let data = FlagLayer::new("test layer", dict).data()?;
        ensure!(data.get(&Profile::Default).is_some_and(|d| d.contains_key("k")));
        Ok(())
    }
}
