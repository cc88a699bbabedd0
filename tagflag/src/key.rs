//! Key paths and their three renderings.
//!
//! A [`KeyPath`] is the ordered list of key tags from the schema root down
//! to a field. The same path is rendered as:
//!
//! - the canonical key, joined with `.` (`server.passport_key`), which is
//!   the key the layered resolver and the file decoder see;
//! - the flag name, with `.` and `_` replaced by `-`
//!   (`server-passport-key`);
//! - the environment variable name, with `.` replaced by `_` and
//!   upper-cased (`SERVER_PASSPORT_KEY`).

use std::fmt;

use crate::{TagflagError, TagflagResult};

/// Ordered key-tag segments from the schema root to a field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct KeyPath {
    segments: Vec<&'static str>,
}

impl KeyPath {
    /// The empty path at the schema root.
    #[must_use]
    pub const fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Extend the path with one key tag.
    ///
    /// # Errors
    ///
    /// Returns [`TagflagError::InvalidInput`] when `segment` is empty or
    /// contains `.`, `=` or whitespace.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagflag::KeyPath;
    /// let key = KeyPath::root().child("db")?.child("user_name")?;
    /// assert_eq!(key.canonical(), "db.user_name");
    /// assert_eq!(key.flag_name(), "db-user-name");
    /// # Ok::<(), tagflag::TagflagError>(())
    /// ```
    pub fn child(&self, segment: &'static str) -> TagflagResult<Self> {
        validate_segment(segment)?;
        let mut segments = self.segments.clone();
        segments.push(segment);
        Ok(Self { segments })
    }

    /// Returns `true` at the schema root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segments in root-to-leaf order.
    #[must_use]
    pub fn segments(&self) -> &[&'static str] {
        &self.segments
    }

    /// Dot-joined canonical key.
    #[must_use]
    pub fn canonical(&self) -> String {
        self.segments.join(".")
    }

    /// Dash-joined flag name with underscores also replaced by dashes.
    #[must_use]
    pub fn flag_name(&self) -> String {
        self.canonical().replace(['.', '_'], "-")
    }

    /// Environment variable name, optionally prefixed.
    ///
    /// The prefix is joined with `_` unless it already ends with one.
    ///
    /// ```
    /// use tagflag::KeyPath;
    /// let key = KeyPath::root().child("db")?.child("host")?;
    /// assert_eq!(key.env_name(None), "DB_HOST");
    /// assert_eq!(key.env_name(Some("app")), "APP_DB_HOST");
    /// assert_eq!(key.env_name(Some("APP_")), "APP_DB_HOST");
    /// # Ok::<(), tagflag::TagflagError>(())
    /// ```
    #[must_use]
    pub fn env_name(&self, prefix: Option<&str>) -> String {
        let body = self.canonical().replace('.', "_");
        let name = match prefix {
            Some(p) if p.ends_with('_') => format!("{p}{body}"),
            Some(p) => format!("{p}_{body}"),
            None => body,
        };
        name.to_ascii_uppercase()
    }

    /// Describe a field under this path for diagnostics.
    ///
    /// Unkeyed fields have no segment of their own, so their Rust identifier
    /// is appended in angle brackets.
    pub(crate) fn describe(&self, key: Option<&str>, ident: &str) -> String {
        let leaf = key.map_or_else(|| format!("<{ident}>"), str::to_owned);
        if self.is_root() {
            leaf
        } else {
            format!("{self}.{leaf}")
        }
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical())
    }
}

fn validate_segment(segment: &str) -> TagflagResult<()> {
    if segment.is_empty() {
        return Err(TagflagError::invalid_input("key tag must not be empty"));
    }
    if let Some(bad) = segment
        .chars()
        .find(|c| *c == '.' || *c == '=' || c.is_whitespace())
    {
        return Err(TagflagError::invalid_input(format!(
            "key tag `{segment}` contains forbidden character {bad:?}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, ensure};
    use rstest::rstest;

    fn path(segments: &[&'static str]) -> Result<KeyPath> {
        let mut key = KeyPath::root();
        for segment in segments {
            key = key.child(segment)?;
        }
        Ok(key)
    }

    #[rstest]
    #[case(&["port"], "port", "port", "PORT")]
    #[case(&["server", "port"], "server.port", "server-port", "SERVER_PORT")]
    #[case(&["db", "user_name"], "db.user_name", "db-user-name", "DB_USER_NAME")]
    #[case(
        &["server", "tls", "cert_file"],
        "server.tls.cert_file",
        "server-tls-cert-file",
        "SERVER_TLS_CERT_FILE"
    )]
    fn renders_all_three_forms(
        #[case] segments: &[&'static str],
        #[case] canonical: &str,
        #[case] flag: &str,
        #[case] env: &str,
    ) -> Result<()> {
        let key = path(segments)?;
        ensure!(key.canonical() == canonical, "canonical: {key}");
        ensure!(key.flag_name() == flag, "flag: {}", key.flag_name());
        ensure!(key.env_name(None) == env, "env: {}", key.env_name(None));
        Ok(())
    }

    #[rstest]
    #[case("")]
    #[case("a.b")]
    #[case("a=b")]
    #[case("a b")]
    fn rejects_malformed_segments(#[case] segment: &'static str) {
        let err = KeyPath::root().child(segment);
        assert!(matches!(err, Err(TagflagError::InvalidInput { .. })));
    }

    #[rstest]
    fn child_leaves_parent_untouched() -> Result<()> {
        let parent = path(&["server"])?;
        let child = parent.child("port")?;
        ensure!(parent.segments() == ["server"]);
        ensure!(child.segments() == ["server", "port"]);
        Ok(())
    }

    #[rstest]
    fn describe_marks_unkeyed_fields() -> Result<()> {
        let parent = path(&["server"])?;
        ensure!(parent.describe(Some("hosts"), "hosts") == "server.hosts");
        ensure!(parent.describe(None, "extra") == "server.<extra>");
        ensure!(KeyPath::root().describe(None, "extra") == "<extra>");
        Ok(())
    }
}
