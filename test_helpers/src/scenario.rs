//! Sandboxed load scenarios.
//!
//! A [`Scenario`] collects the files, environment variables and command line
//! a test needs, then runs the test body inside a [`figment::Jail`]: a fresh
//! temporary working directory whose environment changes are undone
//! afterwards.

use std::ffi::OsString;

use anyhow::{Result, anyhow};

use crate::args::argv;

/// Files, environment and arguments for one isolated run.
///
/// ```
/// use tagflag_test_helpers::Scenario;
///
/// let args = Scenario::new()
///     .file("config.yml", "server:\n  port: 7000\n")
///     .env("DB_HOST", "db.internal")
///     .args(&["--server-port=9090"])
///     .run(|args| {
///         assert_eq!(std::env::var("DB_HOST").as_deref(), Ok("db.internal"));
///         assert!(std::path::Path::new("config.yml").exists());
///         args.len()
///     })?;
/// assert_eq!(args, 2);
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Debug, Clone)]
#[must_use]
pub struct Scenario {
    files: Vec<(String, String)>,
    env: Vec<(String, String)>,
    args: Vec<OsString>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self::new()
    }
}

impl Scenario {
    /// No files, no variables, and an argument vector holding only the
    /// binary name.
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            env: Vec::new(),
            args: argv(&[]),
        }
    }

    /// Create `name` in the working directory before the run.
    pub fn file(mut self, name: &str, contents: &str) -> Self {
        self.files.push((name.to_owned(), contents.to_owned()));
        self
    }

    /// Set an environment variable for the run.
    pub fn env(mut self, name: &str, value: &str) -> Self {
        self.env.push((name.to_owned(), value.to_owned()));
        self
    }

    /// Command-line arguments after the binary name.
    pub fn args(mut self, args: &[&str]) -> Self {
        self.args = argv(args);
        self
    }

    /// Run `body` inside the jail, handing it the argument vector.
    ///
    /// `body` may return a `Result` of its own; it is passed through
    /// untouched so tests can inspect expected failures.
    ///
    /// # Errors
    ///
    /// Returns an error when the jail or one of its files cannot be created.
    pub fn run<T>(self, body: impl FnOnce(Vec<OsString>) -> T) -> Result<T> {
        let Self { files, env, args } = self;
        let mut output = None;
        figment::Jail::try_with(|jail| {
            for (name, contents) in &files {
                jail.create_file(name, contents)?;
            }
            for (name, value) in &env {
                jail.set_env(name, value);
            }
            output = Some(body(args));
            Ok(())
        })
        .map_err(|err| anyhow!("scenario setup failed: {err}"))?;
        output.ok_or_else(|| anyhow!("scenario body did not run"))
    }
}
