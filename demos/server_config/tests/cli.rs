//! Runs the compiled `server_config` binary end to end.

use anyhow::{Context, Result, ensure};
use assert_cmd::Command;
use rstest::{fixture, rstest};
use tempfile::TempDir;

#[fixture]
fn workdir() -> TempDir {
    tempfile::tempdir().unwrap_or_else(|err| panic!("create workdir: {err}"))
}

/// Run the binary in `dir` with a clean environment plus `env`.
fn run(dir: &TempDir, args: &[&str], env: &[(&str, &str)]) -> Result<std::process::Output> {
    #[expect(
        deprecated,
        reason = "cargo_bin is the standard assert_cmd API for locating workspace binaries"
    )]
    let mut cmd = Command::cargo_bin("server_config")?;
    cmd.current_dir(dir.path())
        .env_clear()
        .env("RUST_BACKTRACE", "0")
        .args(args);
    for (key, value) in env {
        cmd.env(key, value);
    }
    Ok(cmd.output()?)
}

fn stdout_json(output: &std::process::Output) -> Result<serde_json::Value> {
    ensure!(
        output.status.success(),
        "binary failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).context("stdout is not JSON")
}

#[rstest]
fn defaults_without_file_env_or_flags(workdir: TempDir) -> Result<()> {
    let json = stdout_json(&run(&workdir, &[], &[])?)?;
    ensure!(json["server"]["port"] == 8080);
    ensure!(json["server"]["passport_key"] == "");
    ensure!(json["db"]["host"] == "localhost");
    Ok(())
}

#[rstest]
fn flag_overrides_file_and_environment(workdir: TempDir) -> Result<()> {
    std::fs::write(workdir.path().join("config.yml"), "server:\n  port: 7000\n")?;
    let output = run(&workdir, &["--server-port=9090"], &[("SERVER_PORT", "8000")])?;
    let json = stdout_json(&output)?;
    ensure!(json["server"]["port"] == 9090);
    Ok(())
}

#[rstest]
fn environment_sets_db_host(workdir: TempDir) -> Result<()> {
    let json = stdout_json(&run(&workdir, &[], &[("DB_HOST", "db.internal")])?)?;
    ensure!(json["db"]["host"] == "db.internal");
    Ok(())
}

#[rstest]
fn help_exits_successfully(workdir: TempDir) -> Result<()> {
    let output = run(&workdir, &["--help"], &[])?;
    ensure!(output.status.success());
    let help = String::from_utf8_lossy(&output.stdout);
    ensure!(help.contains("--server-port"), "help was: {help}");
    ensure!(help.contains("--db-host"), "help was: {help}");
    Ok(())
}

#[rstest]
fn validation_failure_is_reported(workdir: TempDir) -> Result<()> {
    let output = run(&workdir, &["--db-pool-size=0"], &[])?;
    ensure!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    ensure!(stderr.contains("db.pool_size"), "stderr was: {stderr}");
    Ok(())
}

#[rstest]
fn emit_docs_lists_flags(workdir: TempDir) -> Result<()> {
    #[expect(
        deprecated,
        reason = "cargo_bin is the standard assert_cmd API for locating workspace binaries"
    )]
    let mut cmd = Command::cargo_bin("emit_docs")?;
    let output = cmd.current_dir(workdir.path()).output()?;
    let json = stdout_json(&output)?;
    ensure!(json["fields"][0]["flag"] == "--server-port");
    ensure!(json["fields"][0]["env"] == "SERVER_PORT");
    ensure!(json["config_flag"] == "--config");
    Ok(())
}
