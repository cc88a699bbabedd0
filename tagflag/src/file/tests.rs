//! Unit tests for configuration file loading.

use super::*;
use anyhow::{Result, anyhow, ensure};
use rstest::{fixture, rstest};
use tempfile::TempDir;

#[fixture]
fn dir() -> TempDir {
    tempfile::tempdir().unwrap_or_else(|err| panic!("create temp dir: {err}"))
}

fn write(dir: &TempDir, name: &str, contents: &str) -> Result<PathBuf> {
    let path = dir.path().join(name);
    std::fs::write(&path, contents)?;
    Ok(path)
}

fn table<'a>(dict: &'a Dict, key: &str) -> Result<&'a Dict> {
    dict.get(key)
        .and_then(figment::value::Value::as_dict)
        .ok_or_else(|| anyhow!("missing table `{key}`"))
}

#[rstest]
fn missing_file_is_not_an_error(dir: TempDir) -> Result<()> {
    let loaded = load_config_file(&dir.path().join("config.yml"))?;
    ensure!(loaded.is_none());
    Ok(())
}

#[rstest]
fn reads_nested_yaml(dir: TempDir) -> Result<()> {
    let path = write(&dir, "config.yml", "server:\n  port: 7000\ndb:\n  host: db.local\n")?;
    let file = load_config_file(&path)?.ok_or_else(|| anyhow!("file should load"))?;
    ensure!(file.path() == path);
    let server = table(file.values(), "server")?;
    ensure!(server.get("port").and_then(figment::value::Value::to_u128) == Some(7000));
    let host = table(file.values(), "db")?
        .get("host")
        .and_then(figment::value::Value::as_str);
    ensure!(host == Some("db.local"));
    Ok(())
}

#[rstest]
#[case("")]
#[case("   \n\n")]
fn blank_file_is_an_empty_table(dir: TempDir, #[case] contents: &str) -> Result<()> {
    let path = write(&dir, "config.yml", contents)?;
    let file = load_config_file(&path)?.ok_or_else(|| anyhow!("file should load"))?;
    ensure!(file.values().is_empty());
    Ok(())
}

#[rstest]
#[case::malformed_yaml("config.yml", "server: [unclosed\n")]
#[case::top_level_list("config.yml", "- a\n- b\n")]
#[case::malformed_json("config.json", "{\"server\": ")]
#[case::malformed_toml("config.toml", "server = [\n")]
fn rejects_unusable_files(dir: TempDir, #[case] name: &str, #[case] contents: &str) -> Result<()> {
    let path = write(&dir, name, contents)?;
    let err = load_config_file(&path);
    ensure!(
        matches!(&err, Err(TagflagError::FileRead { path: p, .. }) if *p == path),
        "unexpected: {err:?}"
    );
    Ok(())
}

#[rstest]
fn directory_in_place_of_file_is_an_error(dir: TempDir) -> Result<()> {
    let err = load_config_file(dir.path());
    ensure!(matches!(err, Err(TagflagError::FileRead { .. })), "unexpected: {err:?}");
    Ok(())
}

#[rstest]
#[case("config.json", "{\"server\": {\"port\": 7001}}")]
#[case("config.toml", "[server]\nport = 7001\n")]
#[case("config.YAML", "server:\n  port: 7001\n")]
fn selects_parser_by_extension(
    dir: TempDir,
    #[case] name: &str,
    #[case] contents: &str,
) -> Result<()> {
    let path = write(&dir, name, contents)?;
    let file = load_config_file(&path)?.ok_or_else(|| anyhow!("file should load"))?;
    let server = table(file.values(), "server")?;
    ensure!(server.get("port").and_then(figment::value::Value::to_u128) == Some(7001));
    Ok(())
}

#[rstest]
fn file_status_reports_path() {
    let found = FileStatus::Found(PathBuf::from("a.yml"));
    let missing = FileStatus::NotFound(PathBuf::from("b.yml"));
    assert!(found.is_found());
    assert!(!missing.is_found());
    assert_eq!(missing.path(), Path::new("b.yml"));
}
