//! CLI end-to-end tests
//!
//! Tests for the javscraper command-line interface against a local provider.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::{tempdir, TempDir};

/// Get a command for the javscraper binary
#[allow(deprecated)]
fn javscraper_cmd() -> Command {
    Command::cargo_bin("javscraper").unwrap()
}

/// A config with one local provider holding two records.
struct Fixture {
    dir: TempDir,
    config: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempdir().unwrap();
        let records = dir.path().join("records");
        fs::create_dir(&records).unwrap();
        fs::write(
            records.join("ABC-123.json"),
            r#"{
                "num": "ABC-123",
                "title": "Summer Story Jane Doe",
                "date": "2020-05-06",
                "genres": ["Drama", "HD"],
                "actors": ["Jane Doe"],
                "studio": "S1"
            }"#,
        )
        .unwrap();
        fs::write(
            records.join("XYZ-999.json"),
            r#"{"num": "XYZ-999", "title": "Other"}"#,
        )
        .unwrap();

        let config = dir.path().join("config.toml");
        fs::write(
            &config,
            format!(
                r#"
[metadata]
ignore_genres = ["HD"]
add_subtitle_genre = true

[providers]
timeout_secs = 5

[[providers.local]]
name = "library"
path = {records:?}

[cache]
path = {cache:?}
"#,
                records = records,
                cache = dir.path().join("cache"),
            ),
        )
        .unwrap();

        Self { dir, config }
    }

    fn cmd(&self) -> Command {
        let mut cmd = javscraper_cmd();
        cmd.arg("--config").arg(&self.config);
        cmd
    }

    fn cache_dir(&self) -> PathBuf {
        self.dir.path().join("cache")
    }
}

fn stdout_json(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "command failed: {:?}", output);
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_cli_no_args_shows_help() {
    let mut cmd = javscraper_cmd();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_help_flag() {
    let mut cmd = javscraper_cmd();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("javscraper"))
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("fetch"));
}

#[test]
fn test_cli_version_command() {
    let mut cmd = javscraper_cmd();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_cli_validate_config() {
    let fixture = Fixture::new();
    let mut cmd = javscraper_cmd();
    cmd.arg("validate")
        .arg(&fixture.config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("Local providers: 1"));
}

#[test]
fn test_cli_validate_rejects_invalid_config() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("bad.toml");
    fs::write(&config, "[providers]\ntimeout_secs = 0\n").unwrap();

    let mut cmd = javscraper_cmd();
    cmd.arg("validate")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("timeout"));
}

#[test]
fn test_cli_providers() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .arg("providers")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. library"));
}

#[test]
fn test_cli_search() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .args(["search", "abc123.mp4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ABC-123 Summer Story Jane Doe [library]"))
        .stdout(predicate::str::contains("Released: 2020-05-06"))
        .stdout(predicate::str::contains("XYZ-999").not());
}

#[test]
fn test_cli_search_json() {
    let fixture = Fixture::new();
    let hits = stdout_json(fixture.cmd().args(["search", "ABC-123", "--json"]));

    let hits = hits.as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["provider"], "library");
    assert_eq!(hits[0]["token"]["provider"], "library");
    assert_eq!(hits[0]["token"]["key"], "ABC-123");
}

#[test]
fn test_cli_search_skips_implausible_names() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .args(["search", "Summer Holiday Part Two"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing searched"));
}

#[test]
fn test_cli_fetch_normalizes_and_caches() {
    let fixture = Fixture::new();
    let result = stdout_json(fixture.cmd().args(["fetch", "ABC-123-C", "--json"]));

    assert_eq!(result["name"], "ABC-123 Summer Story");
    assert_eq!(result["genres"], serde_json::json!(["Drama", "中文字幕"]));
    assert_eq!(result["studios"], serde_json::json!(["S1"]));
    assert_eq!(result["queried_by_id"], false);

    assert!(fixture
        .cache_dir()
        .join("library")
        .join("ABC-123.json")
        .is_file());
}

#[test]
fn test_cli_fetch_by_token() {
    let fixture = Fixture::new();
    let result = stdout_json(fixture.cmd().args([
        "fetch",
        "--token",
        r#"{"provider":"library","key":"XYZ-999"}"#,
        "--json",
    ]));

    assert_eq!(result["name"], "XYZ-999 Other");
    assert_eq!(result["queried_by_id"], true);
}

#[test]
fn test_cli_fetch_not_found() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .args(["fetch", "NOPE-001"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No metadata found"));
}

#[test]
fn test_cli_fetch_rejects_bad_token() {
    let fixture = Fixture::new();
    fixture
        .cmd()
        .args(["fetch", "--token", "not-a-token"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to decode --token"));
}

#[test]
fn test_cli_fetch_requires_name_or_token() {
    let fixture = Fixture::new();
    fixture.cmd().arg("fetch").assert().failure();
}
