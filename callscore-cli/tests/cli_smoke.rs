//! Smoke tests to verify command wiring

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_serve_help() {
    let mut cmd = Command::cargo_bin("callscore").unwrap();
    cmd.arg("serve").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--in-memory"))
        .stdout(predicate::str::contains("--seed"))
        .stdout(predicate::str::contains("DATABRICKS_AGENT_ENDPOINT"));
}

#[test]
fn test_init_table_help() {
    let mut cmd = Command::cargo_bin("callscore").unwrap();
    cmd.arg("init-table").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("LAKEBASE_INSTANCE_NAME"));
}

#[test]
fn test_query_requires_database() {
    let mut cmd = Command::cargo_bin("callscore").unwrap();
    cmd.current_dir(std::env::temp_dir())
        .env_remove("DATABASE_URL")
        .env_remove("LAKEBASE_INSTANCE_NAME")
        .env_remove("LAKEBASE_DB_NAME")
        .arg("query")
        .arg("SELECT 1");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("No database configured"));
}

#[test]
fn test_seed_requires_in_memory() {
    let mut cmd = Command::cargo_bin("callscore").unwrap();
    cmd.arg("serve").arg("--seed").arg("calls.json");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("--in-memory"));
}

#[test]
fn test_missing_seed_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("callscore").unwrap();
    cmd.arg("serve")
        .arg("--in-memory")
        .arg("--seed")
        .arg(dir.path().join("missing.json"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read seed file"));
}

#[test]
fn test_unknown_command_fails() {
    let mut cmd = Command::cargo_bin("callscore").unwrap();
    cmd.arg("frobnicate");

    cmd.assert().failure();
}
