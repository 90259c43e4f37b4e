//! CLI output integration tests.

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn marketarb() -> Command {
    Command::cargo_bin("marketarb").unwrap()
}

fn temp_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn cli_returns_nonzero_on_zero_poll_interval() {
    let config = temp_config("poll_interval_seconds = 0\n");

    marketarb()
        .args(["--config"])
        .arg(config.path())
        .args(["run", "--no-banner"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("poll_interval_seconds"));
}

#[test]
fn cli_returns_nonzero_on_missing_private_key_path() {
    let toml = concat!(
        "database_url = \"marketarb-cli-test.sqlite3\"\n",
        "\n",
        "[venue_b]\n",
        "base_url = \"https://trading-api.example-venue-b.com\"\n",
    );
    let config = temp_config(toml);

    marketarb()
        .env("VENUE_B_ACCESS_KEY", "some-access-key")
        .args(["--config"])
        .arg(config.path())
        .args(["run", "--no-banner"])
        .assert()
        .failure();
}

#[test]
fn status_on_fresh_config_reports_no_opportunities_or_missing_db() {
    let db_path = tempfile::Builder::new().suffix(".sqlite3").tempfile().unwrap();
    let toml = format!("database_url = \"{}\"\n", db_path.path().display());
    let config = temp_config(&toml);

    marketarb()
        .args(["--config"])
        .arg(config.path())
        .args(["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("marketarb status"));
}

#[test]
fn run_help_lists_run_and_status_subcommands() {
    marketarb()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("status"));
}
