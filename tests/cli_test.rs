//! CLI tests for the fmcsa-register binary.
//!
//! Only offline paths run here; scraping against the live upstream is not
//! exercised from tests.

use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    #[allow(clippy::expect_used)]
    Command::cargo_bin("fmcsa-register").expect("binary builds")
}

#[test]
fn scrape_rejects_malformed_date_token_before_any_network_call() {
    cmd()
        .args(["scrape", "2026-02-20"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date token"));
}

#[test]
fn scrape_rejects_impossible_calendar_date() {
    cmd()
        .args(["scrape", "30-FEB-26"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date token"));
}

#[test]
fn records_lists_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("records.json");

    cmd()
        .args(["records", "--store"])
        .arg(&store)
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: 0"));
}

#[test]
fn stored_dates_lists_nothing_for_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("records.json");

    cmd()
        .args(["stored-dates", "--store"])
        .arg(&store)
        .assert()
        .success()
        .stdout(predicate::str::contains("Stored register dates:"));
}

#[test]
fn help_names_all_subcommands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("dates"))
        .stdout(predicate::str::contains("scrape"))
        .stdout(predicate::str::contains("records"))
        .stdout(predicate::str::contains("stored-dates"));
}
