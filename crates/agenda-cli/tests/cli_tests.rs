//! Integration tests for the `agenda` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to exercise the query, rule
//! and tags subcommands through the actual binary.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

/// Helper: path to the events.json fixture.
fn events_json_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/events.json")
}

/// Helper: path to the config.json fixture.
fn config_json_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/config.json")
}

/// Helper: run `agenda query` with extra args and parse stdout as JSON.
fn query_ids(args: &[&str]) -> Vec<(String, Value)> {
    let output = Command::cargo_bin("agenda")
        .unwrap()
        .arg("query")
        .args(args)
        .output()
        .expect("agenda should run");
    assert!(output.status.success(), "query failed: {:?}", output);

    let parsed: Vec<Value> = serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    parsed
        .into_iter()
        .map(|o| (o["id"].as_str().unwrap().to_string(), o["occurrenceStart"].clone()))
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Query subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn query_march_from_file() {
    let result = query_ids(&[
        "-i",
        events_json_path(),
        "--from",
        "2024-03-01",
        "--to",
        "2024-03-31",
    ]);

    let ids: Vec<&str> = result.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "someday", "standup", "review", "standup", "standup", "broken", "standup"
        ]
    );
    assert_eq!(result[0].1, Value::Null);
    assert_eq!(result[1].1, "2024-03-04T09:00:00Z");
}

#[test]
fn query_from_stdin() {
    let input = r#"[{"id": "a", "title": "A", "start": "2024-03-10T00:00:00Z"}]"#;

    Command::cargo_bin("agenda")
        .unwrap()
        .args(["query", "--from", "2024-03-01T00:00:00Z", "--to", "2024-03-31T00:00:00Z"])
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""occurrenceStart": "2024-03-10T00:00:00Z""#));
}

#[test]
fn query_honors_config_file() {
    // One-month horizon from 2024-03-01 and at most two instances per series.
    let result = query_ids(&[
        "-i",
        events_json_path(),
        "--from",
        "2024-03-01",
        "--config",
        config_json_path(),
    ]);
    let standups = result.iter().filter(|(id, _)| id == "standup").count();
    assert_eq!(standups, 2);
}

#[test]
fn query_writes_output_file() {
    let dir = std::env::temp_dir().join(format!("agenda-cli-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let out = dir.join("occurrences.json");

    Command::cargo_bin("agenda")
        .unwrap()
        .args(["query", "-i", events_json_path(), "--from", "2024-03-09", "--to", "2024-03-11"])
        .args(["-o", out.to_str().unwrap()])
        .assert()
        .success();

    let written: Vec<Value> =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(written.len(), 2, "someday + review");
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn query_rejects_inverted_window() {
    Command::cargo_bin("agenda")
        .unwrap()
        .args(["query", "-i", events_json_path(), "--from", "2024-03-31", "--to", "2024-03-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("window"));
}

#[test]
fn query_rejects_bad_json() {
    Command::cargo_bin("agenda")
        .unwrap()
        .args(["query", "--from", "2024-03-01", "--to", "2024-03-31"])
        .write_stdin("not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse events JSON"));
}

#[test]
fn query_rejects_bad_date() {
    Command::cargo_bin("agenda")
        .unwrap()
        .args(["query", "-i", events_json_path(), "--from", "March"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date or timestamp"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Rule subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn rule_for_quarterly_with_until() {
    Command::cargo_bin("agenda")
        .unwrap()
        .args(["rule", "quarterly", "--until", "2025-01-01"])
        .assert()
        .success()
        .stdout("FREQ=MONTHLY;INTERVAL=3;UNTIL=20250101T000000Z\n");
}

#[test]
fn rule_for_none_prints_nothing() {
    Command::cargo_bin("agenda")
        .unwrap()
        .args(["rule", "none"])
        .assert()
        .success()
        .stdout("");
}

#[test]
fn rule_for_daily_fails() {
    Command::cargo_bin("agenda")
        .unwrap()
        .args(["rule", "daily"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unrecognized recurrence category"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Tags subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn tags_from_hashtags() {
    Command::cargo_bin("agenda")
        .unwrap()
        .args(["tags", "#report #urgent"])
        .assert()
        .success()
        .stdout("[\"report\",\"urgent\"]\n");
}

#[test]
fn tags_from_empty_text() {
    Command::cargo_bin("agenda")
        .unwrap()
        .args(["tags", ""])
        .assert()
        .success()
        .stdout("[]\n");
}
