//! Integration tests for the `courseforge` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to exercise the project, level,
//! conflicts, and validate subcommands through the actual binary, including
//! stdin/stdout piping, file I/O, configuration, and error handling. Every
//! projection pins `--now` so results do not depend on the wall clock.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn schedules_json() -> String {
    std::fs::read_to_string(fixture("schedules.json")).expect("schedules.json fixture must exist")
}

/// A command isolated from any developer `courseforge.toml` or environment overrides.
fn courseforge() -> Command {
    let mut cmd = Command::cargo_bin("courseforge").unwrap();
    cmd.current_dir(env!("CARGO_MANIFEST_DIR"))
        .env_remove("RUST_LOG")
        .env_remove("COURSEFORGE_TIMEZONE")
        .env_remove("COURSEFORGE_HORIZON_DAYS")
        .env_remove("COURSEFORGE_LOGGING__LEVEL");
    cmd
}

fn parse_array(stdout: &[u8]) -> Vec<serde_json::Value> {
    let value: serde_json::Value = serde_json::from_slice(stdout).expect("stdout must be JSON");
    value.as_array().expect("stdout must be a JSON array").clone()
}

// ─────────────────────────────────────────────────────────────────────────────
// project
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn project_file_to_stdout_sorted_by_start() {
    // 2026-03-05 is a Thursday.
    let output = courseforge()
        .args(["project", "-i", fixture("schedules.json").as_str(), "--now", "2026-03-05T10:00", "--horizon", "7"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let occurrences = parse_array(&output);
    let summary: Vec<(&str, &str)> = occurrences
        .iter()
        .map(|o| (o["scheduleId"].as_str().unwrap(), o["startAt"].as_str().unwrap()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("csc201", "2026-03-05T14:00:00"),
            ("csc201", "2026-03-09T09:00:00"),
            ("mth202", "2026-03-09T10:00:00"),
            ("mth202", "2026-03-11T08:00:00"),
            ("csc201", "2026-03-12T14:00:00"),
        ]
    );
    assert_eq!(occurrences[0]["id"], "csc201-2026-03-05");
    assert_eq!(occurrences[0]["label"], "Data Structures");
    assert_eq!(occurrences[0]["location"], "LT 2");
    assert_eq!(occurrences[0]["endAt"], "2026-03-05T15:00:00");
}

#[test]
fn project_stdin_to_stdout() {
    courseforge()
        .args(["project", "--now", "2026-03-05T10:00", "--horizon", "0"])
        .write_stdin(schedules_json())
        .assert()
        .success()
        .stdout(predicate::str::contains("csc201-2026-03-05"))
        .stdout(predicate::str::contains("mth202").not());
}

#[test]
fn project_from_defaults_to_now_but_can_be_moved() {
    let output = courseforge()
        .args([
            "project",
            "-i",
            fixture("schedules.json").as_str(),
            "--now",
            "2026-03-05T10:00",
            "--from",
            "2026-03-11",
            "--horizon",
            "0",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let occurrences = parse_array(&output);
    assert_eq!(occurrences.len(), 1);
    assert_eq!(occurrences[0]["id"], "mth202-2026-03-11");
}

#[test]
fn project_file_to_file() {
    let output_path = std::env::temp_dir().join("courseforge-test-project-output.json");
    let _ = std::fs::remove_file(&output_path);

    courseforge()
        .args(["project", "-i", fixture("schedules.json").as_str(), "--now", "2026-03-05T10:00"])
        .arg("-o")
        .arg(&output_path)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let content = std::fs::read_to_string(&output_path).expect("output file must exist");
    assert_eq!(parse_array(content.as_bytes()).len(), 5, "default horizon is 7 days");

    let _ = std::fs::remove_file(&output_path);
}

#[test]
fn project_absolute_adds_utc_instants() {
    let output = courseforge()
        .args([
            "project",
            "-i",
            fixture("schedules.json").as_str(),
            "--now",
            "2026-03-05T10:00",
            "--horizon",
            "0",
            "--timezone",
            "America/New_York",
            "--absolute",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let occurrences = parse_array(&output);
    assert_eq!(occurrences.len(), 1);
    // 14:00 EST (UTC-5)
    assert_eq!(occurrences[0]["startAt"], "2026-03-05T14:00:00");
    assert_eq!(occurrences[0]["startUtc"], "2026-03-05T19:00:00Z");
    assert_eq!(occurrences[0]["endUtc"], "2026-03-05T20:00:00Z");
}

#[test]
fn project_rfc3339_now_is_converted_into_timezone() {
    // 15:30Z is 10:30 in New York, so the 14:00 lecture is still upcoming.
    courseforge()
        .args([
            "project",
            "-i",
            fixture("schedules.json").as_str(),
            "--now",
            "2026-03-05T15:30:00Z",
            "--horizon",
            "0",
            "--timezone",
            "America/New_York",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("csc201-2026-03-05"));
}

#[test]
fn project_rejects_malformed_time() {
    courseforge()
        .args(["project", "-i", fixture("invalid_slot.json").as_str(), "--now", "2026-03-05T10:00"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("9:00"));
}

#[test]
fn project_rejects_bad_now() {
    courseforge()
        .args(["project", "-i", fixture("schedules.json").as_str(), "--now", "yesterday"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid --now"));
}

#[test]
fn project_rejects_unknown_timezone() {
    courseforge()
        .args([
            "project",
            "-i",
            fixture("schedules.json").as_str(),
            "--now",
            "2026-03-05T10:00",
            "--timezone",
            "Mars/Olympus_Mons",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid timezone"));
}

#[test]
fn project_missing_input_file_fails() {
    courseforge()
        .args(["project", "-i", "/nonexistent/schedules.json", "--now", "2026-03-05T10:00"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

// ─────────────────────────────────────────────────────────────────────────────
// configuration
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn config_file_sets_horizon_and_timezone() {
    let output = courseforge()
        .args([
            "--config",
            fixture("courseforge.toml").as_str(),
            "project",
            "-i",
            fixture("schedules.json").as_str(),
            "--now",
            "2026-03-05T10:00",
            "--absolute",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    // horizon_days = 1 covers Thursday and Friday only; New York is UTC-5 in early March.
    let occurrences = parse_array(&output);
    assert_eq!(occurrences.len(), 1);
    assert_eq!(occurrences[0]["startUtc"], "2026-03-05T19:00:00Z");
}

#[test]
fn environment_overrides_default_horizon() {
    let output = courseforge()
        .env("COURSEFORGE_HORIZON_DAYS", "0")
        .args(["project", "-i", fixture("schedules.json").as_str(), "--now", "2026-03-05T10:00"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    assert_eq!(parse_array(&output).len(), 1);
}

#[test]
fn flag_overrides_config_horizon() {
    let output = courseforge()
        .args([
            "--config",
            fixture("courseforge.toml").as_str(),
            "project",
            "-i",
            fixture("schedules.json").as_str(),
            "--now",
            "2026-03-05T10:00",
            "--horizon",
            "7",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    assert_eq!(parse_array(&output).len(), 5);
}

#[test]
fn missing_explicit_config_file_fails() {
    courseforge()
        .args(["--config", "/nonexistent/courseforge.toml", "level", "PS/ITC/21/0001"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}

// ─────────────────────────────────────────────────────────────────────────────
// level
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn level_of_2021_student_in_2025_is_400() {
    courseforge()
        .args(["level", "PS/ITC/21/0001", "--today", "2025-03-01"])
        .assert()
        .success()
        .stdout("400\n");
}

#[test]
fn level_of_new_student_is_100() {
    courseforge()
        .args(["level", "PS/ITC/24/0007", "--today", "2024-10-01"])
        .assert()
        .success()
        .stdout("100\n");
}

#[test]
fn level_of_garbage_identifier_is_100() {
    courseforge()
        .args(["level", "garbage", "--today", "2025-03-01"])
        .assert()
        .success()
        .stdout("100\n");
}

#[test]
fn level_without_today_uses_clock() {
    courseforge()
        .args(["level", "PS/ITC/00/0001"])
        .assert()
        .success()
        .stdout("400\n");
}

// ─────────────────────────────────────────────────────────────────────────────
// conflicts
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn conflicts_reports_monday_clash() {
    let output = courseforge()
        .args(["conflicts", "-i", fixture("schedules.json").as_str()])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let conflicts = parse_array(&output);
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0]["day"], "Monday");
    assert_eq!(conflicts[0]["first"]["scheduleId"], "csc201");
    assert_eq!(conflicts[0]["second"]["scheduleId"], "mth202");
    assert_eq!(conflicts[0]["overlapMinutes"], 60);
}

#[test]
fn conflicts_empty_document_is_empty_array() {
    courseforge()
        .arg("conflicts")
        .write_stdin("[]")
        .assert()
        .success()
        .stdout("[]\n");
}

// ─────────────────────────────────────────────────────────────────────────────
// validate
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn validate_counts_schedules_and_slots() {
    courseforge()
        .args(["validate", "-i", fixture("schedules.json").as_str()])
        .assert()
        .success()
        .stdout("OK: 3 schedules, 4 slots\n");
}

#[test]
fn validate_rejects_weekend_slot() {
    courseforge()
        .args(["validate", "-i", fixture("weekend_slot.json").as_str()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Saturday"));
}

#[test]
fn validate_rejects_invalid_json() {
    courseforge()
        .arg("validate")
        .write_stdin("{not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid schedules"));
}

// ─────────────────────────────────────────────────────────────────────────────
// General
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn no_subcommand_prints_usage_and_fails() {
    courseforge()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn help_lists_subcommands() {
    courseforge()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("project"))
        .stdout(predicate::str::contains("level"))
        .stdout(predicate::str::contains("conflicts"))
        .stdout(predicate::str::contains("validate"));
}
