//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary against a throwaway data directory and
//! verify its JSON output.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_mindpulse-cli"))
        .args(args)
        .env("MINDPULSE_DATA_DIR", data_dir)
        .env("RUST_LOG", "off")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_json(data_dir: &Path, args: &[&str]) -> serde_json::Value {
    let (stdout, stderr, code) = run_cli(data_dir, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    serde_json::from_str(&stdout).expect("stdout is JSON")
}

fn log(data_dir: &Path, window: &str, tags: &[&str]) -> (String, String, i32) {
    let mut args = vec![
        "checkin", "log", "--energy", "80", "--clarity", "70", "--emotion", "60", "--window",
        window,
    ];
    for tag in tags {
        args.push("--tag");
        args.push(tag);
    }
    run_cli(data_dir, &args)
}

#[test]
fn test_scores_on_fresh_install() {
    let dir = TempDir::new().unwrap();
    let scores = run_json(dir.path(), &["scores"]);
    assert_eq!(scores["mind_score"], 600);
    assert_eq!(scores["momentum"], 0.0);
    assert_eq!(scores["streak"]["current"], 0);
    assert_eq!(scores["level"]["level"], 1);
    assert!(scores["daily_goal"].is_object());
    assert!(dir.path().join("mindpulse.db").exists());
    assert!(dir.path().join("config.toml").exists());
}

#[test]
fn test_checkin_log_and_list() {
    let dir = TempDir::new().unwrap();
    let (stdout, stderr, code) = log(dir.path(), "morning", &["calm"]);
    assert_eq!(code, 0, "checkin log failed: {stderr}");

    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(report["streak"]["current"], 1);
    assert_eq!(report["momentum"], 34.0);
    assert_eq!(report["rings"]["ring1"], true);
    assert_eq!(report["events"][0]["type"], "CheckInSaved");

    let list = run_json(dir.path(), &["checkin", "list"]);
    let entries = list.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["window"], "checkIn1");
    assert_eq!(entries[0]["tags"][0], "calm");

    let scores = run_json(dir.path(), &["scores"]);
    assert_eq!(scores["traits"][0]["tag"], "calm");
    assert_eq!(scores["check_ins_today"][0], "checkIn1");
}

#[test]
fn test_duplicate_window_fails() {
    let dir = TempDir::new().unwrap();
    assert_eq!(log(dir.path(), "2", &[]).2, 0);

    let (_, stderr, code) = log(dir.path(), "2", &[]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"), "stderr: {stderr}");
}

#[test]
fn test_out_of_range_rating_fails() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(
        dir.path(),
        &[
            "checkin", "log", "--energy", "101", "--clarity", "50", "--emotion", "50",
            "--window", "1",
        ],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("energy"), "stderr: {stderr}");

    let list = run_json(dir.path(), &["checkin", "list"]);
    assert!(list.as_array().unwrap().is_empty());
}

#[test]
fn test_rings_through_actions() {
    let dir = TempDir::new().unwrap();
    assert_eq!(log(dir.path(), "1", &[]).2, 0);
    run_json(dir.path(), &["reflect"]);
    let report = run_json(dir.path(), &["insight"]);
    assert_eq!(report["rings"]["ring1"], true);
    assert_eq!(report["rings"]["ring2"], true);
    assert_eq!(report["rings"]["ring3"], true);
    assert_eq!(report["rings"]["bonus"], true);
}

#[test]
fn test_goal_show() {
    let dir = TempDir::new().unwrap();
    let goal = run_json(dir.path(), &["goal", "show"]);
    let name = goal["goal"].as_str().unwrap();
    assert!(["three-checkins", "add-tag", "reflect"].contains(&name));
    assert_eq!(goal["completed"], false);
}

#[test]
fn test_stats_commands() {
    let dir = TempDir::new().unwrap();
    assert_eq!(log(dir.path(), "1", &[]).2, 0);

    let today = run_json(dir.path(), &["stats", "today"]);
    assert_eq!(today["summary"]["count"], 1);
    assert_eq!(today["summary"]["energy"], 80.0);
    assert_eq!(today["display"]["energy"], "80.0");
    assert_eq!(today["display"]["focus"], "74.0");

    let week = run_json(dir.path(), &["stats", "week"]);
    assert_eq!(week["stats"]["count"], 1);

    let history = run_json(dir.path(), &["stats", "history", "--days", "3"]);
    assert_eq!(history.as_array().unwrap().len(), 3);
}

#[test]
fn test_stats_today_without_data_shows_na() {
    let dir = TempDir::new().unwrap();
    let today = run_json(dir.path(), &["stats", "today"]);
    assert_eq!(today["summary"]["count"], 0);
    assert_eq!(today["display"]["energy"], "N/A");
    assert_eq!(today["display"]["focus"], "N/A");
}

#[test]
fn test_stats_history_rejects_huge_range() {
    let dir = TempDir::new().unwrap();
    let (stdout, stderr, code) = run_cli(dir.path(), &["stats", "history", "--days", "200000000"]);
    assert_eq!(code, 2, "stderr: {stderr}");
    assert!(stdout.is_empty());
    assert!(!stderr.contains("panicked"), "stderr: {stderr}");

    let (_, _, code) = run_cli(dir.path(), &["stats", "history", "--days", "0"]);
    assert_eq!(code, 2);

    let history = run_json(dir.path(), &["stats", "history", "--days", "3650"]);
    assert_eq!(history.as_array().unwrap().len(), 3650);
}

#[test]
fn test_config_roundtrip() {
    let dir = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["config", "get", "logging.level"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "warn");

    let (_, _, code) = run_cli(
        dir.path(),
        &["config", "set", "engine.timezone_offset_minutes", "330"],
    );
    assert_eq!(code, 0);
    let (stdout, _, _) = run_cli(dir.path(), &["config", "get", "engine.timezone_offset_minutes"]);
    assert_eq!(stdout.trim(), "330");

    let (_, _, code) = run_cli(dir.path(), &["config", "set", "engine.nope", "1"]);
    assert_eq!(code, 1);

    let (_, _, code) = run_cli(dir.path(), &["config", "reset"]);
    assert_eq!(code, 0);
    let (stdout, _, _) = run_cli(dir.path(), &["config", "get", "engine.timezone_offset_minutes"]);
    assert_eq!(stdout.trim(), "null");
}
