//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own data directory.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use tempfile::TempDir;

fn pomotick(home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_pomotick"));
    cmd.env("POMOTICK_HOME", home)
        .env_remove("POMOTICK_LOG")
        .env_remove("POMOTICK_ENV");
    cmd
}

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(home: &Path, args: &[&str]) -> (String, String, i32) {
    let output = pomotick(home)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);
    (stdout, stderr, code)
}

fn run_ok(home: &Path, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(home, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    stdout
}

fn json(home: &Path, args: &[&str]) -> serde_json::Value {
    serde_json::from_str(&run_ok(home, args)).expect("Failed to parse JSON output")
}

#[test]
fn test_fresh_status_is_default_focus() {
    let home = TempDir::new().unwrap();
    let status = json(home.path(), &["timer", "status", "--json"]);
    assert_eq!(status["timeLeft"], 1500);
    assert_eq!(status["display"], "25:00");
    assert_eq!(status["isRunning"], false);
    assert_eq!(status["sessionCount"], 0);
    assert_eq!(status["dailyGoal"], 8);
}

#[test]
fn test_task_lifecycle() {
    let home = TempDir::new().unwrap();
    let home = home.path();

    let out = run_ok(home, &["task", "add", "Write spec"]);
    assert!(out.contains("#1 Write spec"));
    run_ok(home, &["task", "add", "Review"]);
    run_ok(home, &["task", "select", "1"]);
    run_ok(home, &["task", "toggle", "2"]);

    let tasks = json(home, &["task", "list", "--json"]);
    let tasks = tasks.as_array().unwrap();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0]["pomodoros"], 0);
    assert_eq!(tasks[1]["completed"], true);

    let status = json(home, &["timer", "status", "--json"]);
    assert_eq!(status["activeTask"]["id"], 1);

    run_ok(home, &["task", "remove", "1"]);
    let status = json(home, &["timer", "status", "--json"]);
    assert!(status["activeTask"].is_null());
}

#[test]
fn test_empty_task_and_unknown_id_fail() {
    let home = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(home.path(), &["task", "add", "   "]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));

    let (_, stderr, code) = run_cli(home.path(), &["task", "remove", "42"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("taskId"));
}

#[test]
fn test_settings_update_timer() {
    let home = TempDir::new().unwrap();
    let home = home.path();
    run_ok(home, &["settings", "set", "--focus", "50", "--interval", "2"]);

    let status = json(home, &["timer", "status", "--json"]);
    assert_eq!(status["timeLeft"], 3000);

    let settings = json(home, &["settings", "show", "--json"]);
    assert_eq!(settings["timers"]["focus"], 50);
    assert_eq!(settings["timers"]["break"], 5);
    assert_eq!(settings["longBreakInterval"], 2);
}

#[test]
fn test_invalid_settings_are_rejected() {
    let home = TempDir::new().unwrap();
    let home = home.path();
    for bad in ["abc", "0", "-5"] {
        let arg = format!("--focus={bad}");
        let (_, stderr, code) = run_cli(home, &["settings", "set", &arg]);
        assert_eq!(code, 1, "accepted focus={bad}");
        assert!(stderr.contains("focus"), "{stderr}");
    }
    let status = json(home, &["timer", "status", "--json"]);
    assert_eq!(status["timeLeft"], 1500);
}

#[test]
fn test_skip_moves_to_break_without_credit() {
    let home = TempDir::new().unwrap();
    let home = home.path();
    run_ok(home, &["timer", "skip"]);
    let status = json(home, &["timer", "status", "--json"]);
    assert_eq!(status["period"], "short_break");
    assert_eq!(status["timeLeft"], 300);
    assert_eq!(status["sessionCount"], 0);

    run_ok(home, &["timer", "reset"]);
    let status = json(home, &["timer", "status", "--json"]);
    assert_eq!(status["period"], "short_break");
    assert_eq!(status["timeLeft"], 300);
}

#[test]
fn test_run_quits_paused_and_saves() {
    let home = TempDir::new().unwrap();
    let mut child = pomotick(home.path())
        .args(["timer", "run"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(b"\nq\n").unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());

    let status = json(home.path(), &["timer", "status", "--json"]);
    assert_eq!(status["isRunning"], false);
    assert_eq!(status["period"], "focus");

    let state = std::fs::read_to_string(home.path().join("state.json")).unwrap();
    assert!(state.contains("\"isRunning\": false"));
}

#[test]
fn test_stats_week_has_seven_days() {
    let home = TempDir::new().unwrap();
    let week = json(home.path(), &["stats", "week", "--json"]);
    assert_eq!(week["days"].as_array().unwrap().len(), 7);
    assert_eq!(week["total"], 0);

    let chart = run_ok(home.path(), &["stats", "week"]);
    assert_eq!(chart.lines().count(), 7);
}

#[test]
fn test_config_get_set() {
    let home = TempDir::new().unwrap();
    let home = home.path();
    assert_eq!(run_ok(home, &["config", "get", "timer.auto_advance"]).trim(), "true");
    run_ok(home, &["config", "set", "timer.auto_advance", "false"]);
    assert_eq!(run_ok(home, &["config", "get", "timer.auto_advance"]).trim(), "false");

    let (_, _, code) = run_cli(home, &["config", "get", "no.such.key"]);
    assert_eq!(code, 1);

    run_ok(home, &["config", "reset"]);
    assert_eq!(run_ok(home, &["config", "get", "timer.auto_advance"]).trim(), "true");
}

#[test]
fn test_corrupt_state_falls_back_to_defaults() {
    let home = TempDir::new().unwrap();
    std::fs::write(home.path().join("state.json"), "not json").unwrap();
    let status = json(home.path(), &["timer", "status", "--json"]);
    assert_eq!(status["timeLeft"], 1500);
}
