//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary against a throwaway data directory and
//! verify outputs.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    run_cli_with_input(data_dir, args, "")
}

fn run_cli_with_input(data_dir: &Path, args: &[&str], input: &str) -> (String, String, i32) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_habitrack"))
        .args(args)
        .env("HABITRACK_DATA_DIR", data_dir)
        .env_remove("HABITRACK_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute CLI command");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(input.as_bytes())
        .expect("Failed to write stdin");

    let output = child.wait_with_output().expect("Failed to wait for CLI");
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn test_habit_add_and_list() {
    let dir = tempfile::tempdir().unwrap();

    let (stdout, _, code) = run_cli(dir.path(), &["habit", "add", "Read, slowly"]);
    assert_eq!(code, 0, "Habit add failed");
    assert!(stdout.starts_with("Added: H0001 | Read, slowly | DAILY | created "));

    let (stdout, _, code) = run_cli(dir.path(), &["habit", "add", "Run", "--frequency", "weekly"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("H0002 | Run | WEEKLY"));

    let (stdout, _, code) = run_cli(dir.path(), &["habit", "list"]);
    assert_eq!(code, 0, "Habit list failed");
    assert!(stdout.starts_with("Habits:\n"));
    assert!(stdout.contains("H0001 | Read, slowly"));
    assert!(stdout.contains("H0002 | Run"));
}

#[test]
fn test_habit_list_json() {
    let dir = tempfile::tempdir().unwrap();
    run_cli(dir.path(), &["habit", "add", "Stretch"]);

    let (stdout, _, code) = run_cli(dir.path(), &["habit", "list", "--json"]);
    assert_eq!(code, 0, "Habit list JSON failed");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let habits = parsed.as_array().unwrap();
    assert_eq!(habits.len(), 1);
    assert_eq!(habits[0]["id"], "H0001");
    assert_eq!(habits[0]["frequency"], "DAILY");
}

#[test]
fn test_empty_list() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["habit", "list"]);
    assert_eq!(code, 0);
    assert_eq!(stdout, "No habits yet.\n");
}

#[test]
fn test_log_and_streak() {
    let dir = tempfile::tempdir().unwrap();
    run_cli(dir.path(), &["habit", "add", "Read"]);

    let (stdout, _, code) = run_cli(dir.path(), &["habit", "log", "h0001"]);
    assert_eq!(code, 0, "Habit log failed");
    assert_eq!(stdout, "Logged completion for H0001 (today).\n");

    let (stdout, _, code) = run_cli(dir.path(), &["habit", "streak", "H0001"]);
    assert_eq!(code, 0);
    assert_eq!(stdout, "Current streak for H0001: 1 day(s)\n");

    let (stdout, _, code) = run_cli(dir.path(), &["habit", "show", "H0001", "--json"]);
    assert_eq!(code, 0);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["streak"], 1);
    assert_eq!(parsed["completions"], 1);
    assert_eq!(parsed["habit"]["name"], "Read");
}

#[test]
fn test_log_unknown_habit_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["habit", "log", "H0099"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error: Habit not found: H0099"));
}

#[test]
fn test_ids_continue_after_reload() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("habits.csv"),
        "H0002,a,DAILY,2026-01-01\nH0005,b,WEEKLY,2026-01-01\n",
    )
    .unwrap();

    let (stdout, _, code) = run_cli(dir.path(), &["habit", "add", "c"]);
    assert_eq!(code, 0);
    assert!(stdout.starts_with("Added: H0006 |"));
}

#[test]
fn test_corrupt_data_starts_fresh() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("habits.csv")).unwrap();

    let (stdout, _, code) = run_cli(dir.path(), &["habit", "list"]);
    assert_eq!(code, 0);
    assert_eq!(stdout, "No habits yet.\n");
}

#[test]
fn test_shell_session() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli_with_input(
        dir.path(),
        &[],
        "1\nDrink water\nDAILY\n3\nH0001\n4\nH0001\n7\n",
    );
    assert_eq!(code, 0, "Shell failed");
    assert!(stdout.contains("Added: H0001 | Drink water | DAILY"));
    assert!(stdout.contains("Current streak for H0001: 1 day(s)"));
    assert!(stdout.contains("Goodbye."));

    let (stdout, _, _) = run_cli(dir.path(), &["habit", "list"]);
    assert!(stdout.contains("H0001 | Drink water"));
}

#[test]
fn test_config_get_set_list() {
    let dir = tempfile::tempdir().unwrap();

    let (stdout, _, code) = run_cli(dir.path(), &["config", "get", "reminders.interval_secs"]);
    assert_eq!(code, 0, "Config get failed");
    assert_eq!(stdout.trim(), "30");

    let (stdout, _, code) = run_cli(dir.path(), &["config", "set", "reminders.interval_secs", "45"]);
    assert_eq!(code, 0, "Config set failed");
    assert_eq!(stdout.trim(), "reminders.interval_secs = 45");

    let (stdout, _, code) = run_cli(dir.path(), &["config", "list"]);
    assert_eq!(code, 0, "Config list failed");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["reminders"]["interval_secs"], 45);
}

#[test]
fn test_config_rejects_unknown_key_and_zero_interval() {
    let dir = tempfile::tempdir().unwrap();

    let (_, stderr, code) = run_cli(dir.path(), &["config", "get", "reminders.nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown config key: reminders.nope"));

    let (_, stderr, code) = run_cli(dir.path(), &["config", "set", "reminders.interval_secs", "0"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("reminders.interval_secs"));
}

#[test]
fn test_custom_storage_file() {
    let dir = tempfile::tempdir().unwrap();
    run_cli(dir.path(), &["config", "set", "storage.habits_file", "mine.csv"]);
    run_cli(dir.path(), &["habit", "add", "Journal"]);

    let content = std::fs::read_to_string(dir.path().join("mine.csv")).unwrap();
    assert!(content.starts_with("H0001,Journal,DAILY,"));
}

#[test]
fn test_broken_config_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("config.toml"), "reminders = [").unwrap();

    let (stdout, _, code) = run_cli(dir.path(), &["habit", "add", "Walk"]);
    assert_eq!(code, 0);
    assert!(stdout.starts_with("Added: H0001 | Walk |"));
    assert!(dir.path().join("habits.csv").exists());
}

#[test]
fn test_shell_starts_reminders_with_huge_delay() {
    let dir = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(
        dir.path(),
        &["config", "set", "reminders.initial_delay_secs", "18446744073709551615"],
    );
    assert_eq!(code, 0);

    let (stdout, _, code) = run_cli_with_input(dir.path(), &[], "5\n6\n7\n");
    assert_eq!(code, 0, "Shell failed");
    assert!(stdout.contains("Reminders started."));
    assert!(stdout.contains("Reminders stopped."));
    assert!(stdout.contains("Goodbye."));
}

#[test]
fn test_config_paths_and_reset() {
    let dir = tempfile::tempdir().unwrap();
    run_cli(dir.path(), &["config", "set", "storage.logs_file", "history.csv"]);

    let (stdout, _, code) = run_cli(dir.path(), &["config", "paths"]);
    assert_eq!(code, 0, "Config paths failed");
    assert!(stdout.contains("config.toml"));
    assert!(stdout.contains("history.csv"));

    let (stdout, _, code) = run_cli(dir.path(), &["config", "reset"]);
    assert_eq!(code, 0, "Config reset failed");
    assert_eq!(stdout, "Settings restored to defaults.\n");

    let (stdout, _, _) = run_cli(dir.path(), &["config", "get", "storage.logs_file"]);
    assert_eq!(stdout.trim(), "logs.csv");
}
