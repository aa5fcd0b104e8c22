use std::path::PathBuf;
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("momentum-{nanos}-{file_name}"))
}

fn run_at(store_path: &PathBuf, now: &str, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_momentum"))
        .args(args)
        .env("MOMENTUM_STORE_PATH", store_path)
        .env("MOMENTUM_CONFIG_PATH", temp_path("no-config.json"))
        .env("MOMENTUM_NOW", now)
        .output()
        .expect("failed to run command")
}

fn json_stdout(output: &Output) -> serde_json::Value {
    serde_json::from_str(&String::from_utf8_lossy(&output.stdout)).expect("json output")
}

#[test]
fn suggest_uses_time_of_day() {
    let store_path = temp_path("cli-suggest-slot.json");
    let morning = run_at(&store_path, "2026-10-19T08:00:00Z", &["--json", "suggest"]);
    let evening = run_at(
        &store_path,
        "2026-10-19T18:00:00Z",
        &["--json", "suggest", "--category", "fitness"],
    );
    std::fs::remove_file(&store_path).ok();

    assert!(morning.status.success());
    let morning = json_stdout(&morning);
    assert_eq!(morning["category"], "work");
    assert_eq!(morning["slot"], "morning");
    assert_eq!(morning["tasks"][0], "Review today's priorities");
    assert_eq!(morning["tasks"].as_array().unwrap().len(), 4);

    let evening = json_stdout(&evening);
    assert_eq!(evening["slot"], "evening");
    assert_eq!(evening["tasks"][0], "Evening yoga");
}

#[test]
fn suggest_hides_recently_completed_task() {
    let store_path = temp_path("cli-suggest-recent.json");
    let now = "2026-10-19T13:00:00Z";
    let done = run_at(&store_path, now, &["done", "-c", "work", "Clear inbox"]);
    let output = run_at(&store_path, now, &["--json", "suggest", "-c", "work"]);
    std::fs::remove_file(&store_path).ok();

    assert!(done.status.success());
    let parsed = json_stdout(&output);
    assert_eq!(
        parsed["tasks"],
        serde_json::json!([
            "Follow up on meetings",
            "Update task progress",
            "Review deadlines"
        ])
    );
}

#[test]
fn suggest_plain_text_lists_numbered_tasks() {
    let store_path = temp_path("cli-suggest-text.json");
    let output = run_at(
        &store_path,
        "2026-10-19T09:00:00Z",
        &["suggest", "-c", "Personal"],
    );
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Suggestions for personal (morning):"));
    assert!(stdout.contains("  1. Quick meditation"));
}

#[test]
fn suggest_rejects_unknown_category() {
    let store_path = temp_path("cli-suggest-bad.json");
    let output = run_at(
        &store_path,
        "2026-10-19T09:00:00Z",
        &["suggest", "-c", "study"],
    );
    std::fs::remove_file(&store_path).ok();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input - unknown category 'study'"));
}
