//! Integration tests for the liftlog binary.
//!
//! These tests verify end-to-end behavior including:
//! - The interactive logging loop (scripted over stdin)
//! - Committed workouts landing in the JSONL log
//! - History and exercise listing

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the path to the CLI binary
fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("liftlog"))
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Workout logging from the terminal"));
}

#[test]
fn test_exercises_lists_builtins() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("exercises")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("bench_press"))
        .stdout(predicate::str::contains("Back Squat"));
}

#[test]
fn test_exercises_includes_custom_definitions() {
    let temp_dir = setup_test_dir();
    fs::write(
        temp_dir.path().join("exercises.json"),
        r#"[{"id": "zercher_squat", "name": "Zercher Squat", "equipment": "Barbell",
             "notes": null, "is_custom": false}]"#,
    )
    .expect("Failed to write custom exercises");

    cli()
        .arg("exercises")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Zercher Squat (custom)"));
}

#[test]
fn test_finished_workout_lands_in_log() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("log")
        .arg("--data-dir")
        .arg(&data_dir)
        .write_stdin(
            "start\n\
             add bench_press\n\
             set bench_press 100 5\n\
             done bench_press\n\
             set bench_press\n\
             done bench_press\n\
             finish\n\
             quit\n",
        )
        .assert()
        .success()
        .stdout(predicate::str::contains("Workout saved (2 sets"));

    let log = fs::read_to_string(data_dir.join("workouts.jsonl")).expect("Failed to read log");
    assert_eq!(log.lines().count(), 1);

    let entry: serde_json::Value =
        serde_json::from_str(log.lines().next().unwrap()).expect("Log line is not JSON");
    let sets = entry["sets"].as_array().unwrap();
    assert_eq!(sets.len(), 2);
    assert_eq!(sets[0]["exercise_id"], "bench_press");
    assert_eq!(sets[0]["set_type"], "standard");
    assert_eq!(sets[0]["logged_weight"], 100.0);
    assert_eq!(sets[0]["logged_reps"], 5);
    // The second set carried the first set's weight forward
    assert_eq!(sets[1]["logged_weight"], 100.0);
}

#[test]
fn test_amrap_set_is_tagged_on_disk() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("log")
        .arg("--data-dir")
        .arg(&data_dir)
        .write_stdin(
            "start\n\
             add kettlebell_swing\n\
             amrap kettlebell_swing 24 30 90\n\
             done kettlebell_swing\n\
             finish\n\
             quit\n",
        )
        .assert()
        .success();

    let log = fs::read_to_string(data_dir.join("workouts.jsonl")).expect("Failed to read log");
    assert!(log.contains("\"set_type\":\"amrap_time\""));
    assert!(log.contains("\"target_duration_secs\":90"));
    assert!(log.contains("\"logged_duration_secs\":90"));
}

#[test]
fn test_sets_not_marked_done_are_dropped_from_commit() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("log")
        .arg("--data-dir")
        .arg(&data_dir)
        .write_stdin(
            "start\n\
             add back_squat\n\
             set back_squat 140 5\n\
             done back_squat\n\
             set back_squat\n\
             finish\n\
             quit\n",
        )
        .assert()
        .success()
        .stdout(predicate::str::contains("Workout saved (1 sets"));

    // The second set was logged but never marked done, so it is not history
    let log = fs::read_to_string(data_dir.join("workouts.jsonl")).expect("Failed to read log");
    let entry: serde_json::Value =
        serde_json::from_str(log.lines().next().unwrap()).expect("Log line is not JSON");
    assert_eq!(entry["sets"].as_array().unwrap().len(), 1);
}

#[test]
fn test_done_without_sets_is_reported() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("log")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .write_stdin("start\nadd deadlift\ndone deadlift\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("No sets logged for 'deadlift'"));
}

#[test]
fn test_discard_writes_nothing() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("log")
        .arg("--data-dir")
        .arg(&data_dir)
        .write_stdin(
            "start\n\
             add deadlift\n\
             set deadlift 180 3\n\
             discard\n\
             quit\n",
        )
        .assert()
        .success()
        .stdout(predicate::str::contains("Workout discarded"));

    assert!(!data_dir.join("workouts.jsonl").exists());
}

#[test]
fn test_quit_mid_workout_discards() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("log")
        .arg("--data-dir")
        .arg(&data_dir)
        .write_stdin("start\nadd pull_up\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Discarding unfinished workout"));

    assert!(!data_dir.join("workouts.jsonl").exists());
}

#[test]
fn test_history_shows_committed_workouts() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    cli()
        .arg("log")
        .arg("--data-dir")
        .arg(&data_dir)
        .write_stdin(
            "start\n\
             name Push Day\n\
             add overhead_press\n\
             set overhead_press 60 8\n\
             done overhead_press\n\
             finish\n\
             quit\n",
        )
        .assert()
        .success();

    cli()
        .arg("history")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Push Day"))
        .stdout(predicate::str::contains("overhead_press"));
}

#[test]
fn test_history_empty_log() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("history")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No workouts logged yet"));
}

#[test]
fn test_unknown_exercise_is_reported() {
    let temp_dir = setup_test_dir();

    cli()
        .arg("log")
        .arg("--data-dir")
        .arg(temp_dir.path())
        .write_stdin("start\nadd pogo_stick\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Unknown exercise 'pogo_stick'"));
}
