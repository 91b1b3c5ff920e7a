//! Runs the `verstamp` binary the way a pipeline step would.

use std::path::Path;
use std::process::{Command, Output};

fn verstamp(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_verstamp"))
        .current_dir(dir)
        .args(args)
        .output()
        .expect("run verstamp")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

#[test]
fn encode_concrete_instant() {
    let dir = tempfile::tempdir().unwrap();
    let output = verstamp(
        dir.path(),
        &["encode", "--build", "1", "--at", "2025-01-01T00:01:04Z"],
    );
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "1.0.20250.1");
}

#[test]
fn encode_three_part() {
    let dir = tempfile::tempdir().unwrap();
    let output = verstamp(
        dir.path(),
        &[
            "encode",
            "--build",
            "1",
            "--shape",
            "three",
            "--at",
            "2025-01-01T00:01:04Z",
        ],
    );
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "1.20250.1");
}

#[test]
fn encode_reads_defaults_from_config() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("verstamp.toml"),
        "[stamp]\nbuild = 42\nmajor = 3\n",
    )
    .unwrap();
    let output = verstamp(dir.path(), &["encode", "--at", "2025-01-01 00:01:04"]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "42.3.20250.1");

    let output = verstamp(
        dir.path(),
        &["encode", "--major", "9", "--at", "2025-01-01T00:01:04Z"],
    );
    assert_eq!(stdout(&output), "42.9.20250.1");
}

#[test]
fn invalid_config_fails_before_running() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("verstamp.toml"),
        "[stamp]\nshape = \"three\"\nmajor = 2\n",
    )
    .unwrap();
    let output = verstamp(dir.path(), &["decode", "1.0.20250.1"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn missing_explicit_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = verstamp(dir.path(), &["--config", "nope.toml", "decode", "1.20250.1"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn encode_out_of_range_year_exits_2() {
    let dir = tempfile::tempdir().unwrap();
    let output = verstamp(
        dir.path(),
        &["--json", "encode", "--at", "9999-12-31T23:59:00Z"],
    );
    assert_eq!(output.status.code(), Some(2));
    let err: serde_json::Value = serde_json::from_slice(&output.stderr).unwrap();
    assert_eq!(err["code"], "minor_overflow");
}

fn has_new_york_zone() -> bool {
    Path::new("/usr/share/zoneinfo/America/New_York").exists()
}

fn encode_local_new_york(dir: &Path, at: &str) -> Output {
    Command::new(env!("CARGO_BIN_EXE_verstamp"))
        .current_dir(dir)
        .env("TZ", "America/New_York")
        .args(["--json", "encode", "--clock", "local", "--at", at])
        .output()
        .expect("run verstamp")
}

#[test]
fn encode_local_repeated_hour_takes_earliest_instant() {
    if !has_new_york_zone() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let output = encode_local_new_york(dir.path(), "2025-11-02T01:30:00");
    assert_eq!(output.status.code(), Some(0));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["source_instant"], "2025-11-02T05:30:00Z");
}

#[test]
fn encode_local_skipped_hour_is_rejected() {
    if !has_new_york_zone() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let output = encode_local_new_york(dir.path(), "2025-03-09T02:30:00");
    assert_eq!(output.status.code(), Some(1));
    let err: serde_json::Value = serde_json::from_slice(&output.stderr).unwrap();
    assert_eq!(err["code"], "invalid_timestamp");
}

#[test]
fn encode_three_part_json_uses_four_part_names() {
    let dir = tempfile::tempdir().unwrap();
    let output = verstamp(
        dir.path(),
        &["--json", "encode", "--shape", "three", "--at", "2025-01-01T00:01:04Z"],
    );
    assert_eq!(output.status.code(), Some(0));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["version"], "0.20250.1");
    assert!(json.get("major").is_none());
    assert_eq!(json["minor"], 20250);
    assert_eq!(json["revision"], 1);
}

#[test]
fn decode_text_and_json() {
    let dir = tempfile::tempdir().unwrap();
    let output = verstamp(dir.path(), &["decode", "1.0.20250.1"]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "2025-01-01T00:01:04Z");

    let output = verstamp(dir.path(), &["decode", "--json", "7.20247.35347"]);
    assert_eq!(output.status.code(), Some(0));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["build"], 7);
    assert!(json.get("major").is_none());
    assert_eq!(json["computed_instant"], "2024-12-31T23:58:56Z");
    assert_eq!(json["window_end"], "2024-12-31T23:59:59Z");
}

#[test]
fn decode_rejects_revision_overflow() {
    let dir = tempfile::tempdir().unwrap();
    let output = verstamp(dir.path(), &["--json", "decode", "1.0.25.70000"]);
    assert_eq!(output.status.code(), Some(2));
    let err: serde_json::Value = serde_json::from_slice(&output.stderr).unwrap();
    assert_eq!(err["code"], "revision_overflow");
}

#[test]
fn encode_then_decode_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let encoded = verstamp(
        dir.path(),
        &["encode", "--build", "5", "--major", "2", "--at", "2031-07-19T13:45:12Z"],
    );
    let version = stdout(&encoded);
    let decoded = verstamp(dir.path(), &["decode", &version]);
    assert_eq!(stdout(&decoded), "2031-07-19T13:44:32Z");
}
