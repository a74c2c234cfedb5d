//! Integration tests for the complaintmap binary.

mod common;

use assert_cmd::Command;
use chrono::Utc;
use serde_json::{json, Value};
use std::fs;
use tempfile::TempDir;

fn complaintmap() -> Command {
    let mut cmd = Command::cargo_bin("complaintmap").unwrap();
    cmd.env_remove("RUST_LOG").env("COMPLAINTMAP_QUIET", "1");
    cmd
}

fn run_json(args: &[&str]) -> Value {
    let output = complaintmap().args(args).output().unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_analyze_json_output() {
    let fixture = common::fixture_path("posts.json");
    let value = run_json(&["analyze", fixture.to_str().unwrap(), "--format", "json"]);

    assert_eq!(value["subreddit"], "acmeapp");
    assert_eq!(value["posts_analyzed"], 5);
    assert_eq!(value["summary"]["complaint_count"], 7);
    assert_eq!(value["clusters"].as_array().unwrap().len(), 4);
    assert_eq!(value["clusters"][0]["frequency"], 3);
    assert_eq!(value["clusters"][0]["total_score"], 172);
}

#[test]
fn test_analyze_filters_and_top() {
    let fixture = common::fixture_path("posts.json");
    let value = run_json(&[
        "analyze",
        fixture.to_str().unwrap(),
        "--format",
        "json",
        "--negative-only",
    ]);
    let clusters = value["clusters"].as_array().unwrap();
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0]["category"], "pricing");

    let value = run_json(&[
        "analyze",
        fixture.to_str().unwrap(),
        "--format",
        "json",
        "--sort",
        "score",
        "--top",
        "2",
    ]);
    let scores: Vec<i64> = value["clusters"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["total_score"].as_i64().unwrap())
        .collect();
    assert_eq!(scores, vec![172, 110]);
    // Summary still covers every cluster
    assert_eq!(value["summary"]["cluster_count"], 4);
}

#[test]
fn test_analyze_time_window_and_subreddit() {
    let now = Utc::now().timestamp() as f64;
    let dataset = json!([
        {"id": "new", "title": "The app is broken again", "created_utc": now - 86_400.0,
         "permalink": "/r/acme/comments/new"},
        {"id": "old", "title": "The app was broken years ago", "created_utc": now - 3.0e8,
         "permalink": "/r/acme/comments/old"},
        {"id": "other", "title": "Other app is broken", "created_utc": now - 60.0,
         "permalink": "/r/elsewhere/comments/other"}
    ]);
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("posts.json");
    fs::write(&input, dataset.to_string()).unwrap();

    let value = run_json(&[
        "analyze",
        input.to_str().unwrap(),
        "--format",
        "json",
        "--months",
        "6",
        "--subreddit",
        "r/acme",
    ]);
    assert_eq!(value["subreddit"], "acme");
    assert_eq!(value["window_months"], 6);
    assert_eq!(value["posts_analyzed"], 1);
    assert_eq!(value["clusters"][0]["complaints"][0]["id"], "post-new");
}

#[test]
fn test_analyze_markdown_to_file() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("report.md");
    let fixture = common::fixture_path("posts.json");

    complaintmap()
        .args([
            "analyze",
            fixture.to_str().unwrap(),
            "--format",
            "markdown",
            "--output",
            output.to_str().unwrap(),
        ])
        .assert()
        .success();

    let report = fs::read_to_string(&output).unwrap();
    assert!(report.starts_with("# Complaint Analysis: r/acmeapp"));
    assert!(report.contains("## Complaint Clusters"));
}

#[test]
fn test_stage_failure_warns_but_succeeds() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("posts.json");
    fs::write(
        &input,
        r#"[{"id": "p", "title": "broken", "comments": [{"id": "", "body": "terrible"}]}]"#,
    )
    .unwrap();

    let output = complaintmap()
        .args(["analyze", input.to_str().unwrap(), "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to run complaint detection"));

    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["clusters"].as_array().unwrap().len(), 0);
    assert_eq!(value["failures"].as_array().unwrap().len(), 1);
}

#[test]
fn test_missing_input_fails() {
    complaintmap()
        .args(["analyze", "/no/such/dataset.json"])
        .assert()
        .failure();
}

#[test]
fn test_invalid_explicit_config_fails() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("bad.toml");
    fs::write(&config, "[clustering]\nsimilarity_threshold = 4.0\n").unwrap();
    let fixture = common::fixture_path("posts.json");

    complaintmap()
        .args([
            "analyze",
            fixture.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ])
        .assert()
        .failure();
}

#[test]
fn test_detect_prints_detection() {
    let value = run_json(&["detect", "This is broken and terrible, I hate it"]);
    assert_eq!(value["is_complaint"], true);
    assert_eq!(value["contains_negative_terms"], true);
    assert!(value["sentiment"].as_f64().unwrap() < -0.2);
}

#[test]
fn test_init_writes_config_once() {
    let dir = TempDir::new().unwrap();
    complaintmap().current_dir(dir.path()).arg("init").assert().success();
    let written = fs::read_to_string(dir.path().join(".complaintmap.toml")).unwrap();
    assert!(written.contains("[clustering]"));

    complaintmap().current_dir(dir.path()).arg("init").assert().failure();
    complaintmap()
        .current_dir(dir.path())
        .args(["init", "--force"])
        .assert()
        .success();
}
