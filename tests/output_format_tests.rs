//! Output format tests (CSV, JSON, HTML, output directory)

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

#[test]
fn test_csv_format_summary_table() {
    let mut cmd = Command::cargo_bin("cotejar").unwrap();
    cmd.arg("--format").arg("csv").arg(fixture("ab_testing.csv"));

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("Metric,Value\n"))
        .stdout(predicate::str::contains("Group A Sample Size,20"))
        .stdout(predicate::str::contains("Group B Conversions,8"))
        .stdout(predicate::str::contains("Recommendation,CONTINUE TESTING"));
}

#[test]
fn test_json_format_parses() {
    let mut cmd = Command::cargo_bin("cotejar").unwrap();
    cmd.arg("--format").arg("json").arg(fixture("ab_testing.csv"));

    let output = cmd.assert().success().get_output().stdout.clone();
    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();

    assert_eq!(value["group_a"]["total"], 20);
    assert_eq!(value["group_a"]["successes"], 4);
    assert_eq!(value["group_b"]["successes"], 8);
    assert_eq!(value["recommendation"], "ContinueTesting");
    assert!(value["test"]["p_value"].as_f64().unwrap() > 0.05);
    assert!(value.get("breakdowns").is_none());
}

#[test]
fn test_json_format_with_sections() {
    let mut cmd = Command::cargo_bin("cotejar").unwrap();
    cmd.arg("--format")
        .arg("json")
        .arg("--explore")
        .arg("--breakdowns")
        .arg(fixture("ab_testing.csv"));

    let output = cmd.assert().success().get_output().stdout.clone();
    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();

    assert_eq!(value["exploration"]["rows"], 40);
    assert_eq!(value["breakdowns"]["segments"][0]["name"], "Device");
    assert_eq!(value["breakdowns"]["covariates"][0]["name"], "Page Views");
}

#[test]
fn test_html_format_document() {
    let mut cmd = Command::cargo_bin("cotejar").unwrap();
    cmd.arg("--format").arg("html").arg(fixture("ab_testing.csv"));

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("<!DOCTYPE html>"))
        .stdout(predicate::str::contains("banner-continue-testing"))
        .stdout(predicate::str::contains("bar-track"));
}

#[test]
fn test_output_dir_writes_file() {
    let tmp_dir = TempDir::new().unwrap();
    let out_dir = tmp_dir.path().join("results");

    let mut cmd = Command::cargo_bin("cotejar").unwrap();
    cmd.arg("--format")
        .arg("csv")
        .arg("-o")
        .arg(&out_dir)
        .arg(fixture("ab_testing.csv"));

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Results saved to"));

    let written = fs::read_to_string(out_dir.join("ab_test_summary.csv")).unwrap();
    assert!(written.starts_with("Metric,Value\n"));
    assert!(written.contains("Recommendation,CONTINUE TESTING"));
}

#[test]
fn test_output_dir_created_if_absent() {
    let tmp_dir = TempDir::new().unwrap();
    let out_dir = tmp_dir.path().join("deeply/nested/results");

    let mut cmd = Command::cargo_bin("cotejar").unwrap();
    cmd.arg("--format")
        .arg("html")
        .arg("-o")
        .arg(&out_dir)
        .arg(fixture("ab_testing.csv"));

    cmd.assert().success();

    let written = fs::read_to_string(out_dir.join("ab_test_report.html")).unwrap();
    assert!(written.contains("<!DOCTYPE html>"));
}

#[test]
fn test_text_format_goes_to_file_with_output_dir() {
    let tmp_dir = TempDir::new().unwrap();
    let out_dir = tmp_dir.path().join("results");

    let mut cmd = Command::cargo_bin("cotejar").unwrap();
    cmd.arg("-o").arg(&out_dir).arg(fixture("ab_testing.csv"));

    cmd.assert()
        .success()
        // the report itself must not leak to stdout
        .stdout(predicate::str::contains("RECOMMENDATION").not());

    let written = fs::read_to_string(out_dir.join("ab_test_report.txt")).unwrap();
    assert!(written.contains("RECOMMENDATION: CONTINUE TESTING"));
}
