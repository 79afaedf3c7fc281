/*
 * tests/cli.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * End-to-end tests for the rnb binary.
 */

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const RNB_VARS: &[&str] = &[
    "RNB_TITLE",
    "RNB_AUTHOR",
    "RNB_JSON_INDENT",
    "RNB_R",
    "RNB_CONSOLE_WIDTH",
    "RUST_LOG",
];

fn rnb(dir: &Path, args: &[&str]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_rnb"));
    cmd.current_dir(dir).args(args);
    for var in RNB_VARS {
        cmd.env_remove(var);
    }
    cmd.output().expect("Failed to execute rnb")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_slice(&fs::read(path).expect("Failed to read notebook"))
        .expect("Notebook is not JSON")
}

#[test]
fn test_create_defaults() {
    let dir = TempDir::new().unwrap();
    let output = rnb(dir.path(), &["create", "--date", "2025-01-01"]);
    assert!(output.status.success(), "create failed: {:?}", output);
    assert_eq!(stdout(&output), "notebook.Rnb");

    let json = read_json(&dir.path().join("notebook.Rnb"));
    assert_eq!(json["frontmatter"]["title"], "Untitled");
    assert!(json["frontmatter"]["author"].is_null());
    assert_eq!(json["frontmatter"]["date"], "2025-01-01");
    assert_eq!(json["body"].as_array().unwrap().len(), 3);
}

#[test]
fn test_create_with_flags_and_env() {
    let dir = TempDir::new().unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_rnb"))
        .current_dir(dir.path())
        .env("RNB_AUTHOR", "Env Author")
        .env("RNB_JSON_INDENT", "compact")
        .args(["create", "doc.Rnb", "--title", "Flags", "--meta", "lang=en"])
        .output()
        .unwrap();
    assert!(output.status.success(), "create failed: {:?}", output);

    let text = fs::read_to_string(dir.path().join("doc.Rnb")).unwrap();
    assert_eq!(text.lines().count(), 1);
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["frontmatter"]["title"], "Flags");
    assert_eq!(json["frontmatter"]["author"], "Env Author");
    assert_eq!(json["frontmatter"]["lang"], "en");
}

#[test]
fn test_lint_reports_cell_error() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("bad.Rnb"),
        r#"{"frontmatter": {}, "body": [{"type": "text", "src": "x"}]}"#,
    )
    .unwrap();

    let output = rnb(dir.path(), &["lint", "bad.Rnb"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("element #1 must have type/src/out"), "stderr: {stderr}");
}

#[test]
fn test_refresh_and_export_with_passthrough() {
    let dir = TempDir::new().unwrap();
    assert!(rnb(dir.path(), &["create", "nb.Rnb"]).status.success());

    let output = rnb(dir.path(), &["refresh", "nb.Rnb", "--engine", "passthrough"]);
    assert!(output.status.success(), "refresh failed: {:?}", output);
    let json = read_json(&dir.path().join("nb.Rnb"));
    assert!(json["body"][0]["out"].is_null());
    assert!(!json["body"][1]["out"].is_null());

    let output = rnb(dir.path(), &["export", "nb.Rnb"]);
    assert!(output.status.success(), "export failed: {:?}", output);
    assert_eq!(stdout(&output), "nb.md");
    let markdown = fs::read_to_string(dir.path().join("nb.md")).unwrap();
    assert!(markdown.contains("```r\nx <- 1 + 1\nx\n```"));
}

#[test]
fn test_export_raw_then_import() {
    let dir = TempDir::new().unwrap();
    assert!(rnb(dir.path(), &["create", "nb.Rnb", "--date", "2025-01-01"]).status.success());

    let output = rnb(dir.path(), &["export", "nb.Rnb", "--raw", "-o", "copy.Rmd"]);
    assert!(output.status.success(), "export failed: {:?}", output);

    let output = rnb(dir.path(), &["import", "copy.Rmd"]);
    assert!(output.status.success(), "import failed: {:?}", output);
    assert_eq!(stdout(&output), "copy.Rnb");

    assert_eq!(
        read_json(&dir.path().join("copy.Rnb"))["body"],
        read_json(&dir.path().join("nb.Rnb"))["body"]
    );
}

#[test]
fn test_invalid_width_is_rejected() {
    let dir = TempDir::new().unwrap();
    assert!(rnb(dir.path(), &["create", "nb.Rnb"]).status.success());
    let output = rnb(
        dir.path(),
        &["refresh", "nb.Rnb", "--engine", "passthrough", "--width", "3"],
    );
    assert!(!output.status.success());
}

#[test]
fn test_refresh_without_r_fails_before_touching_notebook() {
    let dir = TempDir::new().unwrap();
    assert!(rnb(dir.path(), &["create", "nb.Rnb"]).status.success());
    let before = fs::read(dir.path().join("nb.Rnb")).unwrap();

    let empty_path = dir.path().join("no-bin");
    fs::create_dir(&empty_path).unwrap();
    let output = Command::new(env!("CARGO_BIN_EXE_rnb"))
        .current_dir(dir.path())
        .env_remove("RNB_R")
        .env("PATH", &empty_path)
        .args(["refresh", "nb.Rnb", "--engine", "knitr"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("knitr engine is not available"), "stderr: {stderr}");
    assert_eq!(fs::read(dir.path().join("nb.Rnb")).unwrap(), before);
}
