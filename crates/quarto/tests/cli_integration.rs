/*
 * cli_integration.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Integration tests for the Quarto CLI.
 */

//! Integration tests for the command-line interface.
//!
//! These tests run the built `quarto` binary against project trees in a
//! temporary directory.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn quarto(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_quarto"))
        .args(args)
        .env_remove("QUARTO_PROFILE")
        .output()
        .expect("Failed to run quarto")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("temp paths are UTF-8")
}

/// A website project that renders on save, with one post opting out.
fn website() -> TempDir {
    let temp = TempDir::new().expect("Failed to create temp directory");
    let site = temp.path().join("site");
    fs::create_dir_all(site.join("posts")).unwrap();
    fs::write(
        site.join("_quarto.yml"),
        "project:\n  type: website\neditor:\n  render-on-save: true\n",
    )
    .unwrap();
    fs::write(site.join("index.qmd"), "---\ntitle: Home\n---\n").unwrap();
    fs::write(
        site.join("posts").join("draft.qmd"),
        "---\ntitle: Draft\neditor:\n  render-on-save: false\n---\n",
    )
    .unwrap();
    fs::write(temp.path().join("loose.qmd"), "# Loose\n").unwrap();
    temp
}

#[test]
fn test_version() {
    let output = quarto(&["--version"]);
    assert!(output.status.success());
    assert!(stdout(&output).starts_with("quarto"));
}

#[test]
fn test_render_on_save_from_project() {
    let temp = website();
    let index = temp.path().join("site").join("index.qmd");

    let output = quarto(&["render-on-save", path_arg(&index)]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "true");
}

#[test]
fn test_render_on_save_document_overrides_project() {
    let temp = website();
    let draft = temp.path().join("site").join("posts").join("draft.qmd");

    let output = quarto(&["render-on-save", path_arg(&draft)]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "false");
}

#[test]
fn test_render_on_save_from_settings_file() {
    let temp = website();
    let loose = temp.path().join("loose.qmd");
    let settings = temp.path().join("settings.json");
    fs::write(&settings, r#"{"quarto": {"render": {"renderOnSave": true}}}"#).unwrap();

    let output = quarto(&["render-on-save", path_arg(&loose)]);
    assert_eq!(stdout(&output), "false");

    let output = quarto(&[
        "render-on-save",
        path_arg(&loose),
        "--settings",
        path_arg(&settings),
    ]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "true");
}

#[test]
fn test_render_on_save_notebook_gate() {
    let temp = TempDir::new().unwrap();
    let notebook = temp.path().join("analysis.ipynb");
    fs::write(&notebook, "{\"cells\": []}").unwrap();

    let output = quarto(&[
        "render-on-save",
        path_arg(&notebook),
        "--notebook-save-events",
        "--host-version",
        "1.66.0",
    ]);
    assert_eq!(stdout(&output), "false");

    let output = quarto(&[
        "render-on-save",
        path_arg(&notebook),
        "--notebook-save-events",
        "--host-version",
        "1.67.0-insider",
    ]);
    assert_eq!(stdout(&output), "false");

    let output = quarto(&[
        "render-on-save",
        path_arg(&notebook),
        "--notebook-save-events",
        "--host-version",
        "1.90.2",
    ]);
    assert_eq!(stdout(&output), "true");
}

#[test]
fn test_render_on_save_missing_file_fails() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("missing.qmd");
    let output = quarto(&["render-on-save", path_arg(&missing)]);
    assert!(!output.status.success());
}

#[test]
fn test_preview_dir() {
    let temp = website();
    let draft = temp.path().join("site").join("posts").join("draft.qmd");
    let loose = temp.path().join("loose.qmd");

    let output = quarto(&["preview-dir", path_arg(&draft)]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        temp.path().join("site").display().to_string()
    );

    let output = quarto(&["preview-dir", path_arg(&loose)]);
    assert!(!output.status.success());

    let output = quarto(&[
        "preview-dir",
        path_arg(&loose),
        "--workspace",
        path_arg(temp.path()),
    ]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), temp.path().display().to_string());
}

#[test]
fn test_front_matter_json() {
    let temp = website();
    let draft = temp.path().join("site").join("posts").join("draft.qmd");

    let output = quarto(&["front-matter", path_arg(&draft)]);
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["title"], "Draft");
    assert_eq!(json["editor"]["render-on-save"], false);

    let output = quarto(&["front-matter", path_arg(&temp.path().join("loose.qmd"))]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "{}");
}

#[test]
fn test_front_matter_keeps_tagged_documents() {
    let temp = TempDir::new().unwrap();
    let report = temp.path().join("report.qmd");
    fs::write(
        &report,
        "---\ntitle: Report\nparams:\n  year: !expr Sys.Date()\neditor:\n  render-on-save: true\n---\n",
    )
    .unwrap();

    let output = quarto(&["front-matter", path_arg(&report)]);
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["params"]["year"], "Sys.Date()");

    let output = quarto(&["render-on-save", path_arg(&report)]);
    assert_eq!(stdout(&output), "true");
}

#[test]
fn test_front_matter_shiny_flag() {
    let temp = TempDir::new().unwrap();
    let app = temp.path().join("app.qmd");
    fs::write(&app, "---\nserver:\n  type: shiny\n---\n").unwrap();
    let doc = temp.path().join("doc.qmd");
    fs::write(&doc, "---\ntitle: Static\n---\n").unwrap();

    let output = quarto(&["front-matter", "--shiny", path_arg(&app)]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "true");

    let output = quarto(&["front-matter", "--shiny", path_arg(&doc)]);
    assert_eq!(stdout(&output), "false");
}
