/*
 * tests/knitr_integration.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Integration tests for the knitr engine.
 */

//! Integration tests for the knitr engine.
//!
//! These tests require R with the knitr and jsonlite packages. They are
//! marked with `#[ignore]` by default and can be run with:
//!
//! ```sh
//! cargo nextest run -p rnb-core --run-ignored only knitr_integration
//! ```

use rnb_core::engine::{KnitrRenderer, RenderConfig, RenderError, RenderScope, Renderer};
use rnb_core::operations::{self, CreateRequest};
use rnb_core::NotebookOptions;
use tempfile::TempDir;

#[test]
fn test_knitr_availability_detection() {
    let engine = KnitrRenderer::default();
    assert_eq!(engine.is_available(), engine.rscript_path().is_some());
    assert_eq!(engine.rscript_path().is_some(), which::which("Rscript").is_ok());

    let dir = TempDir::new().unwrap();
    let engine = KnitrRenderer::new(Some(&dir.path().join("Rscript")));
    assert_eq!(engine.rscript_path().is_some(), which::which("Rscript").is_ok());
}

#[test]
fn test_rscript_hint_is_used() {
    let dir = TempDir::new().unwrap();
    let bin = dir.path().join("bin");
    std::fs::create_dir(&bin).unwrap();
    let rscript = bin.join(if cfg!(windows) { "Rscript.exe" } else { "Rscript" });
    std::fs::write(&rscript, "").unwrap();

    let engine = KnitrRenderer::new(Some(dir.path()));
    assert!(engine.is_available());
    assert_eq!(engine.rscript_path(), Some(rscript.as_path()));
}

#[test]
#[ignore = "requires R with knitr"]
fn test_state_carries_across_cells() {
    let dir = TempDir::new().unwrap();
    let mut engine = KnitrRenderer::default().with_working_dir(dir.path()).with_quiet(true);
    let mut scope = RenderScope::enter(&mut engine, &RenderConfig::default()).unwrap();

    let block = scope.render_block("x <- 1 + 1\nx", "").unwrap();
    assert!(block.contains("## [1] 2"), "unexpected block output: {block}");

    let inline = scope.render_inline("x is `r x`").unwrap();
    assert_eq!(inline, "x is 2");
}

#[test]
#[ignore = "requires R with knitr"]
fn test_chunk_options_are_applied() {
    let mut engine = KnitrRenderer::default().with_quiet(true);
    let mut scope = RenderScope::enter(&mut engine, &RenderConfig::default()).unwrap();
    let out = scope.render_block("1 + 1", "echo=FALSE").unwrap();
    assert!(!out.contains("1 + 1"));
    assert!(out.contains("[1] 2"));
}

#[test]
#[ignore = "requires R with knitr"]
fn test_r_error_is_execution_failure() {
    let mut engine = KnitrRenderer::default().with_quiet(true);
    let mut scope = RenderScope::enter(&mut engine, &RenderConfig::default()).unwrap();
    let err = scope.render_block("stop('boom')", "").unwrap_err();
    assert!(matches!(err, RenderError::ExecutionFailed { .. }));
    assert!(err.to_string().contains("boom"));
}

#[test]
#[ignore = "requires R with knitr"]
fn test_refresh_sample_notebook() {
    let dir = TempDir::new().unwrap();
    let options = NotebookOptions::default();
    let path = operations::create(
        CreateRequest::new().with_path(dir.path().join("sample.Rnb")),
        &options,
    )
    .unwrap();

    let mut engine = KnitrRenderer::new(None).with_working_dir(dir.path()).with_quiet(true);
    operations::refresh(&path, &mut engine, &options).unwrap();

    let nb = operations::lint(&path).unwrap();
    assert_eq!(nb.cell(3).unwrap().out().unwrap().joined(), "The value of `x` is 2.");
}
