/*
 * lint.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Lint command implementation
 */

use std::path::Path;

use anyhow::{Context, Result};

use rnb_core::operations;

/// Execute the lint command
pub fn execute(path: &Path) -> Result<()> {
    let notebook = operations::lint(path)
        .with_context(|| format!("{} is not a valid notebook", path.display()))?;
    println!("{}: ok ({} cells)", path.display(), notebook.len());
    Ok(())
}
