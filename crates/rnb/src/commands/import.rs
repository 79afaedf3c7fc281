/*
 * import.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Import command implementation
 */

use std::path::Path;

use anyhow::{Context, Result};

use rnb_core::operations;

/// Execute the import command
pub fn execute(path: &Path, output: Option<&Path>) -> Result<()> {
    let options = super::env_options()?;
    let written = operations::import(path, output, &options)
        .with_context(|| format!("Failed to import {}", path.display()))?;
    println!("{}", written.display());
    Ok(())
}
