/*
 * export.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Export command implementation
 */

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use rnb_core::{ExportMode, operations};

/// Execute the export command
pub fn execute(path: &Path, output: Option<&Path>, raw: bool) -> Result<()> {
    let mode = if raw { ExportMode::Raw } else { ExportMode::Rendered };
    debug!(?mode, "Exporting {}", path.display());

    let written = operations::export(path, output, mode)
        .with_context(|| format!("Failed to export {}", path.display()))?;
    println!("{}", written.display());
    Ok(())
}
