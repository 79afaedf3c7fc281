//! Command implementations for the rnb CLI
//!
//! Each command module handles the CLI interface and delegates to
//! rnb-core for the actual work.

pub mod create;
pub mod export;
pub mod import;
pub mod lint;
pub mod refresh;

use anyhow::{Context, Result};
use rnb_core::NotebookOptions;

/// `RNB_*` options from the environment.
pub(crate) fn env_options() -> Result<NotebookOptions> {
    NotebookOptions::from_env().context("Failed to read RNB_* options")
}
