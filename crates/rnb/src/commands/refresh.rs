/*
 * refresh.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Refresh command implementation
 */

//! Refresh command implementation.
//!
//! `rnb refresh` re-renders every cell of a notebook and writes the results
//! back. With the knitr engine, R runs in the notebook's directory so
//! relative paths in code resolve next to the file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::ValueEnum;
use tracing::info;

use rnb_core::Renderer;
use rnb_core::engine::{KnitrRenderer, PassthroughRenderer};
use rnb_core::operations;

/// Engines selectable with `--engine`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EngineChoice {
    /// Execute R code through knitr
    Knitr,
    /// Echo sources without executing anything
    Passthrough,
}

/// Arguments for the refresh command
#[derive(Debug)]
pub struct RefreshArgs {
    pub path: PathBuf,
    pub engine: EngineChoice,
    /// Overrides RNB_CONSOLE_WIDTH
    pub width: Option<u16>,
}

/// Execute the refresh command
pub fn execute(args: RefreshArgs) -> Result<()> {
    let mut options = super::env_options()?;
    if let Some(width) = args.width {
        options = options
            .with_console_width(width)
            .context("Invalid --width")?;
    }

    let mut engine = build_engine(args.engine, &args.path, options.rscript.as_deref());
    if !engine.is_available() {
        bail!(
            "The {} engine is not available: Rscript was not found (set RNB_R or add R to PATH)",
            engine.name()
        );
    }
    info!(engine = engine.name(), "Refreshing {}", args.path.display());

    operations::refresh(&args.path, engine.as_mut(), &options)
        .with_context(|| format!("Failed to refresh {}", args.path.display()))?;
    println!("{}", args.path.display());
    Ok(())
}

fn build_engine(choice: EngineChoice, notebook: &Path, rscript: Option<&Path>) -> Box<dyn Renderer> {
    match choice {
        EngineChoice::Knitr => {
            let dir = match notebook.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent,
                _ => Path::new("."),
            };
            Box::new(KnitrRenderer::new(rscript).with_working_dir(dir))
        }
        EngineChoice::Passthrough => Box::new(PassthroughRenderer::new()),
    }
}
