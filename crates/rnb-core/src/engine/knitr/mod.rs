/*
 * engine/knitr/mod.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Knitr engine for R code execution.
 */

//! Knitr engine for R code execution.
//!
//! This engine hands cells to knitr running in a long-lived R process. It
//! requires R with the `knitr` and `jsonlite` packages installed.
//!
//! The process is started on first use and lives as long as the
//! [`KnitrRenderer`], so variables defined by one code cell are visible to
//! the cells after it, and to inline expressions in text cells.

pub mod error_parser;
pub mod protocol;
pub mod subprocess;

use std::path::{Path, PathBuf};

pub use error_parser::classify_r_error;
pub use protocol::{KnitrRequest, KnitrResponse};
pub use subprocess::{KnitrProcess, find_rscript};

use super::config::RenderConfig;
use super::error::RenderError;
use super::traits::Renderer;

/// Knitr engine for R code execution.
pub struct KnitrRenderer {
    /// Path to Rscript executable (discovered or configured)
    rscript_path: Option<PathBuf>,
    working_dir: PathBuf,
    quiet: bool,
    process: Option<KnitrProcess>,
}

impl KnitrRenderer {
    /// Create a knitr engine; `rscript_hint` is the `RNB_R` option.
    pub fn new(rscript_hint: Option<&Path>) -> Self {
        Self {
            rscript_path: find_rscript(rscript_hint),
            working_dir: PathBuf::from("."),
            quiet: false,
            process: None,
        }
    }

    /// Directory R runs in; relative paths in code resolve against it.
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = dir.into();
        self
    }

    /// Discard R's stderr instead of passing it through.
    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Get the path to Rscript, if found.
    pub fn rscript_path(&self) -> Option<&Path> {
        self.rscript_path.as_deref()
    }

    fn process(&mut self) -> Result<&mut KnitrProcess, RenderError> {
        if self.process.is_none() {
            let rscript = self.rscript_path.as_deref().ok_or_else(|| {
                RenderError::runtime_not_found(
                    "knitr",
                    "Rscript (install R from https://www.r-project.org/)",
                )
            })?;
            self.process = Some(KnitrProcess::spawn(rscript, &self.working_dir, self.quiet)?);
        }
        self.process
            .as_mut()
            .ok_or_else(|| RenderError::protocol("knitr", "driver process not running"))
    }

    fn call(&mut self, request: &KnitrRequest<'_>) -> Result<String, RenderError> {
        self.process()?.call(request)
    }
}

/// `output` with knitr's surrounding newlines replaced by those of `source`.
///
/// Knitr pads chunk output with newlines and drops trailing blank lines of
/// its input; keeping the source's own edges lets unchanged text compare
/// equal to its source.
fn match_edges(output: &str, source: &str) -> String {
    let body = source.trim_start_matches('\n');
    let leading = source.len() - body.len();
    let trailing = body.len() - body.trim_end_matches('\n').len();

    let mut text = "\n".repeat(leading);
    text.push_str(output.trim_matches('\n'));
    text.push_str(&"\n".repeat(trailing));
    text
}

impl Default for KnitrRenderer {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Renderer for KnitrRenderer {
    fn name(&self) -> &str {
        "knitr"
    }

    fn render_inline(&mut self, markdown: &str) -> Result<String, RenderError> {
        let output = self.call(&KnitrRequest::Inline { text: markdown })?;
        Ok(match_edges(&output, markdown))
    }

    fn render_block(&mut self, code: &str, options: &str) -> Result<String, RenderError> {
        let output = self.call(&KnitrRequest::Block { code, options })?;
        Ok(match_edges(&output, code))
    }

    fn push_config(&mut self, config: &RenderConfig) -> Result<(), RenderError> {
        self.call(&KnitrRequest::Configure { config }).map(|_| ())
    }

    fn pop_config(&mut self) -> Result<(), RenderError> {
        // Nothing to restore in a process that was never started.
        match self.process.as_mut() {
            Some(process) => process.call(&KnitrRequest::Restore).map(|_| ()),
            None => Ok(()),
        }
    }

    fn is_available(&self) -> bool {
        self.rscript_path.is_some()
    }
}
