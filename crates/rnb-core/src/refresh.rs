/*
 * refresh.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Re-render every cell of a notebook through an engine.
 */

//! Re-render every cell of a notebook through a [`Renderer`].
//!
//! Cells are rendered one at a time in document order; later cells may
//! depend on state left behind by earlier ones. The result is a new
//! notebook: when any cell fails, the caller's notebook (and the file it
//! came from) is left untouched.
//!
//! A rendered result equal to the cell's source is stored as `out: null`.

use crate::engine::{RenderConfig, RenderError, RenderScope, Renderer};
use crate::error::{NotebookError, Result};
use crate::model::{Cell, Lines, Notebook};

/// Counts from one refresh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    /// Cells sent to the engine.
    pub rendered: usize,
    /// Cells whose output matched their source and was stored as null.
    pub identical: usize,
}

/// Render all cells of `notebook` and return the refreshed copy.
///
/// An empty body returns immediately without touching the engine.
pub fn refresh_notebook(
    notebook: &Notebook,
    renderer: &mut dyn Renderer,
    config: &RenderConfig,
) -> Result<(Notebook, RefreshSummary)> {
    let mut summary = RefreshSummary::default();
    if notebook.is_empty() {
        tracing::debug!("Empty body, nothing to refresh");
        return Ok((notebook.clone(), summary));
    }

    let mut scope = RenderScope::enter(renderer, config).map_err(engine_error)?;
    let mut body = Vec::with_capacity(notebook.len());

    for (i, cell) in notebook.cells().iter().enumerate() {
        tracing::debug!(cell = i + 1, kind = %cell.kind(), engine = scope.name(), "Rendering cell");

        let rendered = match cell {
            Cell::Text { src, .. } => scope.render_inline(&src.joined()),
            Cell::Code { src, .. } => scope.render_block(&src.code.joined(), &src.options),
        }
        .map_err(|e| {
            tracing::warn!(cell = i + 1, error = %e, "Cell failed to render");
            engine_error(e)
        })?;

        let out = stored_output(cell, &rendered);
        summary.rendered += 1;
        if out.is_none() {
            summary.identical += 1;
        }
        body.push(cell.clone().with_out(out));
    }

    drop(scope);
    Ok((Notebook::new(notebook.frontmatter().clone(), body), summary))
}

/// `None` when the rendered text equals the joined source.
fn stored_output(cell: &Cell, rendered: &str) -> Option<Lines> {
    if rendered == cell.source_text() {
        None
    } else {
        Some(Lines::from_text(rendered))
    }
}

fn engine_error(e: RenderError) -> NotebookError {
    match e {
        RenderError::Encoding(message) => NotebookError::Encoding(message),
        other => NotebookError::Engine(other),
    }
}
