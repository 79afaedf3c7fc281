/*
 * operations.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * File-level notebook operations.
 */

//! File-level notebook operations.
//!
//! Each operation reads what it needs from disk, acts, and writes its
//! result; no notebook outlives a single call. These are what the `rnb`
//! command line drives.

use std::path::{Path, PathBuf};

use crate::codec::{self, normalize_utf8};
use crate::engine::Renderer;
use crate::error::{NotebookError, Result};
use crate::export::{ExportMode, default_output_path, export_text};
use crate::import::parse_raw_source;
use crate::model::{Cell, Frontmatter, MetaValue, Notebook};
use crate::options::NotebookOptions;
use crate::refresh::refresh_notebook;

/// Extension of notebook files.
pub const NOTEBOOK_EXTENSION: &str = "Rnb";

/// Where [`create`] writes when no path is given.
pub const DEFAULT_NOTEBOOK_PATH: &str = "notebook.Rnb";

/// Options for creating a new notebook.
///
/// Unset fields fall back to [`NotebookOptions`] (title, author), today's
/// date, and the sample body.
#[derive(Debug, Clone, Default)]
pub struct CreateRequest {
    pub path: Option<PathBuf>,
    pub title: Option<String>,
    pub author: Option<String>,
    /// `YYYY-MM-DD`; defaults to the local date.
    pub date: Option<String>,
    /// Extra frontmatter keys, written after title/author/date.
    pub extra: Vec<(String, MetaValue)>,
    pub body: Option<Vec<Cell>>,
}

impl CreateRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<MetaValue>) -> Self {
        self.extra.push((key.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: Vec<Cell>) -> Self {
        self.body = Some(body);
        self
    }

    fn into_notebook(self, options: &NotebookOptions) -> (PathBuf, Notebook) {
        let mut frontmatter = Frontmatter::new();
        frontmatter.insert("title", self.title.unwrap_or_else(|| options.title.clone()));
        frontmatter.insert("author", self.author.or_else(|| options.author.clone()));
        frontmatter.insert("date", self.date.unwrap_or_else(today));
        for (key, value) in self.extra {
            frontmatter.insert(key, value);
        }

        let path = self.path.unwrap_or_else(|| PathBuf::from(DEFAULT_NOTEBOOK_PATH));
        let body = self.body.unwrap_or_else(sample_body);
        (path, Notebook::new(frontmatter, body))
    }
}

/// Today's local date as `YYYY-MM-DD`.
fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

/// The starter body: prose, a code cell, and prose that uses its result.
pub fn sample_body() -> Vec<Cell> {
    vec![
        Cell::text(
            "## Introduction\n\nThis notebook keeps prose, R code and results in one file. \
             Edit the cells, then run `rnb refresh` to render them.",
        ),
        Cell::code("", "x <- 1 + 1\nx"),
        Cell::text("The value of `x` is `r x`."),
    ]
}

/// Write a new notebook and return its path.
pub fn create(request: CreateRequest, options: &NotebookOptions) -> Result<PathBuf> {
    let (path, notebook) = request.into_notebook(options);
    codec::write_notebook(&path, &notebook, options.indent)?;
    tracing::info!(path = %path.display(), cells = notebook.len(), "Created notebook");
    Ok(path)
}

/// Read and validate the notebook at `path`.
pub fn lint(path: &Path) -> Result<Notebook> {
    let notebook = codec::read_notebook(path)?;
    tracing::info!(path = %path.display(), cells = notebook.len(), "Notebook is valid");
    Ok(notebook)
}

/// Re-render every cell of the notebook at `path` and store the results.
///
/// The file is rewritten only after every cell rendered; a notebook with
/// no cells is not rewritten at all.
pub fn refresh(path: &Path, renderer: &mut dyn Renderer, options: &NotebookOptions) -> Result<PathBuf> {
    let notebook = codec::read_notebook(path)?;
    if notebook.is_empty() {
        tracing::info!(path = %path.display(), "Notebook has no cells; nothing to refresh");
        return Ok(path.to_path_buf());
    }

    let (refreshed, summary) = refresh_notebook(&notebook, renderer, &options.render_config())?;
    codec::write_notebook(path, &refreshed, options.indent)?;
    tracing::info!(
        path = %path.display(),
        engine = renderer.name(),
        rendered = summary.rendered,
        identical = summary.identical,
        "Refreshed notebook"
    );
    Ok(path.to_path_buf())
}

/// Project the notebook at `path` to markdown and return the output path.
///
/// `output` defaults to `path` with its extension replaced (`md` or `Rmd`).
pub fn export(path: &Path, output: Option<&Path>, mode: ExportMode) -> Result<PathBuf> {
    let notebook = codec::read_notebook(path)?;
    let output = output.map_or_else(|| default_output_path(path, mode), Path::to_path_buf);
    if output == path {
        return Err(NotebookError::io(
            &output,
            std::io::Error::new(std::io::ErrorKind::AlreadyExists, "export would overwrite its input"),
        ));
    }

    let text = export_text(&notebook, mode)?;
    codec::write_atomic(&output, text.as_bytes())?;
    tracing::info!(input = %path.display(), output = %output.display(), ?mode, "Exported notebook");
    Ok(output)
}

/// Convert a raw-source file into a notebook and return the notebook path.
///
/// `output` defaults to `path` with the extension `Rnb`.
pub fn import(path: &Path, output: Option<&Path>, options: &NotebookOptions) -> Result<PathBuf> {
    let bytes = std::fs::read(path).map_err(|e| NotebookError::io(path, e))?;
    let text = normalize_utf8(&bytes)?;
    let notebook = parse_raw_source(&text)?;

    let output = output.map_or_else(|| path.with_extension(NOTEBOOK_EXTENSION), Path::to_path_buf);
    if output == path {
        return Err(NotebookError::io(
            &output,
            std::io::Error::new(std::io::ErrorKind::AlreadyExists, "import would overwrite its input"),
        ));
    }

    codec::write_notebook(&output, &notebook, options.indent)?;
    tracing::info!(input = %path.display(), output = %output.display(), cells = notebook.len(), "Imported notebook");
    Ok(output)
}
