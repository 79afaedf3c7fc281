//! Core library for rnb notebooks
//!
//! An rnb notebook is one JSON file holding narrative text, R code, and the
//! rendered output of both, so a reader sees sources and results together.
//! This crate owns the document model, its validation and serialization,
//! the export projections, and the refresh loop that re-renders cells
//! through an engine.
//!
//! # Architecture
//!
//! - [`codec`] - canonical JSON encoding, UTF-8 normalization, atomic writes
//! - [`lint`] - structural validation of decoded JSON into a [`Notebook`]
//! - [`model`] - [`Notebook`], [`Cell`], [`Frontmatter`], [`Lines`]
//! - [`export`] - rendered and raw markdown projections
//! - [`import`] - raw markdown back into a notebook
//! - [`refresh`] - renders every cell through a [`Renderer`]
//! - [`engine`] - the [`Renderer`] trait and the knitr/passthrough engines
//! - [`options`] - `RNB_*` environment options
//! - [`operations`] - the file-level API (`create`, `lint`, `refresh`,
//!   `export`, `import`)
//!
//! # Example
//!
//! ```ignore
//! use rnb_core::engine::KnitrRenderer;
//! use rnb_core::{CreateRequest, NotebookOptions, operations};
//!
//! let options = NotebookOptions::from_env()?;
//! let path = operations::create(CreateRequest::new().with_title("Demo"), &options)?;
//!
//! let mut engine = KnitrRenderer::new(options.rscript.as_deref());
//! operations::refresh(&path, &mut engine, &options)?;
//! ```

pub mod codec;
pub mod engine;
pub mod error;
pub mod export;
pub mod import;
pub mod lint;
pub mod model;
pub mod operations;
pub mod options;
pub mod refresh;

// Re-export commonly used types
pub use codec::Indent;
pub use engine::{RenderConfig, RenderError, Renderer};
pub use error::{NotebookError, Result};
pub use export::ExportMode;
pub use lint::{ValidationError, validate};
pub use model::{Cell, CellKind, CodeSource, Frontmatter, Lines, MetaValue, Notebook};
pub use operations::CreateRequest;
pub use options::NotebookOptions;
pub use refresh::{RefreshSummary, refresh_notebook};
