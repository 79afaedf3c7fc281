/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Error types for rnb-core.
 */

//! Error types for rnb-core

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::engine::RenderError;
use crate::lint::ValidationError;

#[derive(Error, Debug)]
pub enum NotebookError {
    /// The input bytes are not valid JSON.
    #[error("Failed to parse notebook JSON: {0}")]
    Parse(#[source] serde_json::Error),

    /// The JSON is well formed but does not describe a notebook.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Text could not be normalized to UTF-8.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// The rendering engine failed while rendering a cell.
    #[error(transparent)]
    Engine(#[from] RenderError),

    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An option value could not be interpreted.
    #[error("Invalid value for {name}: {message}")]
    Config { name: String, message: String },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl NotebookError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn config(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Config {
            name: name.into(),
            message: message.into(),
        }
    }

    /// The validation diagnostic, if this is a validation failure.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, NotebookError>;
