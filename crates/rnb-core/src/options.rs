/*
 * options.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Named options resolved from the environment.
 */

//! Named options resolved from the environment.
//!
//! | Variable            | Meaning                                   | Default    |
//! |---------------------|-------------------------------------------|------------|
//! | `RNB_TITLE`         | title of newly created notebooks          | `Untitled` |
//! | `RNB_AUTHOR`        | author of newly created notebooks         | null       |
//! | `RNB_JSON_INDENT`   | `compact`, `false`, `0`, `true` or spaces | 2 spaces   |
//! | `RNB_R`             | Rscript binary or R installation dir      | `PATH`     |
//! | `RNB_CONSOLE_WIDTH` | console width handed to the engine        | 80         |
//!
//! Empty variables count as unset. Every value can be overridden per call
//! with the `with_*` builders, which is how the CLI applies its flags.

use std::path::PathBuf;

use crate::codec::Indent;
use crate::engine::RenderConfig;
use crate::error::{NotebookError, Result};

pub const TITLE_VAR: &str = "RNB_TITLE";
pub const AUTHOR_VAR: &str = "RNB_AUTHOR";
pub const JSON_INDENT_VAR: &str = "RNB_JSON_INDENT";
pub const R_VAR: &str = "RNB_R";
pub const CONSOLE_WIDTH_VAR: &str = "RNB_CONSOLE_WIDTH";

pub const DEFAULT_TITLE: &str = "Untitled";

/// Console widths R accepts for `options(width = ...)`.
const CONSOLE_WIDTH_RANGE: std::ops::RangeInclusive<u16> = 10..=10000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotebookOptions {
    pub title: String,
    pub author: Option<String>,
    pub indent: Indent,
    pub rscript: Option<PathBuf>,
    pub console_width: u16,
}

impl Default for NotebookOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            author: None,
            indent: Indent::default(),
            rscript: None,
            console_width: RenderConfig::default().console_width,
        }
    }
}

impl NotebookOptions {
    /// Resolve options from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve options through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut options = Self::default();

        if let Some(title) = get(TITLE_VAR) {
            options.title = title;
        }
        options.author = get(AUTHOR_VAR);
        if let Some(indent) = get(JSON_INDENT_VAR) {
            options.indent = parse_indent(&indent)?;
        }
        options.rscript = get(R_VAR).map(PathBuf::from);
        if let Some(width) = get(CONSOLE_WIDTH_VAR) {
            options.console_width = parse_console_width(&width)?;
        }

        tracing::debug!(?options, "Resolved notebook options");
        Ok(options)
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_author(mut self, author: Option<String>) -> Self {
        self.author = author;
        self
    }

    pub fn with_indent(mut self, indent: Indent) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_rscript(mut self, rscript: Option<PathBuf>) -> Self {
        self.rscript = rscript;
        self
    }

    /// Override the console width; out-of-range values are rejected.
    pub fn with_console_width(mut self, width: u16) -> Result<Self> {
        check_console_width(width)?;
        self.console_width = width;
        Ok(self)
    }

    /// The engine configuration these options imply.
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig::default().with_console_width(self.console_width)
    }
}

/// Interpret an `RNB_JSON_INDENT` value.
pub fn parse_indent(value: &str) -> Result<Indent> {
    match value.trim().to_ascii_lowercase().as_str() {
        "compact" | "false" | "0" => Ok(Indent::Compact),
        "true" => Ok(Indent::default()),
        other => other.parse::<usize>().map(Indent::Spaces).map_err(|_| {
            NotebookError::config(
                JSON_INDENT_VAR,
                format!("expected compact, true, false or a number of spaces, got {value:?}"),
            )
        }),
    }
}

fn parse_console_width(value: &str) -> Result<u16> {
    let width = value.trim().parse::<u16>().map_err(|_| {
        NotebookError::config(CONSOLE_WIDTH_VAR, format!("expected a number, got {value:?}"))
    })?;
    check_console_width(width)?;
    Ok(width)
}

fn check_console_width(width: u16) -> Result<()> {
    if CONSOLE_WIDTH_RANGE.contains(&width) {
        Ok(())
    } else {
        Err(NotebookError::config(
            CONSOLE_WIDTH_VAR,
            format!(
                "{width} is outside {}..={}",
                CONSOLE_WIDTH_RANGE.start(),
                CONSOLE_WIDTH_RANGE.end()
            ),
        ))
    }
}
