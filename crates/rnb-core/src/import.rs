/*
 * import.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Build a notebook from raw-source (Rmd-style) text.
 */

//! Build a notebook from raw-source (Rmd-style) text.
//!
//! The input is what [`crate::export`] writes in raw mode: an optional YAML
//! frontmatter block between `---` fences, then prose interleaved with
//! ```` ```{r options} ```` chunks. Prose runs become text cells, with the
//! blank lines around them dropped; chunks become code cells. Nothing is
//! rendered, so every `out` is null.

use serde_json::{Value, json};

use crate::error::{NotebookError, Result};
use crate::export::{Segment, split_segments};
use crate::lint::{self, ValidationError};
use crate::model::{Cell, Frontmatter, Lines, Notebook};

/// Parse raw-source text into a notebook.
pub fn parse_raw_source(text: &str) -> Result<Notebook> {
    let (yaml, body, body_offset) = split_frontmatter(text);
    let frontmatter = match yaml {
        Some(yaml) => parse_frontmatter(yaml)?,
        None => Frontmatter::new(),
    };

    let mut cells = Vec::new();
    for segment in split_segments(body) {
        match segment {
            Segment::Prose(lines) => {
                if let Some(lines) = trim_blank_lines(&lines) {
                    cells.push(Cell::text(Lines::new(
                        lines.iter().map(|l| l.to_string()).collect(),
                    )));
                }
            }
            Segment::Chunk { closed: false, line, .. } => {
                return Err(ValidationError::document(format!(
                    "code chunk opened at line {} is never closed",
                    line + body_offset
                ))
                .into());
            }
            Segment::Chunk { source, .. } => cells.push(Cell::Code { src: source, out: None }),
        }
    }

    tracing::debug!(cells = cells.len(), keys = frontmatter.len(), "Parsed raw source");
    Ok(Notebook::new(frontmatter, cells))
}

/// Split off a leading `---` block: (yaml, rest, lines before rest).
fn split_frontmatter(text: &str) -> (Option<&str>, &str, usize) {
    let Some(after_open) = text
        .strip_prefix("---\n")
        .or_else(|| text.strip_prefix("---\r\n"))
    else {
        return (None, text, 0);
    };

    let mut offset = 0;
    let mut consumed = 1;
    for line in after_open.split_inclusive('\n') {
        consumed += 1;
        let fence = line.trim_end();
        if fence == "---" || fence == "..." {
            let yaml = &after_open[..offset];
            let rest = &after_open[offset + line.len()..];
            return (Some(yaml), rest, consumed);
        }
        offset += line.len();
    }

    // No closing fence: treat the whole input as prose.
    (None, text, 0)
}

/// Convert a YAML mapping into frontmatter, with the same value rules as
/// a notebook file.
fn parse_frontmatter(yaml: &str) -> Result<Frontmatter> {
    let parsed: serde_yaml::Value = serde_yaml::from_str(yaml)?;
    let value = match parsed {
        serde_yaml::Value::Null => Value::Object(Default::default()),
        serde_yaml::Value::Mapping(_) => serde_json::to_value(&parsed).map_err(|e| {
            NotebookError::from(ValidationError::document(format!(
                "frontmatter cannot be represented as JSON: {e}"
            )))
        })?,
        _ => return Err(ValidationError::document("frontmatter must be a mapping").into()),
    };

    let notebook = lint::validate(&json!({ "frontmatter": value, "body": [] }))?;
    let (frontmatter, _) = notebook.into_parts();
    Ok(frontmatter)
}

fn trim_blank_lines<'a>(lines: &'a [&'a str]) -> Option<&'a [&'a str]> {
    let start = lines.iter().position(|l| !l.trim().is_empty())?;
    let end = lines.iter().rposition(|l| !l.trim().is_empty())?;
    Some(&lines[start..=end])
}
