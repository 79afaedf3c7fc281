/*
 * lint.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Structural validation of raw notebook JSON.
 */

//! Structural validation ("lint") of raw notebook JSON.
//!
//! [`validate`] turns a decoded JSON tree into a typed [`Notebook`] or
//! stops at the first structural violation. Cell diagnostics use 1-based
//! indices.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::model::{Cell, CodeSource, Frontmatter, Lines, MetaValue, Notebook};

/// A structural violation in a notebook document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The document as a whole is malformed.
    #[error("invalid notebook: {reason}")]
    Document { reason: String },

    /// A body cell is malformed.
    #[error("{reason}")]
    Cell {
        /// 1-based position of the cell in `body`.
        index: usize,
        /// The offending field (`type`, `src`, `options`, `code`, `out`), or
        /// `element` when the key set itself is wrong.
        field: &'static str,
        reason: String,
    },
}

impl ValidationError {
    pub(crate) fn document(reason: impl Into<String>) -> Self {
        Self::Document {
            reason: reason.into(),
        }
    }

    fn cell(index: usize, field: &'static str, reason: String) -> Self {
        Self::Cell {
            index,
            field,
            reason,
        }
    }

    /// The 1-based cell index, for cell-level errors.
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::Document { .. } => None,
            Self::Cell { index, .. } => Some(*index),
        }
    }

    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Document { .. } => None,
            Self::Cell { field, .. } => Some(field),
        }
    }
}

/// Validate a decoded JSON tree and build the typed notebook.
pub fn validate(value: &Value) -> Result<Notebook, ValidationError> {
    let top = value
        .as_object()
        .ok_or_else(|| ValidationError::document("top level must be an object"))?;
    if !has_exact_keys(top, &["frontmatter", "body"]) {
        return Err(ValidationError::document(
            "top level must have exactly the keys frontmatter/body",
        ));
    }

    let frontmatter = validate_frontmatter(&top["frontmatter"])?;

    let body = top["body"]
        .as_array()
        .ok_or_else(|| ValidationError::document("body must be a list"))?;

    let cells = body
        .iter()
        .enumerate()
        .map(|(i, element)| validate_cell(i + 1, element))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Notebook::new(frontmatter, cells))
}

fn validate_frontmatter(value: &Value) -> Result<Frontmatter, ValidationError> {
    let mut frontmatter = Frontmatter::new();
    let map = match value {
        Value::Object(map) => map,
        // An empty mapping written by a serializer that cannot tell
        // empty objects from empty arrays.
        Value::Array(items) if items.is_empty() => return Ok(frontmatter),
        _ => return Err(ValidationError::document("frontmatter must be a mapping")),
    };

    for (key, value) in map {
        let meta = match value {
            Value::Null => MetaValue::Null,
            Value::Bool(b) => MetaValue::Bool(*b),
            Value::Number(n) => MetaValue::Number(n.clone()),
            Value::String(s) => MetaValue::String(s.clone()),
            Value::Array(_) => match as_strings(value) {
                Some(items) => MetaValue::list(items),
                None => {
                    return Err(ValidationError::document(format!(
                        "frontmatter value '{key}' must be a scalar or an array of strings"
                    )));
                }
            },
            Value::Object(_) => {
                return Err(ValidationError::document(format!(
                    "frontmatter value '{key}' must be a scalar or an array of strings"
                )));
            }
        };
        frontmatter.insert(key.clone(), meta);
    }

    Ok(frontmatter)
}

fn validate_cell(index: usize, element: &Value) -> Result<Cell, ValidationError> {
    let fields = element
        .as_object()
        .filter(|map| has_exact_keys(map, &["type", "src", "out"]))
        .ok_or_else(|| {
            ValidationError::cell(
                index,
                "element",
                format!("element #{index} must have type/src/out"),
            )
        })?;

    let kind = single_string(&fields["type"])
        .filter(|t| *t == "text" || *t == "code")
        .ok_or_else(|| {
            ValidationError::cell(
                index,
                "type",
                format!("type of element #{index} must be text or code"),
            )
        })?;

    let cell = if kind == "text" {
        let src = character(&fields["src"]).ok_or_else(|| {
            ValidationError::cell(
                index,
                "src",
                format!("src of element #{index} must be character"),
            )
        })?;
        Cell::Text {
            src,
            out: validate_out(index, &fields["out"])?,
        }
    } else {
        let src = fields["src"]
            .as_object()
            .filter(|map| has_exact_keys(map, &["options", "code"]))
            .ok_or_else(|| {
                ValidationError::cell(
                    index,
                    "src",
                    format!("src of element #{index} must have options/code"),
                )
            })?;
        let options = single_string(&src["options"]).ok_or_else(|| {
            ValidationError::cell(
                index,
                "options",
                format!("options of element #{index} must be a single string"),
            )
        })?;
        let code = character(&src["code"]).ok_or_else(|| {
            ValidationError::cell(
                index,
                "code",
                format!("code of element #{index} must be character"),
            )
        })?;
        Cell::Code {
            src: CodeSource {
                options: options.to_string(),
                code,
            },
            out: validate_out(index, &fields["out"])?,
        }
    };

    Ok(cell)
}

fn validate_out(index: usize, value: &Value) -> Result<Option<Lines>, ValidationError> {
    if value.is_null() {
        return Ok(None);
    }
    character(value).map(Some).ok_or_else(|| {
        ValidationError::cell(
            index,
            "out",
            format!("out of element #{index} must be character or null"),
        )
    })
}

fn has_exact_keys(map: &Map<String, Value>, keys: &[&str]) -> bool {
    map.len() == keys.len() && keys.iter().all(|k| map.contains_key(*k))
}

/// A string, or an array holding exactly one string.
fn single_string(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) => Some(s),
        Value::Array(items) => match items.as_slice() {
            [Value::String(s)] => Some(s),
            _ => None,
        },
        _ => None,
    }
}

/// A string or an array of strings, split into lines.
///
/// Array elements that contain `\n` are split too, so that a single-line
/// value written back as a bare string reads the same next time.
fn character(value: &Value) -> Option<Lines> {
    match value {
        Value::String(s) => Some(Lines::from_text(s)),
        Value::Array(_) => as_strings(value).map(|items| {
            Lines::new(
                items
                    .iter()
                    .flat_map(|item| item.split('\n').map(str::to_string))
                    .collect(),
            )
        }),
        _ => None,
    }
}

fn as_strings(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|v| v.as_str().map(str::to_string))
        .collect()
}
