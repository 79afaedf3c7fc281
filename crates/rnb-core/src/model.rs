/*
 * model.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * In-memory notebook document model.
 */

//! In-memory notebook document model.
//!
//! A [`Notebook`] is an ordered [`Frontmatter`] mapping plus an ordered
//! sequence of [`Cell`]s. Values of these types are produced by
//! [`crate::lint::validate`] or by the typed constructors; the model does
//! not re-check structure on its own.
//!
//! The `Serialize` implementations here *are* the canonical encoding:
//! single-line [`Lines`] are written as bare strings, everything else as
//! arrays, and `out: None` is written as `null`.

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeSeq, Serializer};

/// Text held as a sequence of lines.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Lines(Vec<String>);

impl Lines {
    pub fn new(lines: Vec<String>) -> Self {
        Self(lines)
    }

    /// Split `text` on `\n`. An empty string is one empty line.
    pub fn from_text(text: &str) -> Self {
        Self(text.split('\n').map(str::to_string).collect())
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The lines joined with `\n`.
    pub fn joined(&self) -> String {
        self.0.join("\n")
    }
}

impl From<&str> for Lines {
    fn from(text: &str) -> Self {
        Self::from_text(text)
    }
}

impl Serialize for Lines {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if let [only] = self.0.as_slice() {
            return serializer.serialize_str(only);
        }
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for line in &self.0 {
            seq.serialize_element(line)?;
        }
        seq.end()
    }
}

/// A frontmatter value: a JSON scalar or an array of strings.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(untagged)]
pub enum MetaValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    List(Vec<String>),
}

impl MetaValue {
    /// Build a list value; a single element collapses to a string.
    pub fn list(mut items: Vec<String>) -> Self {
        if items.len() == 1 {
            Self::String(items.remove(0))
        } else {
            Self::List(items)
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<&str> for MetaValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Option<String>> for MetaValue {
    fn from(s: Option<String>) -> Self {
        s.map_or(Self::Null, Self::String)
    }
}

/// Ordered notebook metadata.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize)]
#[serde(transparent)]
pub struct Frontmatter(IndexMap<String, MetaValue>);

impl Frontmatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace `key`, keeping its original position if present.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<MetaValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.0.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetaValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn title(&self) -> Option<&str> {
        self.get("title").and_then(MetaValue::as_str)
    }

    pub fn author(&self) -> Option<&str> {
        self.get("author").and_then(MetaValue::as_str)
    }
}

/// Source of a code cell.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CodeSource {
    /// Chunk options, interpreted by the rendering engine.
    pub options: String,
    pub code: Lines,
}

impl CodeSource {
    pub fn new(options: impl Into<String>, code: impl Into<Lines>) -> Self {
        Self {
            options: options.into(),
            code: code.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    Text,
    Code,
}

impl CellKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CellKind::Text => "text",
            CellKind::Code => "code",
        }
    }
}

impl std::fmt::Display for CellKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One unit of notebook content.
///
/// `out: None` means either "not rendered yet" or "rendered output equals
/// the source"; the file format does not tell the two apart.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Cell {
    Text { src: Lines, out: Option<Lines> },
    Code { src: CodeSource, out: Option<Lines> },
}

impl Cell {
    /// An unrendered text cell.
    pub fn text(src: impl Into<Lines>) -> Self {
        Cell::Text {
            src: src.into(),
            out: None,
        }
    }

    /// An unrendered code cell.
    pub fn code(options: impl Into<String>, code: impl Into<Lines>) -> Self {
        Cell::Code {
            src: CodeSource::new(options, code),
            out: None,
        }
    }

    pub fn kind(&self) -> CellKind {
        match self {
            Cell::Text { .. } => CellKind::Text,
            Cell::Code { .. } => CellKind::Code,
        }
    }

    /// The source lines: markdown for text cells, code for code cells.
    pub fn source(&self) -> &Lines {
        match self {
            Cell::Text { src, .. } => src,
            Cell::Code { src, .. } => &src.code,
        }
    }

    /// The source joined with `\n`.
    pub fn source_text(&self) -> String {
        self.source().joined()
    }

    pub fn out(&self) -> Option<&Lines> {
        match self {
            Cell::Text { out, .. } | Cell::Code { out, .. } => out.as_ref(),
        }
    }

    /// What a reader sees: the stored output, or the source when there is none.
    pub fn rendered(&self) -> &Lines {
        self.out().unwrap_or_else(|| self.source())
    }

    pub fn set_out(&mut self, value: Option<Lines>) {
        match self {
            Cell::Text { out, .. } | Cell::Code { out, .. } => *out = value,
        }
    }

    pub fn with_out(mut self, value: Option<Lines>) -> Self {
        self.set_out(value);
        self
    }
}

/// A notebook document: frontmatter plus body cells in reading order.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize)]
pub struct Notebook {
    frontmatter: Frontmatter,
    body: Vec<Cell>,
}

impl Notebook {
    pub fn new(frontmatter: Frontmatter, body: Vec<Cell>) -> Self {
        Self { frontmatter, body }
    }

    pub fn frontmatter(&self) -> &Frontmatter {
        &self.frontmatter
    }

    pub fn cells(&self) -> &[Cell] {
        &self.body
    }

    /// Cell at a 1-based index, matching diagnostic numbering.
    pub fn cell(&self, index: usize) -> Option<&Cell> {
        index.checked_sub(1).and_then(|i| self.body.get(i))
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn into_parts(self) -> (Frontmatter, Vec<Cell>) {
        (self.frontmatter, self.body)
    }
}
