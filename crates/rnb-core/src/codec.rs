/*
 * codec.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Canonical JSON reading and writing.
 */

//! Canonical JSON reading and writing.
//!
//! [`decode`] produces a raw JSON tree for [`crate::lint::validate`];
//! [`encode`] writes a typed [`Notebook`] using the unboxing convention
//! implemented by the model's `Serialize` impls.

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use crate::error::{NotebookError, Result};
use crate::lint;
use crate::model::Notebook;

/// JSON layout used when writing notebooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indent {
    /// Everything on one line.
    Compact,
    /// Multi-line output indented by this many spaces.
    Spaces(usize),
}

impl Default for Indent {
    fn default() -> Self {
        Indent::Spaces(2)
    }
}

/// Parse notebook bytes into a raw JSON tree.
pub fn decode(bytes: &[u8]) -> Result<Value> {
    serde_json::from_slice(bytes).map_err(NotebookError::Parse)
}

/// Serialize a notebook to UTF-8 JSON, terminated by a newline.
pub fn encode(notebook: &Notebook, indent: Indent) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    match indent {
        Indent::Compact => {
            serde_json::to_writer(&mut buf, notebook).map_err(to_encoding_error)?;
        }
        Indent::Spaces(width) => {
            let spaces = vec![b' '; width];
            let formatter = serde_json::ser::PrettyFormatter::with_indent(&spaces);
            let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
            notebook.serialize(&mut ser).map_err(to_encoding_error)?;
        }
    }
    buf.push(b'\n');
    Ok(buf)
}

fn to_encoding_error(e: serde_json::Error) -> NotebookError {
    NotebookError::Encoding(e.to_string())
}

/// Normalize raw bytes to UTF-8 text.
///
/// Strips a leading byte-order mark and converts CRLF line endings to LF.
/// Fails only when the bytes are not valid UTF-8.
pub fn normalize_utf8(bytes: &[u8]) -> Result<String> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let text = std::str::from_utf8(bytes).map_err(|e| {
        NotebookError::Encoding(format!(
            "invalid UTF-8 sequence at byte {}",
            e.valid_up_to()
        ))
    })?;
    if text.contains("\r\n") {
        Ok(text.replace("\r\n", "\n"))
    } else {
        Ok(text.to_string())
    }
}

/// Read, decode and validate the notebook at `path`.
pub fn read_notebook(path: &Path) -> Result<Notebook> {
    let bytes = std::fs::read(path).map_err(|e| NotebookError::io(path, e))?;
    let value = decode(&bytes)?;
    let notebook = lint::validate(&value)?;
    tracing::debug!(path = %path.display(), cells = notebook.len(), "Read notebook");
    Ok(notebook)
}

/// Encode `notebook` and write it to `path`.
///
/// The file is replaced atomically: the bytes go to a temporary file in the
/// same directory which is then renamed over `path`.
pub fn write_notebook(path: &Path, notebook: &Notebook, indent: Indent) -> Result<()> {
    let bytes = encode(notebook, indent)?;
    write_atomic(path, &bytes)?;
    tracing::debug!(path = %path.display(), cells = notebook.len(), "Wrote notebook");
    Ok(())
}

/// Write `bytes` to `path` through a temporary sibling file.
///
/// An existing target keeps its permissions. A new file gets the same
/// permissions a plain `File::create` would give it.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut builder = tempfile::Builder::new();
    builder.prefix(".rnb");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        // Subject to the umask, like File::create.
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    let mut tmp = builder.tempfile_in(dir).map_err(|e| NotebookError::io(dir, e))?;

    tmp.write_all(bytes)
        .and_then(|()| tmp.flush())
        .map_err(|e| NotebookError::io(tmp.path(), e))?;

    if let Ok(existing) = std::fs::metadata(path) {
        tmp.as_file()
            .set_permissions(existing.permissions())
            .map_err(|e| NotebookError::io(tmp.path(), e))?;
    }

    tmp.persist(path)
        .map_err(|e| NotebookError::io(path, e.error))?;
    Ok(())
}
