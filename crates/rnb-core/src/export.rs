/*
 * export.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Project a notebook into flat markdown text.
 */

//! Project a notebook into flat markdown text.
//!
//! Two projections exist:
//!
//! - [`ExportMode::Rendered`]: what a reader sees. Text cells show their
//!   rendered output when present; code cells show only their stored
//!   output and disappear entirely when it is null.
//! - [`ExportMode::Raw`]: source only, with code cells as fenced
//!   ```` ```{r options} ```` chunks. [`extract_code_chunks`] reads those
//!   chunks back.
//!
//! Both start with a YAML frontmatter block between `---` fences.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::Result;
use crate::model::{Cell, CodeSource, Frontmatter, Lines, Notebook};

const FENCE: &str = "```";

/// ```` ```{r} ```` or ```` ```{r options} ````, with three or more
/// backticks; the options may contain braces.
static CHUNK_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(`{3,})\{r(?:[ \t]+(.*?))?\}[ \t]*$")
        .expect("Invalid regex pattern for chunk header")
});

/// Which projection [`export_lines`] produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportMode {
    #[default]
    Rendered,
    Raw,
}

impl ExportMode {
    /// Extension of the default output file.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportMode::Rendered => "md",
            ExportMode::Raw => "Rmd",
        }
    }
}

/// Project `notebook` into output lines.
pub fn export_lines(notebook: &Notebook, mode: ExportMode) -> Result<Vec<String>> {
    let mut lines = frontmatter_lines(notebook.frontmatter())?;
    let mut separated = false;

    for cell in notebook.cells() {
        let emitted: Option<&Lines> = match (cell, mode) {
            (Cell::Code { src, .. }, ExportMode::Raw) => {
                let fence = fence_for(&src.code);
                lines.push(fenced_header(&fence, &src.options));
                lines.extend(src.code.iter().map(str::to_string));
                lines.push(fence);
                lines.push(String::new());
                separated = true;
                continue;
            }
            (Cell::Code { out, .. }, ExportMode::Rendered) => out.as_ref(),
            (Cell::Text { src, .. }, ExportMode::Raw) => Some(src),
            (Cell::Text { .. }, ExportMode::Rendered) => Some(cell.rendered()),
        };

        if let Some(emitted) = emitted {
            lines.extend(emitted.iter().map(str::to_string));
            lines.push(String::new());
            separated = true;
        }
    }

    if separated && lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    Ok(lines)
}

/// [`export_lines`] joined into file contents, ending with a newline.
pub fn export_text(notebook: &Notebook, mode: ExportMode) -> Result<String> {
    let mut text = export_lines(notebook, mode)?.join("\n");
    text.push('\n');
    Ok(text)
}

/// `input` with its extension replaced for `mode`.
pub fn default_output_path(input: &Path, mode: ExportMode) -> PathBuf {
    input.with_extension(mode.extension())
}

/// Fence line opening a chunk with `options`.
pub fn chunk_header(options: &str) -> String {
    fenced_header(FENCE, options)
}

fn fenced_header(fence: &str, options: &str) -> String {
    let options = options.trim();
    if options.is_empty() {
        format!("{fence}{{r}}")
    } else {
        format!("{fence}{{r {options}}}")
    }
}

/// Shortest backtick fence that no line of `code` can close.
fn fence_for(code: &Lines) -> String {
    let longest = code
        .iter()
        .map(str::trim_end)
        .filter(|line| !line.is_empty() && line.bytes().all(|b| b == b'`'))
        .map(str::len)
        .max()
        .unwrap_or(0);
    "`".repeat(longest.max(FENCE.len() - 1) + 1)
}

/// Code chunks of a raw export, in order.
///
/// A chunk closes only on a line equal to its opening fence, so code
/// containing ```` ``` ```` survives when the export chose a longer fence.
/// A chunk left open at end of input keeps the lines read so far.
///
/// Prose is not escaped: a ```` ```{r} ```` block written inside a text
/// cell reads back as a chunk. The raw format cannot tell the two apart.
pub fn extract_code_chunks(text: &str) -> Vec<CodeSource> {
    split_segments(text)
        .into_iter()
        .filter_map(|segment| match segment {
            Segment::Chunk { source, .. } => Some(source),
            Segment::Prose(_) => None,
        })
        .collect()
}

/// A run of raw-source text: prose lines or one fenced chunk.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Segment<'a> {
    Prose(Vec<&'a str>),
    Chunk {
        source: CodeSource,
        /// 1-based line of the opening fence.
        line: usize,
        closed: bool,
    },
}

/// Split raw-source text into prose and chunks.
pub(crate) fn split_segments(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut prose: Vec<&str> = Vec::new();
    let mut lines = text.lines().enumerate();

    while let Some((i, line)) = lines.next() {
        let Some(caps) = CHUNK_HEADER.captures(line) else {
            prose.push(line);
            continue;
        };

        if !prose.is_empty() {
            segments.push(Segment::Prose(std::mem::take(&mut prose)));
        }

        let fence = caps.get(1).map_or(FENCE, |m| m.as_str());
        let options = caps.get(2).map_or("", |m| m.as_str().trim());
        let mut code = Vec::new();
        let mut closed = false;
        for (_, line) in lines.by_ref() {
            if line.trim_end() == fence {
                closed = true;
                break;
            }
            code.push(line.to_string());
        }

        segments.push(Segment::Chunk {
            source: CodeSource::new(options, Lines::new(code)),
            line: i + 1,
            closed,
        });
    }

    if !prose.is_empty() {
        segments.push(Segment::Prose(prose));
    }
    segments
}

fn frontmatter_lines(frontmatter: &Frontmatter) -> Result<Vec<String>> {
    let mut lines = vec!["---".to_string()];
    if !frontmatter.is_empty() {
        let yaml = serde_yaml::to_string(frontmatter)?;
        lines.extend(yaml.lines().map(str::to_string));
    }
    lines.push("---".to_string());
    lines.push(String::new());
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn frontmatter() -> Frontmatter {
        let mut fm = Frontmatter::new();
        fm.insert("title", "Demo");
        fm.insert("author", None::<String>);
        fm
    }

    fn sample() -> Notebook {
        Notebook::new(
            frontmatter(),
            vec![
                Cell::text("# Intro").with_out(Some(Lines::from_text("<h1>Intro</h1>"))),
                Cell::code("echo=FALSE", "x <- 1\nx").with_out(Some(Lines::from_text("## [1] 1"))),
                Cell::code("", "invisible(NULL)"),
                Cell::text("Done."),
            ],
        )
    }

    #[test]
    fn test_rendered_export() {
        let text = export_text(&sample(), ExportMode::Rendered).unwrap();
        insta::assert_snapshot!(text, @r"
        ---
        title: Demo
        author: null
        ---

        <h1>Intro</h1>

        ## [1] 1

        Done.
        ");
    }

    #[test]
    fn test_raw_export() {
        let lines = export_lines(&sample(), ExportMode::Raw).unwrap();
        assert_eq!(
            lines,
            vec![
                "---",
                "title: Demo",
                "author: null",
                "---",
                "",
                "# Intro",
                "",
                "```{r echo=FALSE}",
                "x <- 1",
                "x",
                "```",
                "",
                "```{r}",
                "invisible(NULL)",
                "```",
                "",
                "Done.",
            ]
        );
    }

    #[test]
    fn test_raw_export_of_single_chunk() {
        let nb = Notebook::new(Frontmatter::new(), vec![Cell::code("echo=FALSE", "1+1")]);
        let lines = export_lines(&nb, ExportMode::Raw).unwrap();
        assert_eq!(lines, vec!["---", "---", "", "```{r echo=FALSE}", "1+1", "```"]);
    }

    #[test]
    fn test_null_code_output_leaves_no_blank_run() {
        let nb = Notebook::new(
            Frontmatter::new(),
            vec![Cell::text("a"), Cell::code("", "1"), Cell::code("", "2"), Cell::text("b")],
        );
        let lines = export_lines(&nb, ExportMode::Rendered).unwrap();
        assert_eq!(lines, vec!["---", "---", "", "a", "", "b"]);
    }

    #[test]
    fn test_trailing_null_code_cell_drops_last_emitted_separator() {
        let nb = Notebook::new(
            Frontmatter::new(),
            vec![Cell::text("a"), Cell::code("", "1")],
        );
        let lines = export_lines(&nb, ExportMode::Rendered).unwrap();
        assert_eq!(lines, vec!["---", "---", "", "a"]);

        let nb = Notebook::new(Frontmatter::new(), vec![Cell::code("", "1")]);
        let lines = export_lines(&nb, ExportMode::Rendered).unwrap();
        assert_eq!(lines, vec!["---", "---", ""]);
    }

    #[test]
    fn test_empty_body_keeps_frontmatter_block() {
        let nb = Notebook::new(frontmatter(), vec![]);
        let lines = export_lines(&nb, ExportMode::Rendered).unwrap();
        assert_eq!(lines, vec!["---", "title: Demo", "author: null", "---", ""]);
    }

    #[test]
    fn test_chunk_header_trims_options() {
        assert_eq!(chunk_header("  "), "```{r}");
        assert_eq!(chunk_header(" fig.width=4 "), "```{r fig.width=4}");
    }

    #[test]
    fn test_extract_round_trips_chunks() {
        let nb = sample();
        let text = export_text(&nb, ExportMode::Raw).unwrap();
        let chunks = extract_code_chunks(&text);
        let expected: Vec<CodeSource> = nb
            .cells()
            .iter()
            .filter_map(|cell| match cell {
                Cell::Code { src, .. } => Some(src.clone()),
                Cell::Text { .. } => None,
            })
            .collect();
        assert_eq!(chunks, expected);
    }

    #[test]
    fn test_options_with_braces() {
        let chunks = extract_code_chunks("```{r fig.cap=\"{a}\"}\nplot(1)\n```\n");
        assert_eq!(chunks, vec![CodeSource::new("fig.cap=\"{a}\"", "plot(1)")]);
    }

    #[test]
    fn test_code_with_backtick_line_gets_longer_fence() {
        let nb = Notebook::new(
            Frontmatter::new(),
            vec![Cell::code("", "cat('\n```\n')\n```\nx")],
        );
        let lines = export_lines(&nb, ExportMode::Raw).unwrap();
        assert_eq!(
            lines,
            vec!["---", "---", "", "````{r}", "cat('", "```", "')", "```", "x", "````"]
        );

        let text = export_text(&nb, ExportMode::Raw).unwrap();
        let chunks = extract_code_chunks(&text);
        assert_eq!(chunks, vec![CodeSource::new("", "cat('\n```\n')\n```\nx")]);
    }

    #[test]
    fn test_chunk_closes_only_on_matching_fence() {
        let chunks = extract_code_chunks("````{r}\n```\n1\n````\n```{r}\n2\n```\n");
        assert_eq!(
            chunks,
            vec![CodeSource::new("", "```\n1"), CodeSource::new("", "2")]
        );
    }

    #[test]
    fn test_chunk_in_prose_reads_back_as_chunk() {
        let nb = Notebook::new(
            Frontmatter::new(),
            vec![Cell::text("Example:\n```{r}\n1\n```")],
        );
        let text = export_text(&nb, ExportMode::Raw).unwrap();
        assert_eq!(extract_code_chunks(&text), vec![CodeSource::new("", "1")]);
    }

    #[test]
    fn test_unclosed_chunk_is_reported() {
        let segments = split_segments("intro\n```{r}\n1\n");
        assert_eq!(segments.len(), 2);
        assert!(matches!(&segments[1], Segment::Chunk { closed: false, line: 2, .. }));
    }

    #[test]
    fn test_default_output_path() {
        let input = Path::new("dir/analysis.Rnb");
        assert_eq!(default_output_path(input, ExportMode::Rendered), PathBuf::from("dir/analysis.md"));
        assert_eq!(default_output_path(input, ExportMode::Raw), PathBuf::from("dir/analysis.Rmd"));
    }
}
