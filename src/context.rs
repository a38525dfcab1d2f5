//! Source-context capture.
//!
//! A [`SourceContext`] points at the procedure a failure belongs to, the
//! line the failure was reported on and, optionally, the exact span of the
//! failing expression. Nothing is read from disk until the report asks for
//! a [`ContextWindow`]: the trailing slice of the procedure's source,
//! ending at the reported line, with the span wrapped in highlight markers.

use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};

use crate::error::{Result, SoaperError};
use crate::palette::Markers;
use crate::tags::ProcedureInfo;

/// Maximum number of source lines shown for one failure.
pub const MAX_CONTEXT_LINES: usize = 10;

/// A region of source text. Rows are 1-based, columns are 0-based character
/// offsets. An `end_col` past the end of its line covers the rest of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start_row: u32,
    pub start_col: usize,
    pub end_row: u32,
    pub end_col: usize,
}

impl Span {
    pub fn new(start_row: u32, start_col: usize, end_row: u32, end_col: usize) -> Self {
        Self {
            start_row,
            start_col,
            end_row,
            end_col,
        }
    }

    /// Covers a whole line.
    pub fn whole_line(row: u32) -> Self {
        Self::new(row, 0, row, usize::MAX)
    }

    /// Covers a call site from its column to the end of its line.
    pub fn from_call_site(at: &Location<'_>) -> Self {
        Self::new(
            at.line(),
            column_offset(at),
            at.line(),
            usize::MAX,
        )
    }

    /// Covers everything from `start` to the end of the line holding `end`.
    ///
    /// Used for assertion chains, where `start` is the `expect` call and
    /// `end` the comparison that failed, possibly several lines further.
    pub fn between(start: &Location<'_>, end: &Location<'_>) -> Self {
        if start.file() != end.file() || start.line() > end.line() {
            return Self::from_call_site(end);
        }
        Self::new(start.line(), column_offset(start), end.line(), usize::MAX)
    }

    pub fn is_single_line(&self) -> bool {
        self.start_row == self.end_row
    }
}

fn column_offset(at: &Location<'_>) -> usize {
    (at.column() as usize).saturating_sub(1)
}

/// Points at the source of a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceContext {
    suite: String,
    procedure: ProcedureInfo,
    line: Option<u32>,
    span: Option<Span>,
}

impl SourceContext {
    pub fn new(suite: impl Into<String>, procedure: ProcedureInfo) -> Self {
        Self {
            suite: suite.into(),
            procedure,
            line: None,
            span: None,
        }
    }

    /// Sets the reported line.
    pub fn at_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    /// Sets the highlighted span.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Anchors the context at a caller location when it lies inside the
    /// procedure's own file, at or after its first line; otherwise the
    /// context keeps pointing at the procedure's first line.
    pub fn at_location(self, at: &Location<'_>, span: Span) -> Self {
        self.anchored(at.file(), at.line(), span)
    }

    /// Same as [`SourceContext::at_location`] for an owned file/line pair.
    pub fn anchored(self, file: &str, line: u32, span: Span) -> Self {
        // Helpers declared above the procedure are outside its window.
        if file != self.procedure.file || line < self.procedure.first_line {
            return self;
        }
        self.at_line(line).with_span(span)
    }

    pub fn suite(&self) -> &str {
        &self.suite
    }

    pub fn procedure(&self) -> &ProcedureInfo {
        &self.procedure
    }

    pub fn name(&self) -> &'static str {
        self.procedure.name
    }

    pub fn doc(&self) -> &'static str {
        self.procedure.doc
    }

    pub fn file(&self) -> &'static str {
        self.procedure.file
    }

    /// The declaring file as shown in reports (`./src/lib.rs`).
    pub fn relative_path(&self) -> String {
        let path = Path::new(self.procedure.file);
        if path.is_absolute() {
            return path.display().to_string();
        }
        format!("./{}", path.display())
    }

    pub fn first_line(&self) -> u32 {
        self.procedure.first_line
    }

    /// The reported line, defaulting to the procedure's first line.
    pub fn line(&self) -> u32 {
        self.line.unwrap_or(self.procedure.first_line)
    }

    pub fn span(&self) -> Option<Span> {
        self.span
    }

    /// Reads the procedure's source and cuts the window shown for this failure.
    pub fn window(&self, highlight: Markers) -> Result<ContextWindow> {
        let path = Path::new(self.procedure.file);
        let text = fs::read_to_string(path).map_err(|source| SoaperError::SourceRead {
            path: PathBuf::from(path),
            source,
        })?;
        Ok(self.window_from_source(&text, highlight))
    }

    /// Like [`SourceContext::window`], over already loaded source text.
    pub fn window_from_source(&self, source: &str, highlight: Markers) -> ContextWindow {
        let mut lines: Vec<String> = source.lines().map(|l| l.trim_end().to_string()).collect();

        if let Some(span) = self.span {
            highlight_span(&mut lines, span, highlight);
        }

        let first = self.first_line().max(1) as usize;
        let last = (self.line() as usize).max(first);
        let start = (first - 1).min(lines.len());
        let end = last.min(lines.len());

        let mut window = lines[start..end].to_vec();
        let mut first_line_number = start + 1;
        if window.len() > MAX_CONTEXT_LINES {
            let excess = window.len() - MAX_CONTEXT_LINES;
            window.drain(..excess);
            first_line_number += excess;
        }

        ContextWindow {
            first_line_number,
            lines: window,
        }
    }
}

/// The trailing slice of source shown under a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextWindow {
    /// 1-based number of `lines[0]`.
    pub first_line_number: usize,
    pub lines: Vec<String>,
}

impl ContextWindow {
    /// Lines paired with their 1-based line numbers.
    pub fn numbered(&self) -> impl Iterator<Item = (usize, &str)> {
        self.lines
            .iter()
            .enumerate()
            .map(move |(i, line)| (self.first_line_number + i, line.as_str()))
    }
}

// ============================================================================
// SPAN HIGHLIGHTING
// ============================================================================

/// Byte index of the `col`-th character, clamped to the end of the line.
fn char_boundary(line: &str, col: usize) -> usize {
    line.char_indices()
        .nth(col)
        .map(|(i, _)| i)
        .unwrap_or(line.len())
}

/// Wraps the span in `markers`, in place. Rows outside `lines` are ignored.
pub fn highlight_span(lines: &mut [String], span: Span, markers: Markers) {
    if span.start_row == 0 || span.end_row < span.start_row {
        return;
    }
    let start = span.start_row as usize - 1;
    let end = span.end_row as usize - 1;
    if start >= lines.len() {
        return;
    }

    if span.is_single_line() {
        let line = &lines[start];
        let from = char_boundary(line, span.start_col);
        let to = char_boundary(line, span.end_col).max(from);
        let highlighted = format!(
            "{}{}{}",
            &line[..from],
            markers.wrap(&line[from..to]),
            &line[to..]
        );
        lines[start] = highlighted;
        return;
    }

    for (i, line) in lines
        .iter_mut()
        .enumerate()
        .take(end + 1)
        .skip(start)
    {
        if i == start {
            let from = char_boundary(line, span.start_col);
            *line = format!(
                "{}{}{}{}",
                &line[..from],
                markers.open,
                &line[from..],
                markers.close
            );
        } else if i == end {
            let to = char_boundary(line, span.end_col);
            *line = format!("{}{}{}{}", markers.open, &line[..to], markers.close, &line[to..]);
        } else {
            *line = markers.wrap(line);
        }
    }
}
