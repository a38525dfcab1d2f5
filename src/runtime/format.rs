//! Text shaping for report lines.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

const ELLIPSIS: &str = " ...";

/// Shortens `text` to at most `max_width` display columns, marking the cut
/// with ` ...`. Grapheme clusters are never split.
pub fn truncate(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    let budget = max_width.saturating_sub(ELLIPSIS.len());
    let mut out = String::new();
    let mut used = 0;
    for grapheme in text.graphemes(true) {
        let width = grapheme.width();
        if used + width > budget {
            break;
        }
        used += width;
        out.push_str(grapheme);
    }
    out.push_str(ELLIPSIS);
    out
}

/// Splits a docstring into trimmed lines, dropping leading and trailing blank ones.
pub fn split_lines(text: &str) -> Vec<&str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed.lines().map(str::trim).collect()
}

/// A docstring folded onto one line, as shown next to a test name.
pub fn one_line(text: &str) -> String {
    split_lines(text).join(" / ")
}

/// Leading whitespace of `line`.
pub fn indentation(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}
