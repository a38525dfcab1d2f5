//! Key-by-key map diff.

use crate::palette::Markers;

/// One key of the union of both maps, with each side's rendered value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapRow {
    pub key: String,
    pub expected: Option<String>,
    pub actual: Option<String>,
    pub equal: bool,
}

/// Renders a brace-delimited block, one entry per line.
///
/// - key only in actual: a `+` line
/// - key only in expected: a `-` line
/// - unequal values: a `-` line then a `+` line
/// - equal values: a plain line indented by `tab_width`
///
/// Rows are sorted by key. `removed` and `added` wrap the marked lines.
pub fn diff_map(mut rows: Vec<MapRow>, removed: Markers, added: Markers, tab_width: usize) -> String {
    rows.sort_by(|a, b| a.key.cmp(&b.key));
    let indent = " ".repeat(tab_width);
    let marker_pad = " ".repeat(tab_width.saturating_sub(2));

    let mut out = String::from("{\n");
    for row in rows {
        if row.equal {
            if let Some(value) = &row.actual {
                out.push_str(&format!("{indent}{}: {value}\n", row.key));
            }
            continue;
        }
        if let Some(value) = &row.expected {
            let line = format!("- {marker_pad}{}: {value}", row.key);
            out.push_str(&removed.wrap(&line));
            out.push('\n');
        }
        if let Some(value) = &row.actual {
            let line = format!("+ {marker_pad}{}: {value}", row.key);
            out.push_str(&added.wrap(&line));
            out.push('\n');
        }
    }
    out.push('}');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(key: &str, expected: Option<&str>, actual: Option<&str>) -> MapRow {
        MapRow {
            key: key.to_string(),
            expected: expected.map(str::to_string),
            actual: actual.map(str::to_string),
            equal: expected.is_some() && expected == actual,
        }
    }

    #[test]
    fn removed_only_line_for_missing_key() {
        let rows = vec![
            row("y", Some("1"), Some("1")),
            row("z", Some("1"), None),
            row("x", Some("1"), Some("1")),
        ];
        let out = diff_map(rows, Markers::NONE, Markers::NONE, 4);
        assert_eq!(out, "{\n    x: 1\n    y: 1\n-   z: 1\n}");
    }

    #[test]
    fn changed_value_shows_removed_then_added() {
        let rows = vec![row("k", Some("1"), Some("2")), row("n", None, Some("3"))];
        let out = diff_map(rows, Markers::new("R", "r"), Markers::new("A", "a"), 2);
        assert_eq!(out, "{\nR- k: 1r\nA+ k: 2a\nA+ n: 3a\n}");
    }
}
