//! Character-level text diff.

use difference::{Changeset, Difference};

use crate::palette::Markers;

/// Aligns `expected` against `actual` character by character.
///
/// Removed characters only appear on the expected side, added characters
/// only on the actual side, each run wrapped in `inverse`. Unchanged runs
/// appear on both sides, so each side still reads as its original string.
pub fn diff_text(expected: &str, actual: &str, inverse: Markers) -> (String, String) {
    if expected == actual {
        return (expected.to_string(), actual.to_string());
    }
    if expected.is_empty() || actual.is_empty() {
        let wrap = |s: &str| if s.is_empty() { String::new() } else { inverse.wrap(s) };
        return (wrap(expected), wrap(actual));
    }

    let changeset = Changeset::new(expected, actual, "");
    let mut expected_out = String::with_capacity(expected.len());
    let mut actual_out = String::with_capacity(actual.len());

    for diff in &changeset.diffs {
        match diff {
            Difference::Same(x) | Difference::Rem(x) | Difference::Add(x) if x.is_empty() => {}
            Difference::Same(x) => {
                expected_out.push_str(x);
                actual_out.push_str(x);
            }
            Difference::Rem(x) => expected_out.push_str(&inverse.wrap(x)),
            Difference::Add(x) => actual_out.push_str(&inverse.wrap(x)),
        }
    }

    (expected_out, actual_out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const INV: Markers = Markers::new("[", "]");

    #[test]
    fn equal_inputs_are_unmarked() {
        let (e, a) = diff_text("same text", "same text", INV);
        assert_eq!(e, "same text");
        assert_eq!(a, "same text");
    }

    #[test]
    fn substitution_marks_both_sides() {
        let (e, a) = diff_text("test", "tent", INV);
        assert_eq!(e, "te[s]t");
        assert_eq!(a, "te[n]t");
    }

    #[test]
    fn pure_insertion_only_marks_actual() {
        let (e, a) = diff_text("abc", "abXc", INV);
        assert_eq!(e, "abc");
        assert_eq!(a, "ab[X]c");
    }

    #[test]
    fn empty_side() {
        let (e, a) = diff_text("", "new", INV);
        assert_eq!(e, "");
        assert_eq!(a, "[new]");
    }
}
