//! Index-by-index sequence diff.

use std::fmt::Debug;

use crate::palette::Markers;

/// Compares two sequences position by position.
///
/// Positions present on both sides are unmarked when equal and marked on
/// both sides when not. Positions past the end of the shorter sequence are
/// rendered and marked on the side that has them.
pub fn diff_sequence<T>(expected: &[T], actual: &[T], inverse: Markers) -> (String, String)
where
    T: Debug + PartialEq,
{
    let shared = expected.len().min(actual.len());
    let mut expected_items = Vec::with_capacity(expected.len());
    let mut actual_items = Vec::with_capacity(actual.len());

    for (e, a) in expected.iter().zip(actual) {
        let (e_str, a_str) = (format!("{e:?}"), format!("{a:?}"));
        if e == a {
            expected_items.push(e_str);
            actual_items.push(a_str);
        } else {
            expected_items.push(inverse.wrap(&e_str));
            actual_items.push(inverse.wrap(&a_str));
        }
    }

    expected_items.extend(expected[shared..].iter().map(|e| inverse.wrap(&format!("{e:?}"))));
    actual_items.extend(actual[shared..].iter().map(|a| inverse.wrap(&format!("{a:?}"))));

    (
        format!("[{}]", expected_items.join(", ")),
        format!("[{}]", actual_items.join(", ")),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const INV: Markers = Markers::new("<", ">");

    #[test]
    fn unequal_positions_marked_on_both_sides() {
        let (e, a) = diff_sequence(&[1, 2, 3], &[1, 5, 3], INV);
        assert_eq!(e, "[1, <2>, 3]");
        assert_eq!(a, "[1, <5>, 3]");
    }

    #[test]
    fn tail_marked_on_longer_side() {
        let (e, a) = diff_sequence(&[1, 2], &[1, 2, 3, 4], INV);
        assert_eq!(e, "[1, 2]");
        assert_eq!(a, "[1, 2, <3>, <4>]");
    }

    #[test]
    fn empty_sequences() {
        let (e, a) = diff_sequence::<u8>(&[], &[], INV);
        assert_eq!((e.as_str(), a.as_str()), ("[]", "[]"));
    }
}
