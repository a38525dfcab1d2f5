//! Structural diffs between an expected and an actual value.
//!
//! The assertion layer only asks for a diff after it has established that
//! the two values differ. Which strategy renders the diff is decided by the
//! value's type through the [`Diff`] trait:
//!
//! | type                              | strategy              | noun      |
//! |-----------------------------------|-----------------------|-----------|
//! | `str`, `String`                   | [`text::diff_text`]   | strings   |
//! | `Vec<T>`, `[T]`, `[T; N]`         | [`seq::diff_sequence`]| lists     |
//! | `HashSet<T>`, `BTreeSet<T>`       | [`set::diff_set`]     | sets      |
//! | `HashMap<K, V>`, `BTreeMap<K, V>` | [`map::diff_map`]     | maps      |
//! | scalars, `Option`, tuples         | plain values          | values    |
//!
//! Every strategy is pure and infallible. Types of your own get the plain
//! value rendering with [`impl_value_diff!`](crate::impl_value_diff).

pub mod map;
pub mod seq;
pub mod set;
pub mod text;

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;

use crate::palette::Palette;

pub use map::{diff_map, MapRow};
pub use seq::diff_sequence;
pub use set::diff_set;
pub use text::diff_text;

/// How a diff is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffStyle {
    pub palette: Palette,
    pub tab_width: usize,
}

impl Default for DiffStyle {
    fn default() -> Self {
        Self {
            palette: Palette::PLAIN,
            tab_width: 4,
        }
    }
}

/// A rendered diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    /// The expected and the actual value, each annotated.
    Pair { expected: String, actual: String },
    /// A single annotated block holding both sides.
    Block(String),
}

/// Types that know how to render a diff against another value of the same type.
pub trait Diff {
    /// Plural noun used in messages, e.g. "expected strings to equal".
    const KIND: &'static str;

    fn diff(expected: &Self, actual: &Self, style: &DiffStyle) -> Rendered;
}

/// Builds the message of a failed equality assertion.
pub fn equality_message<T: Diff + ?Sized>(expected: &T, actual: &T, style: &DiffStyle) -> String {
    let palette = &style.palette;
    match T::diff(expected, actual, style) {
        Rendered::Pair { expected, actual } => format!(
            "expected {} to equal\n\n{}\n{}",
            T::KIND,
            palette.expected.wrap(&format!("- {expected}")),
            palette.received.wrap(&format!("+ {actual}")),
        ),
        Rendered::Block(block) => format!("expected {} to equal\n\n{block}", T::KIND),
    }
}

/// Plain rendering for values without structure.
pub fn values<T: Debug + ?Sized>(expected: &T, actual: &T) -> Rendered {
    Rendered::Pair {
        expected: format!("{expected:?}"),
        actual: format!("{actual:?}"),
    }
}

/// Gives a type the plain value rendering.
///
/// ```rust
/// #[derive(Debug, PartialEq)]
/// struct Point(i32, i32);
/// soaper::impl_value_diff!(Point);
/// ```
#[macro_export]
macro_rules! impl_value_diff {
    ($($t:ty),* $(,)?) => {
        $(
            impl $crate::diff::Diff for $t {
                const KIND: &'static str = "values";

                fn diff(expected: &Self, actual: &Self, _style: &$crate::diff::DiffStyle) -> $crate::diff::Rendered {
                    $crate::diff::values(expected, actual)
                }
            }
        )*
    };
}

impl_value_diff!(
    bool, char, (), i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64
);

impl<T: Debug> Diff for Option<T> {
    const KIND: &'static str = "values";

    fn diff(expected: &Self, actual: &Self, _style: &DiffStyle) -> Rendered {
        values(expected, actual)
    }
}

impl<T: Debug, E: Debug> Diff for Result<T, E> {
    const KIND: &'static str = "values";

    fn diff(expected: &Self, actual: &Self, _style: &DiffStyle) -> Rendered {
        values(expected, actual)
    }
}

impl<A: Debug, B: Debug> Diff for (A, B) {
    const KIND: &'static str = "values";

    fn diff(expected: &Self, actual: &Self, _style: &DiffStyle) -> Rendered {
        values(expected, actual)
    }
}

impl<A: Debug, B: Debug, C: Debug> Diff for (A, B, C) {
    const KIND: &'static str = "values";

    fn diff(expected: &Self, actual: &Self, _style: &DiffStyle) -> Rendered {
        values(expected, actual)
    }
}

impl<T: Diff + ?Sized> Diff for &T {
    const KIND: &'static str = T::KIND;

    fn diff(expected: &Self, actual: &Self, style: &DiffStyle) -> Rendered {
        T::diff(*expected, *actual, style)
    }
}

impl<T: Diff + ?Sized> Diff for Box<T> {
    const KIND: &'static str = T::KIND;

    fn diff(expected: &Self, actual: &Self, style: &DiffStyle) -> Rendered {
        T::diff(expected, actual, style)
    }
}

// ============================================================================
// TEXT
// ============================================================================

impl Diff for str {
    const KIND: &'static str = "strings";

    fn diff(expected: &Self, actual: &Self, style: &DiffStyle) -> Rendered {
        let expected = expected.escape_debug().to_string();
        let actual = actual.escape_debug().to_string();
        let (expected, actual) = diff_text(&expected, &actual, style.palette.inverse);
        Rendered::Pair { expected, actual }
    }
}

impl Diff for String {
    const KIND: &'static str = "strings";

    fn diff(expected: &Self, actual: &Self, style: &DiffStyle) -> Rendered {
        <str as Diff>::diff(expected, actual, style)
    }
}

// ============================================================================
// SEQUENCES
// ============================================================================

impl<T: Debug + PartialEq> Diff for [T] {
    const KIND: &'static str = "lists";

    fn diff(expected: &Self, actual: &Self, style: &DiffStyle) -> Rendered {
        let (expected, actual) = diff_sequence(expected, actual, style.palette.inverse);
        Rendered::Pair { expected, actual }
    }
}

impl<T: Debug + PartialEq> Diff for Vec<T> {
    const KIND: &'static str = "lists";

    fn diff(expected: &Self, actual: &Self, style: &DiffStyle) -> Rendered {
        <[T] as Diff>::diff(expected, actual, style)
    }
}

impl<T: Debug + PartialEq, const N: usize> Diff for [T; N] {
    const KIND: &'static str = "lists";

    fn diff(expected: &Self, actual: &Self, style: &DiffStyle) -> Rendered {
        <[T] as Diff>::diff(expected, actual, style)
    }
}

// ============================================================================
// SETS
// ============================================================================

fn render_all<'a, T: Debug + 'a>(items: impl Iterator<Item = &'a T>) -> Vec<String> {
    items.map(|item| format!("{item:?}")).collect()
}

impl<T: Debug + Eq + Hash, S: std::hash::BuildHasher> Diff for HashSet<T, S> {
    const KIND: &'static str = "sets";

    fn diff(expected: &Self, actual: &Self, style: &DiffStyle) -> Rendered {
        let shared = render_all(expected.iter().filter(|e| actual.contains(*e)));
        let expected_only = render_all(expected.iter().filter(|e| !actual.contains(*e)));
        let actual_only = render_all(actual.iter().filter(|a| !expected.contains(*a)));
        let (expected, actual) = diff_set(shared, expected_only, actual_only, style.palette.inverse);
        Rendered::Pair { expected, actual }
    }
}

impl<T: Debug + Ord> Diff for BTreeSet<T> {
    const KIND: &'static str = "sets";

    fn diff(expected: &Self, actual: &Self, style: &DiffStyle) -> Rendered {
        let shared = render_all(expected.intersection(actual));
        let expected_only = render_all(expected.difference(actual));
        let actual_only = render_all(actual.difference(expected));
        let (expected, actual) = diff_set(shared, expected_only, actual_only, style.palette.inverse);
        Rendered::Pair { expected, actual }
    }
}

// ============================================================================
// MAPS
// ============================================================================

fn map_rows<'a, K, V>(
    expected: impl Iterator<Item = (&'a K, &'a V)>,
    actual_get: impl Fn(&K) -> Option<&'a V>,
    actual: impl Iterator<Item = (&'a K, &'a V)>,
    expected_has: impl Fn(&K) -> bool,
) -> Vec<MapRow>
where
    K: Debug + 'a,
    V: Debug + PartialEq + 'a,
{
    let mut rows: Vec<MapRow> = expected
        .map(|(key, e)| {
            let a = actual_get(key);
            MapRow {
                key: format!("{key:?}"),
                expected: Some(format!("{e:?}")),
                actual: a.map(|a| format!("{a:?}")),
                equal: a == Some(e),
            }
        })
        .collect();
    rows.extend(actual.filter(|(key, _)| !expected_has(*key)).map(|(key, a)| MapRow {
        key: format!("{key:?}"),
        expected: None,
        actual: Some(format!("{a:?}")),
        equal: false,
    }));
    rows
}

fn render_map(rows: Vec<MapRow>, style: &DiffStyle) -> Rendered {
    Rendered::Block(diff_map(
        rows,
        style.palette.expected,
        style.palette.received,
        style.tab_width,
    ))
}

impl<K, V, S> Diff for HashMap<K, V, S>
where
    K: Debug + Eq + Hash,
    V: Debug + PartialEq,
    S: std::hash::BuildHasher,
{
    const KIND: &'static str = "maps";

    fn diff(expected: &Self, actual: &Self, style: &DiffStyle) -> Rendered {
        let rows = map_rows(
            expected.iter(),
            |k| actual.get(k),
            actual.iter(),
            |k| expected.contains_key(k),
        );
        render_map(rows, style)
    }
}

impl<K, V> Diff for BTreeMap<K, V>
where
    K: Debug + Ord,
    V: Debug + PartialEq,
{
    const KIND: &'static str = "maps";

    fn diff(expected: &Self, actual: &Self, style: &DiffStyle) -> Rendered {
        let rows = map_rows(
            expected.iter(),
            |k| actual.get(k),
            actual.iter(),
            |k| expected.contains_key(k),
        );
        render_map(rows, style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style() -> DiffStyle {
        DiffStyle::default()
    }

    #[test]
    fn strings_are_escaped_before_diffing() {
        let out = equality_message("a\n", "b\n", &style());
        assert!(out.starts_with("expected strings to equal"));
        assert!(out.contains("- «a»\\n"));
        assert!(out.contains("+ «b»\\n"));
    }

    #[test]
    fn set_dispatch_marks_unique_elements() {
        let expected: BTreeSet<i32> = [1, 2].into_iter().collect();
        let actual: BTreeSet<i32> = [2, 3].into_iter().collect();
        assert_eq!(
            BTreeSet::diff(&expected, &actual, &style()),
            Rendered::Pair {
                expected: "{2, «1»}".to_string(),
                actual: "{2, «3»}".to_string(),
            }
        );
    }

    #[test]
    fn hash_set_matches_btree_set() {
        let expected: HashSet<i32> = [1, 2].into_iter().collect();
        let actual: HashSet<i32> = [2, 3].into_iter().collect();
        let Rendered::Pair { expected, actual } = HashSet::diff(&expected, &actual, &style()) else {
            panic!("sets render as a pair");
        };
        assert_eq!(expected, "{2, «1»}");
        assert_eq!(actual, "{2, «3»}");
    }

    #[test]
    fn empty_sets() {
        let empty = HashSet::<u8>::new();
        assert_eq!(
            HashSet::diff(&empty, &empty, &style()),
            Rendered::Pair {
                expected: "{}".to_string(),
                actual: "{}".to_string(),
            }
        );
    }

    #[test]
    fn map_dispatch_renders_block() {
        let actual: HashMap<&str, i32> = [("x", 1), ("y", 1)].into_iter().collect();
        let expected: HashMap<&str, i32> = [("x", 1), ("y", 1), ("z", 1)].into_iter().collect();
        let out = equality_message(&expected, &actual, &style());
        assert_eq!(
            out,
            "expected maps to equal\n\n{\n    \"x\": 1\n    \"y\": 1\n-   \"z\": 1\n}"
        );
    }

    #[test]
    fn scalars_render_plainly() {
        assert_eq!(
            equality_message(&1, &2, &style()),
            "expected values to equal\n\n- 1\n+ 2"
        );
    }

    #[test]
    fn vec_uses_sequence_strategy() {
        let out = equality_message(&vec![1, 2], &vec![1, 3], &style());
        assert_eq!(out, "expected lists to equal\n\n- [1, «2»]\n+ [1, «3»]");
    }
}
