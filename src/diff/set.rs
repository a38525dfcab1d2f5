//! Set diff.

use crate::palette::Markers;

/// Renders the shared elements and each side's unique elements.
///
/// All three lists are sorted before rendering. The result reads
/// `{shared, <unique>}` where only the unique run is wrapped in `inverse`.
pub fn diff_set(
    mut shared: Vec<String>,
    mut expected_only: Vec<String>,
    mut actual_only: Vec<String>,
    inverse: Markers,
) -> (String, String) {
    shared.sort();
    expected_only.sort();
    actual_only.sort();
    (
        render_side(&shared, &expected_only, inverse),
        render_side(&shared, &actual_only, inverse),
    )
}

fn render_side(shared: &[String], unique: &[String], inverse: Markers) -> String {
    let mut out = String::from("{");
    out.push_str(&shared.join(", "));
    if !shared.is_empty() && !unique.is_empty() {
        out.push_str(", ");
    }
    if !unique.is_empty() {
        out.push_str(&inverse.wrap(&unique.join(", ")));
    }
    out.push('}');
    out
}
