//! Line-oriented unified diffs.

use similar::TextDiff;

/// Lines of unchanged context shown around each change.
const CONTEXT_LINES: usize = 3;

/// Renders a unified diff turning `old` into `new`.
///
/// Trailing carriage returns are ignored on every line, and a missing final
/// newline does not count as a change. Returns an empty string when the inputs
/// have the same lines.
pub fn unified_diff(old_label: &str, old: &str, new_label: &str, new: &str) -> String {
    let old = normalize_lines(old);
    let new = normalize_lines(new);
    if old == new {
        return String::new();
    }

    TextDiff::from_lines(&old, &new)
        .unified_diff()
        .context_radius(CONTEXT_LINES)
        .header(old_label, new_label)
        .to_string()
}

/// Rebuilds `text` with every line, including the last, ending in `\n`.
fn normalize_lines(text: &str) -> String {
    text.lines()
        .map(|line| format!("{}\n", line.trim_end_matches('\r')))
        .collect()
}
