//! Human-readable before/after reports for rewritten buffers.

use std::fmt::Write as _;

use similar::TextDiff;

const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const RESET: &str = "\x1b[0m";

/// Unified diff of `before` against `after`.
///
/// Returns an empty string when the buffers are identical.
pub fn present(before_label: &str, before: &[u8], after_label: &str, after: &[u8]) -> String {
    if before == after {
        return String::new();
    }
    let before = String::from_utf8_lossy(before);
    let after = String::from_utf8_lossy(after);
    TextDiff::from_lines(&*before, &*after)
        .unified_diff()
        .context_radius(3)
        .header(before_label, after_label)
        .to_string()
}

/// [`present`] with ANSI colours, each line prefixed by `indent`.
pub fn present_colored(
    indent: &str,
    before_label: &str,
    before: &[u8],
    after_label: &str,
    after: &[u8],
) -> String {
    let report = present(before_label, before, after_label, after);
    let mut out = String::with_capacity(report.len() * 2);
    for line in report.lines() {
        let color = match line.as_bytes().first() {
            Some(b'-') => RED,
            Some(b'+') => GREEN,
            _ => DIM,
        };
        let _ = writeln!(out, "{indent}{color}{line}{RESET}");
    }
    out
}
