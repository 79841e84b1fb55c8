//! Greedy word wrapping and ellipsis truncation.

use crate::measure::{FontSpec, TextMeasurer};

pub const ELLIPSIS: char = '…';

/// Wraps `text` greedily at whitespace so each line stays within `max_width`.
///
/// Words are never split. A word wider than `max_width` is placed alone on
/// its own line. Runs of whitespace collapse to a single space, and blank
/// input produces no lines.
pub fn wrap_text(
    text: &str,
    max_width: f32,
    font: &FontSpec,
    measurer: &dyn TextMeasurer,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }

        let candidate = format!("{current} {word}");
        if measurer.measure_text_width(&candidate, font) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Shortens `line` from the end until it plus an ellipsis fits `max_width`.
///
/// Returns the line untouched when it already fits. Trailing whitespace before
/// the ellipsis is dropped. In the degenerate case only the ellipsis remains.
pub fn ellipsize(
    line: &str,
    max_width: f32,
    font: &FontSpec,
    measurer: &dyn TextMeasurer,
) -> String {
    if measurer.measure_text_width(line, font) <= max_width {
        return line.to_string();
    }
    truncate_with_ellipsis(line, max_width, font, measurer)
}

fn truncate_with_ellipsis(
    line: &str,
    max_width: f32,
    font: &FontSpec,
    measurer: &dyn TextMeasurer,
) -> String {
    let mut kept: Vec<char> = line.chars().collect();
    loop {
        while kept.last().is_some_and(|c| c.is_whitespace()) {
            kept.pop();
        }
        let candidate: String = kept.iter().copied().chain([ELLIPSIS]).collect();
        if kept.is_empty() || measurer.measure_text_width(&candidate, font) <= max_width {
            return candidate;
        }
        kept.pop();
    }
}

/// Caps `lines` at `max_lines`, marking the cut with an ellipsis on the last
/// kept line. Returns whether anything was cut.
pub fn clamp_lines(
    lines: &mut Vec<String>,
    max_lines: usize,
    max_width: f32,
    font: &FontSpec,
    measurer: &dyn TextMeasurer,
) -> bool {
    if lines.len() <= max_lines || max_lines == 0 {
        return false;
    }
    lines.truncate(max_lines);
    if let Some(last) = lines.last_mut() {
        *last = truncate_with_ellipsis(last, max_width, font, measurer);
    }
    true
}
