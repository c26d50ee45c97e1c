// src/extraction/text.rs

/// Split raw text into trimmed, non-empty lines, preserving order.
///
/// Blank lines carry no meaning downstream; section boundaries come from
/// header classification only.
pub fn normalize_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Collapse every whitespace run (newlines included) into a single space.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Length in characters, as the line heuristics count it.
pub fn char_len(line: &str) -> usize {
    line.chars().count()
}
