//! Text helpers shared by the miners, the enhancer and the renderer.
//!
//! All lengths are counted in characters, not bytes.

use crate::constants::report::ELLIPSIS;

/// Keep the first `max - 3` characters and append `...` when `text` is longer than `max`
pub fn truncate_with_ellipsis(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(ELLIPSIS.len());
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}

/// Keep the last `max - 3` characters behind a leading `...` when `text` is longer than `max`
pub fn tail_with_ellipsis(text: &str, max: usize) -> String {
    let len = text.chars().count();
    if len <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(ELLIPSIS.len());
    let mut out = String::from(ELLIPSIS);
    out.extend(text.chars().skip(len - keep));
    out
}

/// Collapse every whitespace run (including newlines) into one space
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Escape `|` so the text can sit inside a markdown table cell
pub fn escape_pipes(text: &str) -> String {
    text.replace('|', "\\|")
}
