//! Doc-comment mining
//!
//! Recovers a short description for a declaration from the comment written
//! just above it. Both extraction strategies use this, keyed on the byte
//! offset where the declaration starts.
//!
//! A `/** ... */` block wins over `///` lines. A comment only attaches when the
//! text between it and the declaration holds no `;` and no `}`: wrappers such
//! as `namespace hal {` or `template <typename T>` may sit in between, a
//! finished statement or a closed scope may not.

use regex::Regex;
use std::sync::LazyLock;

use crate::constants::description::{LOOKBACK_WINDOW, MAX_MINED_CHARS};
use crate::types::truncate_with_ellipsis;

static BLOCK_COMMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)/\*\*(.*?)\*/").expect("block comment pattern is valid")
});

/// Mine the description for a declaration starting at byte `decl_start`.
///
/// Returns an empty string when no attached comment is found.
pub fn mine_description(text: &str, decl_start: usize) -> String {
    let before = match text.get(..decl_start) {
        Some(before) => before,
        None => return String::new(),
    };

    let window_start = before
        .char_indices()
        .rev()
        .nth(LOOKBACK_WINDOW - 1)
        .map(|(idx, _)| idx)
        .unwrap_or(0);
    let window = &before[window_start..];

    let raw = block_comment(window)
        .or_else(|| line_comment_run(window))
        .unwrap_or_default();

    truncate_with_ellipsis(&raw, MAX_MINED_CHARS)
}

/// Last `/** */` block in the window, if nothing detaches it from the declaration
fn block_comment(window: &str) -> Option<String> {
    let last = BLOCK_COMMENT.captures_iter(window).last()?;
    let whole = last.get(0)?;
    if !is_attachable_gap(&window[whole.end()..]) {
        return None;
    }

    let inner = last.get(1).map(|m| m.as_str()).unwrap_or_default();
    let cleaned = inner
        .lines()
        .map(|line| line.trim().trim_start_matches('*').trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    (!cleaned.is_empty()).then_some(cleaned)
}

/// Trailing run of `///` lines, walking upward from the declaration
fn line_comment_run(window: &str) -> Option<String> {
    let mut run: Vec<&str> = Vec::new();

    for line in window.lines().rev() {
        let trimmed = line.trim();
        if let Some(rest) = trimmed.strip_prefix("///") {
            run.push(rest.trim_start_matches('/').trim());
        } else if trimmed.is_empty() || trimmed.starts_with("//") {
            continue;
        } else if run.is_empty() && is_attachable_line(trimmed) {
            continue;
        } else {
            break;
        }
    }

    let joined = run
        .into_iter()
        .rev()
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    (!joined.is_empty()).then_some(joined)
}

fn is_attachable_gap(gap: &str) -> bool {
    gap.lines().all(|line| {
        let trimmed = line.trim();
        trimmed.is_empty() || trimmed.starts_with("//") || is_attachable_line(trimmed)
    })
}

fn is_attachable_line(line: &str) -> bool {
    !line.contains(';') && !line.contains('}')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mine_before(text: &str, marker: &str) -> String {
        let start = text.find(marker).expect("marker present");
        mine_description(text, start)
    }

    #[test]
    fn test_block_comment() {
        let text = "/** Foo bar */\nclass X {};";
        assert_eq!(mine_before(text, "class X"), "Foo bar");
    }

    #[test]
    fn test_multiline_block_strips_stars() {
        let text = "/**\n * UART Driver Interface\n * Provides UART access\n */\nclass Uart {};";
        assert_eq!(
            mine_before(text, "class Uart"),
            "UART Driver Interface Provides UART access"
        );
    }

    #[test]
    fn test_triple_slash_run() {
        let text = "/// line one\n/// line two\n/// line three\nstruct S {};";
        assert_eq!(mine_before(text, "struct S"), "line one line two line three");
    }

    #[test]
    fn test_triple_slash_run_broken_by_code() {
        let text = "/// stale\nint counter;\n/// fresh\n/// still fresh\nclass C {};";
        assert_eq!(mine_before(text, "class C"), "fresh still fresh");
    }

    #[test]
    fn test_block_preferred_over_lines() {
        let text = "/** block */\n/// lines\nclass C {};";
        assert_eq!(mine_before(text, "class C"), "block");
    }

    #[test]
    fn test_comment_detached_by_statement() {
        let text = "/** Foo bar */\nint unrelated = 0;\nclass X {};";
        assert_eq!(mine_before(text, "class X"), "");

        let text = "/// about y\nint y;\nclass X {};";
        assert_eq!(mine_before(text, "class X"), "");
    }

    #[test]
    fn test_comment_detached_by_previous_class() {
        let text = "/** First */\nclass A {};\nclass B {};";
        assert_eq!(mine_before(text, "class B"), "");
        assert_eq!(mine_before(text, "class A"), "First");
    }

    #[test]
    fn test_comment_across_namespace_opener() {
        let text = "/** UART Driver Interface */\nnamespace hal {\n    class UartDriver {};\n}";
        assert_eq!(mine_before(text, "class UartDriver"), "UART Driver Interface");
    }

    #[test]
    fn test_comment_across_template_header() {
        let text = "/// A fixed buffer\ntemplate <typename T, int N>\nclass Buffer {};";
        assert_eq!(mine_before(text, "class Buffer"), "A fixed buffer");
    }

    #[test]
    fn test_comment_outside_window_is_ignored() {
        let padding = "\n".repeat(600);
        let text = format!("/** far away */{}class X {{}};", padding);
        assert_eq!(mine_before(&text, "class X"), "");
    }

    #[test]
    fn test_long_description_truncated() {
        let text = format!("/** {} */\nclass X {{}};", "word ".repeat(60));
        let desc = mine_before(&text, "class X");
        assert_eq!(desc.chars().count(), 200);
        assert!(desc.ends_with("..."));
    }

    #[test]
    fn test_no_comment() {
        assert_eq!(mine_before("class X {};", "class X"), "");
        assert_eq!(mine_description("abc", 99), "");
    }
}
