//! Scope Tracker
//!
//! Finds the closer that balances an already-consumed opener by counting
//! nested delimiter pairs. Every delimiter byte counts, including ones inside
//! string literals and comments: the scanner is lexical, not a tokenizer, and
//! text such as `"{"` in a class body will throw the match off.
//!
//! Delimiters are ASCII, so byte scanning never splits a UTF-8 sequence.

/// A pair of single-byte scope delimiters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeTracker {
    open: u8,
    close: u8,
}

impl ScopeTracker {
    pub const BRACES: ScopeTracker = ScopeTracker::new(b'{', b'}');
    pub const BRACKETS: ScopeTracker = ScopeTracker::new(b'[', b']');
    pub const PARENS: ScopeTracker = ScopeTracker::new(b'(', b')');

    pub const fn new(open: u8, close: u8) -> Self {
        Self { open, close }
    }

    /// Offset one past the closer matching an opener that ends at `start`.
    ///
    /// `start` must point just after the opening delimiter. Returns `None`
    /// when the nesting never balances before end-of-text; callers treat that
    /// as "no scope" rather than a span ending at the text length.
    pub fn find_close(&self, text: &str, start: usize) -> Option<usize> {
        let bytes = text.as_bytes();
        if start > bytes.len() {
            return None;
        }

        let mut depth = 1usize;
        for (offset, &byte) in bytes[start..].iter().enumerate() {
            if byte == self.open {
                depth += 1;
            } else if byte == self.close {
                depth -= 1;
                if depth == 0 {
                    return Some(start + offset + 1);
                }
            }
        }

        None
    }

    /// Nesting depth at `offset`, counting from depth 0 at the start of `text`.
    ///
    /// Stray closers never take the depth below zero.
    pub fn depth_at(&self, text: &str, offset: usize) -> usize {
        let end = offset.min(text.len());
        text.as_bytes()[..end].iter().fold(0usize, |depth, &byte| {
            if byte == self.open {
                depth + 1
            } else if byte == self.close {
                depth.saturating_sub(1)
            } else {
                depth
            }
        })
    }
}
