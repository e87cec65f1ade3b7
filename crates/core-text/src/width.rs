//! Display width helpers.
//!
//! Single authoritative place for terminal column math. Callers outside this
//! crate never reach for `unicode_width` directly.
//!
//! Invariants:
//! - Control characters count as zero columns. `TextBuffer` never stores them
//!   (tabs are expanded on the way in), so buffer text measures exactly as
//!   drawn.
//! - Width of a string is the sum of its chars' widths.

use unicode_width::UnicodeWidthChar;

/// Columns occupied by a single char.
pub fn char_width(c: char) -> usize {
    c.width().unwrap_or(0)
}

/// Columns occupied by a string containing no control sequences.
pub fn display_width(s: &str) -> usize {
    s.chars().map(char_width).sum()
}

/// Columns occupied by the first `chars` chars of `s`.
pub fn prefix_width(s: &str, chars: usize) -> usize {
    s.chars().take(chars).map(char_width).sum()
}
