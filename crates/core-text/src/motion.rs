//! Word motion helpers.
//!
//! These operate purely on a `TextBuffer` + char offset pair and are free of session state.
//! A word is a maximal run of `[A-Za-z0-9_]`; whitespace is space, tab, CR or LF.

use crate::TextBuffer;

/// ASCII word classification used by word motions.
pub fn is_word_char(c: char) -> bool {
    c == '_' || c.is_ascii_alphanumeric()
}

pub fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

/// Offset reached by a backward word motion from `offset`: skip whitespace, then
/// skip the preceding run of word characters.
pub fn word_left(buf: &TextBuffer, offset: usize) -> usize {
    if offset == 0 {
        return 0;
    }
    let mut i = offset.min(buf.len()) - 1;
    while i > 0 && buf.char_at(i).is_some_and(is_whitespace) {
        i -= 1;
    }
    while i > 0 && buf.char_at(i - 1).is_some_and(is_word_char) {
        i -= 1;
    }
    i
}

/// Offset reached by a forward word motion: skip whitespace, then a run of word characters.
pub fn word_right(buf: &TextBuffer, offset: usize) -> usize {
    let len = buf.len();
    let mut i = offset.min(len);
    while i < len && buf.char_at(i).is_some_and(is_whitespace) {
        i += 1;
    }
    while i < len && buf.char_at(i).is_some_and(is_word_char) {
        i += 1;
    }
    i
}
