//! Rope-backed multi-line input buffer.
//!
//! The absolute char offset (`cursor`) is the single source of truth. Line and
//! column are always derived on demand through `offset_to_line_col` /
//! `line_col_to_offset`, which must agree exactly so that vertical motion and
//! viewport mapping never drift.
//!
//! Offsets count Unicode scalar values. The rope is built without the
//! `unicode_lines` / `cr_lines` features, so `\n` is the only line break and
//! rope lines correspond one-to-one with `value.split('\n')`.

use ropey::Rope;
use std::borrow::Cow;

pub mod motion;
pub mod width;

pub use width::display_width;

/// A position inside the buffer expressed as (line index, char column within that line).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineCol {
    pub line: usize,
    pub col: usize,
}

impl LineCol {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

/// Editable text plus cursor. Pure data, no I/O.
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    rope: Rope,
    cursor: usize,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a buffer (e.g. from a history entry); cursor lands at the end.
    pub fn from_text(text: &str) -> Self {
        let mut buf = Self::new();
        buf.set_value(text);
        buf
    }

    /// Full text content.
    pub fn value(&self) -> String {
        self.rope.to_string()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Length in chars.
    pub fn len(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    pub fn set_value(&mut self, text: &str) {
        self.rope = Rope::from_str(&sanitize_input(text));
        self.cursor = self.rope.len_chars();
    }

    /// Replace the content and place the cursor, clamped into range.
    pub fn set_value_and_cursor(&mut self, text: &str, cursor: usize) {
        self.rope = Rope::from_str(&sanitize_input(text));
        self.cursor = cursor.min(self.rope.len_chars());
    }

    pub fn clear(&mut self) {
        self.rope = Rope::new();
        self.cursor = 0;
    }

    /// Number of logical lines (an empty buffer has one empty line).
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Line content without its trailing line break. Out-of-range lines are empty.
    pub fn line(&self, idx: usize) -> String {
        if idx >= self.rope.len_lines() {
            return String::new();
        }
        let mut s = self.rope.line(idx).to_string();
        if s.ends_with('\n') {
            s.pop();
        }
        s
    }

    /// All logical lines, equivalent to `value().split('\n')`.
    pub fn lines(&self) -> Vec<String> {
        (0..self.line_count()).map(|i| self.line(i)).collect()
    }

    /// Char length of a line, excluding the line break.
    pub fn line_len(&self, idx: usize) -> usize {
        if idx >= self.rope.len_lines() {
            return 0;
        }
        let line = self.rope.line(idx);
        let len = line.len_chars();
        if len > 0 && line.char(len - 1) == '\n' {
            len - 1
        } else {
            len
        }
    }

    pub fn offset_to_line_col(&self, offset: usize) -> LineCol {
        let offset = offset.min(self.rope.len_chars());
        let line = self.rope.char_to_line(offset);
        let col = offset - self.rope.line_to_char(line);
        LineCol { line, col }
    }

    /// Inverse of `offset_to_line_col`. Line and column are clamped to the buffer.
    pub fn line_col_to_offset(&self, pos: LineCol) -> usize {
        let last = self.line_count() - 1;
        let line = pos.line.min(last);
        let col = pos.col.min(self.line_len(line));
        self.rope.line_to_char(line) + col
    }

    pub fn cursor_line_col(&self) -> LineCol {
        self.offset_to_line_col(self.cursor)
    }

    /// Char at an absolute offset, if any.
    pub fn char_at(&self, offset: usize) -> Option<char> {
        if offset < self.rope.len_chars() {
            Some(self.rope.char(offset))
        } else {
            None
        }
    }

    /// Insert at the cursor. Text passes through `sanitize_input` first.
    pub fn insert(&mut self, text: &str) {
        let text = sanitize_input(text);
        if text.is_empty() {
            return;
        }
        self.rope.insert(self.cursor, &text);
        self.cursor += text.chars().count();
    }

    pub fn newline(&mut self) {
        self.insert("\n");
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.rope.remove(self.cursor - 1..self.cursor);
        self.cursor -= 1;
    }

    pub fn delete(&mut self) {
        if self.cursor >= self.rope.len_chars() {
            return;
        }
        self.rope.remove(self.cursor..self.cursor + 1);
    }

    /// Remove up to `n` chars immediately before the cursor and return them.
    pub fn delete_before(&mut self, n: usize) -> String {
        let start = self.cursor.saturating_sub(n);
        if start == self.cursor {
            return String::new();
        }
        let removed = self.rope.slice(start..self.cursor).to_string();
        self.rope.remove(start..self.cursor);
        self.cursor = start;
        removed
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.rope.len_chars() {
            self.cursor += 1;
        }
    }

    pub fn move_word_left(&mut self) {
        self.cursor = motion::word_left(self, self.cursor);
    }

    pub fn move_word_right(&mut self) {
        self.cursor = motion::word_right(self, self.cursor);
    }

    pub fn move_home(&mut self) {
        let pos = self.cursor_line_col();
        self.cursor = self.line_col_to_offset(LineCol::new(pos.line, 0));
    }

    pub fn move_end(&mut self) {
        let pos = self.cursor_line_col();
        let len = self.line_len(pos.line);
        self.cursor = self.line_col_to_offset(LineCol::new(pos.line, len));
    }

    pub fn move_up(&mut self) {
        let pos = self.cursor_line_col();
        if pos.line == 0 {
            return;
        }
        self.cursor = self.line_col_to_offset(LineCol::new(pos.line - 1, pos.col));
    }

    pub fn move_down(&mut self) {
        let pos = self.cursor_line_col();
        if pos.line + 1 >= self.line_count() {
            return;
        }
        self.cursor = self.line_col_to_offset(LineCol::new(pos.line + 1, pos.col));
    }

    /// Kill from the cursor to the end of the current line. At end of line the
    /// following line is merged instead and `"\n"` is returned. Empty when nothing
    /// was removed.
    pub fn delete_to_end_of_line(&mut self) -> String {
        let pos = self.cursor_line_col();
        let len = self.line_len(pos.line);
        if pos.col >= len {
            if pos.line + 1 < self.line_count() {
                self.rope.remove(self.cursor..self.cursor + 1);
                return "\n".to_string();
            }
            return String::new();
        }
        let end = self.cursor + (len - pos.col);
        let removed = self.rope.slice(self.cursor..end).to_string();
        self.rope.remove(self.cursor..end);
        removed
    }

    /// Remove the whole current line (with its trailing break unless it is the
    /// last line) and return the removed text.
    pub fn delete_line(&mut self) -> String {
        let pos = self.cursor_line_col();
        let count = self.line_count();
        let start = self.rope.line_to_char(pos.line);
        let is_last = pos.line + 1 >= count;
        let (remove_start, remove_end) = if !is_last {
            (start, self.rope.line_to_char(pos.line + 1))
        } else if pos.line > 0 {
            // Last line: drop the break that precedes it so no empty line is left behind.
            (start - 1, self.rope.len_chars())
        } else {
            (0, self.rope.len_chars())
        };
        let mut removed = self.rope.slice(remove_start..remove_end).to_string();
        if is_last && pos.line > 0 {
            removed.remove(0);
        }
        self.rope.remove(remove_start..remove_end);
        if self.rope.len_chars() == 0 {
            self.cursor = 0;
            return removed;
        }
        let line = pos.line.min(self.line_count() - 1);
        self.cursor = self.line_col_to_offset(LineCol::new(line, pos.col));
        removed
    }
}

/// Normalize CRLF and lone CR to LF.
pub fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if !text.contains('\r') {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
}

/// Spaces a tab expands to when it enters the buffer.
pub const TAB_WIDTH: usize = 4;

/// Text as the buffer stores it: newlines normalized, tabs expanded to
/// `TAB_WIDTH` spaces, other control characters dropped. Every stored char
/// then occupies exactly `char_width` columns on screen.
pub fn sanitize_input(text: &str) -> Cow<'_, str> {
    let text = normalize_newlines(text);
    if !text.chars().any(|c| c.is_control() && c != '\n') {
        return text;
    }
    let mut out = String::with_capacity(text.len() + TAB_WIDTH);
    for c in text.chars() {
        match c {
            '\t' => out.extend(std::iter::repeat_n(' ', TAB_WIDTH)),
            '\n' => out.push('\n'),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn buf_at(text: &str, cursor: usize) -> TextBuffer {
        let mut b = TextBuffer::new();
        b.set_value_and_cursor(text, cursor);
        b
    }

    #[test]
    fn empty_buffer_has_one_line() {
        let b = TextBuffer::new();
        assert_eq!(b.line_count(), 1);
        assert_eq!(b.lines(), vec![String::new()]);
        assert_eq!(b.cursor_line_col(), LineCol::new(0, 0));
    }

    #[test]
    fn lines_match_split_on_newline() {
        let b = TextBuffer::from_text("ab\n\ncd\n");
        let expected: Vec<String> = "ab\n\ncd\n".split('\n').map(String::from).collect();
        assert_eq!(b.lines(), expected);
    }

    #[test]
    fn insert_advances_cursor_by_chars() {
        let mut b = buf_at("ac", 1);
        b.insert("bé");
        assert_eq!(b.value(), "abéc");
        assert_eq!(b.cursor(), 3);
        b.insert("");
        assert_eq!(b.cursor(), 3);
    }

    #[test]
    fn backspace_and_delete_are_noops_at_boundaries() {
        let mut b = buf_at("x", 0);
        b.backspace();
        assert_eq!(b.value(), "x");
        b.move_right();
        b.delete();
        assert_eq!(b.value(), "x");
        b.backspace();
        assert_eq!(b.value(), "");
        assert_eq!(b.cursor(), 0);
    }

    #[test]
    fn backspace_joins_lines() {
        let mut b = buf_at("ab\ncd", 3);
        b.backspace();
        assert_eq!(b.value(), "abcd");
        assert_eq!(b.cursor(), 2);
    }

    #[test]
    fn home_end_stay_on_logical_line() {
        let mut b = buf_at("first\nsecond\nthird", 9);
        b.move_home();
        assert_eq!(b.cursor(), 6);
        b.move_end();
        assert_eq!(b.cursor(), 12);
        assert_eq!(b.cursor_line_col(), LineCol::new(1, 6));
    }

    #[test]
    fn vertical_motion_clamps_and_returns() {
        let mut b = buf_at("long line\nab\nanother long", 7);
        b.move_down();
        assert_eq!(b.cursor_line_col(), LineCol::new(1, 2));
        b.move_down();
        assert_eq!(b.cursor_line_col(), LineCol::new(2, 2));
        b.move_down();
        assert_eq!(b.cursor_line_col(), LineCol::new(2, 2), "no-op at last line");

        let mut b = buf_at("abcdef\nabcdefgh", 4);
        b.move_down();
        b.move_up();
        assert_eq!(b.cursor_line_col(), LineCol::new(0, 4));
        b.move_up();
        assert_eq!(b.cursor_line_col(), LineCol::new(0, 4), "no-op at first line");
    }

    #[test]
    fn delete_to_end_of_line_mid_line() {
        let mut b = buf_at("hello world\nnext", 5);
        let removed = b.delete_to_end_of_line();
        assert_eq!(removed, " world");
        assert_eq!(b.value(), "hello\nnext");
        assert_eq!(b.cursor(), 5);
    }

    #[test]
    fn delete_to_end_of_line_at_eol_merges_next() {
        let mut b = buf_at("ab\ncd", 2);
        assert_eq!(b.delete_to_end_of_line(), "\n");
        assert_eq!(b.value(), "abcd");
        assert_eq!(b.cursor(), 2);
        b.move_end();
        assert_eq!(b.delete_to_end_of_line(), "");
        assert_eq!(b.value(), "abcd");
    }

    #[test]
    fn kill_then_reinsert_restores_buffer() {
        for (text, cursor) in [("hello world\nnext", 5), ("ab\ncd", 2), ("tail", 4)] {
            let mut b = buf_at(text, cursor);
            let removed = b.delete_to_end_of_line();
            b.insert(&removed);
            for _ in 0..removed.chars().count() {
                b.move_left();
            }
            assert_eq!(b.value(), text);
            assert_eq!(b.cursor(), cursor);
        }
    }

    #[test]
    fn delete_line_middle_keeps_column() {
        let mut b = buf_at("one\ntwo words\nthree", 8);
        let removed = b.delete_line();
        assert_eq!(removed, "two words\n");
        assert_eq!(b.value(), "one\nthree");
        assert_eq!(b.cursor_line_col(), LineCol::new(1, 4));
    }

    #[test]
    fn delete_last_line_moves_to_previous() {
        let mut b = buf_at("one\ntwo", 6);
        let removed = b.delete_line();
        assert_eq!(removed, "two");
        assert_eq!(b.value(), "one");
        assert_eq!(b.cursor_line_col(), LineCol::new(0, 2));
    }

    #[test]
    fn delete_only_line_empties_buffer() {
        let mut b = buf_at("solo", 2);
        assert_eq!(b.delete_line(), "solo");
        assert!(b.is_empty());
        assert_eq!(b.cursor(), 0);
    }

    #[test]
    fn delete_before_removes_n_chars() {
        let mut b = buf_at("abcdef", 4);
        assert_eq!(b.delete_before(2), "cd");
        assert_eq!(b.value(), "abef");
        assert_eq!(b.cursor(), 2);
        assert_eq!(b.delete_before(10), "ab");
        assert_eq!(b.cursor(), 0);
    }

    #[test]
    fn normalize_newlines_handles_crlf_and_cr() {
        assert_eq!(normalize_newlines("a\r\nb\rc\n"), "a\nb\nc\n");
        assert!(matches!(normalize_newlines("plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn insert_expands_tabs_and_drops_controls() {
        let mut b = TextBuffer::new();
        b.insert("a\tb\x07\r\nc");
        assert_eq!(b.value(), "a    b\nc");
        assert_eq!(b.cursor(), 8);
        assert_eq!(display_width(&b.line(0)), 6);

        b.set_value("\tx");
        assert_eq!(b.value(), "    x");
        assert_eq!(b.cursor(), 5);
        assert!(matches!(sanitize_input("plain\ntext"), Cow::Borrowed(_)));
    }

    proptest! {
        #![proptest_config(ProptestConfig { max_global_rejects: 65536, ..ProptestConfig::default() })]

        #[test]
        fn line_col_round_trip(text in "[a-z \n]{0,40}", line in 0usize..8, col in 0usize..12) {
            let b = TextBuffer::from_text(&text);
            prop_assume!(line < b.line_count());
            prop_assume!(col <= b.line_len(line));
            let offset = b.line_col_to_offset(LineCol::new(line, col));
            prop_assert_eq!(b.offset_to_line_col(offset), LineCol::new(line, col));
        }

        #[test]
        fn offset_round_trip(text in "[a-zé_\n]{0,40}", pick in 0usize..64) {
            let b = TextBuffer::from_text(&text);
            let offset = pick.min(b.len());
            let pos = b.offset_to_line_col(offset);
            prop_assert_eq!(b.line_col_to_offset(pos), offset);
        }
    }
}
