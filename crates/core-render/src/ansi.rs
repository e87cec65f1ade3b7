//! Control-sequence aware line helpers.
//!
//! Lines handed to the writer may carry SGR sequences (`ESC [ ... m`) produced
//! by `tint`. They occupy no columns. Truncation copies each complete sequence
//! whole and never splits one; when any sequence survives, the line is closed
//! with a reset so attributes never bleed into the next row.

use core_text::width::char_width;

pub const SGR_RESET: &str = "\x1b[0m";

/// Wrap `text` in an SGR color sequence (e.g. code `"35"` = magenta).
pub fn tint(text: &str, code: &str) -> String {
    format!("\x1b[{code}m{text}{SGR_RESET}")
}

/// Visible columns of `line`, ignoring complete SGR sequences.
pub fn visible_width(line: &str) -> usize {
    let mut width = 0;
    let mut rest = line;
    while let Some(c) = rest.chars().next() {
        if let Some(seq_len) = sgr_len(rest) {
            rest = &rest[seq_len..];
            continue;
        }
        width += char_width(c);
        rest = &rest[c.len_utf8()..];
    }
    width
}

/// Truncate `line` to at most `width` visible columns.
///
/// * Complete `ESC [ ... m` sequences are copied whole and count zero columns.
/// * An `ESC [` with no terminating `m` drops the escape char; the remaining
///   text is treated as ordinary characters.
/// * A char that would straddle the limit (wide glyph at the last column) is dropped.
/// * If the output contains any sequence, it ends with `ESC[0m`.
pub fn truncate_visible(line: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let mut out = String::with_capacity(line.len().min(width * 4));
    let mut visible = 0;
    let mut rest = line;
    while visible < width {
        let Some(c) = rest.chars().next() else {
            break;
        };
        if c == '\x1b' && rest[1..].starts_with('[') {
            match sgr_len(rest) {
                Some(seq_len) => {
                    out.push_str(&rest[..seq_len]);
                    rest = &rest[seq_len..];
                }
                None => rest = &rest[1..],
            }
            continue;
        }
        let w = char_width(c);
        if visible + w > width {
            break;
        }
        out.push(c);
        visible += w;
        rest = &rest[c.len_utf8()..];
    }
    if out.contains("\x1b[") {
        out.push_str(SGR_RESET);
    }
    out
}

/// Byte length of a complete SGR sequence at the start of `s`, if any.
fn sgr_len(s: &str) -> Option<usize> {
    let body = s.strip_prefix("\x1b[")?;
    body.find('m').map(|end| 2 + end + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn plain_text_truncates_by_columns() {
        assert_eq!(truncate_visible("hello world", 5), "hello");
        assert_eq!(truncate_visible("hi", 10), "hi");
        assert_eq!(truncate_visible("anything", 0), "");
    }

    #[test]
    fn sequences_are_zero_width_and_reset_appended() {
        let line = format!("{} (shift+tab to cycle)", tint("plan mode", "35"));
        assert_eq!(visible_width(&line), "plan mode (shift+tab to cycle)".len());
        let cut = truncate_visible(&line, 4);
        assert_eq!(cut, "\x1b[35mplan\x1b[0m");
        let whole = truncate_visible(&line, 200);
        assert!(whole.ends_with(SGR_RESET));
        assert!(whole.starts_with("\x1b[35mplan mode\x1b[0m (shift"));
    }

    #[test]
    fn unterminated_sequence_drops_escape() {
        assert_eq!(truncate_visible("a\x1b[31bc", 10), "a[31bc");
    }

    #[test]
    fn wide_glyph_not_split() {
        assert_eq!(truncate_visible("ab漢", 3), "ab");
        assert_eq!(truncate_visible("ab漢", 4), "ab漢");
    }

    proptest! {
        #[test]
        fn never_exceeds_width_or_splits_sequences(
            parts in proptest::collection::vec(("[a-z ]{0,6}", proptest::option::of("3[0-7]")), 0..6),
            width in 0usize..30,
        ) {
            let mut line = String::new();
            for (text, color) in &parts {
                match color {
                    Some(code) => line.push_str(&tint(text, code)),
                    None => line.push_str(text),
                }
            }
            let out = truncate_visible(&line, width);
            prop_assert!(visible_width(&out) <= width);
            // Every ESC starts a complete sequence.
            let mut rest = out.as_str();
            while let Some(pos) = rest.find('\x1b') {
                let tail = &rest[pos..];
                prop_assert!(sgr_len(tail).is_some(), "split sequence in {:?}", out);
                rest = &tail[1..];
            }
            if out.contains("\x1b[") {
                prop_assert!(out.ends_with(SGR_RESET));
            }
        }
    }
}
