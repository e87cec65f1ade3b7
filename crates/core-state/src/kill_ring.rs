//! Kill ring: append-only record of killed spans with yank / yank-cycle.
//!
//! Entries are stored oldest first. `last_yank_len > 0` marks a live yank chain;
//! while it holds, `last_yank_index` names the entry whose text sits immediately
//! before the cursor and `last_yank_len` is its char length.

use core_text::TextBuffer;
use tracing::trace;

#[derive(Debug, Default, Clone)]
pub struct KillRing {
    entries: Vec<String>,
    last_yank_index: usize,
    last_yank_len: usize,
}

impl KillRing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries, oldest first.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn last_yank_index(&self) -> usize {
        self.last_yank_index
    }

    pub fn last_yank_len(&self) -> usize {
        self.last_yank_len
    }

    /// Record a killed span. Empty spans are ignored.
    pub fn push<S: Into<String>>(&mut self, text: S) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        self.entries.push(text);
        self.last_yank_index = self.entries.len() - 1;
        trace!(target: "state.kill_ring", len = self.entries.len(), "push");
    }

    /// Insert the newest entry at the cursor. Returns false when the ring is empty.
    pub fn yank(&mut self, buffer: &mut TextBuffer) -> bool {
        let Some(text) = self.entries.last() else {
            return false;
        };
        buffer.insert(text);
        self.last_yank_index = self.entries.len() - 1;
        self.last_yank_len = text.chars().count();
        trace!(target: "state.kill_ring", index = self.last_yank_index, "yank");
        true
    }

    /// Replace the text inserted by the previous yank with the next older entry,
    /// wrapping from the oldest back to the newest. Only valid directly after a
    /// yank or another cycle.
    pub fn yank_cycle(&mut self, buffer: &mut TextBuffer) -> bool {
        if self.entries.is_empty() || self.last_yank_len == 0 {
            return false;
        }
        buffer.delete_before(self.last_yank_len);
        let len = self.entries.len();
        let index = (self.last_yank_index + len - 1) % len;
        let text = &self.entries[index];
        buffer.insert(text);
        self.last_yank_index = index;
        self.last_yank_len = text.chars().count();
        trace!(target: "state.kill_ring", index, "yank_cycle");
        true
    }

    /// End the current yank chain; a following `yank_cycle` is a no-op.
    pub fn break_chain(&mut self) {
        self.last_yank_len = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(items: &[&str]) -> KillRing {
        let mut r = KillRing::new();
        for i in items {
            r.push(*i);
        }
        r
    }

    #[test]
    fn push_ignores_empty_spans() {
        let mut r = KillRing::new();
        r.push("");
        assert!(r.is_empty());
        r.push("x");
        assert_eq!(r.entries(), ["x"]);
        assert_eq!(r.last_yank_index(), 0);
    }

    #[test]
    fn yank_on_empty_ring_is_noop() {
        let mut r = KillRing::new();
        let mut b = TextBuffer::from_text("abc");
        assert!(!r.yank(&mut b));
        assert!(!r.yank_cycle(&mut b));
        assert_eq!(b.value(), "abc");
    }

    #[test]
    fn yank_inserts_newest() {
        let mut r = ring(&["one", "two"]);
        let mut b = TextBuffer::from_text("> ");
        assert!(r.yank(&mut b));
        assert_eq!(b.value(), "> two");
        assert_eq!(r.last_yank_len(), 3);
    }

    #[test]
    fn cycle_walks_older_and_wraps() {
        let mut r = ring(&["a", "bb", "ccc"]);
        let mut b = TextBuffer::from_text("x");
        r.yank(&mut b);
        assert_eq!(b.value(), "xccc");
        r.yank_cycle(&mut b);
        assert_eq!(b.value(), "xbb");
        r.yank_cycle(&mut b);
        assert_eq!(b.value(), "xa");
        r.yank_cycle(&mut b);
        assert_eq!(b.value(), "xccc", "wraps back to newest");
        assert_eq!(b.cursor(), 4);
    }

    #[test]
    fn cycle_requires_live_chain() {
        let mut r = ring(&["a", "b"]);
        let mut b = TextBuffer::from_text("");
        assert!(!r.yank_cycle(&mut b), "no preceding yank");
        r.yank(&mut b);
        r.break_chain();
        assert!(!r.yank_cycle(&mut b));
        assert_eq!(b.value(), "b");
    }

    #[test]
    fn cycle_handles_multibyte_entries() {
        let mut r = ring(&["ab", "日本語"]);
        let mut b = TextBuffer::from_text("");
        r.yank(&mut b);
        r.yank_cycle(&mut b);
        assert_eq!(b.value(), "ab");
        assert_eq!(b.cursor(), 2);
    }
}
