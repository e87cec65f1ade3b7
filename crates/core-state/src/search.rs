//! Incremental reverse history search session.
//!
//! A session exists only while search is active (`Option<ReverseSearch>` on the
//! session state). Every query change restarts the scan from the newest entry;
//! `repeat` continues strictly older than the current match.

use crate::history::HistoryStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReverseSearch {
    query: String,
    current: Option<usize>,
    original_input: String,
}

impl ReverseSearch {
    /// Open a session remembering the input it replaces.
    pub fn start(original_input: impl Into<String>, history: &HistoryStore) -> Self {
        let mut search = Self {
            query: String::new(),
            current: None,
            original_input: original_input.into(),
        };
        search.refresh(history);
        search
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn original_input(&self) -> &str {
        &self.original_input
    }

    pub fn match_index(&self) -> Option<usize> {
        self.current
    }

    /// Text of the current match, if any.
    pub fn current_match<'h>(&self, history: &'h HistoryStore) -> Option<&'h str> {
        self.current.and_then(|i| history.get(i))
    }

    pub fn push_char(&mut self, c: char, history: &HistoryStore) {
        self.query.push(c);
        self.refresh(history);
    }

    pub fn push_str(&mut self, s: &str, history: &HistoryStore) {
        self.query.push_str(s);
        self.refresh(history);
    }

    /// Remove the last query char and rescan. Returns false when the query was
    /// already empty (the caller aborts the session).
    pub fn backspace(&mut self, history: &HistoryStore) -> bool {
        if self.query.pop().is_none() {
            return false;
        }
        self.refresh(history);
        true
    }

    /// Step to the next older match. Without an older match the session moves
    /// to the no-match state; without a current match (or at index 0) nothing
    /// changes.
    pub fn repeat(&mut self, history: &HistoryStore) {
        match self.current {
            Some(i) if i > 0 => {
                self.current = history.find_match(&self.query, Some(i - 1));
            }
            _ => {}
        }
    }

    fn refresh(&mut self, history: &HistoryStore) {
        self.current = history.find_match(&self.query, history.len().checked_sub(1));
    }
}
