#![allow(dead_code)] // Shared across integration tests; each test binary uses a subset of helpers.

use core_actions::{CommandCatalog, DispatchResult, handle_key, handle_paste};
use core_events::{KeyCode, KeyEvent, KeyModifiers};
use core_state::{HistoryStore, SessionPaths, SessionState};
use std::time::{Duration, Instant};

/// Session plus catalog driven through the public key entry point with a
/// controllable clock.
pub struct Harness {
    pub state: SessionState,
    pub catalog: CommandCatalog,
    pub now: Instant,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_state(SessionState::ephemeral())
    }

    pub fn with_history(entries: &[&str]) -> Self {
        Self::with_state(SessionState::new(
            SessionPaths::default(),
            HistoryStore::from_entries(entries),
            vec![],
        ))
    }

    pub fn with_state(state: SessionState) -> Self {
        Self {
            state,
            catalog: CommandCatalog::builtin(),
            now: Instant::now(),
        }
    }

    pub fn press(&mut self, key: KeyEvent) -> DispatchResult {
        handle_key(&key, &mut self.state, &self.catalog, self.now)
    }

    pub fn code(&mut self, code: KeyCode) -> DispatchResult {
        self.press(KeyEvent::plain(code))
    }

    pub fn ctrl(&mut self, c: char) -> DispatchResult {
        self.press(KeyEvent::ctrl(c))
    }

    pub fn alt(&mut self, c: char) -> DispatchResult {
        self.press(KeyEvent::alt(c))
    }

    pub fn shift(&mut self, code: KeyCode) -> DispatchResult {
        self.press(KeyEvent::new(code, KeyModifiers::SHIFT))
    }

    /// Type each char as an individual key press.
    pub fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.press(KeyEvent::plain(KeyCode::Char(c)));
        }
    }

    pub fn paste(&mut self, text: &str) -> DispatchResult {
        handle_paste(text, &mut self.state, &self.catalog, self.now)
    }

    pub fn advance(&mut self, ms: u64) {
        self.now += Duration::from_millis(ms);
    }

    pub fn value(&self) -> String {
        self.state.buffer.value()
    }

    pub fn transcript(&self) -> Vec<String> {
        self.state
            .transcript
            .messages()
            .iter()
            .map(|m| format!("{}{}", m.role.prefix(), m.content))
            .collect()
    }
}
