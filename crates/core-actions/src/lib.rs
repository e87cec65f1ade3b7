//! Key dispatch for the interactive prompt.
//!
//! Input flows through two pure stages:
//! * `translate_key` classifies a `KeyEvent` into at most one `Action`, using a
//!   small `KeyContext` snapshot (search active, buffer empty, `!` prefix).
//! * `dispatcher::dispatch` applies the `Action` to `SessionState` and reports
//!   whether a redraw is needed plus an optional `Effect` the runtime must carry
//!   out (quit, external editor, shell command).
//!
//! Neither stage performs terminal IO. Slash commands are resolved against a
//! `CommandCatalog`; editor scratch-file helpers live in `io_ops`.

use core_events::KeyEvent;
use core_state::SessionState;
use core_text::sanitize_input;
use std::time::Instant;
use tracing::trace;

pub mod commands;
pub mod dispatcher;
pub mod io_ops;
mod key_translator;

pub use commands::{CommandCatalog, CommandSpec, MAX_SUGGESTIONS, ParsedCommand};
pub use dispatcher::{DispatchResult, Effect, dispatch, finish_shell};
pub use key_translator::translate_key;

/// One dispatchable unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Edit(EditKind),
    Motion(MotionKind),
    Kill(KillKind),
    Yank,
    YankCycle,
    Search(SearchAction),
    Session(SessionAction),
    /// Enter: a trailing `\` continues onto a new line, otherwise submit.
    Submit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditKind {
    Insert(String),
    Newline,
    Backspace,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionKind {
    Left,
    Right,
    WordLeft,
    WordRight,
    LineStart,
    LineEnd,
    /// Previous buffer line, or older history on the first line.
    Up,
    /// Next buffer line, or newer history on the last line.
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KillKind {
    ToEndOfLine,
    Line,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchAction {
    Start,
    Insert(String),
    Repeat,
    Backspace,
    /// Copy the match into the buffer and submit it.
    Accept,
    /// Copy the match into the buffer without submitting.
    AcceptLiteral,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionAction {
    ClearInput,
    Quit,
    Redraw,
    ToggleVerbose,
    ToggleThinking,
    ToggleTasks,
    CycleMode,
    CycleModel,
    OpenEditor,
    /// Esc; a second press inside the rewind window rewinds the transcript.
    Escape,
    /// Tab on a `!` line: complete from the newest matching history entry.
    CompleteFromHistory,
    ShortcutsHelp,
    Notice(Notice),
}

/// Features acknowledged with a transcript notice only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    BackgroundTasks,
    ImagePaste,
}

impl Notice {
    pub fn text(self) -> &'static str {
        match self {
            Notice::BackgroundTasks => "Background tasks are not implemented.",
            Notice::ImagePaste => "Image paste is not implemented.",
        }
    }
}

/// Session facts the translator needs; everything else is decided at dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyContext {
    pub search_active: bool,
    pub buffer_empty: bool,
    pub bang_prefix: bool,
}

impl KeyContext {
    pub fn from_state(state: &SessionState) -> Self {
        Self {
            search_active: state.search.is_some(),
            buffer_empty: state.buffer.is_empty(),
            bang_prefix: state.buffer.char_at(0) == Some('!'),
        }
    }
}

/// Translate and dispatch one key. Keys arriving while an external
/// collaborator holds the session are dropped.
pub fn handle_key(
    key: &KeyEvent,
    state: &mut SessionState,
    catalog: &CommandCatalog,
    now: Instant,
) -> DispatchResult {
    if state.busy {
        trace!(target: "actions.dispatch", key = %key, "key_dropped_busy");
        return DispatchResult::clean();
    }
    let ctx = KeyContext::from_state(state);
    match translate_key(key, &ctx) {
        Some(action) => dispatch(action, state, catalog, now),
        None => {
            trace!(target: "actions.dispatch", key = %key, "key_unbound");
            DispatchResult::clean()
        }
    }
}

/// Insert a bracketed paste. Line endings are normalized and tabs expanded;
/// while a search is active the text extends the query instead.
pub fn handle_paste(
    text: &str,
    state: &mut SessionState,
    catalog: &CommandCatalog,
    now: Instant,
) -> DispatchResult {
    if state.busy {
        return DispatchResult::clean();
    }
    let text = sanitize_input(text).into_owned();
    let action = if state.search.is_some() {
        Action::Search(SearchAction::Insert(text))
    } else {
        Action::Edit(EditKind::Insert(text))
    };
    dispatch(action, state, catalog, now)
}

/// Suggestion lines for the current input; none while searching.
pub fn suggestions(state: &SessionState, catalog: &CommandCatalog) -> Vec<String> {
    if state.search.is_some() {
        return Vec::new();
    }
    catalog.suggestions(&state.buffer.line(0))
}
