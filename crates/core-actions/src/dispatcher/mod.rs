//! Dispatcher applying `Action` to the session state.
//!
//! Sub-modules:
//! * `edit`    - text mutation, kill ring and yank
//! * `motion`  - cursor movement and history navigation
//! * `search`  - reverse search session control
//! * `session` - toggles, permission mode, model, rewind
//! * `submit`  - Enter handling and submission routing
//! * `command` - built-in slash command execution
//!
//! Every action except a yank or yank cycle ends the current yank chain.

use crate::{Action, CommandCatalog};
use core_state::SessionState;
use std::time::Instant;
use tracing::trace;

mod command;
mod edit;
mod motion;
mod search;
mod session;
mod submit;

pub use submit::finish_shell;

/// Work the runtime must carry out after a dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Quit,
    /// Hand the buffer to the external editor.
    OpenEditor,
    /// Run a `!` command; the session stays busy until it finishes.
    RunShell(String),
}

/// Result of dispatching a single `Action`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResult {
    pub redraw: bool,
    pub effect: Option<Effect>,
}

impl DispatchResult {
    pub fn redraw() -> Self {
        Self {
            redraw: true,
            effect: None,
        }
    }

    pub fn clean() -> Self {
        Self {
            redraw: false,
            effect: None,
        }
    }

    pub fn effect(effect: Effect) -> Self {
        Self {
            redraw: true,
            effect: Some(effect),
        }
    }

    pub fn is_quit(&self) -> bool {
        matches!(self.effect, Some(Effect::Quit))
    }
}

/// Apply an action. `now` feeds the double-Esc gesture.
pub fn dispatch(
    action: Action,
    state: &mut SessionState,
    catalog: &CommandCatalog,
    now: Instant,
) -> DispatchResult {
    trace!(target: "actions.dispatch", action = ?action, "dispatch");
    if !matches!(action, Action::Yank | Action::YankCycle) {
        state.kill_ring.break_chain();
    }
    match action {
        Action::Edit(kind) => edit::handle_edit(kind, state),
        Action::Motion(kind) => motion::handle_motion(kind, state),
        Action::Kill(kind) => edit::handle_kill(kind, state),
        Action::Yank => edit::handle_yank(state),
        Action::YankCycle => edit::handle_yank_cycle(state),
        Action::Search(sa) => search::handle_search(sa, state, catalog),
        Action::Session(sa) => session::handle_session(sa, state, catalog, now),
        Action::Submit => submit::handle_enter(state, catalog),
    }
}
