//! Text edits plus kill ring traffic.

use super::DispatchResult;
use crate::{EditKind, KillKind};
use core_state::SessionState;
use tracing::trace;

pub(crate) fn handle_edit(kind: EditKind, state: &mut SessionState) -> DispatchResult {
    let before = state.buffer.cursor();
    match kind {
        EditKind::Insert(text) => state.buffer.insert(&text),
        EditKind::Newline => state.buffer.newline(),
        EditKind::Backspace => state.buffer.backspace(),
        EditKind::Delete => state.buffer.delete(),
    }
    trace!(target: "actions.dispatch", from = before, to = state.buffer.cursor(), "edit");
    DispatchResult::redraw()
}

pub(crate) fn handle_kill(kind: KillKind, state: &mut SessionState) -> DispatchResult {
    let removed = match kind {
        KillKind::ToEndOfLine => state.buffer.delete_to_end_of_line(),
        KillKind::Line => state.buffer.delete_line(),
    };
    if !removed.is_empty() {
        trace!(target: "actions.dispatch", op = ?kind, chars = removed.chars().count(), "kill");
        state.kill_ring.push(removed);
    }
    DispatchResult::redraw()
}

pub(crate) fn handle_yank(state: &mut SessionState) -> DispatchResult {
    if state.kill_ring.yank(&mut state.buffer) {
        DispatchResult::redraw()
    } else {
        DispatchResult::clean()
    }
}

pub(crate) fn handle_yank_cycle(state: &mut SessionState) -> DispatchResult {
    if state.kill_ring.yank_cycle(&mut state.buffer) {
        DispatchResult::redraw()
    } else {
        DispatchResult::clean()
    }
}
