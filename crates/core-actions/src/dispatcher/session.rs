//! Session-level controls: toggles, mode and model cycling, rewind, notices.

use super::{DispatchResult, Effect};
use crate::{CommandCatalog, SessionAction, commands};
use core_state::SessionState;
use std::time::Instant;
use tracing::debug;

pub(crate) fn handle_session(
    action: SessionAction,
    state: &mut SessionState,
    _catalog: &CommandCatalog,
    now: Instant,
) -> DispatchResult {
    match action {
        SessionAction::ClearInput => state.buffer.clear(),
        SessionAction::Quit => return DispatchResult::effect(Effect::Quit),
        SessionAction::Redraw => {}
        SessionAction::ToggleVerbose => {
            state.verbose = !state.verbose;
            state.append_system(format!("Verbose: {}", on_off(state.verbose)));
        }
        SessionAction::ToggleThinking => {
            state.thinking = !state.thinking;
            state.append_system(format!("Extended thinking: {}", on_off(state.thinking)));
        }
        SessionAction::ToggleTasks => state.show_tasks = !state.show_tasks,
        SessionAction::CycleMode => state.cycle_mode(),
        SessionAction::CycleModel => state.cycle_model(),
        SessionAction::OpenEditor => return DispatchResult::effect(Effect::OpenEditor),
        SessionAction::Escape => {
            if !state.note_escape(now) {
                return DispatchResult::clean();
            }
            debug!(target: "actions.dispatch", "double_escape");
            if !state.rewind() {
                return DispatchResult::clean();
            }
        }
        SessionAction::CompleteFromHistory => {
            let prefix = state.buffer.value();
            let Some(found) = state.history.latest_with_prefix(&prefix) else {
                return DispatchResult::clean();
            };
            let found = found.to_string();
            state.buffer.set_value(&found);
        }
        SessionAction::ShortcutsHelp => state.append_system(commands::shortcuts_help()),
        SessionAction::Notice(notice) => state.append_system(notice.text()),
    }
    DispatchResult::redraw()
}

fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}
