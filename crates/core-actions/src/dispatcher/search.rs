//! Reverse search session control.

use super::{DispatchResult, submit};
use crate::{CommandCatalog, SearchAction};
use core_state::{ReverseSearch, SessionState};
use tracing::debug;

pub(crate) fn handle_search(
    action: SearchAction,
    state: &mut SessionState,
    catalog: &CommandCatalog,
) -> DispatchResult {
    let mut search = match state.search.take() {
        Some(search) => search,
        None if action == SearchAction::Start => {
            state.search = Some(ReverseSearch::start(state.buffer.value(), &state.history));
            debug!(target: "actions.search", entries = state.history.len(), "search_start");
            return DispatchResult::redraw();
        }
        None => return DispatchResult::clean(),
    };
    match action {
        SearchAction::Start | SearchAction::Repeat => search.repeat(&state.history),
        SearchAction::Insert(text) => search.push_str(&text, &state.history),
        SearchAction::Backspace => {
            if !search.backspace(&state.history) {
                state.buffer.set_value(search.original_input());
                debug!(target: "actions.search", "search_abort");
                return DispatchResult::redraw();
            }
        }
        SearchAction::Cancel => {
            state.buffer.set_value(search.original_input());
            debug!(target: "actions.search", "search_cancel");
            return DispatchResult::redraw();
        }
        SearchAction::AcceptLiteral => {
            if let Some(found) = search.current_match(&state.history) {
                let found = found.to_string();
                state.buffer.set_value(&found);
            }
            return DispatchResult::redraw();
        }
        SearchAction::Accept => {
            let found = search
                .current_match(&state.history)
                .map(str::to_string);
            debug!(target: "actions.search", matched = found.is_some(), "search_accept");
            return match found {
                Some(text) => {
                    state.buffer.set_value(&text);
                    submit::submit_text(&text, state, catalog)
                }
                None => {
                    state.buffer.clear();
                    DispatchResult::redraw()
                }
            };
        }
    }
    state.search = Some(search);
    DispatchResult::redraw()
}
