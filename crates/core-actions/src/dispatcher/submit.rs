//! Enter handling and submission routing.
//!
//! A submitted line is trimmed, recorded in history and routed by its first
//! character: `/` slash command, `!` shell command, `#` memory shortcut,
//! anything else a user message.

use super::{DispatchResult, Effect, command};
use crate::CommandCatalog;
use core_state::{Role, SessionState};
use tracing::{info, warn};

pub(crate) fn handle_enter(state: &mut SessionState, catalog: &CommandCatalog) -> DispatchResult {
    let value = state.buffer.value();
    if let Some(head) = value.strip_suffix('\\') {
        let cursor = state.buffer.cursor();
        state.buffer.set_value_and_cursor(&format!("{head}\n"), cursor);
        return DispatchResult::redraw();
    }
    submit_text(&value, state, catalog)
}

pub(crate) fn submit_text(
    raw: &str,
    state: &mut SessionState,
    catalog: &CommandCatalog,
) -> DispatchResult {
    let text = raw.trim();
    if text.is_empty() {
        state.buffer.clear();
        return DispatchResult::redraw();
    }
    if let Err(e) = state.history.append(text) {
        // In-memory history stays authoritative for the session.
        warn!(target: "state.history", error = %e, "history_persist_failed");
    }
    state.buffer.clear();
    info!(target: "actions.submit", chars = text.chars().count(), "submit");

    if text.starts_with('/') {
        return command::execute(text, state, catalog);
    }
    if let Some(rest) = text.strip_prefix('!') {
        return run_shell(rest.trim(), state);
    }
    if text.starts_with('#') {
        state.append_system("Memory shortcut is not implemented.");
        return DispatchResult::redraw();
    }
    state.append_message(Role::User, text);
    state.append_message(
        Role::Assistant,
        format!(
            "Placeholder reply (mode={}). No model backend is connected.\nYou said: {text}",
            state.mode.as_str()
        ),
    );
    DispatchResult::redraw()
}

fn run_shell(command: &str, state: &mut SessionState) -> DispatchResult {
    if command.is_empty() {
        state.append_system("No command to run.");
        return DispatchResult::redraw();
    }
    state.append_message(Role::User, format!("! {command}"));
    state.busy = true;
    DispatchResult::effect(Effect::RunShell(command.to_string()))
}

/// Apply a finished shell command's merged output and release the session.
pub fn finish_shell(state: &mut SessionState, output: &str) {
    let content = if output.trim().is_empty() {
        "(no output)"
    } else {
        output.trim_end()
    };
    state.append_message(Role::Tool, content);
    state.busy = false;
}
