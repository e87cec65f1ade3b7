//! Built-in slash command execution.
//!
//! Output is appended to the transcript as system messages. Catalogued stubs
//! and unknown names answer with a notice instead of failing.

use super::{DispatchResult, Effect};
use crate::commands::{self, CommandCatalog, ParsedCommand};
use core_state::{PermissionMode, SessionState, TaskStatus};
use tracing::{info, warn};

pub(crate) fn execute(
    input: &str,
    state: &mut SessionState,
    catalog: &CommandCatalog,
) -> DispatchResult {
    let parsed = ParsedCommand::parse(input);
    info!(target: "actions.command", name = %parsed.name, args = parsed.args.len(), "command");
    match parsed.name.as_str() {
        "" | "help" => state.append_system(catalog.help_text()),
        "exit" => return DispatchResult::effect(Effect::Quit),
        "clear" => {
            state.transcript.clear();
            if let Err(e) = state.history.clear() {
                warn!(target: "state.history", error = %e, "history_persist_failed");
            }
        }
        "config" => {
            let path = state
                .paths
                .config_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(defaults)".to_string());
            state.append_system(format!("Settings path: {path}"));
        }
        "permissions" => match parsed.arg(0) {
            Some(raw) => state.set_mode(PermissionMode::parse_lenient(raw)),
            None => state.append_system(format!("Permission mode: {}", state.mode.as_str())),
        },
        "plan" => {
            state.mode = PermissionMode::Plan;
            state.append_system("Plan mode enabled.");
        }
        "model" => match parsed.arg(0) {
            Some(name) => {
                state.set_model_by_name(name);
            }
            None => state.cycle_model(),
        },
        "status" => {
            let line = format!(
                "Session: {} | Model: {}",
                state.session_id,
                state.active_model().display_name
            );
            state.append_system(line);
        }
        "statusline" => state.append_system(commands::statusline_help()),
        "rewind" => {
            if !state.rewind() {
                state.append_system("Nothing to rewind.");
            }
        }
        "tasks" => state.show_tasks = true,
        "todos" => todos(&parsed, state),
        name if catalog.get(name).is_some_and(|c| !c.implemented) => {
            state.append_system(format!("/{name} is not implemented."));
        }
        name => state.append_system(format!("Command not implemented: /{name}")),
    }
    DispatchResult::redraw()
}

const TODOS_USAGE: &str = "Usage: /todos [add <title> | start <id> | done <id>]";

/// `/todos` shows the tasks panel; subcommands add tasks or move them along.
fn todos(parsed: &ParsedCommand, state: &mut SessionState) {
    let status = match parsed.arg(0) {
        None => {
            state.show_tasks = true;
            return;
        }
        Some("add") => {
            let title = parsed.args[1..].join(" ");
            if title.is_empty() {
                state.append_system(TODOS_USAGE);
                return;
            }
            let id = state.add_task(title).id.clone();
            state.show_tasks = true;
            state.append_system(format!("Added task {id}."));
            return;
        }
        Some("start") => TaskStatus::InProgress,
        Some("done") => TaskStatus::Done,
        Some(_) => {
            state.append_system(TODOS_USAGE);
            return;
        }
    };
    match parsed.arg(1) {
        Some(id) if state.set_task_status(id, status) => state.show_tasks = true,
        Some(id) => state.append_system(format!("Unknown task: {id}")),
        None => state.append_system(TODOS_USAGE),
    }
}
