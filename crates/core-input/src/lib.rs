//! Async terminal input service.
//!
//! Converts crossterm `EventStream` items into `core_events::Event`s on the
//! session channel. Bracketed paste is enabled by `core-terminal`; pastes arrive
//! here as one `InputEvent::Paste` each.

mod async_service;
mod key_token;

pub use async_service::AsyncInputShutdown;

use async_service::spawn_async_event_task;
use core_events::Event;
use tokio::task::JoinHandle;

#[inline]
pub(crate) fn log_paste(payload: &str) {
    tracing::trace!(target: "input.paste", len = payload.len(), "paste");
}

/// Spawn the async input service backed by `crossterm::EventStream`.
///
/// Returns the `JoinHandle` for the background task alongside a shutdown handle
/// that can be used to request immediate termination.
pub fn spawn_async_input(
    sender: tokio::sync::mpsc::Sender<Event>,
) -> (JoinHandle<()>, AsyncInputShutdown) {
    spawn_async_event_task(sender)
}
