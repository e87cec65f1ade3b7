//! Session state: the single owning context for one interactive session.
//!
//! Everything the key dispatcher mutates and the renderer reads lives here:
//! the input buffer, kill ring, history, an optional reverse-search session,
//! the transcript and the toggles surfaced on screen. There are no globals; the
//! binary owns exactly one `SessionState` and threads `&mut` through dispatch.
//!
//! Submodules:
//! - `kill_ring`: append-only killed spans plus yank / yank-cycle.
//! - `history`: submitted lines with newline-joined file persistence.
//! - `search`: incremental reverse search session over `history`.
//!
//! Transcript mutations bump `Transcript::revision`; the runtime compares
//! revisions after each event to decide whether the status-line command needs
//! rescheduling.

use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

pub mod history;
pub mod kill_ring;
pub mod search;

pub use core_text::TextBuffer;
pub use history::{HistoryError, HistoryStore};
pub use kill_ring::KillRing;
pub use search::ReverseSearch;

/// Window for the double-Esc rewind gesture.
pub const ESC_REWIND_WINDOW_MS: u128 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
    Tool,
}

impl Role {
    /// Prefix shown in front of the first line of a message.
    pub fn prefix(self) -> &'static str {
        match self {
            Role::User => "You: ",
            Role::Assistant => "Assistant: ",
            Role::System => "System: ",
            Role::Tool => "Tool: ",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("failed to serialize transcript: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to write transcript {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Ordered conversation messages.
#[derive(Debug, Default, Clone)]
pub struct Transcript {
    messages: Vec<Message>,
    revision: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Bumped on every mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
        self.revision += 1;
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.revision += 1;
    }

    /// Drop the most recent user message and everything after it, returning its
    /// content. `None` when there is no user message.
    pub fn rewind(&mut self) -> Option<String> {
        let idx = self.messages.iter().rposition(|m| m.role == Role::User)?;
        let content = self.messages[idx].content.clone();
        self.messages.truncate(idx);
        self.revision += 1;
        Some(content)
    }

    /// Write `{ "session_id", "messages" }` as pretty JSON.
    pub fn save(&self, path: &Path, session_id: &Uuid) -> Result<(), TranscriptError> {
        #[derive(Serialize)]
        struct Payload<'a> {
            session_id: String,
            messages: &'a [Message],
        }
        let payload = Payload {
            session_id: session_id.to_string(),
            messages: &self.messages,
        };
        let json = serde_json::to_string_pretty(&payload)?;
        fs::write(path, json).map_err(|source| TranscriptError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Permission mode shown on the mode line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermissionMode {
    #[default]
    Normal,
    Plan,
    Auto,
}

impl PermissionMode {
    /// normal -> plan -> auto -> normal
    pub fn cycle(self) -> Self {
        match self {
            PermissionMode::Normal => PermissionMode::Plan,
            PermissionMode::Plan => PermissionMode::Auto,
            PermissionMode::Auto => PermissionMode::Normal,
        }
    }

    /// Lenient parse used by `/permissions <mode>`; unknown input means normal.
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "auto" | "auto-accept" => PermissionMode::Auto,
            "plan" => PermissionMode::Plan,
            _ => PermissionMode::Normal,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PermissionMode::Normal => "normal",
            PermissionMode::Plan => "plan",
            PermissionMode::Auto => "auto",
        }
    }

    /// Text of the mode line indicator.
    pub fn indicator(self) -> &'static str {
        match self {
            PermissionMode::Normal => "accept edits off",
            PermissionMode::Plan => "plan mode",
            PermissionMode::Auto => "accept edits on",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInfo {
    pub id: String,
    pub display_name: String,
}

impl ModelInfo {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

/// Placeholder model list used when configuration supplies none.
pub fn default_models() -> Vec<ModelInfo> {
    vec![
        ModelInfo::new("model-large", "Large"),
        ModelInfo::new("model-fast", "Fast"),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: String,
    pub status: TaskStatus,
    pub title: String,
}

/// Filesystem locations associated with a session.
#[derive(Debug, Clone, Default)]
pub struct SessionPaths {
    pub project_dir: PathBuf,
    /// Per-project data directory (history, scratch file, transcript, log).
    pub data_dir: PathBuf,
    /// Configuration file in effect, if one was found.
    pub config_path: Option<PathBuf>,
}

impl SessionPaths {
    pub fn transcript_path(&self) -> PathBuf {
        self.data_dir.join("transcript.json")
    }

    pub fn scratch_path(&self) -> PathBuf {
        self.data_dir.join("prompt-edit.txt")
    }
}

pub struct SessionState {
    pub buffer: TextBuffer,
    pub kill_ring: KillRing,
    pub history: HistoryStore,
    /// Active reverse search, if any. While `Some`, all keys go to the search.
    pub search: Option<ReverseSearch>,
    pub transcript: Transcript,
    pub mode: PermissionMode,
    models: Vec<ModelInfo>,
    model_index: usize,
    pub verbose: bool,
    pub thinking: bool,
    pub show_tasks: bool,
    pub tasks: Vec<TaskItem>,
    /// First line of the last status-line command output.
    pub status_line: String,
    /// Set while an external collaborator (shell, editor) owns the session.
    pub busy: bool,
    pub last_esc_at: Option<Instant>,
    pub session_id: Uuid,
    pub paths: SessionPaths,
    pub version: String,
    pub started_at: Instant,
}

impl SessionState {
    pub fn new(paths: SessionPaths, history: HistoryStore, models: Vec<ModelInfo>) -> Self {
        let models = if models.is_empty() {
            default_models()
        } else {
            models
        };
        Self {
            buffer: TextBuffer::new(),
            kill_ring: KillRing::new(),
            history,
            search: None,
            transcript: Transcript::new(),
            mode: PermissionMode::default(),
            models,
            model_index: 0,
            verbose: false,
            thinking: false,
            show_tasks: false,
            tasks: Vec::new(),
            status_line: String::new(),
            busy: false,
            last_esc_at: None,
            session_id: Uuid::new_v4(),
            paths,
            version: String::from("0.0.0"),
            started_at: Instant::now(),
        }
    }

    /// Session with an in-memory history and default models. Used by tests and
    /// tooling that has no project directory.
    pub fn ephemeral() -> Self {
        Self::new(
            SessionPaths::default(),
            HistoryStore::in_memory(),
            default_models(),
        )
    }

    pub fn models(&self) -> &[ModelInfo] {
        &self.models
    }

    pub fn model_index(&self) -> usize {
        self.model_index
    }

    pub fn active_model(&self) -> &ModelInfo {
        // `models` is never empty (see `new`).
        &self.models[self.model_index]
    }

    pub fn append_message(&mut self, role: Role, content: impl Into<String>) {
        self.transcript.push(Message::new(role, content));
    }

    pub fn append_system(&mut self, content: impl Into<String>) {
        self.append_message(Role::System, content);
    }

    pub fn cycle_mode(&mut self) {
        self.mode = self.mode.cycle();
        self.append_system(format!("Permission mode: {}", self.mode.as_str()));
    }

    pub fn set_mode(&mut self, mode: PermissionMode) {
        self.mode = mode;
        self.append_system(format!("Permission mode: {}", self.mode.as_str()));
    }

    pub fn cycle_model(&mut self) {
        self.model_index = (self.model_index + 1) % self.models.len();
        let name = self.active_model().display_name.clone();
        self.append_system(format!("Model: {name}"));
    }

    /// Select a model by id or (case-insensitive) display name.
    pub fn set_model_by_name(&mut self, name: &str) -> bool {
        let found = self
            .models
            .iter()
            .position(|m| m.id == name || m.display_name.eq_ignore_ascii_case(name));
        match found {
            Some(idx) => {
                self.model_index = idx;
                let display = self.active_model().display_name.clone();
                self.append_system(format!("Model: {display}"));
                true
            }
            None => {
                self.append_system(format!("Unknown model: {name}"));
                false
            }
        }
    }

    /// Restore the most recent user message into the input and drop it (and what
    /// followed) from the transcript.
    pub fn rewind(&mut self) -> bool {
        let Some(content) = self.transcript.rewind() else {
            return false;
        };
        self.buffer.set_value(&content);
        self.append_system("Rewound to previous user message.");
        debug!(target: "state", messages = self.transcript.len(), "rewind");
        true
    }

    /// Append a pending task with the next sequential id (`t1`, `t2`, ...).
    pub fn add_task(&mut self, title: impl Into<String>) -> &TaskItem {
        let next = self
            .tasks
            .iter()
            .filter_map(|t| t.id.strip_prefix('t')?.parse::<usize>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        self.tasks.push(TaskItem {
            id: format!("t{next}"),
            status: TaskStatus::Pending,
            title: title.into(),
        });
        &self.tasks[self.tasks.len() - 1]
    }

    /// Update a task's status; false when no task has `id`.
    pub fn set_task_status(&mut self, id: &str, status: TaskStatus) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.status = status;
                true
            }
            None => false,
        }
    }

    /// Record an Esc press; returns true when it completes a double-Esc.
    pub fn note_escape(&mut self, now: Instant) -> bool {
        let double = self
            .last_esc_at
            .is_some_and(|prev| now.duration_since(prev).as_millis() < ESC_REWIND_WINDOW_MS);
        self.last_esc_at = if double { None } else { Some(now) };
        double
    }

    /// Persist the transcript next to the history file. No-op without a data dir.
    pub fn save_transcript(&self) -> Result<(), TranscriptError> {
        if self.paths.data_dir.as_os_str().is_empty() {
            return Ok(());
        }
        self.transcript
            .save(&self.paths.transcript_path(), &self.session_id)
    }

    /// Whether the welcome banner should occupy the transcript area.
    pub fn shows_banner(&self) -> bool {
        self.transcript.is_empty() && self.buffer.value().trim().is_empty() && self.search.is_none()
    }
}
