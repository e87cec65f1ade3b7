//! Submitted-input history with file persistence.
//!
//! Invariants:
//! - Entries are trimmed and non-empty.
//! - `index` lies in `[0, len]`; `index == len` means the live (unsubmitted) input.
//! - The file holds entries joined by `\n` and is rewritten in full on every
//!   change. A failed write never drops the in-memory entry.

use core_text::sanitize_input;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("failed to write history file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Default, Clone)]
pub struct HistoryStore {
    entries: Vec<String>,
    index: usize,
    path: Option<PathBuf>,
}

impl HistoryStore {
    /// In-memory store with no backing file.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Build from explicit entries (trimming and dropping blanks). No backing file.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries: Vec<String> = entries
            .into_iter()
            .map(|e| e.as_ref().trim().to_string())
            .filter(|e| !e.is_empty())
            .collect();
        let index = entries.len();
        Self {
            entries,
            index,
            path: None,
        }
    }

    /// Load history from `path`. A missing or unreadable file yields an empty
    /// history bound to the same path so later appends create it.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => raw
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(|l| sanitize_input(l).into_owned())
                .collect(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(target: "state.history", path = %path.display(), "history_missing");
                Vec::new()
            }
            Err(e) => {
                warn!(target: "state.history", path = %path.display(), error = %e, "history_unreadable");
                Vec::new()
            }
        };
        let index = entries.len();
        debug!(target: "state.history", entries = index, "history_loaded");
        Self {
            entries,
            index,
            path: Some(path),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn get(&self, idx: usize) -> Option<&str> {
        self.entries.get(idx).map(String::as_str)
    }

    /// Record a submitted line. Blank input is ignored. The navigation index is
    /// reset to live even when persisting fails.
    pub fn append(&mut self, line: &str) -> Result<(), HistoryError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(());
        }
        self.entries.push(line.to_string());
        self.index = self.entries.len();
        self.persist()
    }

    /// Drop every entry and persist the empty list.
    pub fn clear(&mut self) -> Result<(), HistoryError> {
        self.entries.clear();
        self.index = 0;
        self.persist()
    }

    /// Step to the previous (older) entry. `None` when already at the oldest.
    pub fn prev(&mut self) -> Option<&str> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        self.get(self.index)
    }

    /// Step to the next (newer) entry; stepping past the newest returns to the
    /// live input, represented by an empty string.
    pub fn next(&mut self) -> &str {
        if self.index + 1 >= self.entries.len() {
            self.index = self.entries.len();
            return "";
        }
        self.index += 1;
        &self.entries[self.index]
    }

    /// Return to the live position without touching the entries.
    pub fn reset_index(&mut self) {
        self.index = self.entries.len();
    }

    /// Newest-first scan for an entry containing `query`, starting at `from`
    /// inclusive. An empty query matches `from` itself.
    pub fn find_match(&self, query: &str, from: Option<usize>) -> Option<usize> {
        let from = from?;
        if from >= self.entries.len() {
            return None;
        }
        if query.is_empty() {
            return Some(from);
        }
        (0..=from).rev().find(|&i| self.entries[i].contains(query))
    }

    /// Newest entry starting with `prefix`.
    pub fn latest_with_prefix(&self, prefix: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|e| e.starts_with(prefix))
            .map(String::as_str)
    }

    fn persist(&self) -> Result<(), HistoryError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let write = || -> io::Result<()> {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, self.entries.join("\n"))
        };
        write().map_err(|source| HistoryError::Write {
            path: path.clone(),
            source,
        })?;
        debug!(target: "state.history", entries = self.entries.len(), "history_saved");
        Ok(())
    }
}
