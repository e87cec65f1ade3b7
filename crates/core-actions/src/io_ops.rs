//! Scratch-file helpers for the external editor round trip.
//!
//! The buffer is written verbatim; on the way back CRLF is normalized to LF and
//! a single trailing line break (added by most editors on save) is dropped.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ScratchFileError {
    #[error("failed to write scratch file {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read scratch file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub fn write_scratch(path: &Path, text: &str) -> Result<(), ScratchFileError> {
    let write = || -> io::Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, text)
    };
    write().map_err(|source| ScratchFileError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(target: "io", chars = text.chars().count(), "scratch_written");
    Ok(())
}

pub fn read_scratch(path: &Path) -> Result<String, ScratchFileError> {
    let raw = fs::read_to_string(path).map_err(|source| ScratchFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut text = raw.replace("\r\n", "\n");
    if text.ends_with('\n') {
        text.pop();
    }
    debug!(target: "io", chars = text.chars().count(), "scratch_read");
    Ok(text)
}
