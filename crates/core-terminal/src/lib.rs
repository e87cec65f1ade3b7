//! Terminal backend abstraction and crossterm implementation.
//!
//! `enter` switches to raw mode on the alternate screen with bracketed paste
//! enabled; `leave` undoes all three. The pair is re-entrant so the session can
//! hand the terminal to an external editor and take it back.

use anyhow::Result;
use crossterm::{
    cursor::Show,
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode, enable_raw_mode,
    },
};
use std::io::stdout;
use tracing::debug;

/// Size used when the terminal cannot report one (or reports zero).
pub const FALLBACK_SIZE: TerminalSize = TerminalSize {
    columns: 80,
    rows: 24,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalSize {
    pub columns: u16,
    pub rows: u16,
}

impl TerminalSize {
    /// Replace zero dimensions with the fallback ones.
    pub fn sanitized(columns: u16, rows: u16) -> Self {
        Self {
            columns: if columns == 0 {
                FALLBACK_SIZE.columns
            } else {
                columns
            },
            rows: if rows == 0 { FALLBACK_SIZE.rows } else { rows },
        }
    }
}

/// Query the live terminal size. Never cached by callers; every frame asks again.
pub fn terminal_size() -> TerminalSize {
    match crossterm::terminal::size() {
        Ok((columns, rows)) => TerminalSize::sanitized(columns, rows),
        Err(e) => {
            debug!(target: "terminal", error = %e, "size_unavailable");
            FALLBACK_SIZE
        }
    }
}

pub trait TerminalBackend {
    fn enter(&mut self) -> Result<()>;
    fn leave(&mut self) -> Result<()>;
    fn set_title(&mut self, title: &str) -> Result<()>;
}

pub struct CrosstermBackend {
    entered: bool,
}

/// RAII guard ensuring terminal state restoration even if caller early-returns or panics.
pub struct TerminalGuard<'a> {
    backend: &'a mut CrosstermBackend,
    active: bool,
}

impl Default for CrosstermBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CrosstermBackend {
    pub fn new() -> Self {
        Self { entered: false }
    }

    pub fn is_entered(&self) -> bool {
        self.entered
    }

    /// Enter and return a guard that will leave on drop.
    pub fn enter_guard(&mut self) -> Result<TerminalGuard<'_>> {
        self.enter()?;
        Ok(TerminalGuard {
            backend: self,
            active: true,
        })
    }
}

impl TerminalGuard<'_> {
    pub fn backend(&mut self) -> &mut CrosstermBackend {
        self.backend
    }
}

impl TerminalBackend for CrosstermBackend {
    fn enter(&mut self) -> Result<()> {
        if !self.entered {
            enable_raw_mode()?;
            execute!(stdout(), EnterAlternateScreen, EnableBracketedPaste)?;
            self.entered = true;
            debug!(target: "terminal", "entered");
        }
        Ok(())
    }

    fn leave(&mut self) -> Result<()> {
        if self.entered {
            execute!(stdout(), DisableBracketedPaste, LeaveAlternateScreen, Show)?;
            disable_raw_mode()?;
            self.entered = false;
            debug!(target: "terminal", "left");
        }
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        execute!(stdout(), SetTitle(title))?;
        Ok(())
    }
}

impl Drop for CrosstermBackend {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

impl Drop for TerminalGuard<'_> {
    fn drop(&mut self) {
        if self.active {
            let _ = self.backend.leave();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_dimensions_fall_back() {
        assert_eq!(TerminalSize::sanitized(0, 0), FALLBACK_SIZE);
        assert_eq!(
            TerminalSize::sanitized(100, 0),
            TerminalSize {
                columns: 100,
                rows: 24
            }
        );
        assert_eq!(
            TerminalSize::sanitized(0, 50),
            TerminalSize {
                columns: 80,
                rows: 50
            }
        );
    }

    #[test]
    fn new_backend_is_not_entered() {
        let b = CrosstermBackend::new();
        assert!(!b.is_entered());
    }
}
