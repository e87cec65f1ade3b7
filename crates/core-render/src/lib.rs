//! Frame composition and full-redraw emission.
//!
//! Every frame is rebuilt from `SessionState` and redrawn top to bottom; there
//! is no partial repaint path and no frame cache. Layout, top to bottom:
//!
//! 1. Optional header (status-line output) plus separator.
//! 2. Transcript area: welcome banner when the session is idle, transcript
//!    messages, optional tasks panel. Clipped from the top so the newest lines
//!    stay visible.
//! 3. Command suggestions (supplied by the caller).
//! 4. Separator, input lines (prompt on the first, padding on the rest),
//!    separator.
//! 5. Mode line.
//!
//! Invariants:
//! - Every emitted row is truncated to the terminal width with
//!   `ansi::truncate_visible`, so control sequences are never split.
//! - The frame never holds more lines than the terminal has rows, as long as
//!   the footer and one input row fit. Suggestions are placed before extra
//!   input lines but never take the last input row (trailing ones are
//!   dropped); the header is dropped before the input row.
//! - The input line holding the cursor is always visible.
//! - Rows past the end of the frame are cleared.
//! - The final cursor position is clamped into the screen.
//! - The terminal size is a parameter; callers query it per frame.

use anyhow::Result;
use core_state::SessionState;
use core_terminal::TerminalSize;
use core_text::display_width;
use core_text::width::prefix_width;
use std::io::Write;
use std::path::Path;
use tracing::trace;

pub mod ansi;
pub mod status;
pub mod viewport;
pub mod writer;

pub use viewport::{InputWindow, Viewport};
pub use writer::Writer;

pub const PROMPT: &str = "› ";
pub const SEARCH_PROMPT: &str = "(reverse-i-search)";
/// Header text plus its separator.
const HEADER_ROWS: usize = 2;

/// Presentation toggles that do not come from session state.
#[derive(Debug, Clone, Copy)]
pub struct FrameStyle {
    /// Emit SGR colors (disabled when stdout is not a terminal).
    pub color: bool,
}

impl Default for FrameStyle {
    fn default() -> Self {
        Self { color: true }
    }
}

/// A composed frame: logical lines plus the cursor cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub lines: Vec<String>,
    /// 0-based (column, row), already clamped into the viewport.
    pub cursor: (u16, u16),
    pub viewport: Viewport,
}

/// Build the frame for `state` at `size`.
pub fn compose_frame(
    state: &SessionState,
    suggestions: &[String],
    size: TerminalSize,
    style: FrameStyle,
) -> Frame {
    let vp = Viewport::from_size(size);
    let mut lines = Vec::new();

    // The header yields to the input on terminals too short for both.
    let header = status::header_line(&state.status_line)
        .filter(|_| vp.rows > HEADER_ROWS + viewport::FOOTER_FIXED_ROWS);
    let header_rows = if let Some(h) = header {
        lines.push(h.to_string());
        lines.push(status::separator(vp.columns));
        HEADER_ROWS
    } else {
        0
    };

    let mut transcript = Vec::new();
    if state.shows_banner() {
        let project = project_name(&state.paths.project_dir);
        transcript.extend(status::banner_lines(
            vp.columns,
            &status::BannerInfo {
                version: &state.version,
                project: &project,
                model: &state.active_model().display_name,
            },
        ));
    }
    transcript.extend(status::transcript_lines(state.transcript.messages()));
    if state.show_tasks {
        transcript.extend(status::tasks_lines(&state.tasks));
    }

    let (prompt, input_lines, cursor_line, cursor_col_width) = match &state.search {
        Some(search) => {
            let matched = search.current_match(&state.history).unwrap_or("");
            let line = format!(" {}: {}", search.query(), matched);
            // Cursor sits right after the query.
            let col = 1 + display_width(search.query());
            (SEARCH_PROMPT, vec![line], 0, col)
        }
        None => {
            let pos = state.buffer.cursor_line_col();
            let lines = state.buffer.lines();
            let col = lines
                .get(pos.line)
                .map(|l| prefix_width(l, pos.col))
                .unwrap_or(0);
            (PROMPT, lines, pos.line, col)
        }
    };

    let suggestions = &suggestions[..vp.suggestion_rows(header_rows, suggestions.len())];
    let window = InputWindow::compute(
        input_lines.len(),
        cursor_line,
        vp.max_input_lines(header_rows, suggestions.len()),
    );
    let visible_input = &input_lines[window.start..window.start + window.len];

    let transcript_rows = vp.transcript_rows(header_rows, visible_input.len(), suggestions.len());
    lines.extend(viewport::tail(&transcript, transcript_rows).iter().cloned());
    lines.extend(suggestions.iter().cloned());

    lines.push(status::separator(vp.columns));
    let first_input_row = lines.len();
    let prompt_width = display_width(prompt);
    let padding = " ".repeat(prompt_width);
    for (i, line) in visible_input.iter().enumerate() {
        let lead = if i == 0 { prompt } else { padding.as_str() };
        lines.push(format!("{lead}{line}"));
    }
    lines.push(status::separator(vp.columns));
    lines.push(status::mode_line(state.mode, style.color));

    // Clamp to the nearest visible input row if the cursor line is clipped.
    let cursor_row = match window.row_of(cursor_line) {
        Some(offset) => first_input_row + offset,
        None if cursor_line < window.start => first_input_row,
        None => first_input_row + window.len.saturating_sub(1),
    };
    let cursor = vp.clamp_cursor(prompt_width + cursor_col_width, cursor_row);

    trace!(
        target: "render.frame",
        rows = vp.rows,
        cols = vp.columns,
        lines = lines.len(),
        input_start = window.start,
        input_visible = window.len,
        "compose"
    );

    Frame {
        lines,
        cursor,
        viewport: vp,
    }
}

/// Translate a frame into writer commands: hide cursor, clear and paint every
/// terminal row, place and show the cursor.
pub fn frame_commands(frame: &Frame) -> Writer {
    let vp = frame.viewport;
    let mut w = Writer::new();
    w.hide_cursor();
    for row in 0..vp.rows {
        let y = u16::try_from(row).unwrap_or(u16::MAX);
        w.move_to(0, y);
        w.clear_line();
        if let Some(line) = frame.lines.get(row) {
            w.print(ansi::truncate_visible(line, vp.columns));
        }
    }
    w.move_to(frame.cursor.0, frame.cursor.1);
    w.show_cursor();
    w
}

/// Full redraw renderer.
#[derive(Debug, Default)]
pub struct Renderer {
    style: FrameStyle,
    frames: u64,
}

impl Renderer {
    pub fn new(style: FrameStyle) -> Self {
        Self { style, frames: 0 }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Compose and emit one frame into `out`.
    pub fn render<W: Write>(
        &mut self,
        state: &SessionState,
        suggestions: &[String],
        size: TerminalSize,
        out: &mut W,
    ) -> Result<Frame> {
        let frame = compose_frame(state, suggestions, size, self.style);
        frame_commands(&frame).flush_to(out)?;
        self.frames += 1;
        trace!(target: "render.frame", frame = self.frames, "emitted");
        Ok(frame)
    }
}

fn project_name(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string())
}
