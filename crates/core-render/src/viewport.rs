//! Viewport math for the input area and the transcript area.
//!
//! The viewport is rebuilt from the live terminal size on every frame.
//!
//! Input window policy: the tail of the input is preserved (the last lines are
//! shown when the buffer is taller than the space available), then the window
//! scrolls up only as far as needed to keep the cursor line visible.

use core_terminal::TerminalSize;

/// Rows always occupied below the transcript: separator, separator, mode line.
pub const FOOTER_FIXED_ROWS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub columns: usize,
    pub rows: usize,
}

impl Viewport {
    pub fn new(columns: usize, rows: usize) -> Self {
        Self { columns, rows }
    }

    pub fn from_size(size: TerminalSize) -> Self {
        Self::new(usize::from(size.columns), usize::from(size.rows))
    }

    /// Suggestion rows that fit while leaving one input row. Extra
    /// suggestions are dropped from the end.
    pub fn suggestion_rows(&self, header_rows: usize, wanted: usize) -> usize {
        wanted.min(
            self.rows
                .saturating_sub(header_rows + FOOTER_FIXED_ROWS + 1),
        )
    }

    /// Maximum number of input lines once header and suggestions are placed
    /// (at least one).
    pub fn max_input_lines(&self, header_rows: usize, suggestion_rows: usize) -> usize {
        self.rows
            .saturating_sub(header_rows + FOOTER_FIXED_ROWS + suggestion_rows)
            .max(1)
    }

    /// Rows left for transcript lines once everything else is placed.
    pub fn transcript_rows(
        &self,
        header_rows: usize,
        input_rows: usize,
        suggestion_rows: usize,
    ) -> usize {
        self.rows
            .saturating_sub(header_rows + FOOTER_FIXED_ROWS + input_rows + suggestion_rows)
    }

    /// Clamp a cursor position into the screen.
    pub fn clamp_cursor(&self, col: usize, row: usize) -> (u16, u16) {
        let col = col.min(self.columns.saturating_sub(1));
        let row = row.min(self.rows.saturating_sub(1));
        (clamp_u16(col), clamp_u16(row))
    }
}

fn clamp_u16(v: usize) -> u16 {
    u16::try_from(v).unwrap_or(u16::MAX)
}

/// Visible slice of the input lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputWindow {
    /// Index of the first visible line (number of lines clipped above).
    pub start: usize,
    /// Number of visible lines.
    pub len: usize,
}

impl InputWindow {
    /// Compute the window for `total` lines with at most `max_lines` visible.
    pub fn compute(total: usize, cursor_line: usize, max_lines: usize) -> Self {
        let max_lines = max_lines.max(1);
        let mut start = total.saturating_sub(max_lines);
        if cursor_line < start {
            start = cursor_line;
        }
        let len = total.saturating_sub(start).min(max_lines);
        Self { start, len }
    }

    /// Visible row offset of `line` within the window, if shown.
    pub fn row_of(&self, line: usize) -> Option<usize> {
        (line >= self.start && line < self.start + self.len).then(|| line - self.start)
    }
}

/// The last `rows` items of `lines`.
pub fn tail<T>(lines: &[T], rows: usize) -> &[T] {
    &lines[lines.len().saturating_sub(rows)..]
}
