//! Cursor motions. Up/Down fall through to history navigation at the first and
//! last buffer line respectively.

use super::DispatchResult;
use crate::MotionKind;
use core_state::SessionState;

pub(crate) fn handle_motion(kind: MotionKind, state: &mut SessionState) -> DispatchResult {
    let buffer = &mut state.buffer;
    match kind {
        MotionKind::Left => buffer.move_left(),
        MotionKind::Right => buffer.move_right(),
        MotionKind::WordLeft => buffer.move_word_left(),
        MotionKind::WordRight => buffer.move_word_right(),
        MotionKind::LineStart => buffer.move_home(),
        MotionKind::LineEnd => buffer.move_end(),
        MotionKind::Up => {
            if buffer.cursor_line_col().line > 0 {
                buffer.move_up();
            } else {
                return history_prev(state);
            }
        }
        MotionKind::Down => {
            if buffer.cursor_line_col().line + 1 < buffer.line_count() {
                buffer.move_down();
            } else {
                return history_next(state);
            }
        }
    }
    DispatchResult::redraw()
}

fn history_prev(state: &mut SessionState) -> DispatchResult {
    match state.history.prev() {
        Some(entry) => {
            let entry = entry.to_string();
            state.buffer.set_value(&entry);
            DispatchResult::redraw()
        }
        None => DispatchResult::clean(),
    }
}

fn history_next(state: &mut SessionState) -> DispatchResult {
    // Already live: leave the draft alone.
    if state.history.index() >= state.history.len() {
        return DispatchResult::clean();
    }
    let entry = state.history.next().to_string();
    state.buffer.set_value(&entry);
    DispatchResult::redraw()
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_state::HistoryStore;

    fn with_history(entries: &[&str]) -> SessionState {
        let mut st = SessionState::ephemeral();
        st.history = HistoryStore::from_entries(entries);
        st
    }

    #[test]
    fn up_on_first_line_recalls_history() {
        let mut st = with_history(&["one", "two"]);
        handle_motion(MotionKind::Up, &mut st);
        assert_eq!(st.buffer.value(), "two");
        assert_eq!(st.buffer.cursor(), 3);
        handle_motion(MotionKind::Up, &mut st);
        assert_eq!(st.buffer.value(), "one");
        let res = handle_motion(MotionKind::Up, &mut st);
        assert!(!res.redraw);
        assert_eq!(st.history.index(), 0);
    }

    #[test]
    fn down_past_newest_returns_to_empty_live_line() {
        let mut st = with_history(&["one", "two"]);
        handle_motion(MotionKind::Up, &mut st);
        handle_motion(MotionKind::Down, &mut st);
        assert_eq!(st.buffer.value(), "");
        assert_eq!(st.history.index(), 2);
    }

    #[test]
    fn down_while_live_keeps_draft() {
        let mut st = with_history(&["one"]);
        st.buffer.insert("draft");
        let res = handle_motion(MotionKind::Down, &mut st);
        assert!(!res.redraw);
        assert_eq!(st.buffer.value(), "draft");
    }

    #[test]
    fn vertical_moves_stay_inside_multiline_buffer() {
        let mut st = with_history(&["old"]);
        st.buffer.set_value_and_cursor("ab\ncd", 4);
        handle_motion(MotionKind::Up, &mut st);
        assert_eq!(st.buffer.cursor(), 1);
        assert_eq!(st.buffer.value(), "ab\ncd");
        handle_motion(MotionKind::Down, &mut st);
        assert_eq!(st.buffer.cursor(), 4);
    }
}
