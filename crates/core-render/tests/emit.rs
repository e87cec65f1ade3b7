use core_render::{FrameStyle, Renderer};
use core_state::{PermissionMode, SessionState};
use core_terminal::TerminalSize;

fn render(st: &SessionState, columns: u16, rows: u16) -> String {
    let mut r = Renderer::new(FrameStyle { color: true });
    let mut out = Vec::new();
    r.render(st, &[], TerminalSize { columns, rows }, &mut out)
        .unwrap();
    assert_eq!(r.frames(), 1);
    String::from_utf8(out).unwrap()
}

#[test]
fn every_row_is_cleared_and_cursor_shown_last() {
    let mut st = SessionState::ephemeral();
    st.buffer.insert("hi");
    let out = render(&st, 20, 6);
    assert!(out.starts_with("\x1b[?25l"));
    assert_eq!(out.matches("\x1b[2K").count(), 6);
    for row in 1..=6 {
        assert!(out.contains(&format!("\x1b[{row};1H\x1b[2K")));
    }
    assert!(out.ends_with("\x1b[2;5H\x1b[?25h"));
}

#[test]
fn tinted_mode_line_is_reset_after_truncation() {
    let mut st = SessionState::ephemeral();
    st.buffer.insert("x");
    st.mode = PermissionMode::Plan;
    let out = render(&st, 6, 6);
    // Mode line row: "\x1b[35mplan m" cut to six columns then reset.
    assert!(out.contains("\x1b[35mplan m\x1b[0m"), "{out:?}");
}

#[test]
fn rows_beyond_terminal_are_not_emitted() {
    let mut st = SessionState::ephemeral();
    for i in 0..50 {
        st.append_system(format!("line {i}"));
    }
    let out = render(&st, 30, 5);
    assert_eq!(out.matches("\x1b[2K").count(), 5);
    assert!(!out.contains("\x1b[6;1H"));
}
