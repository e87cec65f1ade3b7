mod common;

use common::Harness;
use core_events::KeyCode;

#[test]
fn history_navigation_is_bounded() {
    let mut h = Harness::with_history(&["a", "b", "c"]);
    for _ in 0..10 {
        h.code(KeyCode::Up);
        assert!(h.state.history.index() <= 3);
    }
    assert_eq!(h.state.history.index(), 0);
    assert_eq!(h.value(), "a");
    for _ in 0..10 {
        h.code(KeyCode::Down);
        assert!(h.state.history.index() <= h.state.history.len());
    }
    assert_eq!(h.state.history.index(), 3);
    assert_eq!(h.value(), "");
}

#[test]
fn word_and_line_motions() {
    let mut h = Harness::new();
    h.type_text("foo bar baz");
    h.alt('b');
    assert_eq!(h.state.buffer.cursor(), 8);
    h.ctrl('a');
    assert_eq!(h.state.buffer.cursor(), 0);
    h.alt('f');
    assert_eq!(h.state.buffer.cursor(), 3);
    h.code(KeyCode::End);
    assert_eq!(h.state.buffer.cursor(), 11);
    h.code(KeyCode::Home);
    h.code(KeyCode::Delete);
    assert_eq!(h.value(), "oo bar baz");
}

#[test]
fn question_mark_on_empty_buffer_shows_shortcuts() {
    let mut h = Harness::new();
    h.type_text("?");
    assert_eq!(h.value(), "");
    assert!(h.transcript()[0].starts_with("System: Shortcuts:"));
    h.type_text("a?");
    assert_eq!(h.value(), "a?");
}

#[test]
fn double_escape_rewinds_into_buffer() {
    let mut h = Harness::new();
    h.type_text("question");
    h.code(KeyCode::Enter);
    h.code(KeyCode::Esc);
    h.advance(100);
    h.code(KeyCode::Esc);
    assert_eq!(h.value(), "question");
    assert_eq!(
        h.transcript(),
        vec!["System: Rewound to previous user message."]
    );
}

#[test]
fn notices_and_toggles() {
    let mut h = Harness::new();
    h.ctrl('b');
    h.ctrl('v');
    h.alt('t');
    h.ctrl('t');
    assert!(h.state.show_tasks);
    assert_eq!(
        h.transcript(),
        vec![
            "System: Background tasks are not implemented.",
            "System: Image paste is not implemented.",
            "System: Extended thinking: on",
        ]
    );
}
