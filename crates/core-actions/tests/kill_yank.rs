mod common;

use common::Harness;
use core_events::KeyCode;

#[test]
fn kill_to_end_then_yank_restores_value_and_cursor() {
    let mut h = Harness::new();
    h.type_text("hello world");
    for _ in 0..6 {
        h.code(KeyCode::Left);
    }
    let before = (h.value(), h.state.buffer.cursor());
    h.ctrl('k');
    assert_eq!(h.value(), "hello");
    h.ctrl('y');
    assert_eq!((h.value(), h.state.buffer.cursor()), before);
}

#[test]
fn yank_cycle_walks_ring_and_wraps() {
    let mut h = Harness::new();
    for word in ["one", "two", "three"] {
        h.type_text(word);
        h.ctrl('u');
    }
    assert_eq!(h.state.kill_ring.entries(), &["one", "two", "three"]);
    h.ctrl('y');
    assert_eq!(h.value(), "three");
    h.alt('y');
    assert_eq!(h.value(), "two");
    h.alt('y');
    assert_eq!(h.value(), "one");
    h.alt('y');
    assert_eq!(h.value(), "three");
}

#[test]
fn cycle_after_other_key_is_ignored() {
    let mut h = Harness::new();
    h.type_text("a");
    h.ctrl('u');
    h.type_text("b");
    h.ctrl('u');
    h.ctrl('y');
    h.code(KeyCode::Left);
    h.alt('y');
    assert_eq!(h.value(), "b");
}

#[test]
fn ctrl_c_clears_without_touching_ring() {
    let mut h = Harness::new();
    h.type_text("draft");
    h.ctrl('c');
    assert_eq!(h.value(), "");
    assert!(h.state.kill_ring.is_empty());
}
