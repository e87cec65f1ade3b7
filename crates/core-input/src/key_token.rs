use core_events::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::event::{
    KeyCode as CKeyCode, KeyEvent as CKeyEvent, KeyEventKind as CKeyEventKind,
    KeyModifiers as CKeyModifiers,
};

/// Map a crossterm key event into the session key model.
///
/// Returns `None` for releases and for key codes the dispatcher has no use for
/// (function keys, media keys, bare modifiers).
pub(crate) fn map_key_event(event: &CKeyEvent) -> Option<KeyEvent> {
    if !matches!(event.kind, CKeyEventKind::Press | CKeyEventKind::Repeat) {
        return None;
    }
    let mut mods = map_mods(event.modifiers);
    let code = match event.code {
        CKeyCode::BackTab => {
            mods |= KeyModifiers::SHIFT;
            KeyCode::Tab
        }
        other => map_key_code(&other)?,
    };
    Some(KeyEvent { code, mods })
}

/// Convert a crossterm key code into a logical key.
pub(crate) fn map_key_code(code: &CKeyCode) -> Option<KeyCode> {
    let code = match code {
        CKeyCode::Char(c) => KeyCode::Char(*c),
        CKeyCode::Enter => KeyCode::Enter,
        CKeyCode::Esc => KeyCode::Esc,
        CKeyCode::Backspace => KeyCode::Backspace,
        CKeyCode::Tab | CKeyCode::BackTab => KeyCode::Tab,
        CKeyCode::Up => KeyCode::Up,
        CKeyCode::Down => KeyCode::Down,
        CKeyCode::Left => KeyCode::Left,
        CKeyCode::Right => KeyCode::Right,
        CKeyCode::Home => KeyCode::Home,
        CKeyCode::End => KeyCode::End,
        CKeyCode::PageUp => KeyCode::PageUp,
        CKeyCode::PageDown => KeyCode::PageDown,
        CKeyCode::Insert => KeyCode::Insert,
        CKeyCode::Delete => KeyCode::Delete,
        CKeyCode::F(_)
        | CKeyCode::Null
        | CKeyCode::CapsLock
        | CKeyCode::ScrollLock
        | CKeyCode::NumLock
        | CKeyCode::PrintScreen
        | CKeyCode::Pause
        | CKeyCode::Menu
        | CKeyCode::KeypadBegin
        | CKeyCode::Media(_)
        | CKeyCode::Modifier(_) => return None,
    };
    Some(code)
}

/// Convert crossterm modifier flags. Meta is folded into `ALT`.
pub(crate) fn map_mods(mods: CKeyModifiers) -> KeyModifiers {
    let mut out = KeyModifiers::empty();
    if mods.contains(CKeyModifiers::CONTROL) {
        out |= KeyModifiers::CTRL;
    }
    if mods.intersects(CKeyModifiers::ALT | CKeyModifiers::META) {
        out |= KeyModifiers::ALT;
    }
    if mods.contains(CKeyModifiers::SHIFT) {
        out |= KeyModifiers::SHIFT;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key_event(code: CKeyCode, modifiers: CKeyModifiers, kind: CKeyEventKind) -> CKeyEvent {
        CKeyEvent {
            code,
            modifiers,
            kind,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn maps_basic_char() {
        let ev = key_event(CKeyCode::Char('x'), CKeyModifiers::NONE, CKeyEventKind::Press);
        assert_eq!(
            map_key_event(&ev),
            Some(KeyEvent::plain(KeyCode::Char('x')))
        );
    }

    #[test]
    fn maps_ctrl_and_meta_chords() {
        let ev = key_event(
            CKeyCode::Char('r'),
            CKeyModifiers::CONTROL,
            CKeyEventKind::Press,
        );
        assert_eq!(map_key_event(&ev), Some(KeyEvent::ctrl('r')));
        let ev = key_event(CKeyCode::Char('y'), CKeyModifiers::META, CKeyEventKind::Press);
        assert_eq!(map_key_event(&ev), Some(KeyEvent::alt('y')));
    }

    #[test]
    fn back_tab_becomes_shift_tab() {
        let ev = key_event(CKeyCode::BackTab, CKeyModifiers::NONE, CKeyEventKind::Press);
        let mapped = map_key_event(&ev).unwrap();
        assert_eq!(mapped.code, KeyCode::Tab);
        assert!(mapped.is_shift());
    }

    #[test]
    fn repeat_is_forwarded_release_is_not() {
        let ev = key_event(CKeyCode::Left, CKeyModifiers::NONE, CKeyEventKind::Repeat);
        assert_eq!(map_key_event(&ev), Some(KeyEvent::plain(KeyCode::Left)));
        let ev = key_event(CKeyCode::Left, CKeyModifiers::NONE, CKeyEventKind::Release);
        assert_eq!(map_key_event(&ev), None);
    }

    #[test]
    fn unsupported_keys_return_none() {
        assert!(map_key_code(&CKeyCode::F(5)).is_none());
        assert!(map_key_code(&CKeyCode::CapsLock).is_none());
    }
}
