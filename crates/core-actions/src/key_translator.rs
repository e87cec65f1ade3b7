//! Key -> Action classification.
//!
//! Precedence: an active search claims every key; control and meta chords are
//! matched before plain characters; anything unrecognized yields `None`.

use crate::{
    Action, EditKind, KeyContext, KillKind, MotionKind, Notice, SearchAction, SessionAction,
};
use core_events::{KeyCode, KeyEvent};

pub fn translate_key(key: &KeyEvent, ctx: &KeyContext) -> Option<Action> {
    if ctx.search_active {
        return search_map(key);
    }
    if key.is_ctrl() {
        return ctrl_map(key);
    }
    if key.is_alt() {
        return alt_map(key);
    }
    plain_map(key, ctx)
}

fn search_map(key: &KeyEvent) -> Option<Action> {
    let action = match key.code {
        KeyCode::Char('c') if key.is_ctrl() => SearchAction::Cancel,
        KeyCode::Char('r') if key.is_ctrl() => SearchAction::Repeat,
        KeyCode::Backspace => SearchAction::Backspace,
        KeyCode::Tab | KeyCode::Esc => SearchAction::AcceptLiteral,
        KeyCode::Enter => SearchAction::Accept,
        _ => {
            let c = key.printable()?;
            SearchAction::Insert(c.to_string())
        }
    };
    Some(Action::Search(action))
}

fn ctrl_map(key: &KeyEvent) -> Option<Action> {
    use SessionAction as S;
    let action = match key.code {
        KeyCode::Char('c') => Action::Session(S::ClearInput),
        KeyCode::Char('d') => Action::Session(S::Quit),
        KeyCode::Char('l') => Action::Session(S::Redraw),
        KeyCode::Char('o') => Action::Session(S::ToggleVerbose),
        KeyCode::Char('g') => Action::Session(S::OpenEditor),
        KeyCode::Char('r') => Action::Search(SearchAction::Start),
        KeyCode::Char('b') => Action::Session(S::Notice(Notice::BackgroundTasks)),
        KeyCode::Char('t') => Action::Session(S::ToggleTasks),
        KeyCode::Char('k') => Action::Kill(KillKind::ToEndOfLine),
        KeyCode::Char('u') => Action::Kill(KillKind::Line),
        KeyCode::Char('y') => Action::Yank,
        KeyCode::Char('a') => Action::Motion(MotionKind::LineStart),
        KeyCode::Char('e') => Action::Motion(MotionKind::LineEnd),
        KeyCode::Char('j') => Action::Edit(EditKind::Newline),
        KeyCode::Char('v') | KeyCode::Insert => {
            Action::Session(S::Notice(Notice::ImagePaste))
        }
        KeyCode::Left => Action::Motion(MotionKind::WordLeft),
        KeyCode::Right => Action::Motion(MotionKind::WordRight),
        _ => return None,
    };
    Some(action)
}

fn alt_map(key: &KeyEvent) -> Option<Action> {
    use SessionAction as S;
    let KeyCode::Char(c) = key.code else {
        return None;
    };
    let action = match c.to_ascii_lowercase() {
        'y' => Action::YankCycle,
        'b' => Action::Motion(MotionKind::WordLeft),
        'f' => Action::Motion(MotionKind::WordRight),
        'm' => Action::Session(S::CycleMode),
        'p' => Action::Session(S::CycleModel),
        't' => Action::Session(S::ToggleThinking),
        'v' => Action::Session(S::Notice(Notice::ImagePaste)),
        _ => return None,
    };
    Some(action)
}

fn plain_map(key: &KeyEvent, ctx: &KeyContext) -> Option<Action> {
    use SessionAction as S;
    let action = match key.code {
        KeyCode::Esc => Action::Session(S::Escape),
        KeyCode::Tab if key.is_shift() => Action::Session(S::CycleMode),
        KeyCode::Tab if ctx.bang_prefix => Action::Session(S::CompleteFromHistory),
        KeyCode::Tab => return None,
        KeyCode::Enter if key.is_shift() => Action::Edit(EditKind::Newline),
        KeyCode::Enter => Action::Submit,
        KeyCode::Backspace => Action::Edit(EditKind::Backspace),
        KeyCode::Delete => Action::Edit(EditKind::Delete),
        KeyCode::Left => Action::Motion(MotionKind::Left),
        KeyCode::Right => Action::Motion(MotionKind::Right),
        KeyCode::Up => Action::Motion(MotionKind::Up),
        KeyCode::Down => Action::Motion(MotionKind::Down),
        KeyCode::Home => Action::Motion(MotionKind::LineStart),
        KeyCode::End => Action::Motion(MotionKind::LineEnd),
        KeyCode::Char('?') if ctx.buffer_empty => Action::Session(S::ShortcutsHelp),
        _ => {
            let c = key.printable()?;
            Action::Edit(EditKind::Insert(c.to_string()))
        }
    };
    Some(action)
}
