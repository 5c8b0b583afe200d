//! Conversions from crossterm events.

use crate::input::InputEvent;
use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::input::KeyModifiers;
use crate::input::MouseButton;
use crate::input::MouseEvent;
use crate::input::MouseEventKind;
use crossterm::event as ct;

/// Maps a crossterm event, or returns `None` for events no effect reacts to (key releases,
/// unsupported keys, pastes, focus gained).
pub fn input_event_from_crossterm(ev: ct::Event) -> Option<InputEvent> {
    match ev {
        // held keys repeat like presses so focus can be scrubbed across a dock
        ct::Event::Key(key) if key.kind != ct::KeyEventKind::Release => {
            key_event_from_crossterm(key).map(InputEvent::Key)
        }
        ct::Event::Mouse(m) => mouse_event_from_crossterm(m).map(InputEvent::Mouse),
        ct::Event::Resize(w, h) => Some(InputEvent::Resize(w, h)),
        ct::Event::FocusLost => Some(InputEvent::FocusLost),
        _ => None,
    }
}

pub fn key_event_from_crossterm(key: ct::KeyEvent) -> Option<KeyEvent> {
    let code = key_code_from_crossterm(key.code)?;
    Some(KeyEvent::new(code).with_modifiers(key.modifiers.into()))
}

fn key_code_from_crossterm(code: ct::KeyCode) -> Option<KeyCode> {
    Some(match code {
        ct::KeyCode::Char(c) => KeyCode::Char(c),
        ct::KeyCode::Enter => KeyCode::Enter,
        ct::KeyCode::Backspace => KeyCode::Backspace,
        ct::KeyCode::Delete => KeyCode::Delete,
        ct::KeyCode::Tab => KeyCode::Tab,
        ct::KeyCode::BackTab => KeyCode::BackTab,
        ct::KeyCode::Esc => KeyCode::Esc,
        ct::KeyCode::Left => KeyCode::Left,
        ct::KeyCode::Right => KeyCode::Right,
        ct::KeyCode::Up => KeyCode::Up,
        ct::KeyCode::Down => KeyCode::Down,
        ct::KeyCode::Home => KeyCode::Home,
        ct::KeyCode::End => KeyCode::End,
        ct::KeyCode::PageUp => KeyCode::PageUp,
        ct::KeyCode::PageDown => KeyCode::PageDown,
        _ => return None,
    })
}

pub fn mouse_event_from_crossterm(m: ct::MouseEvent) -> Option<MouseEvent> {
    let kind = match m.kind {
        ct::MouseEventKind::Moved => MouseEventKind::Moved,
        ct::MouseEventKind::Down(b) => MouseEventKind::Down(b.into()),
        ct::MouseEventKind::Drag(b) => MouseEventKind::Drag(b.into()),
        ct::MouseEventKind::Up(b) => MouseEventKind::Up(b.into()),
        ct::MouseEventKind::ScrollUp => MouseEventKind::ScrollUp,
        ct::MouseEventKind::ScrollDown => MouseEventKind::ScrollDown,
        _ => return None,
    };
    Some(MouseEvent {
        x: m.column,
        y: m.row,
        kind,
        modifiers: m.modifiers.into(),
    })
}

impl From<ct::KeyModifiers> for KeyModifiers {
    fn from(m: ct::KeyModifiers) -> Self {
        KeyModifiers {
            shift: m.contains(ct::KeyModifiers::SHIFT),
            ctrl: m.contains(ct::KeyModifiers::CONTROL),
            alt: m.contains(ct::KeyModifiers::ALT),
        }
    }
}

impl From<ct::MouseButton> for MouseButton {
    fn from(b: ct::MouseButton) -> Self {
        match b {
            ct::MouseButton::Left => MouseButton::Left,
            ct::MouseButton::Right => MouseButton::Right,
            ct::MouseButton::Middle => MouseButton::Middle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mouse(kind: ct::MouseEventKind) -> ct::Event {
        ct::Event::Mouse(ct::MouseEvent {
            kind,
            column: 4,
            row: 7,
            modifiers: ct::KeyModifiers::NONE,
        })
    }

    #[test]
    fn hover_becomes_moved() {
        let mapped = input_event_from_crossterm(mouse(ct::MouseEventKind::Moved));
        assert_eq!(
            mapped,
            Some(InputEvent::Mouse(MouseEvent::new(4, 7, MouseEventKind::Moved)))
        );
    }

    #[test]
    fn horizontal_scroll_is_dropped() {
        assert_eq!(
            input_event_from_crossterm(mouse(ct::MouseEventKind::ScrollLeft)),
            None
        );
    }

    #[test]
    fn key_release_is_dropped_but_repeat_is_kept() {
        let mut key = ct::KeyEvent::new(ct::KeyCode::Right, ct::KeyModifiers::NONE);
        key.kind = ct::KeyEventKind::Release;
        assert_eq!(input_event_from_crossterm(ct::Event::Key(key)), None);
        key.kind = ct::KeyEventKind::Repeat;
        assert_eq!(
            input_event_from_crossterm(ct::Event::Key(key)),
            Some(InputEvent::Key(KeyEvent::new(KeyCode::Right)))
        );
    }

    #[test]
    fn ctrl_c_keeps_its_modifier() {
        let key = ct::KeyEvent::new(ct::KeyCode::Char('c'), ct::KeyModifiers::CONTROL);
        let mapped = key_event_from_crossterm(key);
        assert_eq!(mapped.map(|k| k.modifiers), Some(KeyModifiers::CTRL));
    }

    #[test]
    fn resize_and_focus_loss_pass_through() {
        assert_eq!(
            input_event_from_crossterm(ct::Event::Resize(80, 24)),
            Some(InputEvent::Resize(80, 24))
        );
        assert_eq!(
            input_event_from_crossterm(ct::Event::FocusLost),
            Some(InputEvent::FocusLost)
        );
    }
}
