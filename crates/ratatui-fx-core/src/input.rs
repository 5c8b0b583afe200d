//! Backend-agnostic input events.
//!
//! Effects never see backend types. Apps convert their terminal events into [`InputEvent`] (see
//! `crossterm_input` behind the `crossterm` feature) and hand them to an
//! [`EffectHost`](crate::host::EffectHost), which filters pointer events to its own area.

use crate::math::Vec2;
use ratatui::layout::Rect;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct KeyModifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl KeyModifiers {
    pub const NONE: KeyModifiers = KeyModifiers {
        shift: false,
        ctrl: false,
        alt: false,
    };

    pub const CTRL: KeyModifiers = KeyModifiers {
        shift: false,
        ctrl: true,
        alt: false,
    };

    pub fn none() -> Self {
        Self::NONE
    }

    pub fn is_empty(self) -> bool {
        self == Self::NONE
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Backspace,
    Delete,
    Tab,
    BackTab,
    Esc,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyEvent {
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    pub fn with_modifiers(self, modifiers: KeyModifiers) -> Self {
        Self { modifiers, ..self }
    }

    /// The character typed, if this is a printable key without ctrl or alt.
    pub fn plain_char(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(c) if !self.modifiers.ctrl && !self.modifiers.alt => Some(c),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseEventKind {
    /// Pointer moved with no button held.
    Moved,
    Down(MouseButton),
    Drag(MouseButton),
    Up(MouseButton),
    ScrollUp,
    ScrollDown,
}

/// A mouse event in absolute terminal cell coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MouseEvent {
    pub x: u16,
    pub y: u16,
    pub kind: MouseEventKind,
    pub modifiers: KeyModifiers,
}

impl MouseEvent {
    pub fn new(x: u16, y: u16, kind: MouseEventKind) -> Self {
        Self {
            x,
            y,
            kind,
            modifiers: KeyModifiers::NONE,
        }
    }

    /// Primary button went down.
    pub fn is_press(&self) -> bool {
        self.kind == MouseEventKind::Down(MouseButton::Left)
    }

    /// Primary button came up.
    pub fn is_release(&self) -> bool {
        self.kind == MouseEventKind::Up(MouseButton::Left)
    }

    /// Pointer sample relative to `area`, at the center of the hovered cell, or `None` when the
    /// event lies outside `area`.
    pub fn local_to(&self, area: Rect) -> Option<Vec2> {
        let inside = self.x >= area.x
            && self.y >= area.y
            && self.x < area.x.saturating_add(area.width)
            && self.y < area.y.saturating_add(area.height);
        inside.then(|| {
            Vec2::new(
                (self.x - area.x) as f32 + 0.5,
                (self.y - area.y) as f32 + 0.5,
            )
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    /// The terminal was resized to `(columns, rows)`.
    Resize(u16, u16),
    /// The terminal lost focus; treated like the pointer leaving every host.
    FocusLost,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_sample_is_cell_centered() {
        let area = Rect::new(4, 2, 3, 2);
        let at = |x, y| MouseEvent::new(x, y, MouseEventKind::Moved).local_to(area);
        assert_eq!(at(4, 2), Some(Vec2::new(0.5, 0.5)));
        assert_eq!(at(6, 3), Some(Vec2::new(2.5, 1.5)));
        assert_eq!(at(7, 3), None);
        assert_eq!(at(3, 2), None);
    }

    #[test]
    fn empty_area_contains_nothing() {
        let ev = MouseEvent::new(0, 0, MouseEventKind::Moved);
        assert_eq!(ev.local_to(Rect::default()), None);
    }

    #[test]
    fn plain_char_ignores_chorded_keys() {
        let k = KeyEvent::new(KeyCode::Char('r'));
        assert_eq!(k.plain_char(), Some('r'));
        assert_eq!(k.with_modifiers(KeyModifiers::CTRL).plain_char(), None);
    }
}
