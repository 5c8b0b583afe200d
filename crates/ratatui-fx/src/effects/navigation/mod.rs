//! Navigation widgets whose highlight follows the pointer. Both also work from the keyboard:
//! Left/Right move the focus and Enter selects.

pub mod dock_magnify;
pub mod tab_indicator;

pub use dock_magnify::DockMagnify;
pub use tab_indicator::TabIndicator;

use ratatui_fx_core::input::KeyCode;
use ratatui_fx_core::input::KeyEvent;

/// Focus index after `key`, or `None` if the key does not move focus.
pub(crate) fn step_focus(key: &KeyEvent, focus: usize, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    match key.code {
        KeyCode::Left | KeyCode::BackTab | KeyCode::Char('h') => Some((focus + len - 1) % len),
        KeyCode::Right | KeyCode::Tab | KeyCode::Char('l') => Some((focus + 1) % len),
        KeyCode::Home => Some(0),
        KeyCode::End => Some(len - 1),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui_fx_core::keymap;

    #[test]
    fn focus_wraps_both_ways() {
        let left = keymap::key_code(KeyCode::Left);
        let right = keymap::key_code(KeyCode::Right);
        assert_eq!(step_focus(&left, 0, 3), Some(2));
        assert_eq!(step_focus(&right, 2, 3), Some(0));
        assert_eq!(step_focus(&keymap::key_code(KeyCode::End), 0, 3), Some(2));
        assert_eq!(step_focus(&keymap::key_char('x'), 0, 3), None);
        assert_eq!(step_focus(&right, 0, 0), None);
    }
}
