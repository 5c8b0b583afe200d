use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::input::KeyModifiers;

/// A named set of keys that trigger one action, with the text shown in help lines.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Binding {
    pub keys: Vec<KeyEvent>,
    pub help_key: String,
    pub help_desc: String,
}

impl Binding {
    pub fn new(
        help_key: impl Into<String>,
        help_desc: impl Into<String>,
        keys: Vec<KeyEvent>,
    ) -> Self {
        Self {
            keys,
            help_key: help_key.into(),
            help_desc: help_desc.into(),
        }
    }

    pub fn matches(&self, event: &KeyEvent) -> bool {
        self.keys.iter().any(|k| key_event_matches(k, event))
    }

    /// `"key desc"`, as printed in a status line.
    pub fn hint(&self) -> String {
        format!("{} {}", self.help_key, self.help_desc)
    }
}

pub fn key_event_matches(pattern: &KeyEvent, event: &KeyEvent) -> bool {
    pattern.code == event.code && modifiers_match(pattern.modifiers, event.modifiers)
}

fn modifiers_match(pattern: KeyModifiers, event: KeyModifiers) -> bool {
    // Terminals disagree on reporting SHIFT for upper-case chars; a bare pattern ignores it.
    let shift_ok = pattern.shift == event.shift || pattern.is_empty();
    shift_ok && pattern.ctrl == event.ctrl && pattern.alt == event.alt
}

pub fn key_char(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c))
}

pub fn key_code(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code)
}

pub fn key_ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c)).with_modifiers(KeyModifiers::CTRL)
}

/// Renders bindings as a single `" • "` separated hint line.
pub fn hint_line(bindings: &[Binding]) -> String {
    bindings
        .iter()
        .map(Binding::hint)
        .collect::<Vec<_>>()
        .join(" • ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binding_matches_exact_modifiers() {
        let b = Binding::new("q", "quit", vec![key_char('q')]);
        assert!(b.matches(&key_char('q')));
        assert!(!b.matches(&key_ctrl('q')));
    }

    #[test]
    fn plain_char_pattern_tolerates_shift() {
        let b = Binding::new("G", "last", vec![key_char('G')]);
        let shifted = key_char('G').with_modifiers(KeyModifiers {
            shift: true,
            ctrl: false,
            alt: false,
        });
        assert!(b.matches(&shifted));
    }

    #[test]
    fn hint_line_joins_bindings() {
        let bindings = vec![
            Binding::new("n", "next", vec![key_char('n')]),
            Binding::new("q", "quit", vec![key_char('q')]),
        ];
        assert_eq!(hint_line(&bindings), "n next • q quit");
    }
}
