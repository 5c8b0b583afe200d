//! Character-level text effects. Most are thin shells around
//! [`RevealMachine`](ratatui_fx_core::reveal::RevealMachine); the rest animate per-character
//! bodies directly.
//!
//! Text is laid out on one centered line. Enter, `r` or a click replays the effect.

pub mod connect;
pub mod decrypt;
pub mod gradient;
pub mod pressure_wave;
pub mod scramble;
pub mod shatter;
pub mod typewriter;

pub use connect::ConnectText;
pub use decrypt::DecryptText;
pub use gradient::GradientText;
pub use pressure_wave::PressureWave;
pub use scramble::ScrambleText;
pub use shatter::ShatterText;
pub use typewriter::Typewriter;

use ratatui::layout::Size;
use ratatui_fx_core::color::Rgb;
use ratatui_fx_core::input::KeyCode;
use ratatui_fx_core::input::KeyEvent;
use ratatui_fx_core::math::Vec2;
use ratatui_fx_core::props::Props;
use ratatui_fx_core::render;
use ratatui_fx_core::render::Glyph;
use ratatui_fx_core::reveal::CharCell;
use ratatui_fx_core::reveal::RevealOptions;
use ratatui_fx_core::reveal::RevealOrder;
use unicode_width::UnicodeWidthChar;

/// Replaces line breaks and other control characters with spaces.
pub(crate) fn single_line(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

/// Local top-left cell of `text` centered in an area of `size`.
pub(crate) fn origin(size: Size, text: &str) -> (u16, u16) {
    let w = render::text_width(text);
    (size.width.saturating_sub(w) / 2, size.height / 2)
}

/// Local slot position (cell top-left) of every character of `text` laid out from `origin`.
pub(crate) fn slots(text: &str, origin: (u16, u16)) -> Vec<Vec2> {
    let mut x = origin.0 as f32;
    text.chars()
        .map(|c| {
            let slot = Vec2::new(x, origin.1 as f32);
            x += UnicodeWidthChar::width(c).unwrap_or(0).max(1) as f32;
            slot
        })
        .collect()
}

pub(crate) fn is_replay(key: &KeyEvent) -> bool {
    key.code == KeyCode::Enter || key.plain_char() == Some('r')
}

/// Glyphs for the current reveal state: locked characters in `settled`, the rest in `active`.
pub(crate) fn reveal_glyphs(cells: &[CharCell], settled: Rgb, active: Rgb) -> Vec<Glyph> {
    cells
        .iter()
        .map(|c| Glyph {
            ch: c.glyph,
            offset: c.offset,
            opacity: c.opacity,
            color: if c.settled { settled } else { active },
            bold: c.settled,
        })
        .collect()
}

pub(crate) fn parse_order(value: &str) -> Option<RevealOrder> {
    match value.to_ascii_lowercase().as_str() {
        "forward" | "ltr" => Some(RevealOrder::Forward),
        "reverse" | "rtl" => Some(RevealOrder::Reverse),
        "random" => Some(RevealOrder::Random),
        "center" | "center-out" => Some(RevealOrder::CenterOut),
        _ => None,
    }
}

/// Reads the shared reveal tunables (`stagger`, `baseDuration`, `scrambleCycles`,
/// `cycleSeconds`, `scatter`, `order`, `charset`, `seed`) on top of `d`.
pub(crate) fn reveal_options(p: &Props, d: RevealOptions) -> RevealOptions {
    let order = match p.get("order") {
        None => d.order,
        Some(v) => match v.as_str().and_then(parse_order) {
            Some(order) => order,
            None => {
                tracing::debug!(value = %v, "unknown reveal order, using default");
                d.order
            }
        },
    };
    RevealOptions {
        stagger: p.non_negative_f32("stagger", d.stagger),
        base_duration: p.non_negative_f32("baseDuration", d.base_duration),
        scramble_cycles: p
            .count("scrambleCycles", d.scramble_cycles as usize)
            .min(u32::MAX as usize) as u32,
        cycle_seconds: p.positive_f32("cycleSeconds", d.cycle_seconds),
        scatter: p.non_negative_f32("scatter", d.scatter),
        order,
        charset: p.text("charset", &d.charset),
        seed: p.seed(d.seed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_account_for_wide_chars() {
        let s = slots("a漢b", (2, 1));
        assert_eq!(s, vec![
            Vec2::new(2.0, 1.0),
            Vec2::new(3.0, 1.0),
            Vec2::new(5.0, 1.0),
        ]);
    }

    #[test]
    fn origin_centers_and_clamps() {
        assert_eq!(origin(Size::new(10, 5), "abcd"), (3, 2));
        assert_eq!(origin(Size::new(2, 1), "abcd"), (0, 0));
    }

    #[test]
    fn reveal_props_are_parsed() {
        let p = Props::from_json(r#"{"order": "random", "scrambleCycles": 6, "stagger": -1}"#)
            .unwrap();
        let o = reveal_options(&p, RevealOptions::default());
        assert_eq!(o.order, RevealOrder::Random);
        assert_eq!(o.scramble_cycles, 6);
        assert_eq!(o.stagger, RevealOptions::default().stagger);

        let bad = Props::new().with("order", "sideways");
        assert_eq!(reveal_options(&bad, RevealOptions::default()).order, RevealOrder::Forward);
    }

    #[test]
    fn control_chars_become_spaces() {
        assert_eq!(single_line("a\nb\tc"), "a b c");
    }
}
