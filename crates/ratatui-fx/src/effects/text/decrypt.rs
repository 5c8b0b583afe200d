//! Decrypt text: the line starts as noise and characters lock on a timed schedule, in random
//! order by default.

use crate::effects::text;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::layout::Size;
use ratatui_fx_core::color::Rgb;
use ratatui_fx_core::effect::Effect;
use ratatui_fx_core::effect::FrameCtx;
use ratatui_fx_core::input::KeyEvent;
use ratatui_fx_core::math::Vec2;
use ratatui_fx_core::props::Props;
use ratatui_fx_core::render;
use ratatui_fx_core::render::Glyph;
use ratatui_fx_core::reveal::RevealMachine;
use ratatui_fx_core::reveal::RevealOptions;
use ratatui_fx_core::reveal::RevealOrder;
use ratatui_fx_core::theme::FxTheme;

#[derive(Clone, Debug)]
pub struct DecryptOptions {
    pub text: String,
    pub reveal: RevealOptions,
    /// Color of characters still encrypted.
    pub cipher_color: Rgb,
    pub color: Option<Rgb>,
}

impl Default for DecryptOptions {
    fn default() -> Self {
        Self {
            text: "ACCESS GRANTED".to_string(),
            reveal: RevealOptions {
                stagger: 0.06,
                base_duration: 0.3,
                order: RevealOrder::Random,
                charset: "0123456789ABCDEF#$%&@".to_string(),
                ..RevealOptions::default()
            },
            cipher_color: Rgb::new(64, 200, 120),
            color: None,
        }
    }
}

impl DecryptOptions {
    pub fn from_props(p: &Props) -> Self {
        let d = Self::default();
        Self {
            text: p.text("text", &d.text),
            reveal: text::reveal_options(p, d.reveal),
            cipher_color: p.color("cipherColor", d.cipher_color),
            color: p.get("color").map(|_| p.color("color", Rgb::WHITE)),
        }
    }

    pub fn normalized(self) -> Self {
        Self {
            text: text::single_line(&self.text),
            reveal: self.reveal.normalized(),
            ..self
        }
    }
}

pub struct DecryptText {
    options: DecryptOptions,
    machine: RevealMachine,
    origin: (u16, u16),
}

impl DecryptText {
    pub fn new(options: DecryptOptions) -> Self {
        let options = options.normalized();
        let mut machine = RevealMachine::new(options.reveal.clone());
        machine.trigger(&options.text);
        Self {
            options,
            machine,
            origin: (0, 0),
        }
    }

    pub fn from_props(props: &Props) -> Self {
        Self::new(DecryptOptions::from_props(props))
    }

    pub fn machine(&self) -> &RevealMachine {
        &self.machine
    }

    pub fn replay(&mut self) {
        self.machine.trigger(&self.options.text);
    }
}

impl Effect for DecryptText {
    fn rebuild(&mut self, size: Size) {
        self.origin = text::origin(size, &self.options.text);
        self.replay();
    }

    fn update(&mut self, ctx: &FrameCtx<'_>) {
        self.machine.advance(ctx.dt);
    }

    fn settle(&mut self) {
        self.machine.settle();
    }

    fn render(&self, area: Rect, buf: &mut Buffer, theme: &FxTheme) {
        let color = self.options.color.unwrap_or(theme.foreground);
        // encrypted glyphs are always legible; only locking changes their color
        let glyphs: Vec<Glyph> = self
            .machine
            .cells()
            .iter()
            .map(|c| Glyph {
                ch: c.glyph,
                offset: c.offset,
                opacity: if c.settled { 1.0 } else { 0.35 + 0.65 * c.opacity },
                color: if c.settled {
                    color
                } else {
                    self.options.cipher_color
                },
                bold: c.settled,
            })
            .collect();
        let origin = (area.x + self.origin.0, area.y + self.origin.1);
        render::render_glyphs(area, buf, origin, &glyphs, theme.background);
    }

    fn press(&mut self, _at: Vec2) {
        self.replay();
    }

    fn key(&mut self, key: &KeyEvent) -> bool {
        if text::is_replay(key) {
            self.replay();
            return true;
        }
        false
    }

    fn teardown(&mut self) {
        self.machine.cancel();
    }

    fn is_idle(&self) -> bool {
        self.machine.is_settled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui_fx_core::physics::PointerState;
    use ratatui_fx_core::reveal::RevealPhase;

    fn run(fx: &mut DecryptText, seconds: f32) {
        let pointer = PointerState::default();
        for _ in 0..(seconds * 60.0).round() as usize {
            fx.update(&FrameCtx {
                dt: 1.0 / 60.0,
                time: 0.0,
                pointer: &pointer,
                size: Size::new(30, 3),
            });
        }
    }

    #[test]
    fn decrypts_within_deadline() {
        let mut fx = DecryptText::from_props(&Props::new().with("text", "top secret"));
        fx.rebuild(Size::new(30, 3));
        let deadline = fx.machine().deadline();
        run(&mut fx, deadline + 0.1);
        assert_eq!(fx.machine().phase(), RevealPhase::Settled);
        assert_eq!(fx.machine().displayed(), "top secret");
        assert!(fx.is_idle());
    }

    #[test]
    fn replay_mid_reveal_finishes_with_current_text() {
        let mut fx = DecryptText::from_props(&Props::new().with("text", "abcdef"));
        fx.rebuild(Size::new(30, 3));
        run(&mut fx, 0.4);
        fx.key(&ratatui_fx_core::keymap::key_char('r'));
        assert!(!fx.is_idle());
        run(&mut fx, 2.0);
        assert_eq!(fx.machine().displayed(), "abcdef");
        assert_eq!(fx.machine().pending_timers(), 0);
    }

    #[test]
    fn encrypted_glyphs_are_drawn_before_any_lock() {
        let mut fx = DecryptText::from_props(&Props::new().with("text", "xyz"));
        let area = Rect::new(0, 0, 9, 1);
        fx.rebuild(Size::new(9, 1));
        let mut buf = Buffer::empty(area);
        fx.render(area, &mut buf, &FxTheme::default());
        let row = render::row_text(&buf, area, 0);
        assert_eq!(row.trim().chars().count(), 3);
    }
}
