//! Shatter text: the line starts blown apart, pieces fly back into place, and the finished line
//! flashes once.

use crate::effects::text;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::layout::Size;
use ratatui_fx_core::color::Rgb;
use ratatui_fx_core::effect::Effect;
use ratatui_fx_core::effect::FrameCtx;
use ratatui_fx_core::input::KeyEvent;
use ratatui_fx_core::math;
use ratatui_fx_core::math::Vec2;
use ratatui_fx_core::props;
use ratatui_fx_core::props::Props;
use ratatui_fx_core::render;
use ratatui_fx_core::render::Glyph;
use ratatui_fx_core::reveal::RevealMachine;
use ratatui_fx_core::reveal::RevealOptions;
use ratatui_fx_core::reveal::RevealOrder;
use ratatui_fx_core::theme::FxTheme;
use ratatui_fx_core::timer::Timers;

#[derive(Clone, Debug)]
pub struct ShatterOptions {
    pub text: String,
    pub reveal: RevealOptions,
    /// Seconds the pieces stay scattered before reassembling.
    pub hold: f32,
    /// Seconds the flash takes to fade.
    pub flash: f32,
    /// Show random glyphs on pieces in flight instead of the real characters.
    pub scramble: bool,
    pub flash_color: Option<Rgb>,
}

impl Default for ShatterOptions {
    fn default() -> Self {
        Self {
            text: "SHATTER".to_string(),
            reveal: RevealOptions {
                stagger: 0.04,
                base_duration: 0.6,
                scatter: 8.0,
                order: RevealOrder::CenterOut,
                ..RevealOptions::default()
            },
            hold: 0.4,
            flash: 0.5,
            scramble: false,
            flash_color: None,
        }
    }
}

impl ShatterOptions {
    pub fn from_props(p: &Props) -> Self {
        let d = Self::default();
        Self {
            text: p.text("text", &d.text),
            reveal: text::reveal_options(p, d.reveal),
            hold: p.non_negative_f32("hold", d.hold),
            flash: p.positive_f32("flash", d.flash),
            scramble: p.flag("scramble", d.scramble),
            flash_color: p.get("flashColor").map(|_| p.color("flashColor", Rgb::WHITE)),
        }
    }

    pub fn normalized(self) -> Self {
        let d = Self::default();
        Self {
            text: text::single_line(&self.text),
            reveal: self.reveal.normalized(),
            hold: props::non_negative_or(self.hold, d.hold),
            flash: props::positive_or(self.flash, d.flash),
            ..self
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShatterPhase {
    Shattered,
    Reassembling,
    Flashed,
    Rest,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Reassemble {
    generation: u64,
}

pub struct ShatterText {
    options: ShatterOptions,
    machine: RevealMachine,
    phase: ShatterPhase,
    timers: Timers<Reassemble>,
    /// Remaining flash strength in [0, 1].
    flash: f32,
    origin: (u16, u16),
}

impl ShatterText {
    pub fn new(options: ShatterOptions) -> Self {
        let options = options.normalized();
        let machine = RevealMachine::new(options.reveal.clone());
        let mut fx = Self {
            options,
            machine,
            phase: ShatterPhase::Shattered,
            timers: Timers::new(),
            flash: 0.0,
            origin: (0, 0),
        };
        fx.shatter();
        fx
    }

    pub fn from_props(props: &Props) -> Self {
        Self::new(ShatterOptions::from_props(props))
    }

    pub fn phase(&self) -> ShatterPhase {
        self.phase
    }

    pub fn flash(&self) -> f32 {
        self.flash
    }

    pub fn machine(&self) -> &RevealMachine {
        &self.machine
    }

    /// Blows the line apart and schedules reassembly.
    pub fn shatter(&mut self) {
        self.timers.reset();
        self.machine.trigger(&self.options.text);
        self.phase = ShatterPhase::Shattered;
        self.flash = 0.0;
        self.timers.schedule(
            self.options.hold,
            Reassemble {
                generation: self.machine.generation(),
            },
        );
    }

    fn glyphs(&self, base: Rgb, flash_color: Rgb) -> Vec<Glyph> {
        let shattered = self.phase == ShatterPhase::Shattered;
        self.machine
            .cells()
            .iter()
            .map(|c| {
                let ch = if c.settled || self.options.scramble {
                    c.glyph
                } else {
                    c.target
                };
                let opacity = if shattered && !c.settled {
                    0.45
                } else {
                    c.opacity.max(0.2)
                };
                Glyph {
                    ch,
                    offset: c.offset,
                    opacity,
                    color: base.lerp(flash_color, self.flash),
                    bold: self.flash > 0.0,
                }
            })
            .collect()
    }
}

impl Effect for ShatterText {
    fn rebuild(&mut self, size: Size) {
        self.origin = text::origin(size, &self.options.text);
        self.shatter();
    }

    fn update(&mut self, ctx: &FrameCtx<'_>) {
        match self.phase {
            ShatterPhase::Shattered => {
                for event in self.timers.advance(ctx.dt) {
                    if event.generation == self.machine.generation() {
                        self.phase = ShatterPhase::Reassembling;
                    }
                }
            }
            ShatterPhase::Reassembling => {
                self.machine.advance(ctx.dt);
                if self.machine.is_settled() {
                    self.phase = ShatterPhase::Flashed;
                    self.flash = 1.0;
                }
            }
            ShatterPhase::Flashed => {
                self.flash = math::clamp01(self.flash - ctx.dt / self.options.flash);
                if self.flash == 0.0 {
                    self.phase = ShatterPhase::Rest;
                }
            }
            ShatterPhase::Rest => {}
        }
    }

    fn settle(&mut self) {
        self.timers.cancel_all();
        self.machine.settle();
        self.phase = ShatterPhase::Rest;
        self.flash = 0.0;
    }

    fn render(&self, area: Rect, buf: &mut Buffer, theme: &FxTheme) {
        let flash_color = self.options.flash_color.unwrap_or(theme.highlight);
        let glyphs = self.glyphs(theme.foreground, flash_color);
        let origin = (area.x + self.origin.0, area.y + self.origin.1);
        render::render_glyphs(area, buf, origin, &glyphs, theme.background);
    }

    fn press(&mut self, _at: Vec2) {
        self.shatter();
    }

    fn key(&mut self, key: &KeyEvent) -> bool {
        if text::is_replay(key) {
            self.shatter();
            return true;
        }
        false
    }

    fn teardown(&mut self) {
        self.timers.cancel_all();
        self.machine.cancel();
    }

    fn is_idle(&self) -> bool {
        self.phase == ShatterPhase::Rest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui_fx_core::physics::PointerState;

    fn step(fx: &mut ShatterText, dt: f32) {
        fx.update(&FrameCtx {
            dt,
            time: 0.0,
            pointer: &PointerState::default(),
            size: Size::new(30, 5),
        });
    }

    #[test]
    fn walks_through_every_phase() {
        let mut fx = ShatterText::from_props(&Props::new().with("text", "boom"));
        fx.rebuild(Size::new(30, 5));
        assert_eq!(fx.phase(), ShatterPhase::Shattered);
        assert!(fx.machine().cells().iter().any(|c| c.offset != Vec2::ZERO));

        step(&mut fx, 0.5);
        assert_eq!(fx.phase(), ShatterPhase::Reassembling);

        let mut seen_flash = false;
        for _ in 0..120 {
            step(&mut fx, 1.0 / 60.0);
            seen_flash |= fx.phase() == ShatterPhase::Flashed;
        }
        assert!(seen_flash);
        assert_eq!(fx.phase(), ShatterPhase::Rest);
        assert_eq!(fx.machine().displayed(), "boom");
        assert!(fx.machine().cells().iter().all(|c| c.offset == Vec2::ZERO));
    }

    #[test]
    fn reshatter_discards_the_pending_reassembly() {
        let mut fx = ShatterText::from_props(&Props::new().with("hold", 0.4));
        step(&mut fx, 0.3);
        fx.shatter();
        step(&mut fx, 0.3);
        assert_eq!(fx.phase(), ShatterPhase::Shattered);
        step(&mut fx, 0.2);
        assert_eq!(fx.phase(), ShatterPhase::Reassembling);
    }

    #[test]
    fn settle_renders_the_line_in_place() {
        let mut fx = ShatterText::from_props(&Props::new().with("text", "ok"));
        let area = Rect::new(0, 0, 6, 1);
        fx.rebuild(Size::new(6, 1));
        fx.settle();
        let mut buf = Buffer::empty(area);
        fx.render(area, &mut buf, &FxTheme::default());
        assert_eq!(render::row_text(&buf, area, 0), "  ok  ");
        assert!(fx.is_idle());
    }
}
