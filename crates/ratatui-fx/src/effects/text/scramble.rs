//! Scramble text: every character cycles through random glyphs for a fixed number of ticks, then
//! locks to its real value. Hovering the text scrambles it again once it has settled.

use crate::effects::text;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::layout::Size;
use ratatui_fx_core::color::Rgb;
use ratatui_fx_core::effect::Effect;
use ratatui_fx_core::effect::FrameCtx;
use ratatui_fx_core::input::KeyEvent;
use ratatui_fx_core::math::Vec2;
use ratatui_fx_core::props;
use ratatui_fx_core::props::Props;
use ratatui_fx_core::render;
use ratatui_fx_core::reveal::RevealMachine;
use ratatui_fx_core::reveal::RevealOptions;
use ratatui_fx_core::reveal::RevealPhase;
use ratatui_fx_core::theme::FxTheme;

#[derive(Clone, Debug)]
pub struct ScrambleOptions {
    pub text: String,
    /// Seconds between scramble ticks.
    pub tick_seconds: f32,
    pub reveal: RevealOptions,
    /// Scramble again when the pointer enters the text.
    pub scramble_on_hover: bool,
    pub color: Option<Rgb>,
    pub scramble_color: Option<Rgb>,
}

impl Default for ScrambleOptions {
    fn default() -> Self {
        Self {
            text: "Scramble me".to_string(),
            tick_seconds: 0.05,
            reveal: RevealOptions::default(),
            scramble_on_hover: true,
            color: None,
            scramble_color: None,
        }
    }
}

impl ScrambleOptions {
    pub fn from_props(p: &Props) -> Self {
        let d = Self::default();
        Self {
            text: p.text("text", &d.text),
            tick_seconds: p.positive_f32("tickSeconds", d.tick_seconds),
            reveal: text::reveal_options(p, d.reveal),
            scramble_on_hover: p.flag("scrambleOnHover", d.scramble_on_hover),
            color: p.get("color").map(|_| p.color("color", Rgb::WHITE)),
            scramble_color: p
                .get("scrambleColor")
                .map(|_| p.color("scrambleColor", Rgb::WHITE)),
        }
    }

    pub fn normalized(self) -> Self {
        let d = Self::default();
        Self {
            text: text::single_line(&self.text),
            tick_seconds: props::positive_or(self.tick_seconds, d.tick_seconds),
            reveal: self.reveal.normalized(),
            ..self
        }
    }
}

pub struct ScrambleText {
    options: ScrambleOptions,
    machine: RevealMachine,
    origin: (u16, u16),
    tick_acc: f32,
    hovering: bool,
}

impl ScrambleText {
    pub fn new(options: ScrambleOptions) -> Self {
        let options = options.normalized();
        let mut machine = RevealMachine::new(options.reveal.clone());
        machine.trigger(&options.text);
        Self {
            options,
            machine,
            origin: (0, 0),
            tick_acc: 0.0,
            hovering: false,
        }
    }

    pub fn from_props(props: &Props) -> Self {
        Self::new(ScrambleOptions::from_props(props))
    }

    pub fn machine(&self) -> &RevealMachine {
        &self.machine
    }

    pub fn replay(&mut self) {
        self.tick_acc = 0.0;
        self.machine.trigger(&self.options.text);
    }

    /// Replaces the text and scrambles it in.
    pub fn set_text(&mut self, text: &str) {
        self.options.text = text::single_line(text);
        self.replay();
    }

    fn over_text(&self, p: Vec2) -> bool {
        let w = render::text_width(&self.options.text) as f32;
        let (x, y) = (self.origin.0 as f32, self.origin.1 as f32);
        p.x >= x && p.x < x + w && p.y >= y && p.y < y + 1.0
    }
}

impl Effect for ScrambleText {
    fn rebuild(&mut self, size: Size) {
        self.origin = text::origin(size, &self.options.text);
        self.hovering = false;
        self.replay();
    }

    fn update(&mut self, ctx: &FrameCtx<'_>) {
        let hovering = ctx.pointer.position.is_some_and(|p| self.over_text(p));
        if hovering && !self.hovering && self.options.scramble_on_hover && self.machine.is_settled()
        {
            self.replay();
        }
        self.hovering = hovering;

        if self.machine.is_settled() {
            return;
        }
        self.tick_acc += ctx.dt;
        while self.tick_acc >= self.options.tick_seconds && !self.machine.is_settled() {
            self.tick_acc -= self.options.tick_seconds;
            self.machine.tick();
        }
    }

    fn settle(&mut self) {
        self.machine.settle();
    }

    fn render(&self, area: Rect, buf: &mut Buffer, theme: &FxTheme) {
        let color = self.options.color.unwrap_or(theme.foreground);
        let active = self.options.scramble_color.unwrap_or(theme.accent);
        let glyphs = text::reveal_glyphs(self.machine.cells(), color, active);
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
        self.machine.phase() == RevealPhase::Settled
    }
}
