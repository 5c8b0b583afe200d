//! A button that throws a burst of confetti sparks on every click. Sparks fall under gravity and
//! fade out over their lifetime.

use super::ButtonFace;
use crate::effects;
use crate::effects::buttons;
use rand::Rng;
use rand::rngs::StdRng;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::layout::Size;
use ratatui::style::Style;
use ratatui_fx_core::canvas::FxCanvas;
use ratatui_fx_core::canvas::ramp;
use ratatui_fx_core::color::Rgb;
use ratatui_fx_core::effect::Effect;
use ratatui_fx_core::effect::FrameCtx;
use ratatui_fx_core::input::KeyEvent;
use ratatui_fx_core::math::CELL_ASPECT;
use ratatui_fx_core::math::Vec2;
use ratatui_fx_core::physics::Body;
use ratatui_fx_core::props;
use ratatui_fx_core::props::Props;
use ratatui_fx_core::theme::FxTheme;

const SPARK_GLYPHS: [char; 4] = ['*', '+', '✦', '•'];

#[derive(Clone, Debug)]
pub struct BurstOptions {
    pub face: ButtonFace,
    /// Sparks per click.
    pub count: usize,
    /// Launch speed in cells per second.
    pub speed: f32,
    /// Downward acceleration in rows per second squared.
    pub gravity: f32,
    /// Spark lifetime in seconds.
    pub lifetime: f32,
    pub colors: Vec<Rgb>,
    pub seed: u64,
}

impl Default for BurstOptions {
    fn default() -> Self {
        Self {
            face: ButtonFace::new("Burst"),
            count: 24,
            speed: 18.0,
            gravity: 14.0,
            lifetime: 0.9,
            colors: vec![
                Rgb::new(255, 92, 138),
                Rgb::new(255, 200, 64),
                Rgb::new(56, 214, 255),
                Rgb::new(124, 255, 140),
            ],
            seed: effects::DEFAULT_SEED,
        }
    }
}

impl BurstOptions {
    pub fn from_props(p: &Props) -> Self {
        let d = Self::default();
        Self {
            face: ButtonFace::from_props(p, d.face),
            count: p.count("count", d.count),
            speed: p.positive_f32("speed", d.speed),
            gravity: p.non_negative_f32("gravity", d.gravity),
            lifetime: p.positive_f32("lifetime", d.lifetime),
            colors: d.colors,
            seed: p.seed(d.seed),
        }
    }

    pub fn normalized(self) -> Self {
        let d = Self::default();
        Self {
            count: props::count_or(self.count, d.count),
            speed: props::positive_or(self.speed, d.speed),
            gravity: props::non_negative_or(self.gravity, d.gravity),
            lifetime: props::positive_or(self.lifetime, d.lifetime),
            colors: if self.colors.is_empty() {
                d.colors
            } else {
                self.colors
            },
            ..self
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Spark {
    body: Body,
    glyph: char,
    color: Rgb,
}

pub struct BurstButton {
    options: BurstOptions,
    rect: Rect,
    sparks: Vec<Spark>,
    canvas: FxCanvas,
    rng: StdRng,
    /// Frames of pressed look left after a click.
    flash: u8,
}

impl BurstButton {
    pub fn new(options: BurstOptions) -> Self {
        let options = options.normalized();
        let rng = effects::seeded(options.seed);
        Self {
            options,
            rect: Rect::default(),
            sparks: Vec::new(),
            canvas: FxCanvas::default(),
            rng,
            flash: 0,
        }
    }

    pub fn from_props(props: &Props) -> Self {
        Self::new(BurstOptions::from_props(props))
    }

    pub fn spark_count(&self) -> usize {
        self.sparks.len()
    }

    fn burst(&mut self, origin: Vec2) {
        self.flash = 6;
        for _ in 0..self.options.count {
            let angle = self.rng.random_range(0.0..std::f32::consts::TAU);
            let speed = self.options.speed * self.rng.random_range(0.4..1.0f32);
            let dir = Vec2::from_angle(angle);
            let vel = Vec2::new(dir.x, dir.y / CELL_ASPECT - 0.4) * speed;
            let glyph = SPARK_GLYPHS[self.rng.random_range(0..SPARK_GLYPHS.len())];
            let color = self.options.colors[self.rng.random_range(0..self.options.colors.len())];
            self.sparks.push(Spark {
                body: Body {
                    pos: origin,
                    vel,
                    home: origin,
                    size: 1.0,
                    age: 0.0,
                    lifetime: self.options.lifetime * self.rng.random_range(0.7..1.3f32),
                },
                glyph,
                color,
            });
        }
    }

    fn paint(&mut self) {
        self.canvas.clear();
        for s in &self.sparks {
            let alpha = s.body.life_fraction();
            self.canvas
                .plot_glyph(s.body.pos.x, s.body.pos.y, s.glyph, alpha, s.color);
        }
    }
}

impl Effect for BurstButton {
    fn rebuild(&mut self, size: Size) {
        self.rect = self.options.face.rect(size);
        self.canvas.resize(size.width, size.height);
        self.sparks.clear();
        self.flash = 0;
        self.paint();
    }

    fn update(&mut self, ctx: &FrameCtx<'_>) {
        let g = self.options.gravity;
        for s in &mut self.sparks {
            let b = &mut s.body;
            b.vel.y += g * ctx.dt;
            b.vel *= 0.985;
            b.pos += b.vel * ctx.dt;
            b.age += ctx.dt;
        }
        self.sparks
            .retain(|s| !s.body.is_expired() && s.body.pos.is_finite());
        self.flash = self.flash.saturating_sub(1);
        self.paint();
    }

    fn settle(&mut self) {
        self.sparks.clear();
        self.flash = 0;
        self.paint();
    }

    fn render(&self, area: Rect, buf: &mut Buffer, theme: &FxTheme) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let rect = effects::offset(area, self.rect);
        let border = if self.flash > 0 {
            theme.highlight
        } else {
            theme.accent
        };
        self.options
            .face
            .render(rect, buf, Style::default().fg(border.to_color()), theme);
        self.canvas.flush(area, buf, ramp::SPARKS, theme.base_style());
    }

    fn press(&mut self, at: Vec2) {
        if buttons::contains(self.rect, at) {
            self.burst(at);
        }
    }

    fn key(&mut self, key: &KeyEvent) -> bool {
        if buttons::is_activation(key) {
            self.burst(buttons::center(self.rect));
            return true;
        }
        false
    }

    fn teardown(&mut self) {
        self.sparks.clear();
    }

    fn is_idle(&self) -> bool {
        self.sparks.is_empty() && self.flash == 0
    }
}
