//! Falling streams of glyphs. Streams under the pointer glow brighter and fall slower.

use crate::effects;
use rand::Rng;
use rand::rngs::StdRng;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::layout::Size;
use ratatui_fx_core::canvas::FxCanvas;
use ratatui_fx_core::canvas::ramp;
use ratatui_fx_core::color::Rgb;
use ratatui_fx_core::effect::Effect;
use ratatui_fx_core::effect::FrameCtx;
use ratatui_fx_core::math;
use ratatui_fx_core::physics;
use ratatui_fx_core::props;
use ratatui_fx_core::props::Props;
use ratatui_fx_core::theme::FxTheme;

const GLYPHS: &str = "ｱｲｳｴｵｶｷｸｹｺｻｼｽｾｿﾀﾁﾂﾃﾄﾅﾆﾇﾈﾉ0123456789";

#[derive(Clone, Debug)]
pub struct MatrixRainOptions {
    /// Average fall speed in rows per second.
    pub speed: f32,
    /// Trail length in rows.
    pub trail: f32,
    /// Fraction of columns carrying a stream.
    pub density: f32,
    pub radius: f32,
    pub charset: String,
    pub color: Rgb,
    pub head_color: Rgb,
    pub seed: u64,
}

impl Default for MatrixRainOptions {
    fn default() -> Self {
        Self {
            speed: 12.0,
            trail: 10.0,
            density: 0.7,
            radius: 8.0,
            charset: GLYPHS.to_string(),
            color: Rgb::new(40, 220, 90),
            head_color: Rgb::new(220, 255, 225),
            seed: effects::DEFAULT_SEED,
        }
    }
}

impl MatrixRainOptions {
    pub fn from_props(p: &Props) -> Self {
        let d = Self::default();
        Self {
            speed: p.positive_f32("speed", d.speed),
            trail: p.positive_f32("trail", d.trail),
            density: p.unit_f32("density", d.density),
            radius: p.positive_f32("radius", d.radius),
            charset: p.text("charset", &d.charset),
            color: p.color("color", d.color),
            head_color: p.color("headColor", d.head_color),
            seed: p.seed(d.seed),
        }
    }

    pub fn normalized(self) -> Self {
        let d = Self::default();
        let charset = if self.charset.trim().is_empty() {
            d.charset.clone()
        } else {
            self.charset
        };
        Self {
            speed: props::positive_or(self.speed, d.speed),
            trail: props::positive_or(self.trail, d.trail),
            density: props::unit_or(self.density, d.density),
            radius: props::positive_or(self.radius, d.radius),
            charset,
            ..self
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Stream {
    head: f32,
    speed: f32,
    salt: u32,
}

pub struct MatrixRain {
    options: MatrixRainOptions,
    glyphs: Vec<char>,
    columns: Vec<Option<Stream>>,
    height: u16,
    canvas: FxCanvas,
    rng: StdRng,
    frame: u32,
}

impl MatrixRain {
    pub fn new(options: MatrixRainOptions) -> Self {
        let options = options.normalized();
        let rng = effects::seeded(options.seed);
        let glyphs = options.charset.chars().filter(|c| !c.is_whitespace()).collect();
        Self {
            options,
            glyphs,
            columns: Vec::new(),
            height: 0,
            canvas: FxCanvas::default(),
            rng,
            frame: 0,
        }
    }

    pub fn from_props(props: &Props) -> Self {
        Self::new(MatrixRainOptions::from_props(props))
    }

    pub fn stream_count(&self) -> usize {
        self.columns.iter().flatten().count()
    }

    fn spawn(&mut self, anywhere: bool) -> Option<Stream> {
        if !self.rng.random_bool(self.options.density as f64) {
            return None;
        }
        let h = self.height as f32;
        let head = if anywhere {
            self.rng.random_range(-h..=h)
        } else {
            -self.rng.random_range(0.0..=h / 2.0)
        };
        Some(Stream {
            head,
            speed: self.options.speed * self.rng.random_range(0.5..1.5f32),
            salt: self.rng.random(),
        })
    }

    fn glyph(&self, salt: u32, row: i32) -> char {
        // glyphs re-roll every few frames so the trail shimmers
        let roll = math::hash01(salt ^ (row as u32).wrapping_mul(0x9e37_79b9) ^ (self.frame / 6));
        let i = (roll * self.glyphs.len() as f32) as usize;
        self.glyphs.get(i.min(self.glyphs.len().saturating_sub(1))).copied().unwrap_or('0')
    }

    fn paint(&mut self, pointer_x: Option<f32>) {
        self.canvas.clear();
        let trail = self.options.trail;
        for x in 0..self.columns.len() {
            let Some(stream) = self.columns[x] else {
                continue;
            };
            let near = pointer_x
                .map(|px| physics::pointer_falloff((x as f32 + 0.5 - px).abs(), self.options.radius))
                .unwrap_or(0.0);
            let head_row = stream.head.floor() as i32;
            let len = trail.ceil() as i32;
            for k in 0..=len {
                let row = head_row - k;
                if row < 0 || row >= self.height as i32 {
                    continue;
                }
                let fade = 1.0 - k as f32 / (trail + 1.0);
                let alpha = math::clamp01(fade * (0.7 + 0.3 * near));
                let color = if k == 0 {
                    self.options.head_color
                } else {
                    self.options.color.lerp(self.options.head_color, near * 0.4)
                };
                let ch = self.glyph(stream.salt, row);
                self.canvas.plot_glyph(x as f32, row as f32, ch, alpha, color);
            }
        }
    }
}

impl Effect for MatrixRain {
    fn rebuild(&mut self, size: Size) {
        self.height = size.height;
        self.canvas.resize(size.width, size.height);
        self.columns.clear();
        if !effects::is_empty(size) {
            for _ in 0..size.width {
                let stream = self.spawn(true);
                self.columns.push(stream);
            }
        }
        self.paint(None);
    }

    fn update(&mut self, ctx: &FrameCtx<'_>) {
        self.frame = self.frame.wrapping_add(1);
        let pointer_x = ctx.pointer.position.map(|p| p.x);
        let bottom = self.height as f32 + self.options.trail;
        for x in 0..self.columns.len() {
            match self.columns[x] {
                Some(mut stream) => {
                    let slow = pointer_x
                        .map(|px| {
                            physics::pointer_falloff((x as f32 + 0.5 - px).abs(), self.options.radius)
                        })
                        .unwrap_or(0.0);
                    stream.head += stream.speed * ctx.dt * (1.0 - 0.6 * slow);
                    self.columns[x] = if stream.head > bottom {
                        self.spawn(false)
                    } else {
                        Some(stream)
                    };
                }
                None => {
                    // empty columns get a chance to start a stream roughly once per second
                    if self.rng.random_bool(math::clamp01(ctx.dt) as f64) {
                        self.columns[x] = self.spawn(false);
                    }
                }
            }
        }
        self.paint(pointer_x);
    }

    fn settle(&mut self) {
        self.paint(None);
    }

    fn render(&self, area: Rect, buf: &mut Buffer, theme: &FxTheme) {
        self.canvas.flush(area, buf, ramp::SOLID, theme.base_style());
    }
}
