//! Classic sine plasma. The pointer acts as an extra wave source.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::layout::Size;
use ratatui_fx_core::canvas::FxCanvas;
use ratatui_fx_core::canvas::ramp;
use ratatui_fx_core::color::Rgb;
use ratatui_fx_core::effect::Effect;
use ratatui_fx_core::effect::FrameCtx;
use ratatui_fx_core::math;
use ratatui_fx_core::math::Vec2;
use ratatui_fx_core::props;
use ratatui_fx_core::props::Props;
use ratatui_fx_core::theme::FxTheme;

#[derive(Clone, Debug)]
pub struct PlasmaOptions {
    /// Spatial frequency; larger values give tighter bands.
    pub scale: f32,
    pub speed: f32,
    pub colors: [Rgb; 3],
}

impl Default for PlasmaOptions {
    fn default() -> Self {
        Self {
            scale: 0.15,
            speed: 1.0,
            colors: [
                Rgb::new(255, 0, 128),
                Rgb::new(121, 40, 202),
                Rgb::new(0, 200, 255),
            ],
        }
    }
}

impl PlasmaOptions {
    pub fn from_props(p: &Props) -> Self {
        let d = Self::default();
        Self {
            scale: p.positive_f32("scale", d.scale),
            speed: p.positive_f32("speed", d.speed),
            colors: [
                p.color("colorA", d.colors[0]),
                p.color("colorB", d.colors[1]),
                p.color("colorC", d.colors[2]),
            ],
        }
    }

    pub fn normalized(self) -> Self {
        let d = Self::default();
        Self {
            scale: props::positive_or(self.scale, d.scale),
            speed: props::positive_or(self.speed, d.speed),
            ..self
        }
    }
}

/// Plasma value in [0, 1] at cell `(x, y)` and time `t`.
pub fn plasma_value(x: f32, y: f32, t: f32, scale: f32, source: Option<Vec2>) -> f32 {
    let (sx, sy) = (x * scale, y * scale * math::CELL_ASPECT);
    let mut v = (sx + t).sin() + (sy * 0.8 - t * 0.7).sin() + ((sx + sy) * 0.6 + t * 0.5).sin();
    let center = Vec2::new(sx.sin() * 0.5 + t.cos(), sy.cos() * 0.5);
    v += ((center.length() + t) * 2.0).sin();
    let mut waves = 4.0;
    if let Some(p) = source {
        let d = (Vec2::new(x, y) - p).aspect_corrected().length() * scale;
        v += (d * 3.0 - t * 3.0).sin();
        waves += 1.0;
    }
    math::clamp01((v / waves + 1.0) / 2.0)
}

fn palette(colors: &[Rgb; 3], v: f32) -> Rgb {
    if v < 0.5 {
        colors[0].lerp(colors[1], v * 2.0)
    } else {
        colors[1].lerp(colors[2], (v - 0.5) * 2.0)
    }
}

pub struct Plasma {
    options: PlasmaOptions,
    size: Size,
    time: f32,
    canvas: FxCanvas,
}

impl Plasma {
    pub fn new(options: PlasmaOptions) -> Self {
        Self {
            options: options.normalized(),
            size: Size::new(0, 0),
            time: 0.0,
            canvas: FxCanvas::default(),
        }
    }

    pub fn from_props(props: &Props) -> Self {
        Self::new(PlasmaOptions::from_props(props))
    }

    fn paint(&mut self, source: Option<Vec2>) {
        let t = self.time * self.options.speed;
        for y in 0..self.size.height {
            for x in 0..self.size.width {
                let (fx, fy) = (x as f32 + 0.5, y as f32 + 0.5);
                let v = plasma_value(fx, fy, t, self.options.scale, source);
                let color = palette(&self.options.colors, v);
                self.canvas.plot(x as f32, y as f32, 0.2 + 0.8 * v, color);
            }
        }
    }
}

impl Effect for Plasma {
    fn rebuild(&mut self, size: Size) {
        self.size = size;
        self.canvas.resize(size.width, size.height);
        self.paint(None);
    }

    fn update(&mut self, ctx: &FrameCtx<'_>) {
        self.time = ctx.time;
        self.canvas.clear();
        self.paint(ctx.pointer.position);
    }

    fn settle(&mut self) {
        self.canvas.clear();
        self.paint(None);
    }

    fn render(&self, area: Rect, buf: &mut Buffer, theme: &FxTheme) {
        self.canvas.flush(area, buf, ramp::BLOCKS, theme.base_style());
    }
}
