//! Curtains of light: a few wavy bands whose phase drifts over time. Bands bend toward the
//! pointer's row.

use crate::effects;
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
use ratatui_fx_core::physics;
use ratatui_fx_core::props;
use ratatui_fx_core::props::Props;
use ratatui_fx_core::theme::FxTheme;

#[derive(Clone, Debug)]
pub struct AuroraOptions {
    pub bands: usize,
    pub speed: f32,
    /// Band half-thickness as a fraction of the area height.
    pub thickness: f32,
    pub radius: f32,
    pub colors: Vec<Rgb>,
    pub seed: u64,
}

impl Default for AuroraOptions {
    fn default() -> Self {
        Self {
            bands: 3,
            speed: 0.4,
            thickness: 0.12,
            radius: 20.0,
            colors: vec![
                Rgb::new(60, 255, 160),
                Rgb::new(80, 160, 255),
                Rgb::new(200, 90, 255),
            ],
            seed: effects::DEFAULT_SEED,
        }
    }
}

impl AuroraOptions {
    pub fn from_props(p: &Props) -> Self {
        let d = Self::default();
        let colors: Vec<Rgb> = p
            .string_list("colors", &[])
            .iter()
            .filter_map(|s| Rgb::parse_hex(s).ok())
            .collect();
        Self {
            bands: p.count("bands", d.bands),
            speed: p.positive_f32("speed", d.speed),
            thickness: p.unit_f32("thickness", d.thickness),
            radius: p.positive_f32("radius", d.radius),
            colors: if colors.is_empty() { d.colors } else { colors },
            seed: p.seed(d.seed),
        }
    }

    pub fn normalized(self) -> Self {
        let d = Self::default();
        Self {
            bands: props::count_or(self.bands, d.bands),
            speed: props::positive_or(self.speed, d.speed),
            thickness: props::unit_or(self.thickness, d.thickness),
            radius: props::positive_or(self.radius, d.radius),
            colors: if self.colors.is_empty() {
                d.colors
            } else {
                self.colors
            },
            ..self
        }
    }
}

pub struct Aurora {
    options: AuroraOptions,
    size: Size,
    phase: f32,
    bend: Option<Vec2>,
    canvas: FxCanvas,
}

impl Aurora {
    pub fn new(options: AuroraOptions) -> Self {
        Self {
            options: options.normalized(),
            size: Size::new(0, 0),
            phase: 0.0,
            bend: None,
            canvas: FxCanvas::default(),
        }
    }

    pub fn from_props(props: &Props) -> Self {
        Self::new(AuroraOptions::from_props(props))
    }

    /// Row (fractional) of band `band`'s crest at column `x`.
    pub fn crest(&self, band: usize, x: f32) -> f32 {
        let h = self.size.height as f32;
        let n = self.options.bands as f32;
        let base = h * (band as f32 + 1.0) / (n + 1.0);
        let seed = (self.options.seed as u32).wrapping_add(band as u32 * 101);
        let wobble = math::fbm(x * 0.05, self.phase + band as f32, seed, 3) - 0.5;
        let wave = (x * 0.12 + self.phase * 2.0 + band as f32 * 1.7).sin();
        let mut y = base + (wave * 0.12 + wobble * 0.3) * h;
        if let Some(p) = self.bend {
            let pull = physics::pointer_falloff((x - p.x).abs(), self.options.radius);
            y = math::lerp(y, p.y, pull * 0.5);
        }
        y
    }

    fn paint(&mut self) {
        self.canvas.clear();
        let h = self.size.height as f32;
        let half = (self.options.thickness * h).max(0.5);
        for band in 0..self.options.bands {
            let color = self.options.colors[band % self.options.colors.len()];
            for x in 0..self.size.width {
                let fx = x as f32 + 0.5;
                let crest = self.crest(band, fx);
                let lo = (crest - half).floor().max(0.0) as u16;
                let hi = (crest + half).ceil().min(h) as u16;
                for y in lo..hi {
                    let d = ((y as f32 + 0.5) - crest).abs() / half;
                    let alpha = 1.0 - math::smoothstep(0.0, 1.0, d);
                    self.canvas.accumulate(x as f32, y as f32, alpha * 0.7, color);
                }
            }
        }
    }
}

impl Effect for Aurora {
    fn rebuild(&mut self, size: Size) {
        self.size = size;
        self.canvas.resize(size.width, size.height);
        self.paint();
    }

    fn update(&mut self, ctx: &FrameCtx<'_>) {
        self.phase += self.options.speed * ctx.dt;
        let target = ctx.pointer.position;
        self.bend = match (self.bend, target) {
            (Some(b), Some(t)) => Some(b.lerp(t, 0.1)),
            (_, t) => t,
        };
        self.paint();
    }

    fn settle(&mut self) {
        self.bend = None;
        self.paint();
    }

    fn render(&self, area: Rect, buf: &mut Buffer, theme: &FxTheme) {
        self.canvas.flush(area, buf, ramp::BLOCKS, theme.base_style());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui_fx_core::physics::PointerState;

    #[test]
    fn bands_follow_pointer_row() {
        let mut fx = Aurora::from_props(&Props::new().with("bands", 1));
        let size = Size::new(40, 20);
        fx.rebuild(size);
        let rest = fx.crest(0, 20.0);
        let pointer = PointerState {
            position: Some(Vec2::new(20.0, 19.0)),
            pressed: false,
        };
        fx.update(&FrameCtx {
            dt: 0.0,
            time: 0.0,
            pointer: &pointer,
            size,
        });
        assert!(fx.crest(0, 20.0) > rest);
    }

    #[test]
    fn custom_colors_and_bad_entries() {
        let props = Props::from_json(r##"{"colors": ["#ff0000", "nope"]}"##).unwrap();
        let fx = Aurora::from_props(&props);
        assert_eq!(fx.options.colors, vec![Rgb::new(255, 0, 0)]);
    }

    #[test]
    fn tiny_area_paints_without_panic() {
        let mut fx = Aurora::from_props(&Props::new());
        fx.rebuild(Size::new(1, 1));
        fx.rebuild(Size::new(0, 0));
        fx.settle();
    }
}
