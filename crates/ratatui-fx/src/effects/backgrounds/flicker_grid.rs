//! A grid of squares whose brightness flickers at random, brighter around the pointer.

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
use ratatui_fx_core::math::Vec2;
use ratatui_fx_core::physics;
use ratatui_fx_core::props;
use ratatui_fx_core::props::Props;
use ratatui_fx_core::theme::FxTheme;

#[derive(Clone, Debug)]
pub struct FlickerGridOptions {
    /// Columns per square, including the gap.
    pub square: u16,
    /// Chance per second that a square picks a new brightness.
    pub flicker_chance: f32,
    /// Resting brightness ceiling, in (0, 1).
    pub max_opacity: f32,
    pub radius: f32,
    /// Extra brightness directly under the pointer.
    pub boost: f32,
    pub color: Rgb,
    pub seed: u64,
}

impl Default for FlickerGridOptions {
    fn default() -> Self {
        Self {
            square: 2,
            flicker_chance: 0.3,
            max_opacity: 0.5,
            radius: 12.0,
            boost: 0.6,
            color: Rgb::new(110, 130, 255),
            seed: effects::DEFAULT_SEED,
        }
    }
}

impl FlickerGridOptions {
    pub fn from_props(p: &Props) -> Self {
        let d = Self::default();
        Self {
            square: p.count("squareSize", d.square as usize).min(u16::MAX as usize) as u16,
            flicker_chance: p.positive_f32("flickerChance", d.flicker_chance),
            max_opacity: p.unit_f32("maxOpacity", d.max_opacity),
            radius: p.positive_f32("radius", d.radius),
            boost: p.non_negative_f32("boost", d.boost),
            color: p.color("color", d.color),
            seed: p.seed(d.seed),
        }
    }

    pub fn normalized(self) -> Self {
        let d = Self::default();
        Self {
            square: if self.square == 0 { d.square } else { self.square },
            flicker_chance: props::positive_or(self.flicker_chance, d.flicker_chance),
            max_opacity: props::unit_or(self.max_opacity, d.max_opacity),
            radius: props::positive_or(self.radius, d.radius),
            boost: props::non_negative_or(self.boost, d.boost),
            ..self
        }
    }
}

pub struct FlickerGrid {
    options: FlickerGridOptions,
    cols: usize,
    rows: usize,
    levels: Vec<f32>,
    canvas: FxCanvas,
    rng: StdRng,
}

impl FlickerGrid {
    pub fn new(options: FlickerGridOptions) -> Self {
        let options = options.normalized();
        let rng = effects::seeded(options.seed);
        Self {
            options,
            cols: 0,
            rows: 0,
            levels: Vec::new(),
            canvas: FxCanvas::default(),
            rng,
        }
    }

    pub fn from_props(props: &Props) -> Self {
        Self::new(FlickerGridOptions::from_props(props))
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    pub fn levels(&self) -> &[f32] {
        &self.levels
    }

    fn square_center(&self, col: usize, row: usize) -> Vec2 {
        let s = self.options.square as f32;
        Vec2::new(col as f32 * s + (s - 1.0) / 2.0, row as f32 + 0.5)
    }

    fn paint(&mut self, pointer: Option<Vec2>) {
        self.canvas.clear();
        let s = self.options.square as usize;
        // the last column of every square is a gap
        let filled = (s - 1).max(1);
        for row in 0..self.rows {
            for col in 0..self.cols {
                let mut level = self.levels[row * self.cols + col];
                if let Some(p) = pointer {
                    let d = (self.square_center(col, row) - p).aspect_corrected().length();
                    level += physics::pointer_falloff(d, self.options.radius) * self.options.boost;
                }
                let level = math::clamp01(level);
                for dx in 0..filled {
                    self.canvas.plot(
                        (col * s + dx) as f32,
                        row as f32,
                        level,
                        self.options.color,
                    );
                }
            }
        }
    }
}

impl Effect for FlickerGrid {
    fn rebuild(&mut self, size: Size) {
        self.canvas.resize(size.width, size.height);
        self.cols = size.width.div_ceil(self.options.square) as usize;
        self.rows = size.height as usize;
        let max = self.options.max_opacity;
        let rng = &mut self.rng;
        self.levels = (0..self.cols * self.rows)
            .map(|_| rng.random_range(0.0..=max))
            .collect();
        self.paint(None);
    }

    fn update(&mut self, ctx: &FrameCtx<'_>) {
        let chance = math::clamp01(self.options.flicker_chance * ctx.dt);
        let max = self.options.max_opacity;
        for level in &mut self.levels {
            if self.rng.random_bool(chance as f64) {
                *level = self.rng.random_range(0.0..=max);
            }
        }
        self.paint(ctx.pointer.position);
    }

    fn settle(&mut self) {
        self.paint(None);
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
    fn levels_stay_under_ceiling() {
        let mut fx = FlickerGrid::from_props(&Props::new().with("maxOpacity", 0.4));
        let size = Size::new(21, 5);
        fx.rebuild(size);
        assert_eq!(fx.dimensions(), (11, 5));
        let pointer = PointerState::default();
        for _ in 0..200 {
            fx.update(&FrameCtx {
                dt: 1.0 / 60.0,
                time: 0.0,
                pointer: &pointer,
                size,
            });
        }
        assert!(fx.levels().iter().all(|l| (0.0..=0.4).contains(l)));
    }

    #[test]
    fn pointer_brightens_nearby_squares() {
        let mut fx = FlickerGrid::from_props(&Props::new().with("maxOpacity", 0.01));
        let size = Size::new(20, 6);
        fx.rebuild(size);
        let pointer = PointerState {
            position: Some(Vec2::new(10.0, 3.0)),
            pressed: false,
        };
        fx.update(&FrameCtx {
            dt: 1.0 / 60.0,
            time: 0.0,
            pointer: &pointer,
            size,
        });
        assert!(fx.canvas.alpha_at(10, 3) > 0.4);
    }

    #[test]
    fn zero_area_builds_no_squares() {
        let mut fx = FlickerGrid::from_props(&Props::new());
        fx.rebuild(Size::new(0, 4));
        fx.settle();
        assert!(fx.levels().is_empty());
    }
}
