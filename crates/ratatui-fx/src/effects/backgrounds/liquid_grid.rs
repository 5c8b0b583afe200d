//! A mesh of lattice points that bulges away from the pointer like a sheet of liquid.

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
use ratatui_fx_core::math::CELL_ASPECT;
use ratatui_fx_core::math::Vec2;
use ratatui_fx_core::physics;
use ratatui_fx_core::physics::Body;
use ratatui_fx_core::props;
use ratatui_fx_core::props::Props;
use ratatui_fx_core::theme::FxTheme;

#[derive(Clone, Debug)]
pub struct LiquidGridOptions {
    /// Columns between lattice points.
    pub spacing_x: f32,
    /// Rows between lattice points.
    pub spacing_y: f32,
    pub influence_radius: f32,
    pub max_displacement: f32,
    pub stiffness: f32,
    pub damping: f32,
    pub aspect: f32,
    pub color: Rgb,
}

impl Default for LiquidGridOptions {
    fn default() -> Self {
        Self {
            spacing_x: 4.0,
            spacing_y: 2.0,
            influence_radius: 14.0,
            max_displacement: 3.0,
            stiffness: 0.12,
            damping: 0.8,
            aspect: CELL_ASPECT,
            color: Rgb::new(80, 160, 255),
        }
    }
}

impl LiquidGridOptions {
    pub fn from_props(p: &Props) -> Self {
        let d = Self::default();
        Self {
            spacing_x: p.positive_f32("spacingX", d.spacing_x),
            spacing_y: p.positive_f32("spacingY", d.spacing_y),
            influence_radius: p.positive_f32("influenceRadius", d.influence_radius),
            max_displacement: p.positive_f32("maxDisplacement", d.max_displacement),
            stiffness: p.unit_f32("stiffness", d.stiffness),
            damping: p.unit_f32("damping", d.damping),
            aspect: d.aspect,
            color: p.color("color", d.color),
        }
    }

    pub fn normalized(self) -> Self {
        let d = Self::default();
        Self {
            spacing_x: props::positive_or(self.spacing_x, d.spacing_x),
            spacing_y: props::positive_or(self.spacing_y, d.spacing_y),
            influence_radius: props::positive_or(self.influence_radius, d.influence_radius),
            max_displacement: props::positive_or(self.max_displacement, d.max_displacement),
            stiffness: props::unit_or(self.stiffness, d.stiffness),
            damping: props::unit_or(self.damping, d.damping),
            aspect: props::positive_or(self.aspect, d.aspect),
            ..self
        }
    }
}

/// Offset a lattice point at `home` wants while the pointer is at `pointer`.
///
/// Points at or beyond the influence radius want no offset; a point directly under the pointer
/// has no defined direction and also stays put.
pub fn target_offset(home: Vec2, pointer: Option<Vec2>, options: &LiquidGridOptions) -> Vec2 {
    let Some(p) = pointer else {
        return Vec2::ZERO;
    };
    let delta = home - p;
    let distance = Vec2::new(delta.x, delta.y * options.aspect).length();
    if distance < math::MIN_DISTANCE {
        return Vec2::ZERO;
    }
    let magnitude =
        physics::displacement_toward(distance, options.influence_radius, options.max_displacement);
    delta.normalize_or_zero() * magnitude
}

pub struct LiquidGrid {
    options: LiquidGridOptions,
    cols: usize,
    rows: usize,
    points: Vec<Body>,
    canvas: FxCanvas,
}

impl LiquidGrid {
    pub fn new(options: LiquidGridOptions) -> Self {
        Self {
            options: options.normalized(),
            cols: 0,
            rows: 0,
            points: Vec::new(),
            canvas: FxCanvas::default(),
        }
    }

    pub fn from_props(props: &Props) -> Self {
        Self::new(LiquidGridOptions::from_props(props))
    }

    pub fn points(&self) -> &[Body] {
        &self.points
    }

    fn point(&self, col: usize, row: usize) -> &Body {
        &self.points[row * self.cols + col]
    }

    fn paint(&mut self) {
        self.canvas.clear();
        let max = self.options.max_displacement;
        let base = self.options.color;
        for row in 0..self.rows {
            for col in 0..self.cols {
                let p = *self.point(col, row);
                let glow = math::clamp01(p.displacement() / max);
                let color = base.lerp(Rgb::WHITE, glow * 0.6);
                if col + 1 < self.cols {
                    let q = self.point(col + 1, row).pos;
                    self.canvas.line(p.pos, q, 0.15 + 0.4 * glow, color);
                }
                if row + 1 < self.rows {
                    let q = self.point(col, row + 1).pos;
                    self.canvas.line(p.pos, q, 0.15 + 0.4 * glow, color);
                }
                self.canvas.plot(p.pos.x, p.pos.y, 0.6 + 0.4 * glow, color);
            }
        }
    }
}

impl Effect for LiquidGrid {
    fn rebuild(&mut self, size: Size) {
        self.points.clear();
        self.canvas.resize(size.width, size.height);
        if effects::is_empty(size) {
            self.cols = 0;
            self.rows = 0;
            return;
        }
        // at most one lattice point per cell
        let (sx, sy) = (self.options.spacing_x.max(1.0), self.options.spacing_y.max(1.0));
        self.cols = (size.width as f32 / sx).floor() as usize + 1;
        self.rows = (size.height as f32 / sy).floor() as usize + 1;
        for row in 0..self.rows {
            for col in 0..self.cols {
                let home = Vec2::new(col as f32 * sx, row as f32 * sy);
                self.points.push(Body::at(home));
            }
        }
        self.paint();
    }

    fn update(&mut self, ctx: &FrameCtx<'_>) {
        let pointer = ctx.pointer.position;
        for p in &mut self.points {
            let target = p.home + target_offset(p.home, pointer, &self.options);
            p.vel += (target - p.pos) * self.options.stiffness;
            p.vel *= self.options.damping;
            p.pos += p.vel;
        }
        self.paint();
    }

    fn settle(&mut self) {
        for p in &mut self.points {
            p.pos = p.home;
            p.vel = Vec2::ZERO;
        }
        self.paint();
    }

    fn render(&self, area: Rect, buf: &mut Buffer, theme: &FxTheme) {
        self.canvas.flush(area, buf, ramp::ASCII, theme.base_style());
    }

    fn is_idle(&self) -> bool {
        self.points
            .iter()
            .all(|p| p.displacement() < 0.01 && p.speed() < 0.01)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui_fx_core::physics::PointerState;

    #[test]
    fn displacement_at_half_radius_is_half_max() {
        let options = LiquidGridOptions {
            influence_radius: 100.0,
            max_displacement: 15.0,
            ..LiquidGridOptions::default()
        };
        let off = target_offset(Vec2::new(50.0, 0.0), Some(Vec2::ZERO), &options);
        let m = off.length();
        assert!(m > 0.0 && m < 15.0);
        assert!((m - 7.5).abs() < 1e-4);
        assert!(off.x > 0.0);
    }

    #[test]
    fn no_offset_at_or_beyond_radius_or_on_top() {
        let options = LiquidGridOptions {
            influence_radius: 10.0,
            ..LiquidGridOptions::default()
        };
        assert_eq!(
            target_offset(Vec2::new(10.0, 0.0), Some(Vec2::ZERO), &options),
            Vec2::ZERO
        );
        assert_eq!(
            target_offset(Vec2::new(3.0, 3.0), Some(Vec2::new(3.0, 3.0)), &options),
            Vec2::ZERO
        );
        assert_eq!(target_offset(Vec2::new(1.0, 1.0), None, &options), Vec2::ZERO);
    }

    #[test]
    fn lattice_covers_area_and_relaxes() {
        let mut fx = LiquidGrid::from_props(&Props::new());
        fx.rebuild(Size::new(16, 8));
        assert_eq!(fx.points().len(), 5 * 5);

        let size = Size::new(16, 8);
        let pointer = PointerState {
            position: Some(Vec2::new(8.0, 4.0)),
            pressed: false,
        };
        for _ in 0..30 {
            fx.update(&FrameCtx {
                dt: 1.0 / 60.0,
                time: 0.0,
                pointer: &pointer,
                size,
            });
        }
        assert!(!fx.is_idle());
        let gone = PointerState::default();
        for _ in 0..600 {
            fx.update(&FrameCtx {
                dt: 1.0 / 60.0,
                time: 0.0,
                pointer: &gone,
                size,
            });
        }
        assert!(fx.is_idle());
    }

    #[test]
    fn zero_spacing_prop_is_coerced() {
        let fx = LiquidGrid::from_props(&Props::new().with("spacingX", 0));
        assert_eq!(fx.options.spacing_x, LiquidGridOptions::default().spacing_x);
    }

    #[test]
    fn tiny_spacing_keeps_one_point_per_cell() {
        let props = Props::from_json(r#"{"spacingX": 1e-6, "spacingY": 1e-6}"#).unwrap();
        let mut fx = LiquidGrid::from_props(&props);
        fx.rebuild(Size::new(80, 24));
        assert_eq!(fx.points().len(), 81 * 25);
    }
}
