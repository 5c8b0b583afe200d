//! Dots chasing each other around an ellipse, each trailing a fading tail.

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
use ratatui_fx_core::props;
use ratatui_fx_core::props::Props;
use ratatui_fx_core::theme::FxTheme;

#[derive(Clone, Debug)]
pub struct OrbitOptions {
    pub dots: usize,
    /// Orbit radius in columns.
    pub radius: f32,
    /// Revolutions per second.
    pub speed: f32,
    /// Tail length as a fraction of a revolution.
    pub tail: f32,
    pub color: Rgb,
}

impl Default for OrbitOptions {
    fn default() -> Self {
        Self {
            dots: 3,
            radius: 6.0,
            speed: 0.8,
            tail: 0.2,
            color: Rgb::new(124, 92, 255),
        }
    }
}

impl OrbitOptions {
    pub fn from_props(p: &Props) -> Self {
        let d = Self::default();
        Self {
            dots: p.count("dots", d.dots),
            radius: p.positive_f32("radius", d.radius),
            speed: p.positive_f32("speed", d.speed),
            tail: p.unit_f32("tail", d.tail),
            color: p.color("color", d.color),
        }
    }

    pub fn normalized(self) -> Self {
        let d = Self::default();
        Self {
            dots: props::count_or(self.dots, d.dots),
            radius: props::positive_or(self.radius, d.radius),
            speed: props::positive_or(self.speed, d.speed),
            tail: props::unit_or(self.tail, d.tail),
            ..self
        }
    }
}

pub struct OrbitLoader {
    options: OrbitOptions,
    size: Size,
    /// Revolutions completed, fractional.
    turn: f32,
    canvas: FxCanvas,
}

impl OrbitLoader {
    pub fn new(options: OrbitOptions) -> Self {
        Self {
            options: options.normalized(),
            size: Size::new(0, 0),
            turn: 0.0,
            canvas: FxCanvas::default(),
        }
    }

    pub fn from_props(props: &Props) -> Self {
        Self::new(OrbitOptions::from_props(props))
    }

    /// Position of a point `turn` revolutions around the orbit.
    pub fn point(&self, turn: f32) -> Vec2 {
        let center = Vec2::new(self.size.width as f32 / 2.0, self.size.height as f32 / 2.0);
        // shrink to fit small areas
        let fit = (self.size.width as f32 / 2.0 - 1.0)
            .min((self.size.height as f32 / 2.0 - 0.5) * CELL_ASPECT)
            .max(0.0);
        let r = self.options.radius.min(fit);
        let dir = Vec2::from_angle(turn * std::f32::consts::TAU);
        center + Vec2::new(dir.x * r, dir.y * r / CELL_ASPECT)
    }

    fn paint(&mut self) {
        self.canvas.clear();
        if effects::is_empty(self.size) {
            return;
        }
        let n = self.options.dots;
        let samples = 12;
        for i in 0..n {
            let lead = self.turn + i as f32 / n as f32;
            for s in (0..=samples).rev() {
                let back = self.options.tail * s as f32 / samples as f32;
                let alpha = 1.0 - s as f32 / (samples + 1) as f32;
                let p = self.point(lead - back);
                let color = self.options.color.lerp(Rgb::WHITE, math::clamp01(alpha - 0.6));
                self.canvas.plot(p.x, p.y, alpha, color);
            }
        }
    }
}

impl Effect for OrbitLoader {
    fn rebuild(&mut self, size: Size) {
        self.size = size;
        self.canvas.resize(size.width, size.height);
        self.paint();
    }

    fn update(&mut self, ctx: &FrameCtx<'_>) {
        self.turn = (self.turn + self.options.speed * ctx.dt).fract();
        self.paint();
    }

    fn settle(&mut self) {
        self.turn = 0.0;
        self.paint();
    }

    fn render(&self, area: Rect, buf: &mut Buffer, theme: &FxTheme) {
        self.canvas.flush(area, buf, ramp::DOTS, theme.base_style());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn points_stay_inside_small_areas() {
        let mut fx = OrbitLoader::from_props(&Props::new().with("radius", 50));
        fx.rebuild(Size::new(10, 4));
        for i in 0..32 {
            let p = fx.point(i as f32 / 32.0);
            assert!(p.x >= 0.0 && p.x < 10.0, "{p:?}");
            assert!(p.y >= 0.0 && p.y < 4.0, "{p:?}");
        }
    }

    #[test]
    fn head_is_brightest() {
        let mut fx = OrbitLoader::from_props(&Props::new().with("dots", 1));
        fx.rebuild(Size::new(30, 10));
        let head = fx.point(0.0);
        assert_eq!(fx.canvas.alpha_at(head.x as u16, head.y as u16), 1.0);
    }
}
