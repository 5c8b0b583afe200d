//! A rotating double helix: two strands in opposite phase with rungs between them. The strand
//! nearer the viewer is drawn brighter.

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
use ratatui_fx_core::props;
use ratatui_fx_core::props::Props;
use ratatui_fx_core::theme::FxTheme;

#[derive(Clone, Debug)]
pub struct HelixOptions {
    /// Width of the helix in columns.
    pub length: u16,
    /// Twists per second.
    pub speed: f32,
    /// Columns per full twist.
    pub wavelength: f32,
    /// Columns between rungs. Zero disables rungs.
    pub rung_every: u16,
    pub color_a: Rgb,
    pub color_b: Rgb,
}

impl Default for HelixOptions {
    fn default() -> Self {
        Self {
            length: 32,
            speed: 0.5,
            wavelength: 16.0,
            rung_every: 3,
            color_a: Rgb::new(255, 92, 138),
            color_b: Rgb::new(56, 214, 255),
        }
    }
}

impl HelixOptions {
    pub fn from_props(p: &Props) -> Self {
        let d = Self::default();
        let rung_every = match p.get("rungEvery").and_then(|v| v.as_u64()) {
            Some(n) => n.min(u16::MAX as u64) as u16,
            None => d.rung_every,
        };
        Self {
            length: p.count("length", d.length as usize).min(u16::MAX as usize) as u16,
            speed: p.positive_f32("speed", d.speed),
            wavelength: p.positive_f32("wavelength", d.wavelength),
            rung_every,
            color_a: p.color("colorA", d.color_a),
            color_b: p.color("colorB", d.color_b),
        }
    }

    pub fn normalized(self) -> Self {
        let d = Self::default();
        Self {
            length: if self.length == 0 { d.length } else { self.length },
            speed: props::positive_or(self.speed, d.speed),
            wavelength: props::positive_or(self.wavelength, d.wavelength),
            ..self
        }
    }
}

/// Vertical offset in [-1, 1] and depth in [-1, 1] (positive is nearer) of strand `strand` at
/// `column`, for a rotation of `turn` revolutions.
pub fn strand_at(column: f32, turn: f32, wavelength: f32, strand: usize) -> (f32, f32) {
    let angle = (column / wavelength + turn) * std::f32::consts::TAU
        + strand as f32 * std::f32::consts::PI;
    (angle.sin(), angle.cos())
}

pub struct HelixLoader {
    options: HelixOptions,
    size: Size,
    turn: f32,
    canvas: FxCanvas,
}

impl HelixLoader {
    pub fn new(options: HelixOptions) -> Self {
        Self {
            options: options.normalized(),
            size: Size::new(0, 0),
            turn: 0.0,
            canvas: FxCanvas::default(),
        }
    }

    pub fn from_props(props: &Props) -> Self {
        Self::new(HelixOptions::from_props(props))
    }

    fn paint(&mut self) {
        self.canvas.clear();
        if effects::is_empty(self.size) {
            return;
        }
        let len = self.options.length.min(self.size.width);
        let left = (self.size.width - len) / 2;
        let mid = self.size.height as f32 / 2.0;
        let amp = (self.size.height as f32 / 2.0 - 0.5).clamp(0.0, 3.0);
        let colors = [self.options.color_a, self.options.color_b];
        for c in 0..len {
            let x = (left + c) as f32;
            let mut ends = [Vec2::ZERO; 2];
            let mut depths = [0.0f32; 2];
            for (strand, color) in colors.iter().enumerate() {
                let (offset, depth) = strand_at(c as f32, self.turn, self.options.wavelength, strand);
                let y = mid + offset * amp;
                ends[strand] = Vec2::new(x, y);
                depths[strand] = depth;
                let alpha = math::remap(depth, (-1.0, 1.0), (0.25, 1.0));
                self.canvas.plot(x, y, alpha, *color);
            }
            if self.options.rung_every > 0 && c % self.options.rung_every == 0 {
                let fade = math::remap(depths[0].abs(), (0.0, 1.0), (0.35, 0.15));
                let rung = colors[0].lerp(colors[1], 0.5);
                self.canvas.line(ends[0], ends[1], fade, rung);
            }
        }
    }
}

impl Effect for HelixLoader {
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
    fn strands_are_in_opposite_phase() {
        for c in 0..20 {
            let (a, da) = strand_at(c as f32, 0.3, 16.0, 0);
            let (b, db) = strand_at(c as f32, 0.3, 16.0, 1);
            assert!((a + b).abs() < 1e-4);
            assert!((da + db).abs() < 1e-4);
        }
    }

    #[test]
    fn paints_within_a_tiny_area() {
        let mut fx = HelixLoader::from_props(&Props::new());
        fx.rebuild(Size::new(5, 1));
        let lit = (0..5).filter(|x| fx.canvas.alpha_at(*x, 0) > 0.0).count();
        assert_eq!(lit, 5);
    }

    #[test]
    fn zero_rung_spacing_is_allowed() {
        let fx = HelixLoader::from_props(&Props::new().with("rungEvery", 0));
        assert_eq!(fx.options.rung_every, 0);
    }
}
