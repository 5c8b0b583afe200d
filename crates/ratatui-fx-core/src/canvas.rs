//! Immediate-mode cell painter.
//!
//! Effects plot samples with an alpha in [0, 1] and a color. Each cell keeps its brightest sample;
//! [`FxCanvas::flush`] then maps alpha to a glyph ramp and scales the color, writing the result
//! into a ratatui [`Buffer`]. The canvas is owned by the effect and reused across frames.

use crate::color::Rgb;
use crate::math;
use crate::math::Vec2;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;

/// Glyph ramps from faint to solid. The first glyph is drawn for the lowest visible alpha.
pub mod ramp {
    pub const DOTS: &[&str] = &["·", "∙", "•", "●"];
    pub const ASCII: &[&str] = &[".", ":", "-", "=", "+", "*", "#", "%", "@"];
    pub const BLOCKS: &[&str] = &["░", "▒", "▓", "█"];
    pub const SPARKS: &[&str] = &["⋅", "+", "*", "✦", "✸"];
    pub const SOLID: &[&str] = &["█"];
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Sample {
    alpha: f32,
    color: Rgb,
    glyph: Option<char>,
}

#[derive(Clone, Debug, Default)]
pub struct FxCanvas {
    width: u16,
    height: u16,
    cells: Vec<Sample>,
}

impl FxCanvas {
    pub fn new(width: u16, height: u16) -> Self {
        let mut c = Self::default();
        c.resize(width, height);
        c
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.cells = vec![Sample::default(); width as usize * height as usize];
    }

    pub fn clear(&mut self) {
        self.cells.fill(Sample::default());
    }

    fn index(&self, x: f32, y: f32) -> Option<usize> {
        if !x.is_finite() || !y.is_finite() || x < 0.0 || y < 0.0 {
            return None;
        }
        let (cx, cy) = (x as usize, y as usize);
        if cx >= self.width as usize || cy >= self.height as usize {
            return None;
        }
        Some(cy * self.width as usize + cx)
    }

    /// Plots one sample. Out-of-bounds and non-finite coordinates are ignored.
    pub fn plot(&mut self, x: f32, y: f32, alpha: f32, color: Rgb) {
        self.plot_sample(x, y, alpha, color, None);
    }

    /// Plots a sample that renders as `glyph` instead of a ramp glyph.
    pub fn plot_glyph(&mut self, x: f32, y: f32, glyph: char, alpha: f32, color: Rgb) {
        self.plot_sample(x, y, alpha, color, Some(glyph));
    }

    fn plot_sample(&mut self, x: f32, y: f32, alpha: f32, color: Rgb, glyph: Option<char>) {
        let alpha = math::clamp01(alpha);
        if alpha <= 0.0 {
            return;
        }
        let Some(i) = self.index(x, y) else {
            return;
        };
        let cell = &mut self.cells[i];
        if alpha >= cell.alpha {
            *cell = Sample { alpha, color, glyph };
        }
    }

    /// Adds `alpha` to whatever the cell holds, saturating at 1.
    pub fn accumulate(&mut self, x: f32, y: f32, alpha: f32, color: Rgb) {
        let alpha = math::clamp01(alpha);
        let Some(i) = self.index(x, y) else {
            return;
        };
        let cell = &mut self.cells[i];
        cell.alpha = math::clamp01(cell.alpha + alpha);
        cell.color = if cell.color == Rgb::BLACK {
            color
        } else {
            cell.color.lerp(color, 0.5)
        };
    }

    /// Straight line from `a` to `b` (cell coordinates) using DDA stepping.
    pub fn line(&mut self, a: Vec2, b: Vec2, alpha: f32, color: Rgb) {
        if !a.is_finite() || !b.is_finite() {
            return;
        }
        let delta = b - a;
        let steps = delta.x.abs().max(delta.y.abs()).ceil().min(4096.0) as usize;
        if steps == 0 {
            self.plot(a.x, a.y, alpha, color);
            return;
        }
        for s in 0..=steps {
            let p = a.lerp(b, s as f32 / steps as f32);
            self.plot(p.x, p.y, alpha, color);
        }
    }

    /// Ring of radius `r` around `center`, with rows compressed by [`math::CELL_ASPECT`].
    pub fn ring(&mut self, center: Vec2, r: f32, alpha: f32, color: Rgb) {
        if !(r > 0.0) || !center.is_finite() {
            return;
        }
        let samples = ((r * std::f32::consts::TAU * 1.5).ceil() as usize).clamp(8, 2048);
        for s in 0..samples {
            let dir = Vec2::from_angle(s as f32 / samples as f32 * std::f32::consts::TAU);
            self.plot(
                center.x + dir.x * r,
                center.y + dir.y * r / math::CELL_ASPECT,
                alpha,
                color,
            );
        }
    }

    pub fn alpha_at(&self, x: u16, y: u16) -> f32 {
        self.index(x as f32, y as f32)
            .map(|i| self.cells[i].alpha)
            .unwrap_or(0.0)
    }

    /// Writes every visible sample into `buf` at `area`, clipped to both.
    pub fn flush(&self, area: Rect, buf: &mut Buffer, ramp: &[&str], base: Style) {
        if area.width == 0 || area.height == 0 || self.is_empty() || ramp.is_empty() {
            return;
        }
        let w = area.width.min(self.width);
        let h = area.height.min(self.height);
        let mut tmp = [0u8; 4];
        for cy in 0..h {
            for cx in 0..w {
                let sample = self.cells[cy as usize * self.width as usize + cx as usize];
                if sample.alpha <= 0.0 {
                    continue;
                }
                let Some(cell) = buf.cell_mut((area.x + cx, area.y + cy)) else {
                    continue;
                };
                let symbol = match sample.glyph {
                    Some(g) => &*g.encode_utf8(&mut tmp),
                    None => ramp_glyph(ramp, sample.alpha),
                };
                cell.set_style(base);
                cell.set_symbol(symbol);
                cell.set_fg(sample.color.scale(0.25 + 0.75 * sample.alpha).to_color());
            }
        }
    }
}

/// Picks the ramp glyph for `alpha`; alpha is clamped so the index is always in range.
pub fn ramp_glyph<'a>(ramp: &[&'a str], alpha: f32) -> &'a str {
    if ramp.is_empty() {
        return " ";
    }
    let a = math::clamp01(alpha);
    let i = ((a * ramp.len() as f32).ceil() as usize).clamp(1, ramp.len()) - 1;
    ramp[i]
}

/// Fills `area` with `style` (usually a background color).
pub fn fill(area: Rect, buf: &mut Buffer, style: Style) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    buf.set_style(area, style);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brightest_sample_wins() {
        let mut c = FxCanvas::new(4, 2);
        c.plot(1.2, 0.7, 0.3, Rgb::WHITE);
        c.plot(1.9, 0.1, 0.8, Rgb::WHITE);
        c.plot(1.0, 0.0, 0.5, Rgb::WHITE);
        assert!((c.alpha_at(1, 0) - 0.8).abs() < 1e-6);
    }

    #[test]
    fn alpha_is_clamped_and_out_of_bounds_ignored() {
        let mut c = FxCanvas::new(2, 2);
        c.plot(0.0, 0.0, 7.0, Rgb::WHITE);
        c.plot(-1.0, 0.0, 1.0, Rgb::WHITE);
        c.plot(5.0, 5.0, 1.0, Rgb::WHITE);
        c.plot(f32::NAN, 0.0, 1.0, Rgb::WHITE);
        assert_eq!(c.alpha_at(0, 0), 1.0);
        c.accumulate(1.0, 1.0, 0.7, Rgb::WHITE);
        c.accumulate(1.0, 1.0, 0.7, Rgb::WHITE);
        assert_eq!(c.alpha_at(1, 1), 1.0);
    }

    #[test]
    fn ramp_glyph_covers_range() {
        assert_eq!(ramp_glyph(ramp::BLOCKS, 0.01), "░");
        assert_eq!(ramp_glyph(ramp::BLOCKS, 1.0), "█");
        assert_eq!(ramp_glyph(ramp::BLOCKS, 5.0), "█");
        assert_eq!(ramp_glyph(&[], 0.5), " ");
    }

    #[test]
    fn flush_writes_clipped_cells() {
        let mut c = FxCanvas::new(6, 3);
        c.plot(0.0, 0.0, 1.0, Rgb::WHITE);
        c.plot(5.0, 2.0, 1.0, Rgb::WHITE);
        let area = Rect::new(0, 0, 3, 2);
        let mut buf = Buffer::empty(area);
        c.flush(area, &mut buf, ramp::SOLID, Style::default());
        assert_eq!(buf.cell((0, 0)).map(|c| c.symbol()), Some("█"));
        assert_eq!(buf.cell((2, 1)).map(|c| c.symbol()), Some(" "));
    }

    #[test]
    fn zero_sized_canvas_is_noop() {
        let mut c = FxCanvas::new(0, 0);
        c.plot(0.0, 0.0, 1.0, Rgb::WHITE);
        c.line(Vec2::ZERO, Vec2::new(10.0, 10.0), 1.0, Rgb::WHITE);
        c.ring(Vec2::ZERO, 3.0, 1.0, Rgb::WHITE);
        let mut buf = Buffer::empty(Rect::new(0, 0, 0, 0));
        c.flush(Rect::new(0, 0, 0, 0), &mut buf, ramp::DOTS, Style::default());
    }

    #[test]
    fn line_touches_both_ends() {
        let mut c = FxCanvas::new(10, 10);
        c.line(Vec2::new(0.5, 0.5), Vec2::new(8.5, 4.5), 1.0, Rgb::WHITE);
        assert_eq!(c.alpha_at(0, 0), 1.0);
        assert_eq!(c.alpha_at(8, 4), 1.0);
    }
}
