//! A row of equalizer bars that pulse in a staggered wave.

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
use ratatui_fx_core::props;
use ratatui_fx_core::props::Props;
use ratatui_fx_core::theme::FxTheme;

/// Eighth-block glyphs, from empty to a full cell.
const EIGHTHS: [char; 9] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

#[derive(Clone, Debug)]
pub struct PulseBarsOptions {
    pub bars: usize,
    /// Tallest bar in rows.
    pub height: u16,
    /// Pulses per second.
    pub speed: f32,
    /// Phase delay between neighbouring bars, in cycles.
    pub stagger: f32,
    pub color: Rgb,
    pub peak_color: Rgb,
}

impl Default for PulseBarsOptions {
    fn default() -> Self {
        Self {
            bars: 5,
            height: 4,
            speed: 1.2,
            stagger: 0.12,
            color: Rgb::new(56, 214, 255),
            peak_color: Rgb::new(200, 245, 255),
        }
    }
}

impl PulseBarsOptions {
    pub fn from_props(p: &Props) -> Self {
        let d = Self::default();
        Self {
            bars: p.count("bars", d.bars),
            height: p.count("height", d.height as usize).min(u16::MAX as usize) as u16,
            speed: p.positive_f32("speed", d.speed),
            stagger: p.non_negative_f32("stagger", d.stagger),
            color: p.color("color", d.color),
            peak_color: p.color("peakColor", d.peak_color),
        }
    }

    pub fn normalized(self) -> Self {
        let d = Self::default();
        Self {
            bars: props::count_or(self.bars, d.bars),
            height: if self.height == 0 { d.height } else { self.height },
            speed: props::positive_or(self.speed, d.speed),
            stagger: props::non_negative_or(self.stagger, d.stagger),
            ..self
        }
    }
}

pub struct PulseBars {
    options: PulseBarsOptions,
    size: Size,
    phase: f32,
    canvas: FxCanvas,
}

impl PulseBars {
    pub fn new(options: PulseBarsOptions) -> Self {
        Self {
            options: options.normalized(),
            size: Size::new(0, 0),
            phase: 0.0,
            canvas: FxCanvas::default(),
        }
    }

    pub fn from_props(props: &Props) -> Self {
        Self::new(PulseBarsOptions::from_props(props))
    }

    /// Fill level of bar `i` in [0.15, 1].
    pub fn level(&self, i: usize) -> f32 {
        let t = self.phase - i as f32 * self.options.stagger;
        let wave = 0.5 - 0.5 * (t * std::f32::consts::TAU).cos();
        0.15 + 0.85 * wave
    }

    fn paint(&mut self) {
        self.canvas.clear();
        if effects::is_empty(self.size) {
            return;
        }
        let rows = self.options.height.min(self.size.height);
        let n = self.options.bars;
        // each bar is two columns wide with a one column gap
        let total = (n * 3).saturating_sub(1) as u16;
        let left = self.size.width.saturating_sub(total) / 2;
        let bottom = (self.size.height + rows) / 2;
        for i in 0..n {
            let x0 = left + i as u16 * 3;
            if x0 >= self.size.width {
                break;
            }
            let level = self.level(i);
            let eighths = (level * rows as f32 * 8.0).round() as u32;
            let color = self.options.color.lerp(self.options.peak_color, level);
            for r in 0..rows {
                let filled = eighths.saturating_sub(r as u32 * 8).min(8) as usize;
                if filled == 0 {
                    break;
                }
                let y = bottom - 1 - r;
                for dx in 0..2 {
                    self.canvas.plot_glyph(
                        (x0 + dx) as f32,
                        y as f32,
                        EIGHTHS[filled],
                        math::lerp(0.6, 1.0, level),
                        color,
                    );
                }
            }
        }
    }
}

impl Effect for PulseBars {
    fn rebuild(&mut self, size: Size) {
        self.size = size;
        self.canvas.resize(size.width, size.height);
        self.paint();
    }

    fn update(&mut self, ctx: &FrameCtx<'_>) {
        self.phase = (self.phase + self.options.speed * ctx.dt).fract();
        self.paint();
    }

    fn settle(&mut self) {
        // a rising ramp reads as "loading" without motion
        self.phase = 0.5;
        self.paint();
    }

    fn render(&self, area: Rect, buf: &mut Buffer, theme: &FxTheme) {
        self.canvas.flush(area, buf, ramp::SOLID, theme.base_style());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_are_bounded_and_staggered() {
        let mut fx = PulseBars::from_props(&Props::new());
        fx.rebuild(Size::new(20, 6));
        fx.phase = 0.3;
        for i in 0..5 {
            assert!((0.15..=1.0).contains(&fx.level(i)));
        }
        assert_ne!(fx.level(0), fx.level(1));
    }

    #[test]
    fn full_bar_reaches_top_row() {
        let mut fx = PulseBars::from_props(&Props::new().with("bars", 1).with("stagger", 0));
        fx.rebuild(Size::new(4, 4));
        fx.phase = 0.5;
        fx.paint();
        assert!(fx.canvas.alpha_at(1, 0) > 0.0);
        assert!(fx.canvas.alpha_at(1, 3) > 0.0);
    }

    #[test]
    fn short_area_does_not_underflow() {
        let mut fx = PulseBars::from_props(&Props::new().with("height", 10));
        fx.rebuild(Size::new(3, 1));
        fx.settle();
    }
}
