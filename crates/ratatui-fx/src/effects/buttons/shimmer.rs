//! A button with a band of light that sweeps across its face. Hovering keeps the sweep going
//! back to back; otherwise it pauses between passes.

use super::ButtonFace;
use crate::effects;
use crate::effects::buttons;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::layout::Size;
use ratatui::style::Style;
use ratatui_fx_core::color::Rgb;
use ratatui_fx_core::effect::Effect;
use ratatui_fx_core::effect::FrameCtx;
use ratatui_fx_core::input::KeyEvent;
use ratatui_fx_core::math;
use ratatui_fx_core::math::Vec2;
use ratatui_fx_core::props;
use ratatui_fx_core::props::Props;
use ratatui_fx_core::theme::FxTheme;

#[derive(Clone, Debug)]
pub struct ShimmerOptions {
    pub face: ButtonFace,
    /// Seconds one pass takes.
    pub sweep: f32,
    /// Pause between passes when not hovered.
    pub pause: f32,
    /// Band half-width in columns.
    pub band: f32,
    pub color: Rgb,
}

impl Default for ShimmerOptions {
    fn default() -> Self {
        Self {
            face: ButtonFace::new("Shimmer"),
            sweep: 1.2,
            pause: 1.5,
            band: 3.0,
            color: Rgb::new(255, 255, 255),
        }
    }
}

impl ShimmerOptions {
    pub fn from_props(p: &Props) -> Self {
        let d = Self::default();
        Self {
            face: ButtonFace::from_props(p, d.face),
            sweep: p.positive_f32("sweep", d.sweep),
            pause: p.non_negative_f32("pause", d.pause),
            band: p.positive_f32("band", d.band),
            color: p.color("color", d.color),
        }
    }

    pub fn normalized(self) -> Self {
        let d = Self::default();
        Self {
            sweep: props::positive_or(self.sweep, d.sweep),
            pause: props::non_negative_or(self.pause, d.pause),
            band: props::positive_or(self.band, d.band),
            ..self
        }
    }
}

pub struct ShimmerButton {
    options: ShimmerOptions,
    rect: Rect,
    /// Seconds into the current sweep-plus-pause cycle.
    clock: f32,
    presses: u32,
}

impl ShimmerButton {
    pub fn new(options: ShimmerOptions) -> Self {
        Self {
            options: options.normalized(),
            rect: Rect::default(),
            clock: 0.0,
            presses: 0,
        }
    }

    pub fn from_props(props: &Props) -> Self {
        Self::new(ShimmerOptions::from_props(props))
    }

    pub fn presses(&self) -> u32 {
        self.presses
    }

    /// Column (local) of the band center, or `None` while paused.
    pub fn band_x(&self) -> Option<f32> {
        if self.clock >= self.options.sweep {
            return None;
        }
        let t = math::ease_in_out_sine(self.clock / self.options.sweep);
        let start = self.rect.x as f32 - self.options.band;
        let end = (self.rect.x + self.rect.width) as f32 + self.options.band;
        Some(math::lerp(start, end, t))
    }

    /// Highlight strength in [0, 1] at local cell `(x, y)`.
    pub fn shine(&self, x: u16, y: u16) -> f32 {
        let Some(bx) = self.band_x() else {
            return 0.0;
        };
        // slanted band
        let skew = (y as f32 - self.rect.y as f32) * 0.5;
        let d = (x as f32 + 0.5 + skew - bx).abs();
        math::clamp01(1.0 - d / self.options.band)
    }
}

impl Effect for ShimmerButton {
    fn rebuild(&mut self, size: Size) {
        self.rect = self.options.face.rect(size);
        self.clock = 0.0;
    }

    fn update(&mut self, ctx: &FrameCtx<'_>) {
        let hovered = ctx
            .pointer
            .position
            .is_some_and(|p| buttons::contains(self.rect, p));
        let cycle = if hovered {
            self.options.sweep
        } else {
            self.options.sweep + self.options.pause
        };
        self.clock = (self.clock + ctx.dt) % cycle;
    }

    fn settle(&mut self) {
        self.clock = self.options.sweep;
    }

    fn render(&self, area: Rect, buf: &mut Buffer, theme: &FxTheme) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let rect = effects::offset(area, self.rect);
        self.options
            .face
            .render(rect, buf, Style::default().fg(theme.accent.to_color()), theme);
        if self.band_x().is_none() {
            return;
        }
        for y in self.rect.y..self.rect.y + self.rect.height {
            for x in self.rect.x..self.rect.x + self.rect.width {
                let s = self.shine(x, y);
                if s <= 0.0 {
                    continue;
                }
                let (bx, by) = (area.x + x, area.y + y);
                if bx >= area.right() || by >= area.bottom() {
                    continue;
                }
                if let Some(cell) = buf.cell_mut((bx, by)) {
                    let base = if y == self.rect.y + 1 && x > self.rect.x {
                        theme.foreground
                    } else {
                        theme.accent
                    };
                    cell.set_fg(base.lerp(self.options.color, s).to_color());
                }
            }
        }
    }

    fn press(&mut self, at: Vec2) {
        if buttons::contains(self.rect, at) {
            self.presses += 1;
            self.clock = 0.0;
        }
    }

    fn key(&mut self, key: &KeyEvent) -> bool {
        if buttons::is_activation(key) {
            self.presses += 1;
            self.clock = 0.0;
            return true;
        }
        false
    }
}
