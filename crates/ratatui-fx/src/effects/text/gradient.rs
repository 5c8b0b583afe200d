//! Gradient text: a looping color gradient slides through the letters. Hovering the text speeds
//! the sweep up.

use crate::effects::text;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::layout::Size;
use ratatui_fx_core::color::Rgb;
use ratatui_fx_core::effect::Effect;
use ratatui_fx_core::effect::FrameCtx;
use ratatui_fx_core::math::Vec2;
use ratatui_fx_core::props;
use ratatui_fx_core::props::Props;
use ratatui_fx_core::render;
use ratatui_fx_core::render::Glyph;
use ratatui_fx_core::theme::FxTheme;

#[derive(Clone, Debug)]
pub struct GradientOptions {
    pub text: String,
    pub colors: Vec<Rgb>,
    /// Gradient cycles per second.
    pub speed: f32,
    /// Columns one full gradient cycle spans.
    pub spread: f32,
    /// Speed multiplier while hovered.
    pub hover_boost: f32,
}

impl Default for GradientOptions {
    fn default() -> Self {
        Self {
            text: "Gradient text".to_string(),
            colors: vec![
                Rgb::new(64, 255, 170),
                Rgb::new(64, 121, 255),
                Rgb::new(255, 92, 200),
            ],
            speed: 0.25,
            spread: 24.0,
            hover_boost: 3.0,
        }
    }
}

impl GradientOptions {
    pub fn from_props(p: &Props) -> Self {
        let d = Self::default();
        let colors: Vec<Rgb> = p
            .string_list("colors", &[])
            .iter()
            .filter_map(|s| Rgb::parse_hex(s).ok())
            .collect();
        Self {
            text: p.text("text", &d.text),
            colors: if colors.is_empty() { d.colors } else { colors },
            speed: p.non_negative_f32("speed", d.speed),
            spread: p.positive_f32("spread", d.spread),
            hover_boost: p.positive_f32("hoverBoost", d.hover_boost),
        }
    }

    pub fn normalized(self) -> Self {
        let d = Self::default();
        Self {
            text: text::single_line(&self.text),
            colors: if self.colors.is_empty() {
                d.colors
            } else {
                self.colors
            },
            speed: props::non_negative_or(self.speed, d.speed),
            spread: props::positive_or(self.spread, d.spread),
            hover_boost: props::positive_or(self.hover_boost, d.hover_boost),
        }
    }
}

/// Color at `t` of a looping gradient through `colors` (`t` wraps at 1).
pub fn gradient_at(colors: &[Rgb], t: f32) -> Rgb {
    match colors {
        [] => Rgb::WHITE,
        [only] => *only,
        _ => {
            let t = if t.is_finite() { t.rem_euclid(1.0) } else { 0.0 };
            let scaled = t * colors.len() as f32;
            let i = (scaled.floor() as usize).min(colors.len() - 1);
            let next = (i + 1) % colors.len();
            colors[i].lerp(colors[next], scaled - i as f32)
        }
    }
}

pub struct GradientText {
    options: GradientOptions,
    /// Gradient phase in cycles.
    phase: f32,
    origin: (u16, u16),
    hovering: bool,
}

impl GradientText {
    pub fn new(options: GradientOptions) -> Self {
        Self {
            options: options.normalized(),
            phase: 0.0,
            origin: (0, 0),
            hovering: false,
        }
    }

    pub fn from_props(props: &Props) -> Self {
        Self::new(GradientOptions::from_props(props))
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Color of the letter `column` columns into the text.
    pub fn color_at(&self, column: f32) -> Rgb {
        gradient_at(
            &self.options.colors,
            column / self.options.spread - self.phase,
        )
    }

    fn over_text(&self, p: Vec2) -> bool {
        let w = render::text_width(&self.options.text) as f32;
        let (x, y) = (self.origin.0 as f32, self.origin.1 as f32);
        p.x >= x && p.x < x + w && p.y >= y && p.y < y + 1.0
    }
}

impl Effect for GradientText {
    fn rebuild(&mut self, size: Size) {
        self.origin = text::origin(size, &self.options.text);
    }

    fn update(&mut self, ctx: &FrameCtx<'_>) {
        self.hovering = ctx.pointer.position.is_some_and(|p| self.over_text(p));
        let boost = if self.hovering {
            self.options.hover_boost
        } else {
            1.0
        };
        self.phase = (self.phase + ctx.dt * self.options.speed * boost).rem_euclid(1.0);
    }

    fn settle(&mut self) {
        self.phase = 0.0;
    }

    fn render(&self, area: Rect, buf: &mut Buffer, theme: &FxTheme) {
        let slots = text::slots(&self.options.text, (0, 0));
        let glyphs: Vec<Glyph> = self
            .options
            .text
            .chars()
            .zip(slots)
            .map(|(ch, slot)| Glyph {
                ch,
                offset: Vec2::ZERO,
                opacity: 1.0,
                color: self.color_at(slot.x),
                bold: self.hovering,
            })
            .collect();
        let origin = (area.x + self.origin.0, area.y + self.origin.1);
        render::render_glyphs(area, buf, origin, &glyphs, theme.background);
    }

    fn is_idle(&self) -> bool {
        self.options.speed == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui_fx_core::physics::PointerState;

    #[test]
    fn gradient_loops_through_stops() {
        let colors = [Rgb::new(0, 0, 0), Rgb::new(200, 0, 0)];
        assert_eq!(gradient_at(&colors, 0.0), colors[0]);
        assert_eq!(gradient_at(&colors, 0.5), colors[1]);
        assert_eq!(gradient_at(&colors, 1.0), colors[0]);
        assert_eq!(gradient_at(&colors, -0.5), colors[1]);
        assert_eq!(gradient_at(&colors, f32::NAN), colors[0]);
        assert_eq!(gradient_at(&[], 0.3), Rgb::WHITE);
    }

    #[test]
    fn hover_speeds_up_the_sweep() {
        let size = Size::new(30, 3);
        let mut calm = GradientText::from_props(&Props::new());
        let mut hovered = GradientText::from_props(&Props::new());
        calm.rebuild(size);
        hovered.rebuild(size);
        let away = PointerState::default();
        let over = PointerState {
            position: Some(Vec2::new(15.0, 1.5)),
            pressed: false,
        };
        for _ in 0..10 {
            calm.update(&FrameCtx {
                dt: 1.0 / 60.0,
                time: 0.0,
                pointer: &away,
                size,
            });
            hovered.update(&FrameCtx {
                dt: 1.0 / 60.0,
                time: 0.0,
                pointer: &over,
                size,
            });
        }
        assert!(hovered.phase() > calm.phase() * 2.0);
    }

    #[test]
    fn neighbouring_letters_get_different_colors() {
        let fx = GradientText::from_props(&Props::new());
        assert_ne!(fx.color_at(0.0), fx.color_at(4.0));
    }
}
