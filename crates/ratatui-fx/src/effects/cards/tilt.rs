//! A card that tilts toward the pointer. Tilt is spring-smoothed and shown as a light gradient
//! across the face plus a small parallax shift of the content.

use super::CardText;
use crate::effects;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::layout::Size;
use ratatui::style::Style;
use ratatui_fx_core::canvas::FxCanvas;
use ratatui_fx_core::canvas::ramp;
use ratatui_fx_core::color::Rgb;
use ratatui_fx_core::effect::Effect;
use ratatui_fx_core::effect::FrameCtx;
use ratatui_fx_core::math;
use ratatui_fx_core::math::Vec2;
use ratatui_fx_core::physics::Spring;
use ratatui_fx_core::props;
use ratatui_fx_core::props::Props;
use ratatui_fx_core::theme::FxTheme;

#[derive(Clone, Debug)]
pub struct TiltOptions {
    pub text: CardText,
    /// Strength of the shading gradient at full tilt, in (0, 1).
    pub max_tilt: f32,
    /// Content shift in cells at full tilt.
    pub parallax: f32,
    pub stiffness: f32,
    pub damping: f32,
    pub color: Rgb,
}

impl Default for TiltOptions {
    fn default() -> Self {
        Self {
            text: CardText {
                title: "Tilt".to_string(),
                ..CardText::default()
            },
            max_tilt: 0.5,
            parallax: 1.0,
            stiffness: 0.12,
            damping: 0.7,
            color: Rgb::new(120, 180, 255),
        }
    }
}

impl TiltOptions {
    pub fn from_props(p: &Props) -> Self {
        let d = Self::default();
        Self {
            text: CardText::from_props(p, d.text),
            max_tilt: p.unit_f32("maxTilt", d.max_tilt),
            parallax: p.non_negative_f32("parallax", d.parallax),
            stiffness: p.unit_f32("stiffness", d.stiffness),
            damping: p.unit_f32("damping", d.damping),
            color: p.color("color", d.color),
        }
    }

    pub fn normalized(self) -> Self {
        let d = Self::default();
        Self {
            max_tilt: props::unit_or(self.max_tilt, d.max_tilt),
            parallax: props::non_negative_or(self.parallax, d.parallax),
            stiffness: props::unit_or(self.stiffness, d.stiffness),
            damping: props::unit_or(self.damping, d.damping),
            ..self
        }
    }
}

/// Tilt target in [-1, 1] on both axes for a pointer at `p` over `card`.
pub fn tilt_target(card: Rect, p: Vec2) -> Vec2 {
    if card.width == 0 || card.height == 0 {
        return Vec2::ZERO;
    }
    let half = Vec2::new(card.width as f32 / 2.0, card.height as f32 / 2.0);
    let center = Vec2::new(card.x as f32, card.y as f32) + half;
    let rel = p - center;
    Vec2::new(
        (rel.x / half.x).clamp(-1.0, 1.0),
        (rel.y / half.y).clamp(-1.0, 1.0),
    )
}

pub struct TiltCard {
    options: TiltOptions,
    card: Rect,
    tilt: Spring,
    canvas: FxCanvas,
}

impl TiltCard {
    pub fn new(options: TiltOptions) -> Self {
        let options = options.normalized();
        let tilt = Spring::new(options.stiffness, options.damping);
        Self {
            options,
            card: Rect::default(),
            tilt,
            canvas: FxCanvas::default(),
        }
    }

    pub fn from_props(props: &Props) -> Self {
        Self::new(TiltOptions::from_props(props))
    }

    pub fn tilt(&self) -> Vec2 {
        self.tilt.value
    }

    fn contains(&self, p: Vec2) -> bool {
        p.x >= self.card.x as f32
            && p.y >= self.card.y as f32
            && p.x < (self.card.x + self.card.width) as f32
            && p.y < (self.card.y + self.card.height) as f32
    }

    fn shift(&self) -> (i16, i16) {
        let s = self.tilt.value * self.options.parallax;
        (s.x.round() as i16, s.y.round() as i16)
    }

    fn paint(&mut self) {
        self.canvas.clear();
        let card = self.card;
        if card.width == 0 || card.height == 0 {
            return;
        }
        let tilt = self.tilt.value;
        for y in card.y..card.y + card.height {
            for x in card.x..card.x + card.width {
                let cell = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let n = tilt_target(card, cell);
                // the side tilted toward the viewer catches the light
                let lit = (n.x * tilt.x + n.y * tilt.y) * self.options.max_tilt;
                let alpha = math::clamp01(0.2 + lit);
                self.canvas.plot(x as f32, y as f32, alpha, self.options.color);
            }
        }
    }
}

impl Effect for TiltCard {
    fn rebuild(&mut self, size: Size) {
        self.card = self.options.text.rect(size);
        self.canvas.resize(size.width, size.height);
        self.tilt.snap(Vec2::ZERO);
        self.paint();
    }

    fn update(&mut self, ctx: &FrameCtx<'_>) {
        let target = match ctx.pointer.position {
            Some(p) if self.contains(p) => tilt_target(self.card, p),
            _ => Vec2::ZERO,
        };
        self.tilt.step(target);
        self.paint();
    }

    fn settle(&mut self) {
        self.tilt.snap(Vec2::ZERO);
        self.paint();
    }

    fn render(&self, area: Rect, buf: &mut Buffer, theme: &FxTheme) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let card = effects::offset(area, self.card);
        self.canvas.flush(area, buf, ramp::BLOCKS, theme.base_style());
        effects::frame(card, buf, Style::default().fg(theme.accent.to_color()));
        self.options.text.render(card, self.shift(), buf, theme);
    }

    fn is_idle(&self) -> bool {
        self.tilt.is_resting_at(Vec2::ZERO, 1e-3)
    }
}
