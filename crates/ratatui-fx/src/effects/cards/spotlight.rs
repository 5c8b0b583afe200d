//! A card lit by a soft spotlight that trails the pointer and lights up the border it passes.

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
use ratatui_fx_core::physics;
use ratatui_fx_core::physics::Spring;
use ratatui_fx_core::props;
use ratatui_fx_core::props::Props;
use ratatui_fx_core::theme::FxTheme;

#[derive(Clone, Debug)]
pub struct SpotlightOptions {
    pub text: CardText,
    pub radius: f32,
    /// Peak spotlight brightness, in (0, 1).
    pub intensity: f32,
    /// Opacity change per second when the pointer enters or leaves.
    pub fade_speed: f32,
    pub color: Rgb,
}

impl Default for SpotlightOptions {
    fn default() -> Self {
        Self {
            text: CardText {
                title: "Spotlight".to_string(),
                ..CardText::default()
            },
            radius: 14.0,
            intensity: 0.6,
            fade_speed: 4.0,
            color: Rgb::new(180, 160, 255),
        }
    }
}

impl SpotlightOptions {
    pub fn from_props(p: &Props) -> Self {
        let d = Self::default();
        Self {
            text: CardText::from_props(p, d.text),
            radius: p.positive_f32("radius", d.radius),
            intensity: p.unit_f32("intensity", d.intensity),
            fade_speed: p.positive_f32("fadeSpeed", d.fade_speed),
            color: p.color("color", d.color),
        }
    }

    pub fn normalized(self) -> Self {
        let d = Self::default();
        Self {
            radius: props::positive_or(self.radius, d.radius),
            intensity: props::unit_or(self.intensity, d.intensity),
            fade_speed: props::positive_or(self.fade_speed, d.fade_speed),
            ..self
        }
    }
}

pub struct SpotlightCard {
    options: SpotlightOptions,
    card: Rect,
    light: Spring,
    opacity: f32,
    canvas: FxCanvas,
}

impl SpotlightCard {
    pub fn new(options: SpotlightOptions) -> Self {
        Self {
            options: options.normalized(),
            card: Rect::default(),
            light: Spring::new(0.25, 0.6),
            opacity: 0.0,
            canvas: FxCanvas::default(),
        }
    }

    pub fn from_props(props: &Props) -> Self {
        Self::new(SpotlightOptions::from_props(props))
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn light_position(&self) -> Vec2 {
        self.light.value
    }

    fn contains(&self, p: Vec2) -> bool {
        p.x >= self.card.x as f32
            && p.y >= self.card.y as f32
            && p.x < (self.card.x + self.card.width) as f32
            && p.y < (self.card.y + self.card.height) as f32
    }

    fn paint(&mut self) {
        self.canvas.clear();
        if self.opacity <= 0.0 {
            return;
        }
        let peak = self.options.intensity * self.opacity;
        for y in self.card.y..self.card.y + self.card.height {
            for x in self.card.x..self.card.x + self.card.width {
                let cell = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let d = (cell - self.light.value).aspect_corrected().length();
                let glow = physics::pointer_falloff(d, self.options.radius);
                let alpha = math::smoothstep(0.0, 1.0, glow) * peak;
                self.canvas.plot(x as f32, y as f32, alpha, self.options.color);
            }
        }
    }
}

impl Effect for SpotlightCard {
    fn rebuild(&mut self, size: Size) {
        self.card = self.options.text.rect(size);
        self.canvas.resize(size.width, size.height);
        let center = Vec2::new(
            self.card.x as f32 + self.card.width as f32 / 2.0,
            self.card.y as f32 + self.card.height as f32 / 2.0,
        );
        self.light.snap(center);
        self.opacity = 0.0;
        self.paint();
    }

    fn update(&mut self, ctx: &FrameCtx<'_>) {
        let inside = ctx.pointer.position.filter(|p| self.contains(*p));
        let step = self.options.fade_speed * ctx.dt;
        match inside {
            Some(p) => {
                self.light.step(p);
                self.opacity = math::clamp01(self.opacity + step);
            }
            None => self.opacity = math::clamp01(self.opacity - step),
        }
        self.paint();
    }

    fn settle(&mut self) {
        self.opacity = 0.0;
        self.paint();
    }

    fn render(&self, area: Rect, buf: &mut Buffer, theme: &FxTheme) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let card = effects::offset(area, self.card);
        self.canvas.flush(area, buf, ramp::BLOCKS, theme.base_style());
        // border brightens where the light is
        let lit = theme.muted.lerp(self.options.color, self.opacity);
        effects::frame(card, buf, Style::default().fg(lit.to_color()));
        self.options.text.render(card, (0, 0), buf, theme);
    }

    fn is_idle(&self) -> bool {
        self.opacity == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui_fx_core::physics::PointerState;

    fn step(fx: &mut SpotlightCard, pointer: &PointerState, size: Size, n: usize) {
        for _ in 0..n {
            fx.update(&FrameCtx {
                dt: 1.0 / 60.0,
                time: 0.0,
                pointer,
                size,
            });
        }
    }

    #[test]
    fn light_fades_in_follows_and_fades_out() {
        let mut fx = SpotlightCard::from_props(&Props::new());
        let size = Size::new(40, 11);
        fx.rebuild(size);
        let target = Vec2::new(10.0, 3.0);
        let inside = PointerState {
            position: Some(target),
            pressed: false,
        };
        step(&mut fx, &inside, size, 120);
        assert_eq!(fx.opacity(), 1.0);
        assert!(fx.light_position().distance(target) < 0.1);

        step(&mut fx, &PointerState::default(), size, 120);
        assert!(fx.is_idle());
    }

    #[test]
    fn pointer_outside_the_card_is_ignored() {
        let mut fx = SpotlightCard::from_props(&Props::new().with("width", 10));
        let size = Size::new(40, 11);
        fx.rebuild(size);
        let outside = PointerState {
            position: Some(Vec2::new(1.0, 1.0)),
            pressed: false,
        };
        step(&mut fx, &outside, size, 30);
        assert_eq!(fx.opacity(), 0.0);
    }

    #[test]
    fn renders_border_and_title() {
        let mut fx = SpotlightCard::from_props(&Props::new().with("width", 20).with("height", 5));
        let area = Rect::new(0, 0, 20, 5);
        fx.rebuild(Size::new(20, 5));
        let mut buf = Buffer::empty(area);
        fx.render(area, &mut buf, &FxTheme::default());
        assert!(ratatui_fx_core::render::row_text(&buf, area, 0).starts_with('╭'));
        assert!(ratatui_fx_core::render::row_text(&buf, area, 1).contains("Spotlight"));
    }
}
