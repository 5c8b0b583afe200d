//! A button that leans toward a nearby pointer as if magnetised, then springs back.

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
use ratatui_fx_core::math::Vec2;
use ratatui_fx_core::physics;
use ratatui_fx_core::physics::Spring;
use ratatui_fx_core::props;
use ratatui_fx_core::props::Props;
use ratatui_fx_core::theme::FxTheme;

#[derive(Clone, Debug)]
pub struct MagneticOptions {
    pub face: ButtonFace,
    /// Distance (aspect corrected) at which the magnet starts pulling.
    pub radius: f32,
    /// Fraction of the pointer offset the button follows, in (0, 1).
    pub pull: f32,
    /// Largest offset in cells.
    pub max_offset: f32,
    pub color: Rgb,
}

impl Default for MagneticOptions {
    fn default() -> Self {
        Self {
            face: ButtonFace::new("Magnetic"),
            radius: 18.0,
            pull: 0.35,
            max_offset: 3.0,
            color: Rgb::new(124, 92, 255),
        }
    }
}

impl MagneticOptions {
    pub fn from_props(p: &Props) -> Self {
        let d = Self::default();
        Self {
            face: ButtonFace::from_props(p, d.face),
            radius: p.positive_f32("radius", d.radius),
            pull: p.unit_f32("pull", d.pull),
            max_offset: p.positive_f32("maxOffset", d.max_offset),
            color: p.color("color", d.color),
        }
    }

    pub fn normalized(self) -> Self {
        let d = Self::default();
        Self {
            radius: props::positive_or(self.radius, d.radius),
            pull: props::unit_or(self.pull, d.pull),
            max_offset: props::positive_or(self.max_offset, d.max_offset),
            ..self
        }
    }
}

pub struct MagneticButton {
    options: MagneticOptions,
    home: Rect,
    size: Size,
    offset: Spring,
    presses: u32,
}

impl MagneticButton {
    pub fn new(options: MagneticOptions) -> Self {
        Self {
            options: options.normalized(),
            home: Rect::default(),
            size: Size::new(0, 0),
            offset: Spring::new(0.18, 0.72),
            presses: 0,
        }
    }

    pub fn from_props(props: &Props) -> Self {
        Self::new(MagneticOptions::from_props(props))
    }

    pub fn offset(&self) -> Vec2 {
        self.offset.value
    }

    pub fn presses(&self) -> u32 {
        self.presses
    }

    /// Offset the button wants for a pointer at `p`.
    pub fn target_offset(&self, p: Option<Vec2>) -> Vec2 {
        let Some(p) = p else {
            return Vec2::ZERO;
        };
        let delta = p - buttons::center(self.home);
        let d = delta.aspect_corrected().length();
        if physics::pointer_falloff(d, self.options.radius) == 0.0 {
            return Vec2::ZERO;
        }
        let want = delta * self.options.pull;
        let max = self.options.max_offset;
        Vec2::new(want.x.clamp(-max, max), want.y.clamp(-max / 2.0, max / 2.0))
    }

    /// Current button rectangle in local coordinates, kept inside the area.
    pub fn rect(&self) -> Rect {
        let o = self.offset.value;
        let max_x = self.size.width.saturating_sub(self.home.width) as f32;
        let max_y = self.size.height.saturating_sub(self.home.height) as f32;
        let x = (self.home.x as f32 + o.x).round().clamp(0.0, max_x) as u16;
        let y = (self.home.y as f32 + o.y).round().clamp(0.0, max_y) as u16;
        Rect::new(x, y, self.home.width, self.home.height)
    }
}

impl Effect for MagneticButton {
    fn rebuild(&mut self, size: Size) {
        self.size = size;
        self.home = self.options.face.rect(size);
        self.offset.snap(Vec2::ZERO);
    }

    fn update(&mut self, ctx: &FrameCtx<'_>) {
        let target = self.target_offset(ctx.pointer.position);
        self.offset.step(target);
    }

    fn settle(&mut self) {
        self.offset.snap(Vec2::ZERO);
    }

    fn render(&self, area: Rect, buf: &mut Buffer, theme: &FxTheme) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let rect = effects::offset(area, self.rect());
        let strength = (self.offset.value.length() / self.options.max_offset).min(1.0);
        let border = theme.muted.lerp(self.options.color, 0.4 + 0.6 * strength);
        self.options
            .face
            .render(rect, buf, Style::default().fg(border.to_color()), theme);
    }

    fn press(&mut self, at: Vec2) {
        if buttons::contains(self.rect(), at) {
            self.presses += 1;
        }
    }

    fn key(&mut self, key: &KeyEvent) -> bool {
        if buttons::is_activation(key) {
            self.presses += 1;
            return true;
        }
        false
    }

    fn is_idle(&self) -> bool {
        self.offset.is_resting_at(Vec2::ZERO, 1e-3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui_fx_core::keymap;
    use ratatui_fx_core::physics::PointerState;

    #[test]
    fn leans_toward_pointer_within_limits() {
        let mut fx = MagneticButton::from_props(&Props::new());
        let size = Size::new(40, 11);
        fx.rebuild(size);
        let center = buttons::center(fx.rect());
        let pointer = PointerState {
            position: Some(center + Vec2::new(10.0, 0.0)),
            pressed: false,
        };
        for _ in 0..200 {
            fx.update(&FrameCtx {
                dt: 1.0 / 60.0,
                time: 0.0,
                pointer: &pointer,
                size,
            });
        }
        assert!((fx.offset().x - 3.0).abs() < 0.01);
        assert!(fx.rect().x > fx.home.x);
    }

    #[test]
    fn far_pointer_has_no_pull() {
        let mut fx = MagneticButton::from_props(&Props::new());
        fx.rebuild(Size::new(80, 20));
        let far = buttons::center(fx.home) + Vec2::new(30.0, 0.0);
        assert_eq!(fx.target_offset(Some(far)), Vec2::ZERO);
        assert_eq!(fx.target_offset(None), Vec2::ZERO);
    }

    #[test]
    fn enter_and_clicks_count_as_presses() {
        let mut fx = MagneticButton::from_props(&Props::new());
        fx.rebuild(Size::new(40, 11));
        assert!(fx.key(&keymap::key_code(ratatui_fx_core::input::KeyCode::Enter)));
        assert!(!fx.key(&keymap::key_char('x')));
        fx.press(buttons::center(fx.rect()));
        fx.press(Vec2::new(0.0, 0.0));
        assert_eq!(fx.presses(), 2);
    }
}
