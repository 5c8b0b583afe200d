//! A button that spreads a ripple from the exact spot it was clicked.

use super::ButtonFace;
use crate::effects;
use crate::effects::buttons;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::layout::Size;
use ratatui::style::Style;
use ratatui_fx_core::canvas::FxCanvas;
use ratatui_fx_core::canvas::ramp;
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
pub struct RippleButtonOptions {
    pub face: ButtonFace,
    /// Seconds a ripple lives.
    pub duration: f32,
    /// Ring thickness in cells.
    pub thickness: f32,
    pub color: Rgb,
}

impl Default for RippleButtonOptions {
    fn default() -> Self {
        Self {
            face: ButtonFace::new("Ripple"),
            duration: 0.6,
            thickness: 2.0,
            color: Rgb::new(56, 214, 255),
        }
    }
}

impl RippleButtonOptions {
    pub fn from_props(p: &Props) -> Self {
        let d = Self::default();
        Self {
            face: ButtonFace::from_props(p, d.face),
            duration: p.positive_f32("duration", d.duration),
            thickness: p.positive_f32("thickness", d.thickness),
            color: p.color("color", d.color),
        }
    }

    pub fn normalized(self) -> Self {
        let d = Self::default();
        Self {
            duration: props::positive_or(self.duration, d.duration),
            thickness: props::positive_or(self.thickness, d.thickness),
            ..self
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ButtonRipple {
    pub origin: Vec2,
    pub age: f32,
}

pub struct RippleButton {
    options: RippleButtonOptions,
    rect: Rect,
    ripples: Vec<ButtonRipple>,
    canvas: FxCanvas,
}

impl RippleButton {
    pub fn new(options: RippleButtonOptions) -> Self {
        Self {
            options: options.normalized(),
            rect: Rect::default(),
            ripples: Vec::new(),
            canvas: FxCanvas::default(),
        }
    }

    pub fn from_props(props: &Props) -> Self {
        Self::new(RippleButtonOptions::from_props(props))
    }

    pub fn ripples(&self) -> &[ButtonRipple] {
        &self.ripples
    }

    /// Radius that lets a ripple from anywhere reach every corner.
    fn reach(&self) -> f32 {
        Vec2::new(self.rect.width as f32, self.rect.height as f32)
            .aspect_corrected()
            .length()
    }

    fn paint(&mut self) {
        self.canvas.clear();
        let reach = self.reach();
        let duration = self.options.duration;
        let thickness = self.options.thickness;
        let r = self.rect;
        if r.width < 3 || r.height < 3 {
            return;
        }
        for ripple in &self.ripples {
            let t = math::clamp01(ripple.age / duration);
            let radius = math::ease_out_cubic(t) * reach;
            let fade = 1.0 - t;
            for y in r.y + 1..r.y + r.height - 1 {
                for x in r.x + 1..r.x + r.width - 1 {
                    let cell = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                    let d = (cell - ripple.origin).aspect_corrected().length();
                    // inside the wave front the button stays tinted
                    let band = if d <= radius {
                        0.35 + 0.65 * math::clamp01(1.0 - (radius - d) / thickness)
                    } else {
                        0.0
                    };
                    self.canvas
                        .plot(x as f32, y as f32, band * fade, self.options.color);
                }
            }
        }
    }
}

impl Effect for RippleButton {
    fn rebuild(&mut self, size: Size) {
        self.rect = self.options.face.rect(size);
        self.canvas.resize(size.width, size.height);
        self.ripples.clear();
        self.paint();
    }

    fn update(&mut self, ctx: &FrameCtx<'_>) {
        for r in &mut self.ripples {
            r.age += ctx.dt;
        }
        let duration = self.options.duration;
        self.ripples.retain(|r| r.age < duration);
        self.paint();
    }

    fn settle(&mut self) {
        self.ripples.clear();
        self.paint();
    }

    fn render(&self, area: Rect, buf: &mut Buffer, theme: &FxTheme) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        self.canvas.flush(area, buf, ramp::BLOCKS, theme.base_style());
        let rect = effects::offset(area, self.rect);
        let border = if self.ripples.is_empty() {
            theme.muted
        } else {
            self.options.color
        };
        self.options
            .face
            .render(rect, buf, Style::default().fg(border.to_color()), theme);
    }

    fn press(&mut self, at: Vec2) {
        if buttons::contains(self.rect, at) {
            self.ripples.push(ButtonRipple {
                origin: at,
                age: 0.0,
            });
        }
    }

    fn key(&mut self, key: &KeyEvent) -> bool {
        if buttons::is_activation(key) {
            let origin = buttons::center(self.rect);
            self.ripples.push(ButtonRipple { origin, age: 0.0 });
            return true;
        }
        false
    }

    fn teardown(&mut self) {
        self.ripples.clear();
    }

    fn is_idle(&self) -> bool {
        self.ripples.is_empty()
    }
}
