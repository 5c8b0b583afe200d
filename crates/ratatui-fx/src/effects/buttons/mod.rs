//! Buttons with pointer and click feedback. Every button also answers Enter and Space, which press
//! it at its center.

pub mod burst;
pub mod magnetic;
pub mod ripple;
pub mod shimmer;

pub use burst::BurstButton;
pub use magnetic::MagneticButton;
pub use ripple::RippleButton;
pub use shimmer::ShimmerButton;

use crate::effects;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::layout::Size;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui_fx_core::input::KeyCode;
use ratatui_fx_core::input::KeyEvent;
use ratatui_fx_core::math::Vec2;
use ratatui_fx_core::props::Props;
use ratatui_fx_core::render;
use ratatui_fx_core::theme::FxTheme;

/// Label and padding shared by the button effects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ButtonFace {
    pub label: String,
    /// Columns of padding on each side of the label.
    pub padding: u16,
}

impl ButtonFace {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            padding: 3,
        }
    }

    pub fn from_props(p: &Props, d: ButtonFace) -> Self {
        Self {
            label: p.text("label", &d.label),
            padding: p.count("padding", d.padding as usize).min(64) as u16,
        }
    }

    /// Button rectangle (border included), centered in an area of `size`.
    pub fn rect(&self, size: Size) -> Rect {
        let width = render::text_width(&self.label)
            .saturating_add(self.padding * 2)
            .saturating_add(2);
        effects::centered_local(size, width, 3)
    }

    /// Border plus centered label. `rect` is in buffer coordinates.
    pub fn render(&self, rect: Rect, buf: &mut Buffer, border: Style, theme: &FxTheme) {
        effects::frame(rect, buf, border);
        if rect.height < 3 || rect.width < 3 {
            return;
        }
        let inner_w = rect.width - 2;
        let w = render::text_width(&self.label).min(inner_w);
        let x = rect.x + 1 + (inner_w - w) / 2;
        let style = Style::default()
            .fg(theme.foreground.to_color())
            .add_modifier(Modifier::BOLD);
        render::render_str_clipped(x, rect.y + 1, 0, w, buf, &self.label, style);
    }
}

pub(crate) fn contains(rect: Rect, p: Vec2) -> bool {
    p.x >= rect.x as f32
        && p.y >= rect.y as f32
        && p.x < (rect.x + rect.width) as f32
        && p.y < (rect.y + rect.height) as f32
}

pub(crate) fn center(rect: Rect) -> Vec2 {
    Vec2::new(
        rect.x as f32 + rect.width as f32 / 2.0,
        rect.y as f32 + rect.height as f32 / 2.0,
    )
}

/// `true` for the keys that activate a focused button.
pub(crate) fn is_activation(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Enter | KeyCode::Char(' '))
}
