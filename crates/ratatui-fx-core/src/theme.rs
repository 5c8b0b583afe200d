use crate::color::Rgb;
use ratatui::style::Style;

/// Base colors every effect draws from unless its own props override them.
#[derive(Clone, Debug)]
pub struct FxTheme {
    pub background: Rgb,
    pub foreground: Rgb,
    pub accent: Rgb,
    pub muted: Rgb,
    pub highlight: Rgb,
}

impl Default for FxTheme {
    fn default() -> Self {
        Self {
            background: Rgb::new(10, 10, 18),
            foreground: Rgb::new(228, 228, 240),
            accent: Rgb::new(124, 92, 255),
            muted: Rgb::new(90, 90, 110),
            highlight: Rgb::new(56, 214, 255),
        }
    }
}

impl FxTheme {
    pub fn base_style(&self) -> Style {
        Style::default()
            .bg(self.background.to_color())
            .fg(self.foreground.to_color())
    }

    pub fn muted_style(&self) -> Style {
        Style::default()
            .bg(self.background.to_color())
            .fg(self.muted.to_color())
    }
}
