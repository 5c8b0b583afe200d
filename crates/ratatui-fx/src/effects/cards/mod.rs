//! Bordered cards with pointer-reactive lighting.

pub mod border_beam;
pub mod spotlight;
pub mod tilt;

pub use border_beam::BorderBeam;
pub use spotlight::SpotlightCard;
pub use tilt::TiltCard;

use crate::effects;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::layout::Size;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui_fx_core::props::Props;
use ratatui_fx_core::render;
use ratatui_fx_core::theme::FxTheme;

/// Title and body shown inside a card, plus its preferred size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardText {
    pub title: String,
    pub body: String,
    pub width: u16,
    pub height: u16,
}

impl Default for CardText {
    fn default() -> Self {
        Self {
            title: "Card".to_string(),
            body: "Move the pointer over me.".to_string(),
            width: 36,
            height: 9,
        }
    }
}

impl CardText {
    /// Reads `title`, `body`, `width` and `height` on top of `d`.
    pub fn from_props(p: &Props, d: CardText) -> Self {
        Self {
            title: p.text("title", &d.title),
            body: p.text("body", &d.body),
            width: p.count("width", d.width as usize).min(u16::MAX as usize) as u16,
            height: p.count("height", d.height as usize).min(u16::MAX as usize) as u16,
        }
    }

    /// The card rectangle in local coordinates of an area of `size`.
    pub fn rect(&self, size: Size) -> Rect {
        effects::centered_local(size, self.width.max(4), self.height.max(3))
    }

    /// Writes the title and word-wrapped body inside `card` (buffer coordinates, border
    /// included). `shift` nudges the content for parallax.
    pub fn render(&self, card: Rect, shift: (i16, i16), buf: &mut Buffer, theme: &FxTheme) {
        let inner = Rect::new(
            card.x.saturating_add(2),
            card.y.saturating_add(1),
            card.width.saturating_sub(4),
            card.height.saturating_sub(2),
        );
        if inner.width == 0 || inner.height == 0 {
            return;
        }
        let x = (inner.x as i32 + shift.0 as i32).max(inner.x as i32) as u16;
        let y0 = (inner.y as i32 + shift.1 as i32).max(inner.y as i32) as u16;
        let max_cols = (inner.x + inner.width).saturating_sub(x);
        let bottom = inner.y + inner.height;
        let title_style = Style::default()
            .fg(theme.foreground.to_color())
            .add_modifier(Modifier::BOLD);
        if y0 < bottom {
            render::render_str_clipped(x, y0, 0, max_cols, buf, &self.title, title_style);
        }
        let body_style = Style::default().fg(theme.muted.to_color());
        for (i, line) in wrap_words(&self.body, max_cols as usize).iter().enumerate() {
            let y = y0 + 2 + i as u16;
            if y >= bottom {
                break;
            }
            render::render_str_clipped(x, y, 0, max_cols, buf, line, body_style);
        }
    }
}

/// Greedy word wrap by display width. Words longer than `width` are split.
pub(crate) fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    if width == 0 {
        return lines;
    }
    let mut line = String::new();
    let mut line_w = 0usize;
    for word in text.split_whitespace() {
        let mut word = word.to_string();
        loop {
            let w = render::text_width(&word) as usize;
            let needed = if line_w == 0 { w } else { line_w + 1 + w };
            if needed <= width {
                if line_w > 0 {
                    line.push(' ');
                }
                line.push_str(&word);
                line_w = needed;
                break;
            }
            if line_w > 0 {
                lines.push(std::mem::take(&mut line));
                line_w = 0;
                continue;
            }
            let split: String = word.chars().take(width).collect();
            let rest: String = word.chars().skip(width).collect();
            lines.push(split);
            if rest.is_empty() {
                break;
            }
            word = rest;
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}
