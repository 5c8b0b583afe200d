//! A card whose border carries a travelling beam of light. Hovering the card speeds the beam up.

use super::CardText;
use crate::effects;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::layout::Size;
use ratatui::style::Style;
use ratatui_fx_core::color::Rgb;
use ratatui_fx_core::effect::Effect;
use ratatui_fx_core::effect::FrameCtx;
use ratatui_fx_core::math;
use ratatui_fx_core::props;
use ratatui_fx_core::props::Props;
use ratatui_fx_core::theme::FxTheme;

#[derive(Clone, Debug)]
pub struct BorderBeamOptions {
    pub text: CardText,
    /// Seconds per lap.
    pub duration: f32,
    /// Beam length in border cells.
    pub length: usize,
    /// Speed multiplier while the pointer is over the card.
    pub hover_boost: f32,
    pub color_from: Rgb,
    pub color_to: Rgb,
}

impl Default for BorderBeamOptions {
    fn default() -> Self {
        Self {
            text: CardText {
                title: "Border beam".to_string(),
                ..CardText::default()
            },
            duration: 4.0,
            length: 12,
            hover_boost: 2.0,
            color_from: Rgb::new(255, 170, 64),
            color_to: Rgb::new(156, 64, 255),
        }
    }
}

impl BorderBeamOptions {
    pub fn from_props(p: &Props) -> Self {
        let d = Self::default();
        Self {
            text: CardText::from_props(p, d.text),
            duration: p.positive_f32("duration", d.duration),
            length: p.count("length", d.length),
            hover_boost: p.positive_f32("hoverBoost", d.hover_boost),
            color_from: p.color("colorFrom", d.color_from),
            color_to: p.color("colorTo", d.color_to),
        }
    }

    pub fn normalized(self) -> Self {
        let d = Self::default();
        Self {
            duration: props::positive_or(self.duration, d.duration),
            length: props::count_or(self.length, d.length),
            hover_boost: props::positive_or(self.hover_boost, d.hover_boost),
            ..self
        }
    }
}

/// Border cells of `rect` in clockwise order starting at the top-left corner.
pub fn perimeter(rect: Rect) -> Vec<(u16, u16)> {
    let mut cells = Vec::new();
    if rect.width == 0 || rect.height == 0 {
        return cells;
    }
    let (x0, y0) = (rect.x, rect.y);
    let (x1, y1) = (rect.x + rect.width - 1, rect.y + rect.height - 1);
    if rect.height == 1 {
        return (x0..=x1).map(|x| (x, y0)).collect();
    }
    if rect.width == 1 {
        return (y0..=y1).map(|y| (x0, y)).collect();
    }
    cells.extend((x0..x1).map(|x| (x, y0)));
    cells.extend((y0..y1).map(|y| (x1, y)));
    cells.extend((x0 + 1..=x1).rev().map(|x| (x, y1)));
    cells.extend((y0 + 1..=y1).rev().map(|y| (x0, y)));
    cells
}

pub struct BorderBeam {
    options: BorderBeamOptions,
    card: Rect,
    path: Vec<(u16, u16)>,
    /// Lap progress in [0, 1).
    head: f32,
    hovered: bool,
}

impl BorderBeam {
    pub fn new(options: BorderBeamOptions) -> Self {
        Self {
            options: options.normalized(),
            card: Rect::default(),
            path: Vec::new(),
            head: 0.0,
            hovered: false,
        }
    }

    pub fn from_props(props: &Props) -> Self {
        Self::new(BorderBeamOptions::from_props(props))
    }

    pub fn head(&self) -> f32 {
        self.head
    }

    /// Border cells lit by the beam with their brightness, head first.
    pub fn lit_cells(&self) -> Vec<((u16, u16), f32)> {
        let n = self.path.len();
        if n == 0 {
            return Vec::new();
        }
        let head = (self.head * n as f32) as usize % n;
        let len = self.options.length.min(n);
        (0..len)
            .map(|k| {
                let i = (head + n - k) % n;
                (self.path[i], 1.0 - k as f32 / len as f32)
            })
            .collect()
    }
}

impl Effect for BorderBeam {
    fn rebuild(&mut self, size: Size) {
        self.card = self.options.text.rect(size);
        self.path = perimeter(self.card);
        self.head = 0.0;
    }

    fn update(&mut self, ctx: &FrameCtx<'_>) {
        let card = self.card;
        self.hovered = ctx.pointer.position.is_some_and(|p| {
            p.x >= card.x as f32
                && p.y >= card.y as f32
                && p.x < (card.x + card.width) as f32
                && p.y < (card.y + card.height) as f32
        });
        let boost = if self.hovered {
            self.options.hover_boost
        } else {
            1.0
        };
        self.head = (self.head + ctx.dt * boost / self.options.duration).fract();
    }

    fn settle(&mut self) {
        self.head = 0.0;
        self.hovered = false;
    }

    fn render(&self, area: Rect, buf: &mut Buffer, theme: &FxTheme) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let card = effects::offset(area, self.card);
        effects::frame(card, buf, Style::default().fg(theme.muted.to_color()));
        self.options.text.render(card, (0, 0), buf, theme);
        for ((x, y), t) in self.lit_cells() {
            let color = self
                .options
                .color_to
                .lerp(self.options.color_from, t)
                .scale(math::lerp(0.3, 1.0, t));
            let (bx, by) = (area.x + x, area.y + y);
            if bx >= area.right() || by >= area.bottom() {
                continue;
            }
            if let Some(cell) = buf.cell_mut((bx, by)) {
                cell.set_fg(color.to_color());
            }
        }
    }
}
