//! A tab strip with an underline that glides to the hovered tab and settles back on the selected
//! one when the pointer leaves.

use super::step_focus;
use crate::effects::buttons;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::layout::Size;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui_fx_core::color::Rgb;
use ratatui_fx_core::effect::Effect;
use ratatui_fx_core::effect::FrameCtx;
use ratatui_fx_core::input::KeyCode;
use ratatui_fx_core::input::KeyEvent;
use ratatui_fx_core::math::Vec2;
use ratatui_fx_core::physics::Spring;
use ratatui_fx_core::props;
use ratatui_fx_core::props::Props;
use ratatui_fx_core::render;
use ratatui_fx_core::theme::FxTheme;

#[derive(Clone, Debug)]
pub struct TabOptions {
    pub tabs: Vec<String>,
    /// Initially selected tab.
    pub selected: usize,
    /// Columns of padding on each side of a label.
    pub padding: u16,
    pub stiffness: f32,
    pub damping: f32,
    pub color: Rgb,
}

impl Default for TabOptions {
    fn default() -> Self {
        Self {
            tabs: ["Overview", "Activity", "Settings", "Help"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            selected: 0,
            padding: 2,
            stiffness: 0.2,
            damping: 0.7,
            color: Rgb::new(56, 214, 255),
        }
    }
}

impl TabOptions {
    pub fn from_props(p: &Props) -> Self {
        let d = Self::default();
        let defaults: Vec<&str> = d.tabs.iter().map(String::as_str).collect();
        // `selected` is an index, so zero is valid here
        let selected = p
            .get("selected")
            .and_then(|v| v.as_u64())
            .map_or(d.selected, |v| v.min(usize::MAX as u64) as usize);
        Self {
            tabs: p.string_list("tabs", &defaults),
            selected,
            padding: p.count("padding", d.padding as usize).min(16) as u16,
            stiffness: p.unit_f32("stiffness", d.stiffness),
            damping: p.unit_f32("damping", d.damping),
            color: p.color("color", d.color),
        }
    }

    pub fn normalized(self) -> Self {
        let d = Self::default();
        let tabs: Vec<String> = self
            .tabs
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let tabs = if tabs.is_empty() { d.tabs } else { tabs };
        Self {
            selected: self.selected.min(tabs.len() - 1),
            tabs,
            stiffness: props::unit_or(self.stiffness, d.stiffness),
            damping: props::unit_or(self.damping, d.damping),
            ..self
        }
    }
}

pub struct TabIndicator {
    options: TabOptions,
    /// Tab rectangles (one row tall) in local coordinates.
    tabs: Vec<Rect>,
    selected: usize,
    hovered: Option<usize>,
    /// Indicator left edge in `x`, width in `y`.
    indicator: Spring,
}

impl TabIndicator {
    pub fn new(options: TabOptions) -> Self {
        let options = options.normalized();
        let indicator = Spring::new(options.stiffness, options.damping);
        Self {
            selected: options.selected,
            options,
            tabs: Vec::new(),
            hovered: None,
            indicator,
        }
    }

    pub fn from_props(props: &Props) -> Self {
        Self::new(TabOptions::from_props(props))
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn tab_rects(&self) -> &[Rect] {
        &self.tabs
    }

    /// Indicator left edge and width, in columns.
    pub fn indicator(&self) -> (f32, f32) {
        (self.indicator.value.x, self.indicator.value.y)
    }

    fn target(&self) -> Vec2 {
        let index = self.hovered.unwrap_or(self.selected);
        self.tabs
            .get(index)
            .map_or(Vec2::ZERO, |r| Vec2::new(r.x as f32, r.width as f32))
    }

    /// Tab under `p`; the indicator row below the labels counts too.
    fn tab_at(&self, p: Vec2) -> Option<usize> {
        self.tabs.iter().position(|r| {
            let hit = Rect::new(r.x, r.y, r.width, r.height.saturating_add(1));
            buttons::contains(hit, p)
        })
    }
}

impl Effect for TabIndicator {
    fn rebuild(&mut self, size: Size) {
        let pad = self.options.padding;
        let widths: Vec<u16> = self
            .options
            .tabs
            .iter()
            .map(|t| render::text_width(t).saturating_add(pad * 2))
            .collect();
        let total = widths.iter().fold(0u16, |acc, w| acc.saturating_add(*w));
        let mut x = size.width.saturating_sub(total) / 2;
        let y = size.height.saturating_sub(2) / 2;
        self.tabs = widths
            .iter()
            .map(|&w| {
                let r = Rect::new(x, y, w, 1);
                x = x.saturating_add(w);
                r
            })
            .collect();
        self.hovered = None;
        self.indicator.snap(self.target());
    }

    fn update(&mut self, ctx: &FrameCtx<'_>) {
        self.hovered = ctx.pointer.position.and_then(|p| self.tab_at(p));
        self.indicator.step(self.target());
    }

    fn settle(&mut self) {
        self.hovered = None;
        self.indicator.snap(self.target());
    }

    fn render(&self, area: Rect, buf: &mut Buffer, theme: &FxTheme) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let pad = self.options.padding;
        for (i, (label, r)) in self.options.tabs.iter().zip(&self.tabs).enumerate() {
            if r.y >= area.height || r.x >= area.width {
                continue;
            }
            let x = r.x.saturating_add(pad);
            if x >= area.width {
                continue;
            }
            let mut style = Style::default().fg(theme.muted.to_color());
            if i == self.selected {
                style = Style::default()
                    .fg(theme.foreground.to_color())
                    .add_modifier(Modifier::BOLD);
            } else if self.hovered == Some(i) {
                style = Style::default().fg(theme.foreground.to_color());
            }
            render::render_str_clipped(
                area.x + x,
                area.y + r.y,
                0,
                area.width - x,
                buf,
                label,
                style,
            );
        }

        let Some(first) = self.tabs.first() else {
            return;
        };
        let row = first.y + 1;
        if row >= area.height {
            return;
        }
        let (left, width) = self.indicator();
        let start = left.round().max(0.0);
        let end = (left + width).round().min(area.width as f32);
        if end <= start {
            return;
        }
        let style = Style::default().fg(self.options.color.to_color());
        for x in start as u16..end as u16 {
            if let Some(cell) = buf.cell_mut((area.x + x, area.y + row)) {
                cell.set_symbol("━");
                cell.set_style(style);
            }
        }
    }

    fn press(&mut self, at: Vec2) {
        if let Some(i) = self.tab_at(at) {
            self.selected = i;
        }
    }

    fn key(&mut self, key: &KeyEvent) -> bool {
        if let Some(next) = step_focus(key, self.selected, self.options.tabs.len()) {
            self.selected = next;
            return true;
        }
        let KeyCode::Char(c) = key.code else {
            return false;
        };
        // digits jump straight to a tab, 1-based
        match c.to_digit(10).map(|d| d as usize) {
            Some(d) if d >= 1 && d <= self.options.tabs.len() => {
                self.selected = d - 1;
                true
            }
            _ => false,
        }
    }

    fn is_idle(&self) -> bool {
        self.indicator.is_resting_at(self.target(), 1e-3)
    }
}
