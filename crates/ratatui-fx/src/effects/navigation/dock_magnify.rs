//! A dock whose items grow and rise as the pointer sweeps over them, pushing their neighbours
//! aside. Each item's magnification is spring-smoothed.

use super::step_focus;
use crate::effects;
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
use ratatui_fx_core::math;
use ratatui_fx_core::math::Vec2;
use ratatui_fx_core::physics;
use ratatui_fx_core::physics::Spring;
use ratatui_fx_core::props;
use ratatui_fx_core::props::Props;
use ratatui_fx_core::render;
use ratatui_fx_core::theme::FxTheme;

const ITEM_HEIGHT: u16 = 3;
const GAP: u16 = 1;

#[derive(Clone, Debug)]
pub struct DockOptions {
    pub items: Vec<String>,
    /// Scale of the item right under the pointer; 1 disables the effect.
    pub magnification: f32,
    /// Horizontal distance over which neighbours are magnified.
    pub radius: f32,
    /// Extra columns on each side of a fully magnified item.
    pub spread: f32,
    /// Rows a fully magnified item rises.
    pub lift: f32,
    pub color: Rgb,
}

impl Default for DockOptions {
    fn default() -> Self {
        Self {
            items: ["Home", "Files", "Music", "Photos", "Mail", "Settings"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            magnification: 2.0,
            radius: 14.0,
            spread: 2.0,
            lift: 1.0,
            color: Rgb::new(124, 92, 255),
        }
    }
}

impl DockOptions {
    pub fn from_props(p: &Props) -> Self {
        let d = Self::default();
        let defaults: Vec<&str> = d.items.iter().map(String::as_str).collect();
        Self {
            items: p.string_list("items", &defaults),
            magnification: p.positive_f32("magnification", d.magnification),
            radius: p.positive_f32("radius", d.radius),
            spread: p.non_negative_f32("spread", d.spread),
            lift: p.non_negative_f32("lift", d.lift),
            color: p.color("color", d.color),
        }
    }

    pub fn normalized(self) -> Self {
        let d = Self::default();
        let items: Vec<String> = self
            .items
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let magnification = if self.magnification.is_finite() && self.magnification >= 1.0 {
            self.magnification
        } else {
            d.magnification
        };
        Self {
            items: if items.is_empty() { d.items } else { items },
            magnification,
            radius: props::positive_or(self.radius, d.radius),
            spread: props::non_negative_or(self.spread, d.spread),
            lift: props::non_negative_or(self.lift, d.lift),
            ..self
        }
    }
}

pub struct DockMagnify {
    options: DockOptions,
    size: Size,
    /// Rest layout, used to measure pointer distance so growth cannot feed back into itself.
    homes: Vec<Rect>,
    /// Magnification per item in `x`; `y` is unused.
    scales: Vec<Spring>,
    targets: Vec<f32>,
    focus: usize,
    keyboard: bool,
    selected: Option<usize>,
}

impl DockMagnify {
    pub fn new(options: DockOptions) -> Self {
        let options = options.normalized();
        let n = options.items.len();
        Self {
            options,
            size: Size::new(0, 0),
            homes: Vec::new(),
            scales: vec![Self::spring(); n],
            targets: vec![1.0; n],
            focus: 0,
            keyboard: false,
            selected: None,
        }
    }

    pub fn from_props(props: &Props) -> Self {
        Self::new(DockOptions::from_props(props))
    }

    fn spring() -> Spring {
        let mut s = Spring::new(0.22, 0.68);
        s.snap(Vec2::new(1.0, 0.0));
        s
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn scale(&self, index: usize) -> f32 {
        self.scales.get(index).map_or(1.0, |s| s.value.x)
    }

    /// Magnification progress in [0, 1] for item `index`.
    fn growth(&self, index: usize) -> f32 {
        let span = self.options.magnification - 1.0;
        if span <= 0.0 {
            return 0.0;
        }
        math::clamp01((self.scale(index) - 1.0) / span)
    }

    fn base_width(label: &str) -> u16 {
        render::text_width(label).saturating_add(4)
    }

    fn baseline(&self) -> u16 {
        let lift = self.options.lift.ceil() as u16;
        let y = self.size.height.saturating_sub(ITEM_HEIGHT) / 2 + lift;
        y.min(self.size.height.saturating_sub(ITEM_HEIGHT))
    }

    fn row(&self, widths: &[u16], lifts: &[u16]) -> Vec<Rect> {
        let gaps = GAP.saturating_mul(widths.len().saturating_sub(1) as u16);
        let total = widths
            .iter()
            .fold(0u16, |acc, w| acc.saturating_add(*w))
            .saturating_add(gaps);
        let mut x = self.size.width.saturating_sub(total) / 2;
        let y = self.baseline();
        widths
            .iter()
            .zip(lifts)
            .map(|(&w, &lift)| {
                let r = Rect::new(x, y.saturating_sub(lift), w, ITEM_HEIGHT);
                x = x.saturating_add(w).saturating_add(GAP);
                r
            })
            .collect()
    }

    /// Current item rectangles in local coordinates.
    pub fn layout(&self) -> Vec<Rect> {
        let mut widths = Vec::with_capacity(self.options.items.len());
        let mut lifts = Vec::with_capacity(self.options.items.len());
        for (i, label) in self.options.items.iter().enumerate() {
            let g = self.growth(i);
            let extra = (g * self.options.spread).round() as u16;
            widths.push(Self::base_width(label).saturating_add(extra * 2));
            lifts.push((g * self.options.lift).round() as u16);
        }
        self.row(&widths, &lifts)
    }

    /// Scale item `index` wants for the given pointer.
    fn target(&self, index: usize, pointer: Option<Vec2>) -> f32 {
        let Some(home) = self.homes.get(index) else {
            return 1.0;
        };
        let center = buttons::center(*home);
        let reach = match pointer {
            // only while the pointer is roughly level with the dock
            Some(p) if (p.y - center.y).abs() <= ITEM_HEIGHT as f32 + 1.0 => {
                physics::pointer_falloff((p.x - center.x).abs(), self.options.radius)
            }
            Some(_) => 0.0,
            None if self.keyboard => {
                let focus = self.homes.get(self.focus).map_or(center, |r| buttons::center(*r));
                physics::pointer_falloff((focus.x - center.x).abs(), self.options.radius)
            }
            None => 0.0,
        };
        1.0 + (self.options.magnification - 1.0) * reach
    }
}

impl Effect for DockMagnify {
    fn rebuild(&mut self, size: Size) {
        self.size = size;
        let widths: Vec<u16> = self.options.items.iter().map(|l| Self::base_width(l)).collect();
        let lifts = vec![0; widths.len()];
        self.homes = self.row(&widths, &lifts);
        for s in &mut self.scales {
            s.snap(Vec2::new(1.0, 0.0));
        }
        self.targets.iter_mut().for_each(|t| *t = 1.0);
    }

    fn update(&mut self, ctx: &FrameCtx<'_>) {
        if ctx.pointer.position.is_some() {
            self.keyboard = false;
        }
        for i in 0..self.scales.len() {
            let target = self.target(i, ctx.pointer.position);
            self.targets[i] = target;
            self.scales[i].step(Vec2::new(target, 0.0));
            // never shrink below rest size
            if self.scales[i].value.x < 1.0 {
                self.scales[i].value.x = 1.0;
            }
        }
    }

    fn settle(&mut self) {
        for (s, t) in self.scales.iter_mut().zip(&mut self.targets) {
            *t = 1.0;
            s.snap(Vec2::new(1.0, 0.0));
        }
    }

    fn render(&self, area: Rect, buf: &mut Buffer, theme: &FxTheme) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        for (i, (label, rect)) in self.options.items.iter().zip(self.layout()).enumerate() {
            let rect = effects::offset(area, rect);
            let g = self.growth(i);
            let focused = self.keyboard && i == self.focus;
            let border = if focused {
                self.options.color
            } else {
                theme.muted.lerp(self.options.color, g)
            };
            effects::frame(rect, buf, Style::default().fg(border.to_color()));
            if rect.width < 3 || rect.height < ITEM_HEIGHT {
                continue;
            }
            let inner_w = rect.width - 2;
            let w = render::text_width(label).min(inner_w);
            let x = rect.x + 1 + (inner_w - w) / 2;
            let fg = if self.selected == Some(i) {
                theme.accent
            } else {
                theme.foreground
            };
            let mut style = Style::default().fg(fg.to_color());
            if g > 0.5 || focused {
                style = style.add_modifier(Modifier::BOLD);
            }
            render::render_str_clipped(x, rect.y + 1, 0, w, buf, label, style);
        }
    }

    fn press(&mut self, at: Vec2) {
        if let Some(i) = self.layout().iter().position(|r| buttons::contains(*r, at)) {
            self.selected = Some(i);
            self.focus = i;
        }
    }

    fn key(&mut self, key: &KeyEvent) -> bool {
        if let Some(next) = step_focus(key, self.focus, self.options.items.len()) {
            self.focus = next;
            self.keyboard = true;
            return true;
        }
        if key.code == KeyCode::Enter {
            self.selected = Some(self.focus);
            self.keyboard = true;
            return true;
        }
        false
    }

    fn is_idle(&self) -> bool {
        self.scales
            .iter()
            .zip(&self.targets)
            .all(|(s, &t)| s.is_resting_at(Vec2::new(t, 0.0), 1e-3))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui_fx_core::keymap;
    use ratatui_fx_core::physics::PointerState;

    fn run(fx: &mut DockMagnify, pointer: &PointerState, frames: usize) {
        for _ in 0..frames {
            fx.update(&FrameCtx {
                dt: 1.0 / 60.0,
                time: 0.0,
                pointer,
                size: Size::new(80, 9),
            });
        }
    }

    #[test]
    fn item_under_pointer_grows_most() {
        let mut fx = DockMagnify::from_props(&Props::new());
        fx.rebuild(Size::new(80, 9));
        let target = buttons::center(fx.homes[2]);
        let pointer = PointerState {
            position: Some(target),
            pressed: false,
        };
        run(&mut fx, &pointer, 200);
        assert!((fx.scale(2) - 2.0).abs() < 0.01);
        assert!(fx.scale(1) > 1.0 && fx.scale(1) < fx.scale(2));
        assert!(fx.scale(5) < fx.scale(1));
        let layout = fx.layout();
        assert!(layout[2].width > fx.homes[2].width);
        assert!(layout[2].y < fx.homes[2].y);
        assert!(fx.is_idle());
    }

    #[test]
    fn items_never_overlap_while_magnified() {
        let mut fx = DockMagnify::from_props(&Props::new());
        fx.rebuild(Size::new(80, 9));
        let pointer = PointerState {
            position: Some(buttons::center(fx.homes[3])),
            pressed: false,
        };
        for _ in 0..60 {
            run(&mut fx, &pointer, 1);
            let layout = fx.layout();
            for pair in layout.windows(2) {
                assert!(pair[0].x + pair[0].width < pair[1].x + 1);
            }
        }
    }

    #[test]
    fn leaving_the_dock_shrinks_back() {
        let mut fx = DockMagnify::from_props(&Props::new());
        fx.rebuild(Size::new(80, 9));
        let over = PointerState {
            position: Some(buttons::center(fx.homes[0])),
            pressed: false,
        };
        run(&mut fx, &over, 60);
        run(&mut fx, &PointerState::default(), 300);
        assert!((0..6).all(|i| (fx.scale(i) - 1.0).abs() < 1e-3));
        assert_eq!(fx.layout(), fx.homes);
    }

    #[test]
    fn keyboard_focus_and_selection() {
        let mut fx = DockMagnify::from_props(&Props::from_json(r#"{"items": ["a", "b", "c"]}"#).unwrap());
        fx.rebuild(Size::new(40, 9));
        assert!(fx.key(&keymap::key_code(KeyCode::Right)));
        assert!(fx.key(&keymap::key_code(KeyCode::Enter)));
        assert_eq!(fx.selected(), Some(1));
        run(&mut fx, &PointerState::default(), 200);
        assert!(fx.scale(1) > fx.scale(0));
    }

    #[test]
    fn click_selects_item() {
        let mut fx = DockMagnify::from_props(&Props::new());
        fx.rebuild(Size::new(80, 9));
        let at = buttons::center(fx.homes[4]);
        fx.press(at);
        assert_eq!(fx.selected(), Some(4));
    }
}
