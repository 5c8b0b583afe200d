//! Concrete effects, grouped the way the catalog presents them.

pub mod backgrounds;
pub mod buttons;
pub mod cards;
pub mod loaders;
pub mod navigation;
pub mod text;

use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::layout::Size;
use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Widget;

pub(crate) const DEFAULT_SEED: u64 = 0x00f1_5eed;

pub(crate) fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub(crate) fn is_empty(size: Size) -> bool {
    size.width == 0 || size.height == 0
}

/// A `width` x `height` rectangle centered in `area`, shrunk to fit.
pub(crate) fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect::new(
        area.x + (area.width - w) / 2,
        area.y + (area.height - h) / 2,
        w,
        h,
    )
}

/// Same as [`centered`] but in local coordinates of an area of `size`.
pub(crate) fn centered_local(size: Size, width: u16, height: u16) -> Rect {
    centered(Rect::new(0, 0, size.width, size.height), width, height)
}

/// Rounded border around `rect`, skipped when it would not fit.
pub(crate) fn frame(rect: Rect, buf: &mut Buffer, style: Style) {
    if rect.width < 2 || rect.height < 2 {
        return;
    }
    Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(style)
        .render(rect, buf);
}

/// Translates a local rectangle into buffer coordinates under `area`.
pub(crate) fn offset(area: Rect, local: Rect) -> Rect {
    Rect::new(area.x + local.x, area.y + local.y, local.width, local.height).intersection(area)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_shrinks_to_area() {
        let r = centered(Rect::new(2, 2, 10, 4), 20, 2);
        assert_eq!(r, Rect::new(2, 3, 10, 2));
    }

    #[test]
    fn frame_skips_tiny_rects() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 1, 1));
        frame(Rect::new(0, 0, 1, 1), &mut buf, Style::default());
        assert_eq!(buf.cell((0, 0)).map(|c| c.symbol()), Some(" "));
    }
}
