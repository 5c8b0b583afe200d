//! Text painting helpers for character-level effects.

use crate::color::Rgb;
use crate::math::Vec2;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::style::Style;
use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

/// Writes `input` starting at `(x, y)`, skipping the first `start_col` display columns and never
/// writing more than `max_cols` columns. Wide characters that would straddle an edge are dropped.
pub fn render_str_clipped(
    x: u16,
    y: u16,
    start_col: u32,
    max_cols: u16,
    buf: &mut Buffer,
    input: &str,
    style: Style,
) {
    if max_cols == 0 {
        return;
    }

    let start_col = start_col as usize;
    let max_cols = max_cols as usize;
    let mut col = 0usize;
    let mut out_cols = 0usize;
    let mut dx = 0u16;
    let mut tmp = [0u8; 4];

    for ch in input.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if w == 0 {
            continue;
        }
        if col < start_col {
            col += w;
            continue;
        }
        if out_cols + w > max_cols {
            return;
        }

        let s = ch.encode_utf8(&mut tmp);
        if let Some(cell) = buf.cell_mut((x + dx, y)) {
            cell.set_style(style);
            cell.set_symbol(s);
        }
        dx += 1;
        out_cols += 1;
        col += w;

        if w == 2 {
            if let Some(cell) = buf.cell_mut((x + dx, y)) {
                cell.set_style(style);
                cell.set_symbol("");
            }
            dx += 1;
            out_cols += 1;
        }
    }
}

/// One character to paint at a fractional offset from its layout slot.
#[derive(Clone, Copy, Debug)]
pub struct Glyph {
    pub ch: char,
    pub offset: Vec2,
    pub opacity: f32,
    pub color: Rgb,
    pub bold: bool,
}

/// Display width of `text` in columns.
pub fn text_width(text: &str) -> u16 {
    UnicodeWidthStr::width(text).min(u16::MAX as usize) as u16
}

/// Column at which `width` columns of content start when centered in `area`.
pub fn centered_x(area: Rect, width: u16) -> u16 {
    area.x + area.width.saturating_sub(width) / 2
}

/// Paints glyphs laid out left to right from `origin`, each displaced by its own offset and
/// faded toward `background` by its opacity. Glyphs outside `area` are skipped. Fully transparent
/// glyphs are not drawn.
pub fn render_glyphs(
    area: Rect,
    buf: &mut Buffer,
    origin: (u16, u16),
    glyphs: &[Glyph],
    background: Rgb,
) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let mut slot_x = origin.0 as f32;
    let mut tmp = [0u8; 4];
    for g in glyphs {
        let w = UnicodeWidthChar::width(g.ch).unwrap_or(0).max(1) as f32;
        let gx = (slot_x + g.offset.x).round();
        let gy = (origin.1 as f32 + g.offset.y).round();
        slot_x += w;
        if g.opacity <= 0.0 || g.ch == ' ' {
            continue;
        }
        if gx < area.x as f32
            || gy < area.y as f32
            || gx >= (area.x + area.width) as f32
            || gy >= (area.y + area.height) as f32
        {
            continue;
        }
        let Some(cell) = buf.cell_mut((gx as u16, gy as u16)) else {
            continue;
        };
        let color = background.lerp(g.color, g.opacity);
        let mut style = Style::default().fg(color.to_color());
        if g.bold {
            style = style.add_modifier(Modifier::BOLD);
        }
        cell.set_style(style);
        cell.set_symbol(g.ch.encode_utf8(&mut tmp));
    }
}

/// Reads back the symbols of row `y` in `area` (test and snapshot helper).
pub fn row_text(buf: &Buffer, area: Rect, y: u16) -> String {
    let mut out = String::new();
    for x in area.x..area.x + area.width {
        if let Some(cell) = buf.cell((x, y)) {
            out.push_str(cell.symbol());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clipped_render_respects_width() {
        let area = Rect::new(0, 0, 4, 1);
        let mut buf = Buffer::empty(area);
        render_str_clipped(0, 0, 1, 3, &mut buf, "abcdef", Style::default());
        assert_eq!(row_text(&buf, area, 0), "bcd ");
    }

    #[test]
    fn glyphs_land_on_offset_cells() {
        let area = Rect::new(0, 0, 6, 3);
        let mut buf = Buffer::empty(area);
        let glyphs = [
            Glyph {
                ch: 'A',
                offset: Vec2::ZERO,
                opacity: 1.0,
                color: Rgb::WHITE,
                bold: false,
            },
            Glyph {
                ch: 'B',
                offset: Vec2::new(2.0, 1.0),
                opacity: 1.0,
                color: Rgb::WHITE,
                bold: true,
            },
        ];
        render_glyphs(area, &mut buf, (0, 0), &glyphs, Rgb::BLACK);
        assert_eq!(row_text(&buf, area, 0), "A     ");
        assert_eq!(row_text(&buf, area, 1), "   B  ");
    }

    #[test]
    fn glyphs_outside_area_are_skipped() {
        let area = Rect::new(0, 0, 2, 1);
        let mut buf = Buffer::empty(area);
        let g = Glyph {
            ch: 'Z',
            offset: Vec2::new(-5.0, 0.0),
            opacity: 1.0,
            color: Rgb::WHITE,
            bold: false,
        };
        render_glyphs(area, &mut buf, (0, 0), &[g], Rgb::BLACK);
        assert_eq!(row_text(&buf, area, 0), "  ");
    }
}
