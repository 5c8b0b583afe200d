use crate::error::FxError;
use crate::math;
use ratatui::style::Color;

/// A 24-bit color. Effects blend in RGB and convert to [`Color::Rgb`] at paint time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rgb`, `#rrggbb` or the same without the leading `#`.
    pub fn parse_hex(input: &str) -> Result<Rgb, FxError> {
        let s = input.trim();
        let hex = s.strip_prefix('#').unwrap_or(s);
        let invalid = || FxError::InvalidColor(input.to_string());
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        match hex.len() {
            3 => {
                let mut out = [0u8; 3];
                for (i, c) in hex.chars().enumerate() {
                    let v = c.to_digit(16).ok_or_else(invalid)? as u8;
                    out[i] = v * 17;
                }
                Ok(Rgb::new(out[0], out[1], out[2]))
            }
            6 => {
                let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
                Ok(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
            }
            _ => Err(invalid()),
        }
    }

    /// Multiplies every channel by `alpha` (clamped to [0, 1]), i.e. blends towards black.
    pub fn scale(self, alpha: f32) -> Rgb {
        let a = math::clamp01(alpha);
        let ch = |c: u8| (c as f32 * a).round() as u8;
        Rgb::new(ch(self.r), ch(self.g), ch(self.b))
    }

    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        let t = math::clamp01(t);
        let ch = |a: u8, b: u8| math::lerp(a as f32, b as f32, t).round() as u8;
        Rgb::new(
            ch(self.r, other.r),
            ch(self.g, other.g),
            ch(self.b, other.b),
        )
    }

    /// Perceived brightness in [0, 1].
    pub fn luminance(self) -> f32 {
        (0.2126 * self.r as f32 + 0.7152 * self.g as f32 + 0.0722 * self.b as f32) / 255.0
    }

    pub fn to_color(self) -> Color {
        Color::Rgb(self.r, self.g, self.b)
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<Rgb> for Color {
    fn from(value: Rgb) -> Self {
        value.to_color()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_and_short_hex() {
        assert_eq!(Rgb::parse_hex("#ff8000").unwrap(), Rgb::new(255, 128, 0));
        assert_eq!(Rgb::parse_hex("0af").unwrap(), Rgb::new(0, 170, 255));
        assert_eq!(Rgb::parse_hex(" #FFF ").unwrap(), Rgb::WHITE);
    }

    #[test]
    fn rejects_malformed_hex() {
        for bad in ["", "#", "#12", "#12345", "#gg0000", "red", "#ff00ff00"] {
            assert!(Rgb::parse_hex(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn scale_clamps_alpha() {
        assert_eq!(Rgb::WHITE.scale(2.0), Rgb::WHITE);
        assert_eq!(Rgb::WHITE.scale(-1.0), Rgb::BLACK);
        assert_eq!(Rgb::WHITE.scale(f32::NAN), Rgb::BLACK);
    }

    #[test]
    fn hex_round_trips_through_display() {
        let c = Rgb::new(18, 52, 86);
        assert_eq!(c.to_hex(), "#123456");
    }
}
