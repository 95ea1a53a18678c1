use serde::{Deserialize, Serialize};
use std::fmt;

/// RGBA colour that round-trips through `#RRGGBB` hex strings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parses `#RRGGBB` (or `RRGGBB`); returns `None` for anything else.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }

        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
        Some(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Uppercase `#RRGGBB`, alpha is dropped
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Same colour with alpha scaled by `opacity` (0.0 to 1.0)
    pub fn with_opacity(self, opacity: f32) -> Self {
        let a = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self { a, ..self }
    }

    /// Relative luminance, used to compare how light two colours are
    pub fn luminance(&self) -> f64 {
        0.2126 * self.r as f64 + 0.7152 * self.g as f64 + 0.0722 * self.b as f64
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(feature = "egui")]
impl From<Color> for egui::Color32 {
    fn from(color: Color) -> Self {
        egui::Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        assert_eq!(Color::from_hex("#800026"), Some(Color::rgb(0x80, 0x00, 0x26)));
        assert_eq!(Color::from_hex("ffeda0"), Some(Color::rgb(0xFF, 0xED, 0xA0)));
        assert_eq!(Color::from_hex("#80002"), None);
        assert_eq!(Color::from_hex("#GG0000"), None);
        assert_eq!(Color::from_hex("#+1+2+3"), None);
        assert_eq!(Color::from_hex("-10000"), None);
    }

    #[test]
    fn test_hex_formatting_is_uppercase() {
        assert_eq!(Color::rgb(0xfd, 0x8d, 0x3c).to_hex(), "#FD8D3C");
        assert_eq!(Color::rgb(0, 255, 0).to_string(), "#00FF00");
    }

    #[test]
    fn test_with_opacity() {
        let faded = Color::BLACK.with_opacity(0.8);
        assert_eq!(faded.a, 204);
        assert_eq!(Color::WHITE.with_opacity(4.0).a, 255);
    }
}
