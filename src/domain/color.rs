//! Hex colors used by shapes, wires and labels

use std::fmt;

use serde::{Deserialize, Serialize};

/// An opaque sRGB color, serialized as `#rrggbb`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (the leading `#` is optional)
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Convert to RGBA bytes with the given opacity (0.0-1.0)
    pub fn to_rgba_u8(self, opacity: f32) -> [u8; 4] {
        let a = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        [self.r, self.g, self.b, a]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value).ok_or_else(|| format!("invalid color {value:?}, expected #rrggbb"))
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(Color::from_hex("#0891b2"), Some(Color::rgb(0x08, 0x91, 0xb2)));
        assert_eq!(Color::from_hex("ef4444"), Some(Color::rgb(0xef, 0x44, 0x44)));
        assert_eq!(Color::from_hex("#fff"), None);
        assert_eq!(Color::from_hex("#gg0000"), None);
        assert_eq!(Color::from_hex("#+f+f+f"), None);
        assert_eq!(Color::from_hex("-1-1-1"), None);
    }

    #[test]
    fn test_display_is_lowercase_hex() {
        assert_eq!(Color::rgb(0xD9, 0x77, 0x06).to_string(), "#d97706");
    }

    #[test]
    fn test_serde_rejects_bad_hex() {
        let ok: Color = serde_json::from_str("\"#7c3aed\"").unwrap();
        assert_eq!(ok, Color::rgb(0x7c, 0x3a, 0xed));
        assert!(serde_json::from_str::<Color>("\"purple\"").is_err());
    }

    #[test]
    fn test_opacity_byte() {
        assert_eq!(Color::rgb(1, 2, 3).to_rgba_u8(0.5), [1, 2, 3, 128]);
        assert_eq!(Color::rgb(1, 2, 3).to_rgba_u8(2.0)[3], 255);
    }
}
