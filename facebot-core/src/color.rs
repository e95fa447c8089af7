//! RGB565 color handling
//!
//! The panel and framebuffer use 16-bit packed RGB565 pixels:
//! 5 bits red, 6 bits green, 5 bits blue.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 16-bit packed RGB565 color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rgb565(pub u16);

impl Rgb565 {
    pub const BLACK: Self = Self(0x0000);
    pub const WHITE: Self = Self(0xFFFF);

    /// Pack 8-bit channels into RGB565
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        let r5 = (r >> 3) as u16;
        let g6 = (g >> 2) as u16;
        let b5 = (b >> 3) as u16;
        Self((r5 << 11) | (g6 << 5) | b5)
    }

    /// Parse a `#RRGGBB` or `RRGGBB` hex string
    ///
    /// Returns `None` for anything that is not exactly six hex digits.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let rgb = u32::from_str_radix(digits, 16).ok()?;
        Some(Self::from_rgb(
            ((rgb >> 16) & 0xFF) as u8,
            ((rgb >> 8) & 0xFF) as u8,
            (rgb & 0xFF) as u8,
        ))
    }

    /// Raw packed value
    pub const fn raw(self) -> u16 {
        self.0
    }
}

impl From<Rgb565> for u16 {
    fn from(color: Rgb565) -> Self {
        color.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rgb_extremes() {
        assert_eq!(Rgb565::from_rgb(0, 0, 0), Rgb565::BLACK);
        assert_eq!(Rgb565::from_rgb(255, 255, 255), Rgb565::WHITE);
        assert_eq!(Rgb565::from_rgb(255, 0, 0).raw(), 0xF800);
        assert_eq!(Rgb565::from_rgb(0, 255, 0).raw(), 0x07E0);
        assert_eq!(Rgb565::from_rgb(0, 0, 255).raw(), 0x001F);
    }

    #[test]
    fn test_from_hex() {
        assert_eq!(Rgb565::from_hex("#FF0000"), Some(Rgb565(0xF800)));
        assert_eq!(Rgb565::from_hex("00ff00"), Some(Rgb565(0x07E0)));
        assert_eq!(
            Rgb565::from_hex("#121228"),
            Some(Rgb565::from_rgb(18, 18, 40))
        );
    }

    #[test]
    fn test_from_hex_rejects_garbage() {
        assert_eq!(Rgb565::from_hex(""), None);
        assert_eq!(Rgb565::from_hex("#12345"), None);
        assert_eq!(Rgb565::from_hex("#GGGGGG"), None);
        assert_eq!(Rgb565::from_hex("#1234567"), None);
    }
}
