//! Color operation utilities.
//!
//! Colors are in ARGB8888 format (0xAARRGGBB) throughout the crate.

/// Color operation utilities
pub struct ColorOps;

impl ColorOps {
    /// Extract red channel from ARGB color
    #[inline]
    pub fn red(color: u32) -> u8 {
        ((color >> 16) & 0xFF) as u8
    }

    /// Extract green channel from ARGB color
    #[inline]
    pub fn green(color: u32) -> u8 {
        ((color >> 8) & 0xFF) as u8
    }

    /// Extract blue channel from ARGB color
    #[inline]
    pub fn blue(color: u32) -> u8 {
        (color & 0xFF) as u8
    }

    /// Extract alpha channel from ARGB color
    #[inline]
    pub fn alpha(color: u32) -> u8 {
        ((color >> 24) & 0xFF) as u8
    }

    /// Construct ARGB color from components
    #[inline]
    pub fn from_argb(a: u8, r: u8, g: u8, b: u8) -> u32 {
        ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
    }

    /// Construct RGB color with full alpha
    #[inline]
    pub fn from_rgb(r: u8, g: u8, b: u8) -> u32 {
        0xFF000000 | ((r as u32) << 16) | ((g as u32) << 8) | (b as u32)
    }

    /// Byte order expected by PNG RGBA8 scanlines.
    #[inline]
    pub fn to_rgba_bytes(color: u32) -> [u8; 4] {
        [
            Self::red(color),
            Self::green(color),
            Self::blue(color),
            Self::alpha(color),
        ]
    }

    /// Parse a hex color string into ARGB.
    ///
    /// Accepts `RGB`, `ARGB`, `RRGGBB` and `AARRGGBB`, with or without a
    /// leading `#`. Short forms expand each digit (`F80` is `FF8800`) and
    /// forms without alpha are fully opaque.
    ///
    /// ```
    /// use nss_core::graphics::ColorOps;
    ///
    /// assert_eq!(ColorOps::parse_hex("6A6D6A"), Some(0xFF6A6D6A));
    /// assert_eq!(ColorOps::parse_hex("#80FF0000"), Some(0x80FF0000));
    /// assert_eq!(ColorOps::parse_hex("zz"), None);
    /// ```
    pub fn parse_hex(text: &str) -> Option<u32> {
        let digits = text.trim();
        let digits = digits.strip_prefix('#').unwrap_or(digits);
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let value = u32::from_str_radix(digits, 16).ok()?;
        let nibble = |shift: u32| ((value >> shift) & 0xF) as u8 * 0x11;
        match digits.len() {
            3 => Some(Self::from_rgb(nibble(8), nibble(4), nibble(0))),
            4 => Some(Self::from_argb(nibble(12), nibble(8), nibble(4), nibble(0))),
            6 => Some(0xFF000000 | value),
            8 => Some(value),
            _ => None,
        }
    }
}
