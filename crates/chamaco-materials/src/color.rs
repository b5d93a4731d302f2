//! RGB color values used by uniforms and physical materials.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// ColorParseError
// ---------------------------------------------------------------------------

/// Errors returned when parsing a hex color string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    /// The string is not 3 or 6 hex digits (after an optional `#`).
    #[error("hex color '{0}' must have 3 or 6 digits")]
    InvalidLength(String),

    /// The string contains a character that is not a hex digit.
    #[error("hex color '{0}' contains a non-hex digit")]
    InvalidDigit(String),
}

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// An RGB color with sRGB-encoded components in `[0.0, 1.0]`.
///
/// Uploaded to shaders as a `vec3`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    /// Create a color from raw components. Values are not clamped.
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create a color from a packed `0xRRGGBB` value.
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }

    /// Parse `"#RRGGBB"`, `"RRGGBB"`, `"#RGB"` or `"RGB"`.
    ///
    /// # Errors
    ///
    /// Returns [`ColorParseError`] if the digit count or any digit is invalid.
    pub fn parse_hex(s: &str) -> Result<Self, ColorParseError> {
        let digits = s.trim().trim_start_matches('#');
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError::InvalidDigit(s.to_string()));
        }

        let packed = match digits.len() {
            6 => u32::from_str_radix(digits, 16)
                .map_err(|_| ColorParseError::InvalidDigit(s.to_string()))?,
            3 => {
                // #RGB expands each nibble: 0xF -> 0xFF.
                let short = u32::from_str_radix(digits, 16)
                    .map_err(|_| ColorParseError::InvalidDigit(s.to_string()))?;
                let r = (short >> 8) & 0xf;
                let g = (short >> 4) & 0xf;
                let b = short & 0xf;
                (r * 0x11) << 16 | (g * 0x11) << 8 | (b * 0x11)
            }
            _ => return Err(ColorParseError::InvalidLength(s.to_string())),
        };

        Ok(Self::from_hex(packed))
    }

    /// Pack back into `0xRRGGBB`, rounding and clamping each channel.
    pub fn to_hex(self) -> u32 {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
        channel(self.r) << 16 | channel(self.g) << 8 | channel(self.b)
    }

    /// Convert sRGB-encoded components to linear light.
    pub fn to_linear(self) -> Self {
        fn decode(c: f32) -> f32 {
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        Self::new(decode(self.r), decode(self.g), decode(self.b))
    }

    /// Component-wise scale.
    pub fn scaled(self, factor: f32) -> Self {
        Self::new(self.r * factor, self.g * factor, self.b * factor)
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[f32; 3]> for Color {
    fn from([r, g, b]: [f32; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl From<Color> for [f32; 3] {
    fn from(c: Color) -> Self {
        c.to_array()
    }
}
