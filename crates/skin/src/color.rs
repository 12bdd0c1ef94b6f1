//! RGBA color type used by brushes and text.
//!
//! ## Supported formats
//!
//! - **Hex**: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`
//! - **Named**: a small set of basic names (`white`, `black`, `red`, ...)
//! - **Special**: `transparent`
//!
//! ```
//! use skin::RgbaColor;
//!
//! let panel = RgbaColor::parse("#202830").unwrap();
//! let faded = panel.multiply_alpha(0.5);
//! assert_eq!(faded.a, 0.5);
//! ```

use std::fmt;

/// Error returned when color parsing fails.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorParseError {
    /// Human-readable description of the parsing error.
    pub message: String,
}

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ColorParseError {}

/// An RGBA color with 8-bit channels and a floating-point alpha.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RgbaColor {
    /// Red component (0-255).
    pub r: u8,
    /// Green component (0-255).
    pub g: u8,
    /// Blue component (0-255).
    pub b: u8,
    /// Alpha component (0.0 = transparent, 1.0 = opaque).
    pub a: f32,
}

impl Default for RgbaColor {
    fn default() -> Self {
        Self::black()
    }
}

impl RgbaColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn white() -> Self {
        Self::rgb(255, 255, 255)
    }

    pub const fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    /// Returns a fully transparent color.
    pub const fn transparent() -> Self {
        Self::rgba(0, 0, 0, 0.0)
    }

    /// Returns a copy of this color with the specified alpha value.
    pub fn with_alpha(self, alpha: f32) -> Self {
        Self {
            a: alpha.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Scales the alpha channel, used when drawing with an absolute alpha.
    pub fn multiply_alpha(self, factor: f32) -> Self {
        self.with_alpha(self.a * factor)
    }

    /// Returns true if the color is fully transparent.
    pub fn is_transparent(&self) -> bool {
        self.a <= 0.0
    }

    /// Linear interpolation between two colors, `t` in `0.0..=1.0`.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: self.a + (other.a - self.a) * t,
        }
    }

    /// Formats as `#rrggbb` or `#rrggbbaa` when not opaque.
    pub fn to_hex(&self) -> String {
        if self.a >= 1.0 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            let alpha = (self.a.clamp(0.0, 1.0) * 255.0).round() as u8;
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, alpha)
        }
    }

    /// Parse a color string.
    pub fn parse(input: &str) -> Result<Self, ColorParseError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ColorParseError {
                message: "empty color string".to_string(),
            });
        }

        if let Some(hex) = input.strip_prefix('#') {
            return Self::parse_hex(hex);
        }

        Self::parse_named(&input.to_lowercase())
    }

    fn parse_hex(hex: &str) -> Result<Self, ColorParseError> {
        let chars: Vec<char> = hex.to_lowercase().chars().collect();

        match chars.len() {
            3 => {
                let r = Self::parse_hex_digit(chars[0])? * 17;
                let g = Self::parse_hex_digit(chars[1])? * 17;
                let b = Self::parse_hex_digit(chars[2])? * 17;
                Ok(Self::rgb(r, g, b))
            }
            4 => {
                let r = Self::parse_hex_digit(chars[0])? * 17;
                let g = Self::parse_hex_digit(chars[1])? * 17;
                let b = Self::parse_hex_digit(chars[2])? * 17;
                let a = Self::parse_hex_digit(chars[3])? * 17;
                Ok(Self::rgba(r, g, b, a as f32 / 255.0))
            }
            6 => {
                let r = Self::parse_hex_pair(chars[0], chars[1])?;
                let g = Self::parse_hex_pair(chars[2], chars[3])?;
                let b = Self::parse_hex_pair(chars[4], chars[5])?;
                Ok(Self::rgb(r, g, b))
            }
            8 => {
                let r = Self::parse_hex_pair(chars[0], chars[1])?;
                let g = Self::parse_hex_pair(chars[2], chars[3])?;
                let b = Self::parse_hex_pair(chars[4], chars[5])?;
                let a = Self::parse_hex_pair(chars[6], chars[7])?;
                Ok(Self::rgba(r, g, b, a as f32 / 255.0))
            }
            n => Err(ColorParseError {
                message: format!("invalid hex color length: {}", n),
            }),
        }
    }

    fn parse_hex_digit(c: char) -> Result<u8, ColorParseError> {
        match c {
            '0'..='9' => Ok(c as u8 - b'0'),
            'a'..='f' => Ok(c as u8 - b'a' + 10),
            _ => Err(ColorParseError {
                message: format!("invalid hex digit: {}", c),
            }),
        }
    }

    fn parse_hex_pair(high: char, low: char) -> Result<u8, ColorParseError> {
        Ok(Self::parse_hex_digit(high)? * 16 + Self::parse_hex_digit(low)?)
    }

    fn parse_named(name: &str) -> Result<Self, ColorParseError> {
        let color = match name {
            "transparent" => Self::transparent(),
            "white" => Self::white(),
            "black" => Self::black(),
            "red" => Self::rgb(255, 0, 0),
            "green" => Self::rgb(0, 128, 0),
            "lime" => Self::rgb(0, 255, 0),
            "blue" => Self::rgb(0, 0, 255),
            "yellow" => Self::rgb(255, 255, 0),
            "cyan" => Self::rgb(0, 255, 255),
            "magenta" => Self::rgb(255, 0, 255),
            "gray" | "grey" => Self::rgb(128, 128, 128),
            "silver" => Self::rgb(192, 192, 192),
            "orange" => Self::rgb(255, 165, 0),
            _ => {
                return Err(ColorParseError {
                    message: format!("unknown color name: {}", name),
                });
            }
        };
        Ok(color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_short_and_long_hex() {
        assert_eq!(RgbaColor::parse("#fff").unwrap(), RgbaColor::white());
        assert_eq!(
            RgbaColor::parse("#102030").unwrap(),
            RgbaColor::rgb(0x10, 0x20, 0x30)
        );
        let translucent = RgbaColor::parse("#10203080").unwrap();
        assert!((translucent.a - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_parse_named_and_errors() {
        assert_eq!(RgbaColor::parse("Red").unwrap(), RgbaColor::rgb(255, 0, 0));
        assert!(RgbaColor::parse("#12").is_err());
        assert!(RgbaColor::parse("not-a-color").is_err());
        assert!(RgbaColor::parse("").is_err());
    }

    #[test]
    fn test_multiply_alpha_clamps() {
        let c = RgbaColor::rgba(1, 2, 3, 0.8);
        assert!((c.multiply_alpha(0.5).a - 0.4).abs() < 1e-6);
        assert_eq!(c.multiply_alpha(4.0).a, 1.0);
    }

    #[test]
    fn test_lerp_endpoints() {
        let a = RgbaColor::black();
        let b = RgbaColor::white();
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5).r, 128);
    }

    #[test]
    fn test_to_hex() {
        assert_eq!(RgbaColor::rgb(255, 0, 16).to_hex(), "#ff0010");
        assert_eq!(RgbaColor::rgba(0, 0, 0, 0.0).to_hex(), "#00000000");
    }
}
