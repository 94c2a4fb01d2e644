//! RGBA color with channels in the 0..=255 range.

use std::fmt;

use lumen_math::Vec3;
use thiserror::Error;

/// Errors from parsing color strings.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ColorError {
    #[error("Invalid hex color: {0:?} (expected #rrggbb)")]
    InvalidHex(String),
}

/// An RGBA color. Channels are floats nominally in [0, 255].
///
/// Values outside that range are kept as-is and only clamped when the
/// color is quantized (see [`Color::to_rgba8`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::new(255.0, 255.0, 255.0);
    pub const RED: Color = Color::new(255.0, 0.0, 0.0);
    pub const GREEN: Color = Color::new(0.0, 255.0, 0.0);
    pub const BLUE: Color = Color::new(0.0, 0.0, 255.0);
    pub const YELLOW: Color = Color::new(255.0, 255.0, 0.0);

    /// Opaque color from three channels.
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 255.0 }
    }

    pub const fn with_alpha(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Convert a unit-range color (as produced by shading) to 0..=255.
    pub fn from_unit(c: Vec3) -> Self {
        Self::new(c.x * 255.0, c.y * 255.0, c.z * 255.0)
    }

    /// Unit-range RGB, the inverse of [`Color::from_unit`].
    pub fn to_unit(self) -> Vec3 {
        Vec3::new(self.r, self.g, self.b) / 255.0
    }

    /// Linear interpolation: `a * (1 - t) + b * t`, exact at both ends.
    pub fn lerp(a: Color, b: Color, t: f32) -> Color {
        let u = 1.0 - t;
        Color {
            r: a.r * u + b.r * t,
            g: a.g * u + b.g * t,
            b: a.b * u + b.b * t,
            a: a.a * u + b.a * t,
        }
    }

    /// Bilinear interpolation over four corner colors.
    ///
    /// `c00` sits at (s=0, t=0), `c10` at (1, 0), `c01` at (0, 1) and
    /// `c11` at (1, 1).
    pub fn lerp_2d(c00: Color, c10: Color, c01: Color, c11: Color, s: f32, t: f32) -> Color {
        let bottom = Color::lerp(c00, c10, s);
        let top = Color::lerp(c01, c11, s);
        Color::lerp(bottom, top, t)
    }

    /// Quantize to RGBA8, rounding and clamping each channel.
    pub fn to_rgba8(self) -> [u8; 4] {
        [
            quantize(self.r),
            quantize(self.g),
            quantize(self.b),
            quantize(self.a),
        ]
    }

    /// `#rrggbb` with lowercase hex digits. Alpha is not encoded.
    pub fn to_hex(self) -> String {
        let [r, g, b, _] = self.to_rgba8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Parse `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Result<Color, ColorError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(ColorError::InvalidHex(hex.to_string()));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map(f32::from)
                .map_err(|_| ColorError::InvalidHex(hex.to_string()))
        };

        Ok(Color::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

fn quantize(channel: f32) -> u8 {
    channel.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints() {
        let a = Color::new(10.0, 20.0, 30.0);
        let b = Color::new(200.0, 100.0, 0.0);
        assert_eq!(Color::lerp(a, b, 0.0), a);
        assert_eq!(Color::lerp(a, b, 1.0), b);

        let mid = Color::lerp(a, b, 0.5);
        assert!((mid.r - 105.0).abs() < 1e-4);
        assert!((mid.g - 60.0).abs() < 1e-4);
        assert!((mid.b - 15.0).abs() < 1e-4);
    }

    #[test]
    fn test_lerp_2d_corners_and_center() {
        let (red, green, blue, yellow) = (Color::RED, Color::GREEN, Color::BLUE, Color::YELLOW);

        assert_eq!(Color::lerp_2d(red, green, blue, yellow, 0.0, 0.0), red);
        assert_eq!(Color::lerp_2d(red, green, blue, yellow, 1.0, 0.0), green);
        assert_eq!(Color::lerp_2d(red, green, blue, yellow, 0.0, 1.0), blue);
        assert_eq!(Color::lerp_2d(red, green, blue, yellow, 1.0, 1.0), yellow);

        let center = Color::lerp_2d(red, green, blue, yellow, 0.5, 0.5);
        assert!((center.r - 127.5).abs() < 1e-3);
        assert!((center.g - 127.5).abs() < 1e-3);
        assert!((center.b - 63.75).abs() < 1e-3);
    }

    #[test]
    fn test_to_hex() {
        assert_eq!(Color::new(255.0, 0.0, 16.0).to_hex(), "#ff0010");
        assert_eq!(Color::new(0.4, 254.6, 300.0).to_hex(), "#00ffff");
    }

    #[test]
    fn test_hex_round_trip() {
        let source = Color::new(12.3, 171.6, 254.9);
        let parsed = Color::from_hex(&source.to_hex()).unwrap();

        assert_eq!(parsed.r, 12.0);
        assert_eq!(parsed.g, 172.0);
        assert_eq!(parsed.b, 255.0);
    }

    #[test]
    fn test_from_hex_rejects_garbage() {
        assert!(Color::from_hex("#12345").is_err());
        assert!(Color::from_hex("#gg0000").is_err());
        assert!(Color::from_hex("").is_err());
        assert_eq!(Color::from_hex("00ff00").unwrap(), Color::GREEN);
    }

    #[test]
    fn test_display() {
        assert_eq!(Color::new(1.0, 2.5, 3.0).to_string(), "rgb(1, 2.5, 3)");
    }

    #[test]
    fn test_from_unit() {
        let c = Color::from_unit(Vec3::new(1.0, 0.5, 0.0));
        assert_eq!(c, Color::new(255.0, 127.5, 0.0));
        assert!((c.to_unit() - Vec3::new(1.0, 0.5, 0.0)).length() < 1e-6);
    }
}
