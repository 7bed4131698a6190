//! Shared geometric and color primitives used across the canvas, rasterizer and tools.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Nearest pixel coordinate.
    pub fn rounded(self) -> (i32, i32) {
        (round_coord(self.x), round_coord(self.y))
    }

    pub fn distance_to(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

fn round_coord(value: f64) -> i32 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
}

/// Straight-alpha 8-bit RGBA color. Alpha 0 is fully transparent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn channels(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub const fn from_channels(channels: [u8; 4]) -> Self {
        Self::new(channels[0], channels[1], channels[2], channels[3])
    }

    /// Same color with alpha derived from an opacity percentage.
    pub fn with_opacity(self, opacity_percent: u8) -> Self {
        Self {
            a: opacity_to_alpha(opacity_percent),
            ..self
        }
    }

    /// Per-channel interpolation of r, g and b; alpha is taken from `self`.
    pub fn lerp(self, other: Color, ratio: f64) -> Self {
        let ratio = if ratio.is_nan() {
            0.0
        } else {
            ratio.clamp(0.0, 1.0)
        };
        let mix = |from: u8, to: u8| -> u8 {
            let value = f64::from(from) + (f64::from(to) - f64::from(from)) * ratio;
            value.trunc().clamp(0.0, 255.0) as u8
        };
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: self.a,
        }
    }

    /// True when every channel differs from `other` by at most `tolerance`.
    pub fn within_tolerance(self, other: Color, tolerance: u8) -> bool {
        self.channels()
            .iter()
            .zip(other.channels().iter())
            .all(|(left, right)| left.abs_diff(*right) <= tolerance)
    }

    /// Parses `#rgb` or `#rrggbb`; the leading `#` is optional.
    pub fn from_hex(value: &str) -> Option<Self> {
        let hex = value.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() {
            return None;
        }

        match hex.len() {
            3 => {
                let mut channels = [0_u8; 3];
                for (slot, digit) in channels.iter_mut().zip(hex.chars()) {
                    let nibble = u8::try_from(digit.to_digit(16)?).ok()?;
                    *slot = nibble * 17;
                }
                Some(Self::rgb(channels[0], channels[1], channels[2]))
            }
            6 => {
                let red = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let green = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let blue = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Self::rgb(red, green, blue))
            }
            _ => None,
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value).ok_or_else(|| format!("invalid hex color: {value}"))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

pub fn opacity_to_alpha(opacity_percent: u8) -> u8 {
    let percent = f64::from(opacity_percent.min(100));
    (255.0 * percent / 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parsing_accepts_short_and_long_forms() {
        assert_eq!(Color::from_hex("#000000"), Some(Color::BLACK));
        assert_eq!(Color::from_hex("ffffff"), Some(Color::WHITE));
        assert_eq!(Color::from_hex(" #f80 "), Some(Color::rgb(255, 136, 0)));
        assert_eq!(Color::from_hex("#12ab9C"), Some(Color::rgb(0x12, 0xab, 0x9c)));
    }

    #[test]
    fn hex_parsing_rejects_malformed_values() {
        for value in ["", "#", "#12", "#12345", "#1234567", "#ggg", "red", "#ééé"] {
            assert_eq!(Color::from_hex(value), None, "{value:?} should be rejected");
        }
    }

    #[test]
    fn hex_output_is_lowercase_rrggbb() {
        assert_eq!(Color::rgb(1, 171, 255).to_hex(), "#01abff");
    }

    #[test]
    fn opacity_maps_to_straight_alpha() {
        assert_eq!(opacity_to_alpha(0), 0);
        assert_eq!(opacity_to_alpha(50), 128);
        assert_eq!(opacity_to_alpha(100), 255);
        assert_eq!(opacity_to_alpha(250), 255);
        assert_eq!(Color::BLACK.with_opacity(20).a, 51);
    }

    #[test]
    fn lerp_truncates_and_clamps_ratio() {
        let mid = Color::BLACK.lerp(Color::WHITE, 0.5);
        assert_eq!(mid, Color::rgb(127, 127, 127));
        assert_eq!(Color::BLACK.lerp(Color::WHITE, 4.0), Color::WHITE);
        assert_eq!(Color::BLACK.lerp(Color::WHITE, -1.0), Color::BLACK);
    }

    #[test]
    fn tolerance_is_checked_per_channel() {
        let base = Color::new(100, 100, 100, 255);
        assert!(base.within_tolerance(Color::new(110, 90, 105, 250), 10));
        assert!(!base.within_tolerance(Color::new(111, 100, 100, 255), 10));
        assert!(!base.within_tolerance(Color::new(100, 100, 100, 240), 10));
    }

    #[test]
    fn color_serializes_as_hex_string() {
        let json = serde_json::to_string(&Color::rgb(255, 0, 16)).unwrap();
        assert_eq!(json, "\"#ff0010\"");
        let parsed: Color = serde_json::from_str("\"#0f0\"").unwrap();
        assert_eq!(parsed, Color::rgb(0, 255, 0));
        assert!(serde_json::from_str::<Color>("\"nope\"").is_err());
    }

    #[test]
    fn point_rounding_and_distance() {
        assert_eq!(Point::new(1.4, 2.6).rounded(), (1, 3));
        assert_eq!(Point::new(f64::NAN, -0.4).rounded(), (0, 0));
        assert_eq!(Point::new(0.0, 0.0).distance_to(Point::new(3.0, 4.0)), 5.0);
    }
}
