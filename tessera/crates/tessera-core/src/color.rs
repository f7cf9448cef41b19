//! Tile colors.
//!
//! A [`Color`] holds straight (non-premultiplied) RGBA channels in `0.0..=1.0`.
//! In configuration files colors are strings: a hex value with or without
//! `#` (`"ccc"`, `"#cccc"`, `"#cccccc"`, `"#cccccccc"`) or one of the names
//! accepted by [`Color::parse`].
//!
//! ```
//! use tessera_core::Color;
//!
//! let glyph: Color = "#cccccc".parse().unwrap();
//! let ghost = glyph.multiply_alpha(0.5).blend_over(Color::BLACK);
//! assert_eq!(ghost.to_rgb_u8(), (102, 102, 102));
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ColorParseError;

/// An RGBA color.
#[derive(Clone, Copy, PartialEq, Default)]
pub struct Color {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
    /// Opacity, 0.0 is fully transparent.
    pub a: f32,
}

impl Color {
    /// No color at all. Backends treat it as "leave the default".
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);
    /// `#000000`
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    /// `#ffffff`
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    /// `#ff0000`
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    /// `#00ff00`
    pub const GREEN: Self = Self::rgb(0.0, 1.0, 0.0);
    /// `#0000ff`
    pub const BLUE: Self = Self::rgb(0.0, 0.0, 1.0);
    /// `#808080`
    pub const GRAY: Self = Self::rgb(0.5, 0.5, 0.5);

    /// Builds a color from float channels.
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Builds an opaque color from float channels.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// Builds a color from byte channels.
    pub fn from_rgba_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        let unit = |v: u8| f32::from(v) / 255.0;
        Self::rgba(unit(r), unit(g), unit(b), unit(a))
    }

    /// Builds an opaque color from byte channels.
    pub fn from_rgb_u8(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgba_u8(r, g, b, u8::MAX)
    }

    /// Byte channels, rounded to the nearest value.
    pub fn to_rgba_u8(self) -> (u8, u8, u8, u8) {
        let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        (byte(self.r), byte(self.g), byte(self.b), byte(self.a))
    }

    /// Byte channels without opacity.
    pub fn to_rgb_u8(self) -> (u8, u8, u8) {
        let (r, g, b, _) = self.to_rgba_u8();
        (r, g, b)
    }

    /// Returns true if nothing shows through the color.
    pub fn is_opaque(self) -> bool {
        self.a >= 1.0
    }

    /// The same color with its opacity scaled by `factor`.
    pub fn multiply_alpha(self, factor: f32) -> Self {
        Self {
            a: (self.a * factor).clamp(0.0, 1.0),
            ..self
        }
    }

    /// Draws `self` over `below` (Porter-Duff source-over).
    pub fn blend_over(self, below: Self) -> Self {
        if self.is_opaque() || below.a <= 0.0 {
            return self;
        }
        if self.a <= 0.0 {
            return below;
        }

        let rest = below.a * (1.0 - self.a);
        let a = self.a + rest;
        let mix = |top: f32, bottom: f32| (top * self.a + bottom * rest) / a;
        Self::rgba(mix(self.r, below.r), mix(self.g, below.g), mix(self.b, below.b), a)
    }

    /// Reads a color name or a hex value.
    ///
    /// Names are matched without case: `transparent`, `black`, `white`,
    /// `red`, `green`, `blue`, `gray` and `grey`.
    pub fn parse(input: &str) -> Result<Self, ColorParseError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ColorParseError::Empty);
        }

        let named = match input.to_ascii_lowercase().as_str() {
            "transparent" => Some(Self::TRANSPARENT),
            "black" => Some(Self::BLACK),
            "white" => Some(Self::WHITE),
            "red" => Some(Self::RED),
            "green" => Some(Self::GREEN),
            "blue" => Some(Self::BLUE),
            "gray" | "grey" => Some(Self::GRAY),
            _ => None,
        };
        if let Some(color) = named {
            return Ok(color);
        }

        if input.starts_with('#') || input.chars().all(|c| c.is_ascii_hexdigit()) {
            Self::from_hex(input)
        } else {
            Err(ColorParseError::UnknownName(input.to_string()))
        }
    }

    /// Reads `RGB`, `RGBA`, `RRGGBB` or `RRGGBBAA`, with an optional `#`.
    pub fn from_hex(input: &str) -> Result<Self, ColorParseError> {
        let digits = input
            .strip_prefix('#')
            .unwrap_or(input)
            .chars()
            .map(|c| {
                c.to_digit(16)
                    .map(|d| d as u8)
                    .ok_or(ColorParseError::BadDigit(c))
            })
            .collect::<Result<Vec<u8>, _>>()?;

        let channels: Vec<u8> = match digits.len() {
            0 => return Err(ColorParseError::Empty),
            3 | 4 => digits.iter().map(|d| d * 17).collect(),
            6 | 8 => digits.chunks(2).map(|pair| pair[0] * 16 + pair[1]).collect(),
            len => return Err(ColorParseError::BadLength(len)),
        };
        let alpha = channels.get(3).copied().unwrap_or(u8::MAX);
        Ok(Self::from_rgba_u8(channels[0], channels[1], channels[2], alpha))
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Lowercase `#rrggbb`, with `aa` appended when not opaque.
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (r, g, b, a) = self.to_rgba_u8();
        write!(f, "#{r:02x}{g:02x}{b:02x}")?;
        if a != u8::MAX {
            write!(f, "{a:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Color({self})")
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_hex_forms() {
        assert_eq!(Color::from_hex("#ff8000").unwrap().to_rgba_u8(), (255, 128, 0, 255));
        assert_eq!(Color::from_hex("ccc").unwrap(), Color::from_hex("#cccccc").unwrap());
        assert_eq!(Color::from_hex("#f008").unwrap().to_rgba_u8(), (255, 0, 0, 136));
        assert_eq!(Color::from_hex("#11223344").unwrap().to_rgba_u8(), (0x11, 0x22, 0x33, 0x44));
    }

    #[test]
    fn test_hex_errors() {
        assert_eq!(Color::from_hex("#"), Err(ColorParseError::Empty));
        assert_eq!(Color::from_hex("#12345"), Err(ColorParseError::BadLength(5)));
        assert_eq!(Color::from_hex("#gg0000"), Err(ColorParseError::BadDigit('g')));
    }

    #[test]
    fn test_parse_names() {
        assert_eq!(Color::parse("Grey").unwrap(), Color::GRAY);
        assert_eq!(Color::parse(" transparent ").unwrap(), Color::TRANSPARENT);
        assert_eq!("#000".parse::<Color>().unwrap(), Color::BLACK);
        assert_eq!(
            Color::parse("mauve"),
            Err(ColorParseError::UnknownName("mauve".to_string()))
        );
        assert_eq!(Color::parse("  "), Err(ColorParseError::Empty));
    }

    #[test]
    fn test_display() {
        assert_eq!(Color::RED.to_string(), "#ff0000");
        assert_eq!(Color::TRANSPARENT.to_string(), "#00000000");
    }

    #[test]
    fn test_multiply_alpha_clamps() {
        assert_eq!(Color::WHITE.multiply_alpha(0.25).a, 0.25);
        assert_eq!(Color::WHITE.multiply_alpha(4.0).a, 1.0);
        assert_eq!(Color::WHITE.multiply_alpha(-1.0).a, 0.0);
    }

    #[test]
    fn test_blend_over() {
        assert_eq!(Color::RED.blend_over(Color::BLUE), Color::RED);
        assert_eq!(Color::TRANSPARENT.blend_over(Color::BLUE), Color::BLUE);

        let half = Color::WHITE.multiply_alpha(0.5).blend_over(Color::BLACK);
        assert_eq!(half.to_rgba_u8(), (128, 128, 128, 255));
    }

    #[test]
    fn test_serde_uses_strings() {
        #[derive(Serialize, Deserialize)]
        struct Holder {
            color: Color,
        }

        let holder: Holder = toml::from_str("color = \"#cccccc\"").unwrap();
        assert_eq!(holder.color, Color::from_rgb_u8(0xcc, 0xcc, 0xcc));
        assert_eq!(toml::to_string(&holder).unwrap().trim(), "color = \"#cccccc\"");
        assert!(toml::from_str::<Holder>("color = \"nope\"").is_err());
    }
}
