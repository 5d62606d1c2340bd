use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ColorError {
    #[error("invalid color '{0}'")]
    Invalid(String),
}

/// RGBA color. Serialized as a CSS color string (`#rrggbb` or `rgba(..)`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn with_alpha(mut self, a: f32) -> Self {
        self.a = a.clamp(0.0, 1.0);
        self
    }

    pub fn to_f32_array(&self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a,
        ]
    }

    /// CSS representation as understood by canvas paint state.
    pub fn to_css(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a >= 1.0 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "rgba({},{},{},{})", self.r, self.g, self.b, self.a)
        }
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ColorError::Invalid(s.to_string());
        let trimmed = s.trim();

        if let Some(hex) = trimmed.strip_prefix('#') {
            if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(invalid());
            }
            let channel = |i: usize, len: usize| {
                let digits = hex.get(i..i + len).ok_or_else(invalid)?;
                let v = u8::from_str_radix(digits, 16).map_err(|_| invalid())?;
                Ok::<u8, ColorError>(if len == 1 { v * 17 } else { v })
            };
            return match hex.len() {
                3 => Ok(Color::rgb(channel(0, 1)?, channel(1, 1)?, channel(2, 1)?)),
                6 => Ok(Color::rgb(channel(0, 2)?, channel(2, 2)?, channel(4, 2)?)),
                _ => Err(invalid()),
            };
        }

        let (body, has_alpha) = if let Some(rest) = trimmed.strip_prefix("rgba(") {
            (rest, true)
        } else if let Some(rest) = trimmed.strip_prefix("rgb(") {
            (rest, false)
        } else {
            return Err(invalid());
        };
        let body = body.strip_suffix(')').ok_or_else(invalid)?;
        let parts: Vec<&str> = body.split(',').map(str::trim).collect();
        let expected = if has_alpha { 4 } else { 3 };
        if parts.len() != expected {
            return Err(invalid());
        }
        let channel = |p: &str| {
            if p.is_empty() || !p.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            p.parse::<u8>().map_err(|_| invalid())
        };
        let alpha = if has_alpha {
            let a = parts[3].parse::<f32>().map_err(|_| invalid())?;
            if !a.is_finite() {
                return Err(invalid());
            }
            a
        } else {
            1.0
        };
        Ok(Color::rgba(
            channel(parts[0])?,
            channel(parts[1])?,
            channel(parts[2])?,
            alpha.clamp(0.0, 1.0),
        ))
    }
}

impl TryFrom<String> for Color {
    type Error = ColorError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_string()
    }
}

/// How a source's shapes are stroked and filled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerStyle {
    pub stroke_color: Color,
    pub fill_color: Color,
    /// Stroke width in pixels, independent of zoom.
    pub weight: f64,
    pub fill_opacity: f32,
    /// Radius in pixels of the marker drawn for point geometries.
    pub point_radius: f64,
}

impl Default for LayerStyle {
    fn default() -> Self {
        Self {
            stroke_color: Color::rgb(0x25, 0x63, 0xeb),
            fill_color: Color::rgb(0x25, 0x63, 0xeb),
            weight: 2.0,
            fill_opacity: 0.2,
            point_radius: 4.0,
        }
    }
}

impl LayerStyle {
    pub fn with_colors(mut self, stroke: Color, fill: Color) -> Self {
        self.stroke_color = stroke;
        self.fill_color = fill;
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!("#2563eb".parse::<Color>().unwrap(), Color::rgb(0x25, 0x63, 0xeb));
        assert_eq!("#fff".parse::<Color>().unwrap(), Color::WHITE);
        assert!("#12345".parse::<Color>().is_err());
        assert!("#gggggg".parse::<Color>().is_err());
    }

    #[test]
    fn test_parse_rgba() {
        let c: Color = "rgba(255, 255, 255, 0.85)".parse().unwrap();
        assert_eq!(c, Color::rgba(255, 255, 255, 0.85));
        assert_eq!(c.to_css(), "rgba(255,255,255,0.85)");
        assert_eq!("rgb(1,2,3)".parse::<Color>().unwrap(), Color::rgb(1, 2, 3));
        assert!("rgb(1,2)".parse::<Color>().is_err());
        assert!("blue".parse::<Color>().is_err());
    }

    #[test]
    fn test_signed_channels_rejected() {
        assert!("#+f+f+f".parse::<Color>().is_err());
        assert!("#+fffff".parse::<Color>().is_err());
        assert!("rgb(+1,2,3)".parse::<Color>().is_err());
        assert!("rgba(1,2,3,NaN)".parse::<Color>().is_err());
        assert_eq!("#FfF".parse::<Color>().unwrap(), Color::rgb(255, 255, 255));
    }

    #[test]
    fn test_style_serde_uses_css_strings() {
        let style = LayerStyle::default();
        let json = serde_json::to_value(&style).unwrap();
        assert_eq!(json["stroke_color"], "#2563eb");

        let parsed: LayerStyle =
            serde_json::from_str(r##"{"stroke_color":"#ff0000","weight":3}"##).unwrap();
        assert_eq!(parsed.stroke_color, Color::rgb(255, 0, 0));
        assert_eq!(parsed.weight, 3.0);
        assert_eq!(parsed.fill_opacity, 0.2);
    }
}
