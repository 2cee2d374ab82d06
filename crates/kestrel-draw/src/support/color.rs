//! RGBA colors and the built-in palette.

use glam::Vec4;
use serde::{Deserialize, Serialize};

use crate::{DrawError, Result};

/// An RGBA color with channels in `[0, 1]`.
///
/// The float channels, their byte equivalents and a `Vec4` for shader
/// uniforms are all computed on construction.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f32; 4]", into = "[f32; 4]")]
pub struct Color {
    r: f32,
    g: f32,
    b: f32,
    a: f32,
    bytes: [u8; 4],
    vector: Vec4,
}

impl Color {
    pub const BLACK: Color = Color::opaque(0.0, 0.0, 0.0);
    pub const RED: Color = Color::opaque(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::opaque(0.0, 1.0, 0.0);
    pub const YELLOW: Color = Color::opaque(1.0, 1.0, 0.0);
    pub const BLUE: Color = Color::opaque(0.0, 0.0, 1.0);
    pub const MAGENTA: Color = Color::opaque(1.0, 0.0, 1.0);
    pub const CYAN: Color = Color::opaque(0.0, 1.0, 1.0);
    pub const WHITE: Color = Color::opaque(1.0, 1.0, 1.0);

    pub const LIME: Color = Color::opaque(0.5, 1.0, 0.0);
    pub const LIGHT_BLUE: Color = Color::opaque(0.0, 0.5, 1.0);
    pub const PINK: Color = Color::opaque(1.0, 0.0, 0.5);
    pub const ORANGE: Color = Color::opaque(1.0, 0.5, 0.0);
    pub const LIGHT_CYAN: Color = Color::opaque(0.0, 1.0, 0.5);
    pub const PURPLE: Color = Color::opaque(0.5, 0.0, 1.0);

    pub const GREY_05: Color = Color::opaque(0.05, 0.05, 0.05);
    pub const GREY_10: Color = Color::opaque(0.1, 0.1, 0.1);
    pub const GREY_20: Color = Color::opaque(0.2, 0.2, 0.2);
    pub const GREY_30: Color = Color::opaque(0.3, 0.3, 0.3);
    pub const GREY_40: Color = Color::opaque(0.4, 0.4, 0.4);
    pub const GREY_50: Color = Color::opaque(0.5, 0.5, 0.5);
    pub const GREY_60: Color = Color::opaque(0.6, 0.6, 0.6);
    pub const GREY_70: Color = Color::opaque(0.7, 0.7, 0.7);
    pub const GREY_80: Color = Color::opaque(0.8, 0.8, 0.8);
    pub const GREY_90: Color = Color::opaque(0.9, 0.9, 0.9);

    /// Build a color, rejecting any channel outside `[0, 1]` (NaN included).
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Result<Self> {
        for (channel, value) in [('r', r), ('g', g), ('b', b), ('a', a)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(DrawError::ColorOutOfRange { channel, value });
            }
        }
        Ok(Self::from_unit(r, g, b, a))
    }

    pub fn from_bytes(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::from_unit(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            f32::from(a) / 255.0,
        )
    }

    // Channels must already be in range
    const fn from_unit(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            r,
            g,
            b,
            a,
            bytes: [to_byte(r), to_byte(g), to_byte(b), to_byte(a)],
            vector: Vec4::new(r, g, b, a),
        }
    }

    const fn opaque(r: f32, g: f32, b: f32) -> Self {
        Self::from_unit(r, g, b, 1.0)
    }

    pub fn r(&self) -> f32 {
        self.r
    }

    pub fn g(&self) -> f32 {
        self.g
    }

    pub fn b(&self) -> f32 {
        self.b
    }

    pub fn a(&self) -> f32 {
        self.a
    }

    /// Channels as `[r, g, b, a]` bytes
    pub fn bytes(&self) -> [u8; 4] {
        self.bytes
    }

    pub fn as_vec4(&self) -> Vec4 {
        self.vector
    }

    pub fn as_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn with_alpha(&self, a: f32) -> Result<Self> {
        Self::new(self.r, self.g, self.b, a)
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

const fn to_byte(channel: f32) -> u8 {
    (channel * 255.0 + 0.5) as u8
}

impl TryFrom<[f32; 4]> for Color {
    type Error = DrawError;

    fn try_from([r, g, b, a]: [f32; 4]) -> Result<Self> {
        Color::new(r, g, b, a)
    }
}

impl From<Color> for [f32; 4] {
    fn from(color: Color) -> Self {
        color.as_array()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_rejected() {
        assert_eq!(
            Color::new(1.2, 0.0, 0.0, 1.0),
            Err(DrawError::ColorOutOfRange {
                channel: 'r',
                value: 1.2
            })
        );
        assert!(Color::new(0.0, -0.1, 0.0, 1.0).is_err());
        assert!(Color::new(0.0, 0.0, 0.0, f32::NAN).is_err());
    }

    #[test]
    fn test_representations_agree() {
        let color = Color::new(1.0, 0.5, 0.0, 0.25).unwrap();
        assert_eq!(color.bytes(), [255, 128, 0, 64]);
        assert_eq!(color.as_vec4(), Vec4::new(1.0, 0.5, 0.0, 0.25));
    }

    #[test]
    fn test_palette() {
        assert_eq!(Color::WHITE.bytes(), [255, 255, 255, 255]);
        assert_eq!(Color::ORANGE, Color::new(1.0, 0.5, 0.0, 1.0).unwrap());
        assert_eq!(Color::GREY_50.bytes()[0], 128);
        assert_eq!(Color::default(), Color::BLACK);
    }

    #[test]
    fn test_from_bytes() {
        let color = Color::from_bytes(0, 255, 51, 255);
        assert_eq!(color.g(), 1.0);
        assert!((color.b() - 0.2).abs() < 1e-6);
        assert_eq!(color.bytes(), [0, 255, 51, 255]);
    }
}
