use serde::{Deserialize, Serialize};

use crate::support::Color;
use crate::{DrawError, Result};

/// Layout of decoded pixel data
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PixelFormat {
    #[default]
    Rgba8,
    Rgb8,
    Luminance8,
}

impl PixelFormat {
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgba8 => 4,
            PixelFormat::Rgb8 => 3,
            PixelFormat::Luminance8 => 1,
        }
    }
}

/// Decoded pixels handed over by an image loader.
///
/// The draw engine only reads the dimensions and format; the bytes are passed
/// through to the backend on upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Vec<u8>,
}

impl Bitmap {
    pub fn new(width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(DrawError::invalid(
                "bitmap",
                format!("dimensions must be non-zero, got {width}x{height}"),
            ));
        }

        let expected = width as usize * height as usize * format.bytes_per_pixel();
        if data.len() != expected {
            return Err(DrawError::BitmapSize {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            format,
            data,
        })
    }

    /// RGBA bitmap filled with one color.
    pub fn solid(width: u32, height: u32, color: Color) -> Result<Self> {
        let pixels = width as usize * height as usize;
        let data = color.bytes().repeat(pixels);
        Self::new(width, height, PixelFormat::Rgba8, data)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}
