use crate::support::RectangularArea2i;
use crate::{DrawError, Result};

/// Pixel sub-rectangle of a texture with its normalized UV quad.
///
/// UVs are stored as eight floats in top-left, bottom-left, top-right,
/// bottom-right order, matching the vertex order of a quad strip.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Texture2dArea {
    area: RectangularArea2i,
    uvs: [f32; 8],
}

impl Texture2dArea {
    /// The area must be non-empty and lie inside the texture.
    pub fn new(area: RectangularArea2i, texture_width: u32, texture_height: u32) -> Result<Self> {
        if area.is_empty() {
            return Err(DrawError::invalid("area", format!("{area} is empty")));
        }
        if !area.fits_within(texture_width, texture_height) {
            return Err(DrawError::invalid(
                "area",
                format!("{area} exceeds a {texture_width}x{texture_height} texture"),
            ));
        }

        let w = texture_width as f32;
        let h = texture_height as f32;
        let (left, top) = (area.left as f32 / w, area.top as f32 / h);
        let (right, bottom) = (area.right as f32 / w, area.bottom as f32 / h);

        Ok(Self {
            area,
            uvs: [left, top, left, bottom, right, top, right, bottom],
        })
    }

    pub fn area(&self) -> RectangularArea2i {
        self.area
    }

    pub fn width(&self) -> u32 {
        self.area.width() as u32
    }

    pub fn height(&self) -> u32 {
        self.area.height() as u32
    }

    pub fn texture_coordinates(&self) -> &[f32; 8] {
        &self.uvs
    }

    /// UV of one corner: 0 top-left, 1 bottom-left, 2 top-right, 3 bottom-right.
    pub fn corner(&self, corner: usize) -> [f32; 2] {
        let i = (corner % 4) * 2;
        [self.uvs[i], self.uvs[i + 1]]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uv_order() {
        let area = Texture2dArea::new(RectangularArea2i::new(64, 16, 128, 48), 256, 64).unwrap();
        assert_eq!(
            area.texture_coordinates(),
            &[0.25, 0.25, 0.25, 0.75, 0.5, 0.25, 0.5, 0.75]
        );
        assert_eq!(area.corner(3), [0.5, 0.75]);
        assert_eq!(area.width(), 64);
        assert_eq!(area.height(), 32);
    }

    #[test]
    fn test_rejects_out_of_bounds() {
        assert!(Texture2dArea::new(RectangularArea2i::new(0, 0, 65, 10), 64, 64).is_err());
        assert!(Texture2dArea::new(RectangularArea2i::new(-1, 0, 10, 10), 64, 64).is_err());
        assert!(Texture2dArea::new(RectangularArea2i::new(5, 5, 5, 10), 64, 64).is_err());
    }
}
