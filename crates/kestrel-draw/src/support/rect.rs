//! Axis-aligned rectangles.
//!
//! Both types store their four edges. `top` and `bottom` are edges, not a
//! direction: in an upper-left-origin frame `top < bottom`, in a
//! lower-left-origin frame `top > bottom`. Width and height are always
//! reported as non-negative extents.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Coordinate2, Coordinate2i};

/// Rectangle in world or screen units
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RectangularArea2 {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl RectangularArea2 {
    pub const ZERO: RectangularArea2 = RectangularArea2::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> f32 {
        (self.right - self.left).abs()
    }

    pub fn height(&self) -> f32 {
        (self.bottom - self.top).abs()
    }

    pub fn top_left(&self) -> Coordinate2 {
        Coordinate2::new(self.left, self.top)
    }

    pub fn bottom_left(&self) -> Coordinate2 {
        Coordinate2::new(self.left, self.bottom)
    }

    pub fn top_right(&self) -> Coordinate2 {
        Coordinate2::new(self.right, self.top)
    }

    pub fn bottom_right(&self) -> Coordinate2 {
        Coordinate2::new(self.right, self.bottom)
    }

    pub fn center(&self) -> Coordinate2 {
        Coordinate2::new(
            (self.left + self.right) * 0.5,
            (self.top + self.bottom) * 0.5,
        )
    }

    /// Edges are inclusive, regardless of which way `top` points.
    pub fn contains(&self, point: Coordinate2) -> bool {
        let (min_x, max_x) = (self.left.min(self.right), self.left.max(self.right));
        let (min_y, max_y) = (self.top.min(self.bottom), self.top.max(self.bottom));
        (min_x..=max_x).contains(&point.x) && (min_y..=max_y).contains(&point.y)
    }
}

impl fmt::Display for RectangularArea2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{}x{}x{}",
            self.left, self.top, self.right, self.bottom
        )
    }
}

/// Pixel rectangle in texture space (origin at the upper left).
///
/// `right` and `bottom` are exclusive: a 64 pixel wide column starting at 0
/// has `left == 0` and `right == 64`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RectangularArea2i {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl RectangularArea2i {
    pub const ZERO: RectangularArea2i = RectangularArea2i::new(0, 0, 0, 0);

    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Rectangle from its upper-left corner and size.
    pub const fn from_origin_size(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    pub fn width(&self) -> i32 {
        (self.right - self.left).abs()
    }

    pub fn height(&self) -> i32 {
        (self.bottom - self.top).abs()
    }

    pub fn is_empty(&self) -> bool {
        self.right <= self.left || self.bottom <= self.top
    }

    pub fn top_left(&self) -> Coordinate2i {
        Coordinate2i::new(self.left, self.top)
    }

    pub fn bottom_right(&self) -> Coordinate2i {
        Coordinate2i::new(self.right, self.bottom)
    }

    /// True when the rectangle lies within `[0, width] x [0, height]`.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.left >= 0
            && self.top >= 0
            && i64::from(self.right) <= i64::from(width)
            && i64::from(self.bottom) <= i64::from(height)
    }
}

impl fmt::Display for RectangularArea2i {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{}x{}x{}",
            self.left, self.top, self.right, self.bottom
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extent_ignores_orientation() {
        let upper_left = RectangularArea2::new(-4.0, -3.0, 4.0, 3.0);
        let lower_left = RectangularArea2::new(-4.0, 3.0, 4.0, -3.0);
        assert_eq!(upper_left.width(), 8.0);
        assert_eq!(upper_left.height(), 6.0);
        assert_eq!(lower_left.height(), 6.0);
        assert_eq!(lower_left.center(), Coordinate2::ZERO);
        assert!(lower_left.contains(Coordinate2::new(4.0, -3.0)));
        assert!(!lower_left.contains(Coordinate2::new(4.5, 0.0)));
    }

    #[test]
    fn test_pixel_rect() {
        let rect = RectangularArea2i::from_origin_size(64, 0, 64, 64);
        assert_eq!(rect.right, 128);
        assert_eq!(rect.width(), 64);
        assert_eq!(rect.height(), 64);
        assert!(!rect.is_empty());
        assert!(rect.fits_within(256, 64));
        assert!(!rect.fits_within(100, 64));
        assert!(RectangularArea2i::ZERO.is_empty());
    }
}
