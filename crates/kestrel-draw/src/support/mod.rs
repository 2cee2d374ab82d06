//! Geometry and color value types

mod angle;
mod color;
mod coordinate;
mod rect;

pub use angle::Angle2;
pub use color::Color;
pub use coordinate::{Coordinate2, Coordinate2i, GridLocation};
pub use rect::{RectangularArea2, RectangularArea2i};
