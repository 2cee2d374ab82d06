use glam::Vec2;

use super::{Drawable, Frame, quad_vertices};
use crate::support::{Angle2, Color, Coordinate2};
use crate::textures::{TileKey, TileRef};
use crate::Result;

/// One textured quad showing a single tile.
///
/// The quad is centered on `position` and sized from the tile's pixel size
/// times `scale`. The tiled texture is fixed at construction; the index and
/// tile within it can change freely.
#[derive(Clone, Debug)]
pub struct Sprite {
    tile: TileRef,
    position: Coordinate2,
    scale: Vec2,
    rotation: Angle2,
    tint: Color,
    visible: bool,
}

impl Sprite {
    pub fn new(tile: TileRef) -> Self {
        Self {
            tile,
            position: Coordinate2::ZERO,
            scale: Vec2::ONE,
            rotation: Angle2::ZERO,
            tint: Color::WHITE,
            visible: true,
        }
    }

    pub fn at(mut self, position: Coordinate2) -> Self {
        self.position = position;
        self
    }

    pub fn tile(&self) -> &TileRef {
        &self.tile
    }

    /// Show another tile of the same tiled texture.
    pub fn set_tile(&mut self, index: impl Into<String>, tile: TileKey) {
        self.tile.index = index.into();
        self.tile.tile = tile;
    }

    pub fn position(&self) -> Coordinate2 {
        self.position
    }

    pub fn set_position(&mut self, position: Coordinate2) {
        self.position = position;
    }

    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: Vec2) {
        self.scale = scale;
    }

    pub fn rotation(&self) -> Angle2 {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: Angle2) {
        self.rotation = rotation;
    }

    pub fn tint(&self) -> Color {
        self.tint
    }

    pub fn set_tint(&mut self, tint: Color) {
        self.tint = tint;
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

impl Drawable for Sprite {
    fn render(&self, frame: &mut Frame<'_>) -> Result<()> {
        let area = *frame.tile(&self.tile)?;
        let size = Vec2::new(area.width() as f32, area.height() as f32) * self.scale;

        let quad = quad_vertices(
            self.position.as_vec2(),
            size,
            self.rotation,
            &area,
            self.tint,
            frame.coordinate_system(),
        );
        frame.draw_quads(&self.tile.tiled_texture, &quad)
    }

    fn tiled_texture(&self) -> Option<&str> {
        Some(&self.tile.tiled_texture)
    }

    fn is_visible(&self) -> bool {
        self.visible
    }
}
