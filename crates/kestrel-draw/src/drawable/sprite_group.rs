use glam::Vec2;

use super::{Drawable, Frame, QuadVertex, quad_vertices};
use crate::support::{Angle2, Color, Coordinate2};
use crate::textures::{TileKey, TiledTexture};
use crate::Result;

/// One entry of a [`SpriteGroup`]
#[derive(Clone, Debug)]
pub struct SpriteGroupItem {
    pub index: String,
    pub tile: TileKey,
    pub position: Coordinate2,
    pub scale: Vec2,
    pub rotation: Angle2,
    pub tint: Color,
    pub visible: bool,
}

impl SpriteGroupItem {
    /// Item showing `tile` from the default index.
    pub fn new(tile: TileKey, position: Coordinate2) -> Self {
        Self {
            index: TiledTexture::DEFAULT_INDEX.to_string(),
            tile,
            position,
            scale: Vec2::ONE,
            rotation: Angle2::ZERO,
            tint: Color::WHITE,
            visible: true,
        }
    }
}

/// Many sprites sharing one tiled texture, drawn in a single batch
#[derive(Clone, Debug)]
pub struct SpriteGroup {
    tiled_texture: String,
    items: Vec<SpriteGroupItem>,
    visible: bool,
}

impl SpriteGroup {
    pub fn new(tiled_texture: impl Into<String>) -> Self {
        Self {
            tiled_texture: tiled_texture.into(),
            items: Vec::new(),
            visible: true,
        }
    }

    /// Append an item and return its position in the group.
    pub fn push(&mut self, item: SpriteGroupItem) -> usize {
        self.items.push(item);
        self.items.len() - 1
    }

    pub fn get(&self, i: usize) -> Option<&SpriteGroupItem> {
        self.items.get(i)
    }

    pub fn get_mut(&mut self, i: usize) -> Option<&mut SpriteGroupItem> {
        self.items.get_mut(i)
    }

    pub fn items(&self) -> &[SpriteGroupItem] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut [SpriteGroupItem] {
        &mut self.items
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

impl Drawable for SpriteGroup {
    fn render(&self, frame: &mut Frame<'_>) -> Result<()> {
        let mode = frame.coordinate_system();
        let mut vertices: Vec<QuadVertex> = Vec::with_capacity(self.items.len() * 4);

        {
            let tiled = frame.tiled_texture(&self.tiled_texture)?;
            for item in self.items.iter().filter(|item| item.visible) {
                let area = tiled.tile(&item.index, &item.tile)?;
                let size = Vec2::new(area.width() as f32, area.height() as f32) * item.scale;
                vertices.extend(quad_vertices(
                    item.position.as_vec2(),
                    size,
                    item.rotation,
                    area,
                    item.tint,
                    mode,
                ));
            }
        }

        frame.draw_quads(&self.tiled_texture, &vertices)
    }

    fn tiled_texture(&self) -> Option<&str> {
        Some(&self.tiled_texture)
    }

    fn is_visible(&self) -> bool {
        self.visible
    }
}
