//! Drawables and the per-frame render context
//!
//! A drawable lives on exactly one layer and is rendered in insertion order
//! within it. Drawables that sample a tiled texture report it through
//! [`Drawable::tiled_texture`] so the engine can hold the texture in its
//! cache for as long as the drawable is on a layer.

mod sprite;
mod sprite_group;

pub use sprite::Sprite;
pub use sprite_group::{SpriteGroup, SpriteGroupItem};

use std::any::Any;
use std::fmt;

use bytemuck::{Pod, Zeroable};
use glam::{Mat2, Vec2};

use crate::backend::{GraphicsBackend, TextureHandle};
use crate::camera::CoordinateSystemMode;
use crate::support::{Angle2, Color};
use crate::textures::{ResourceCache, Texture, Texture2dArea, TileRef, TiledTexture};
use crate::Result;

/// Engine-assigned identity of a drawable
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DrawableId(pub(crate) u64);

impl DrawableId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for DrawableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Downcasting support for boxed drawables
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Something a layer can render
pub trait Drawable: AsAny {
    /// Issue draw calls for this frame.
    fn render(&self, frame: &mut Frame<'_>) -> Result<()>;

    /// Cache key of the tiled texture this drawable samples, if any.
    ///
    /// Read once when the drawable is added to a layer. It must not change
    /// while the drawable is on a layer.
    fn tiled_texture(&self) -> Option<&str> {
        None
    }

    fn is_visible(&self) -> bool {
        true
    }
}

/// Vertex handed to the backend, four per quad
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: [f32; 4],
}

/// Build the four vertices of a textured quad centered on `position`.
///
/// `size` is the full quad size in layer units. Vertex order matches the UV
/// order of [`Texture2dArea`].
pub fn quad_vertices(
    position: Vec2,
    size: Vec2,
    rotation: Angle2,
    area: &Texture2dArea,
    tint: Color,
    mode: CoordinateSystemMode,
) -> [QuadVertex; 4] {
    let half = size * 0.5;
    // Direction of the texture's top edge in layer space
    let up = match mode {
        CoordinateSystemMode::OriginAtUpperLeft => -1.0,
        CoordinateSystemMode::OriginAtLowerLeft => 1.0,
    };
    let offsets = [
        Vec2::new(-half.x, up * half.y),
        Vec2::new(-half.x, -up * half.y),
        Vec2::new(half.x, up * half.y),
        Vec2::new(half.x, -up * half.y),
    ];

    let turn = Mat2::from_angle(rotation.radians());
    let color = tint.as_array();
    let mut vertices = [QuadVertex::default(); 4];
    for (corner, (vertex, offset)) in vertices.iter_mut().zip(offsets).enumerate() {
        let p = position + turn * offset;
        *vertex = QuadVertex {
            position: [p.x, p.y],
            uv: area.corner(corner),
            color,
        };
    }
    vertices
}

/// Render context handed to drawables for one layer.
///
/// Resolves tile references against the engine's caches and forwards quad
/// batches to the backend, binding textures as needed and counting draws.
pub struct Frame<'a> {
    backend: &'a mut dyn GraphicsBackend,
    textures: &'a ResourceCache<Texture>,
    tiled_textures: &'a ResourceCache<TiledTexture>,
    coordinate_system: CoordinateSystemMode,
    bound: Option<TextureHandle>,
    draw_calls: u32,
}

impl<'a> Frame<'a> {
    pub(crate) fn new(
        backend: &'a mut dyn GraphicsBackend,
        textures: &'a ResourceCache<Texture>,
        tiled_textures: &'a ResourceCache<TiledTexture>,
        coordinate_system: CoordinateSystemMode,
    ) -> Self {
        Self {
            backend,
            textures,
            tiled_textures,
            coordinate_system,
            bound: None,
            draw_calls: 0,
        }
    }

    pub fn coordinate_system(&self) -> CoordinateSystemMode {
        self.coordinate_system
    }

    pub fn tiled_texture(&self, key: &str) -> Result<&TiledTexture> {
        self.tiled_textures.get(key)
    }

    pub fn tile(&self, tile: &TileRef) -> Result<&Texture2dArea> {
        self.tiled_textures
            .get(&tile.tiled_texture)?
            .tile(&tile.index, &tile.tile)
    }

    /// Draw quads sampling the texture behind `tiled_texture`.
    pub fn draw_quads(&mut self, tiled_texture: &str, vertices: &[QuadVertex]) -> Result<()> {
        if vertices.is_empty() {
            return Ok(());
        }

        let texture_key = self.tiled_textures.get(tiled_texture)?.texture_key();
        let handle = self.textures.get(texture_key)?.handle;
        if self.bound != Some(handle) {
            self.backend.bind_texture(handle)?;
            self.bound = Some(handle);
        }

        self.backend.draw_quads(vertices)?;
        self.draw_calls += 1;
        Ok(())
    }

    /// Draw calls issued through this frame so far
    pub fn draw_calls(&self) -> u32 {
        self.draw_calls
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::support::RectangularArea2i;

    fn full_area() -> Texture2dArea {
        Texture2dArea::new(RectangularArea2i::new(0, 0, 16, 16), 16, 16).unwrap()
    }

    #[test]
    fn test_quad_corners_upper_left() {
        let quad = quad_vertices(
            Vec2::new(10.0, 10.0),
            Vec2::new(4.0, 2.0),
            Angle2::ZERO,
            &full_area(),
            Color::WHITE,
            CoordinateSystemMode::OriginAtUpperLeft,
        );

        assert_eq!(quad[0].position, [8.0, 9.0]);
        assert_eq!(quad[0].uv, [0.0, 0.0]);
        assert_eq!(quad[1].position, [8.0, 11.0]);
        assert_eq!(quad[1].uv, [0.0, 1.0]);
        assert_eq!(quad[3].position, [12.0, 11.0]);
        assert_eq!(quad[3].color, [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_quad_lower_left_flips_top() {
        let quad = quad_vertices(
            Vec2::ZERO,
            Vec2::new(2.0, 2.0),
            Angle2::ZERO,
            &full_area(),
            Color::WHITE,
            CoordinateSystemMode::OriginAtLowerLeft,
        );
        assert_eq!(quad[0].position, [-1.0, 1.0]);
    }

    #[test]
    fn test_quad_rotation() {
        let quad = quad_vertices(
            Vec2::ZERO,
            Vec2::new(2.0, 2.0),
            Angle2::new(90.0).unwrap(),
            &full_area(),
            Color::WHITE,
            CoordinateSystemMode::OriginAtLowerLeft,
        );
        // Top-left (-1, 1) turned a quarter counter-clockwise
        assert!((quad[0].position[0] - -1.0).abs() < 1e-5);
        assert!((quad[0].position[1] - -1.0).abs() < 1e-5);
    }

    #[test]
    fn test_vertex_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<QuadVertex>(), 32);
        let quad = [QuadVertex::default(); 4];
        assert_eq!(bytemuck::cast_slice::<QuadVertex, f32>(&quad).len(), 32);
    }
}
