//! 2D draw engine for Kestrel
//!
//! This crate provides a scene-graph-free renderer front end:
//! - Geometry and color primitives (Coordinate2, RectangularArea2, Angle2, Color)
//! - Texture atlases: tile indexes over a bitmap and the UV quads they produce
//! - A reference-counted resource cache shared by textures and tiled textures
//! - World and screen cameras with lazily recomputed orthographic projections
//! - Z-ordered layers holding drawables, rendered through a `GraphicsBackend`
//!
//! Rasterization is left to the backend. `HeadlessBackend` records the
//! command stream and is what tests and the demo use.

pub mod backend;
pub mod camera;
pub mod drawable;
pub mod engine;
mod error;
pub mod layer;
mod lifecycle;
pub mod support;
pub mod textures;

pub use backend::{BackendCommand, BlendMode, GraphicsBackend, HeadlessBackend, TextureHandle};
pub use camera::{Camera, CameraKind, CameraState, CameraView, CoordinateSystemMode};
pub use drawable::{Drawable, DrawableId, Frame, QuadVertex, Sprite, SpriteGroup, SpriteGroupItem};
pub use engine::{CameraHandle, DrawEngine, EngineConfig, RenderOutcome, RenderPolicy};
pub use error::DrawError;
pub use layer::{Layer, LayerKind};
pub use lifecycle::Lifecycle;
pub use support::{
    Angle2, Color, Coordinate2, Coordinate2i, GridLocation, RectangularArea2, RectangularArea2i,
};
pub use textures::{
    Bitmap, CachePolicy, CacheUser, PixelFormat, ResourceCache, Texture, Texture2dArea,
    TileIndex, TileKey, TileLayout, TileRef, TiledTexture,
};

/// Convenience result alias used across the crate
pub type Result<T> = std::result::Result<T, DrawError>;
