//! Texture atlases and the shared texture registries
//!
//! A [`Bitmap`] is uploaded once and cached as a [`Texture`]. A
//! [`TiledTexture`] wraps one cached texture and carries any number of named
//! [`TileIndex`] partitions of it, each producing the [`Texture2dArea`] UV
//! quads that drawables sample. Both registries are [`ResourceCache`]s.

mod area;
mod bitmap;
mod cache;
mod index;
mod tiled;

pub use area::Texture2dArea;
pub use bitmap::{Bitmap, PixelFormat};
pub use cache::{CachePolicy, CacheUser, ResourceCache};
pub use index::{TileIndex, TileKey, TileLayout};
pub use tiled::{TileRef, TiledTexture};

use crate::backend::TextureHandle;

/// A bitmap that has been uploaded to the graphics backend
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Texture {
    pub handle: TextureHandle,
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
}
