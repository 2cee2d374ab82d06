//! Error types for the draw engine.

use thiserror::Error;

use crate::drawable::DrawableId;
use crate::layer::LayerKind;
use crate::textures::CacheUser;

/// Errors raised by the draw engine and its registries
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DrawError {
    /// Malformed argument passed to a constructor or setter
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    /// Color channel outside [0, 1]
    #[error("color channel {channel} out of range: {value} (expected 0.0..=1.0)")]
    ColorOutOfRange { channel: char, value: f32 },

    /// Angles must be finite before they can be normalized
    #[error("angle must be finite, got {0}")]
    NonFiniteAngle(f32),

    /// Camera zoom must be a finite positive value
    #[error("invalid zoom {0}: zoom must be greater than 0")]
    InvalidZoom(f32),

    /// Tile count is zero, exceeds the bitmap or does not divide it evenly
    #[error("{count} tiles cannot evenly divide a {axis} of {pixels} pixels")]
    InvalidTileCount {
        axis: &'static str,
        count: u32,
        pixels: u32,
    },

    /// Tile key does not belong to this index
    #[error("tile {0} is not part of this index")]
    UnknownTile(String),

    /// Index name not present on a tiled texture
    #[error("tiled texture has no index named `{0}`")]
    UnknownIndex(String),

    /// Index name already present on a tiled texture
    #[error("tiled texture already has an index named `{0}`")]
    DuplicateIndex(String),

    /// Bitmap bytes do not match the declared dimensions and format
    #[error("bitmap data is {actual} bytes, expected {expected}")]
    BitmapSize { expected: usize, actual: usize },

    /// Cache key registered twice
    #[error("{cache} `{key}` is already registered")]
    AlreadyRegistered { cache: &'static str, key: String },

    /// Cache key not registered
    #[error("{cache} `{key}` is not registered")]
    NotRegistered { cache: &'static str, key: String },

    /// Unregister attempted while users remain
    #[error("{cache} `{key}` still has {users} registered users")]
    ResourceInUse {
        cache: &'static str,
        key: String,
        users: usize,
    },

    /// The same user added twice against one key
    #[error("{user} is already a user of `{key}`")]
    DuplicateUser { key: String, user: CacheUser },

    /// Removing a user that was never added
    #[error("{user} is not a user of `{key}`")]
    UnknownUser { key: String, user: CacheUser },

    /// Two layers cannot share a z-index
    #[error("a layer already exists at z-index {0}")]
    LayerExists(i32),

    /// No layer at this z-index
    #[error("no layer at z-index {0}")]
    UnknownLayer(i32),

    /// Layer exists but has a different kind than requested
    #[error("layer at z-index {z_index} is {actual:?}, expected {expected:?}")]
    LayerKindMismatch {
        z_index: i32,
        expected: LayerKind,
        actual: LayerKind,
    },

    /// Z-index outside the public layer range
    #[error("z-index {0} is outside the layer range")]
    ZIndexOutOfRange(i32),

    /// Drawable id not present in any layer
    #[error("unknown drawable {0}")]
    UnknownDrawable(DrawableId),

    /// Drawable exists but is not of the requested type
    #[error("drawable {0} has a different type")]
    DrawableTypeMismatch(DrawableId),

    /// Texture handle unknown to the backend
    #[error("unknown texture handle {0}")]
    UnknownTextureHandle(u32),

    /// Draw issued with no texture bound
    #[error("no texture bound")]
    NoTextureBound,

    /// Mutating the screen camera
    #[error("the screen camera is fixed to the framebuffer")]
    FixedCamera,

    /// Object used after teardown
    #[error("{0} has been disposed")]
    Disposed(&'static str),

    /// Known unsupported path
    #[error("{0} is not implemented")]
    NotImplemented(&'static str),
}

impl DrawError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }
}
