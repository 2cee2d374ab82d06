use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use super::{Texture2dArea, TileIndex, TileKey};
use crate::support::RectangularArea2i;
use crate::{DrawError, Result};

/// A cached texture together with the named indexes partitioning it.
///
/// The tiled texture refers to its texture by cache key and is registered as
/// a user of it for as long as the tiled texture itself is cached.
#[derive(Clone, Debug)]
pub struct TiledTexture {
    key: String,
    texture_key: String,
    width: u32,
    height: u32,
    indexes: AHashMap<String, TileIndex>,
}

impl TiledTexture {
    /// Name used when an index is created without one
    pub const DEFAULT_INDEX: &'static str = "Default";

    pub fn new(
        key: impl Into<String>,
        texture_key: impl Into<String>,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            key: key.into(),
            texture_key: texture_key.into(),
            width,
            height,
            indexes: AHashMap::new(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Cache key of the underlying texture
    pub fn texture_key(&self) -> &str {
        &self.texture_key
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn create_column_index(&mut self, name: &str, columns: u32) -> Result<&TileIndex> {
        let index = TileIndex::columns(name, self.width, self.height, columns)?;
        self.add_index(index)
    }

    pub fn create_grid_index(&mut self, name: &str, columns: u32, rows: u32) -> Result<&TileIndex> {
        let index = TileIndex::grid(name, self.width, self.height, columns, rows)?;
        self.add_index(index)
    }

    pub fn create_named_index<I, S>(&mut self, name: &str, regions: I) -> Result<&TileIndex>
    where
        I: IntoIterator<Item = (S, RectangularArea2i)>,
        S: Into<String>,
    {
        let index = TileIndex::named(name, self.width, self.height, regions)?;
        self.add_index(index)
    }

    /// Attach an index built for a texture of this size.
    pub fn add_index(&mut self, index: TileIndex) -> Result<&TileIndex> {
        if index.texture_size() != self.size() {
            let (w, h) = index.texture_size();
            return Err(DrawError::invalid(
                "index",
                format!(
                    "built for a {w}x{h} texture, `{}` is {}x{}",
                    self.key, self.width, self.height
                ),
            ));
        }
        if self.indexes.contains_key(index.name()) {
            return Err(DrawError::DuplicateIndex(index.name().to_string()));
        }

        log::debug!(
            "Tiled texture `{}` gained index `{}` ({} tiles)",
            self.key,
            index.name(),
            index.tile_count()
        );
        let name = index.name().to_string();
        Ok(&*self.indexes.entry(name).or_insert(index))
    }

    /// Detach an index. Sprites still pointing at it fail on their next render.
    pub fn remove_index(&mut self, name: &str) -> Result<TileIndex> {
        self.indexes
            .remove(name)
            .ok_or_else(|| DrawError::UnknownIndex(name.to_string()))
    }

    pub fn index(&self, name: &str) -> Result<&TileIndex> {
        self.indexes
            .get(name)
            .ok_or_else(|| DrawError::UnknownIndex(name.to_string()))
    }

    pub fn has_index(&self, name: &str) -> bool {
        self.indexes.contains_key(name)
    }

    pub fn index_count(&self) -> usize {
        self.indexes.len()
    }

    pub fn index_names(&self) -> impl Iterator<Item = &str> {
        self.indexes.keys().map(String::as_str)
    }

    pub fn tile(&self, index: &str, key: &TileKey) -> Result<&Texture2dArea> {
        self.index(index)?.tile(key)
    }

    pub fn texture_coordinates(&self, index: &str, key: &TileKey) -> Result<&[f32; 8]> {
        self.index(index)?.texture_coordinates(key)
    }
}

/// Handle to one tile of one index of a cached tiled texture.
///
/// A `TileRef` is only a name triple; it does not keep anything alive.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileRef {
    pub tiled_texture: String,
    pub index: String,
    pub tile: TileKey,
}

impl TileRef {
    /// Tile in the default index.
    pub fn new(tiled_texture: impl Into<String>, tile: TileKey) -> Self {
        Self::in_index(tiled_texture, TiledTexture::DEFAULT_INDEX, tile)
    }

    pub fn in_index(
        tiled_texture: impl Into<String>,
        index: impl Into<String>,
        tile: TileKey,
    ) -> Self {
        Self {
            tiled_texture: tiled_texture.into(),
            index: index.into(),
            tile,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indexes_share_one_texture() {
        let mut tiled = TiledTexture::new("sprites", "sprites.png", 128, 64);
        tiled
            .create_column_index(TiledTexture::DEFAULT_INDEX, 4)
            .unwrap();
        tiled.create_grid_index("Cells", 8, 4).unwrap();

        assert_eq!(tiled.index_count(), 2);
        let column = tiled.tile("Default", &TileKey::Column(1)).unwrap();
        let cell = tiled.tile("Cells", &TileKey::grid(2, 0)).unwrap();
        assert_eq!(column.area().left, 32);
        assert_eq!(cell.area().left, 32);
        assert_eq!(cell.height(), 16);
    }

    #[test]
    fn test_duplicate_index_name_rejected() {
        let mut tiled = TiledTexture::new("sprites", "sprites.png", 64, 64);
        tiled.create_column_index("Default", 2).unwrap();
        assert_eq!(
            tiled.create_grid_index("Default", 2, 2).unwrap_err(),
            DrawError::DuplicateIndex("Default".to_string())
        );
    }

    #[test]
    fn test_foreign_index_rejected() {
        let mut tiled = TiledTexture::new("sprites", "sprites.png", 64, 64);
        let index = TileIndex::columns("Wide", 128, 64, 2).unwrap();
        assert!(tiled.add_index(index).is_err());
    }

    #[test]
    fn test_remove_index() {
        let mut tiled = TiledTexture::new("sprites", "sprites.png", 64, 64);
        tiled.create_column_index("Default", 2).unwrap();

        let removed = tiled.remove_index("Default").unwrap();
        assert_eq!(removed.tile_count(), 2);
        assert!(!tiled.has_index("Default"));
        assert!(matches!(
            tiled.texture_coordinates("Default", &TileKey::Column(0)),
            Err(DrawError::UnknownIndex(_))
        ));
    }

    #[test]
    fn test_tile_ref_defaults_index() {
        let tile = TileRef::new("sprites", TileKey::Column(0));
        assert_eq!(tile.index, "Default");
    }
}
