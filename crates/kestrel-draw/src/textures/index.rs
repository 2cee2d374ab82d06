//! Tile indexes: fixed partitions of a texture into addressable areas.

use std::fmt;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use super::Texture2dArea;
use crate::support::{GridLocation, RectangularArea2i};
use crate::{DrawError, Result};

/// How an index partitions its texture
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileLayout {
    /// Equal-width, full-height columns
    Column { columns: u32 },
    /// Equal cells, `columns * rows` of them
    Grid { columns: u32, rows: u32 },
    /// Free-form named regions
    Named,
}

/// Address of one tile inside an index
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKey {
    Column(u32),
    Grid(GridLocation),
    Named(String),
}

impl TileKey {
    pub fn grid(column: u32, row: u32) -> Self {
        TileKey::Grid(GridLocation::new(column, row))
    }

    pub fn named(name: impl Into<String>) -> Self {
        TileKey::Named(name.into())
    }
}

impl fmt::Display for TileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TileKey::Column(column) => write!(f, "column {column}"),
            TileKey::Grid(location) => write!(f, "cell {location}"),
            TileKey::Named(name) => write!(f, "`{name}`"),
        }
    }
}

/// Immutable tile table over a texture of known size.
///
/// Column and grid tiles are stored row-major in a flat vector, so lookups
/// are a bounds check and an index. Named tiles go through a name map.
#[derive(Clone, Debug)]
pub struct TileIndex {
    name: String,
    layout: TileLayout,
    texture_width: u32,
    texture_height: u32,
    tiles: Vec<Texture2dArea>,
    names: AHashMap<String, usize>,
}

impl TileIndex {
    /// Split the texture into `columns` full-height columns.
    pub fn columns(
        name: impl Into<String>,
        texture_width: u32,
        texture_height: u32,
        columns: u32,
    ) -> Result<Self> {
        let tile_width = tile_extent("width", texture_width, columns)?;

        let tiles = (0..columns)
            .map(|c| {
                let rect = RectangularArea2i::from_origin_size(
                    (c * tile_width) as i32,
                    0,
                    tile_width as i32,
                    texture_height as i32,
                );
                Texture2dArea::new(rect, texture_width, texture_height)
            })
            .collect::<Result<Vec<_>>>()?;

        Self::build(
            name,
            TileLayout::Column { columns },
            texture_width,
            texture_height,
            tiles,
        )
    }

    /// Split the texture into a `columns x rows` grid.
    pub fn grid(
        name: impl Into<String>,
        texture_width: u32,
        texture_height: u32,
        columns: u32,
        rows: u32,
    ) -> Result<Self> {
        let tile_width = tile_extent("width", texture_width, columns)?;
        let tile_height = tile_extent("height", texture_height, rows)?;

        let mut tiles = Vec::with_capacity(columns as usize * rows as usize);
        for row in 0..rows {
            for column in 0..columns {
                let rect = RectangularArea2i::from_origin_size(
                    (column * tile_width) as i32,
                    (row * tile_height) as i32,
                    tile_width as i32,
                    tile_height as i32,
                );
                tiles.push(Texture2dArea::new(rect, texture_width, texture_height)?);
            }
        }

        Self::build(
            name,
            TileLayout::Grid { columns, rows },
            texture_width,
            texture_height,
            tiles,
        )
    }

    /// Free-form regions addressed by name.
    ///
    /// Every region must be non-empty and inside the texture. Region names
    /// must be unique and not blank. Regions may overlap.
    pub fn named<I, S>(
        name: impl Into<String>,
        texture_width: u32,
        texture_height: u32,
        regions: I,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = (S, RectangularArea2i)>,
        S: Into<String>,
    {
        let mut index = Self::build(
            name,
            TileLayout::Named,
            texture_width,
            texture_height,
            Vec::new(),
        )?;

        for (region_name, rect) in regions {
            let region_name = region_name.into();
            if region_name.trim().is_empty() {
                return Err(DrawError::invalid("region", "region names must not be blank"));
            }
            if index.names.contains_key(&region_name) {
                return Err(DrawError::invalid(
                    "region",
                    format!("duplicate region `{region_name}`"),
                ));
            }

            let area = Texture2dArea::new(rect, texture_width, texture_height)?;
            index.names.insert(region_name, index.tiles.len());
            index.tiles.push(area);
        }

        if index.tiles.is_empty() {
            return Err(DrawError::invalid("regions", "a named index needs at least one region"));
        }

        Ok(index)
    }

    fn build(
        name: impl Into<String>,
        layout: TileLayout,
        texture_width: u32,
        texture_height: u32,
        tiles: Vec<Texture2dArea>,
    ) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DrawError::invalid("name", "index names must not be blank"));
        }

        Ok(Self {
            name,
            layout,
            texture_width,
            texture_height,
            tiles,
            names: AHashMap::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn layout(&self) -> TileLayout {
        self.layout
    }

    /// Size of the texture this index partitions
    pub fn texture_size(&self) -> (u32, u32) {
        (self.texture_width, self.texture_height)
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    pub fn tile(&self, key: &TileKey) -> Result<&Texture2dArea> {
        self.slot(key)
            .and_then(|i| self.tiles.get(i))
            .ok_or_else(|| DrawError::UnknownTile(key.to_string()))
    }

    /// UV quad for `key`, see [`Texture2dArea::texture_coordinates`].
    pub fn texture_coordinates(&self, key: &TileKey) -> Result<&[f32; 8]> {
        Ok(self.tile(key)?.texture_coordinates())
    }

    /// Every valid key, in storage order.
    pub fn keys(&self) -> Vec<TileKey> {
        match self.layout {
            TileLayout::Column { columns } => (0..columns).map(TileKey::Column).collect(),
            TileLayout::Grid { columns, rows } => (0..rows)
                .flat_map(|row| (0..columns).map(move |column| TileKey::grid(column, row)))
                .collect(),
            TileLayout::Named => {
                let mut named: Vec<_> = self.names.iter().collect();
                named.sort_by_key(|(_, slot)| **slot);
                named
                    .into_iter()
                    .map(|(name, _)| TileKey::Named(name.clone()))
                    .collect()
            }
        }
    }

    fn slot(&self, key: &TileKey) -> Option<usize> {
        match (self.layout, key) {
            (TileLayout::Column { columns }, TileKey::Column(column)) if *column < columns => {
                Some(*column as usize)
            }
            (TileLayout::Grid { columns, rows }, TileKey::Grid(location))
                if location.column < columns && location.row < rows =>
            {
                Some(location.row as usize * columns as usize + location.column as usize)
            }
            (TileLayout::Named, TileKey::Named(name)) => self.names.get(name).copied(),
            _ => None,
        }
    }
}

/// Pixel extent of one tile, or an error if `count` does not divide `pixels`.
fn tile_extent(axis: &'static str, pixels: u32, count: u32) -> Result<u32> {
    if count == 0 || count > pixels || pixels % count != 0 {
        return Err(DrawError::InvalidTileCount {
            axis,
            count,
            pixels,
        });
    }
    Ok(pixels / count)
}
