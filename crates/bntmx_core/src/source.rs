//! In-memory snapshot of a parsed map
//!
//! A `MapSource` only holds what the compiler needs: dimensions, the layers
//! selected by the companion descriptor (already in export order), tilesets,
//! and the files the map was read from.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::{SourceObject, TileRef, TilesetInfo};

/// An object layer selected for export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceObjectLayer {
    pub path: String,
    /// Objects in source encounter order
    pub objects: Vec<SourceObject>,
}

impl SourceObjectLayer {
    pub fn new(path: impl Into<String>, objects: Vec<SourceObject>) -> Self {
        Self {
            path: path.into(),
            objects,
        }
    }
}

/// A tile layer selected for export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceTileLayer {
    pub path: String,
    /// Row-major cells - None means empty
    pub tiles: Vec<Option<TileRef>>,
}

impl SourceTileLayer {
    pub fn new(path: impl Into<String>, tiles: Vec<Option<TileRef>>) -> Self {
        Self {
            path: path.into(),
            tiles,
        }
    }
}

/// Immutable snapshot of one map, as consumed by the compiler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapSource {
    /// Base name of the map file, used to name every artifact
    pub name: String,
    /// Map width in tiles
    pub width: u32,
    /// Map height in tiles
    pub height: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    /// Graphics layer paths, bottom to top
    #[serde(default)]
    pub graphics_layers: Vec<String>,
    #[serde(default)]
    pub object_layers: Vec<SourceObjectLayer>,
    #[serde(default)]
    pub tile_layers: Vec<SourceTileLayer>,
    /// Tilesets in declaration order
    #[serde(default)]
    pub tilesets: Vec<TilesetInfo>,
    /// Files besides the map and its descriptor the map was built from
    #[serde(default)]
    pub dependencies: Vec<PathBuf>,
}

impl MapSource {
    /// Create an empty map source with the given dimensions
    pub fn new(
        name: impl Into<String>,
        width: u32,
        height: u32,
        tile_width: u32,
        tile_height: u32,
    ) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            tile_width,
            tile_height,
            graphics_layers: Vec::new(),
            object_layers: Vec::new(),
            tile_layers: Vec::new(),
            tilesets: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    /// Add a graphics layer on top of the existing ones
    pub fn with_graphics_layer(mut self, path: impl Into<String>) -> Self {
        self.graphics_layers.push(path.into());
        self
    }

    /// Add an object layer
    pub fn with_object_layer(mut self, layer: SourceObjectLayer) -> Self {
        self.object_layers.push(layer);
        self
    }

    /// Add a tile layer
    pub fn with_tile_layer(mut self, layer: SourceTileLayer) -> Self {
        self.tile_layers.push(layer);
        self
    }

    /// Add a tileset
    pub fn with_tileset(mut self, tileset: TilesetInfo) -> Self {
        self.tilesets.push(tileset);
        self
    }

    /// Map size in pixels (width, height)
    pub fn dimensions_in_pixels(&self) -> (u32, u32) {
        (self.width * self.tile_width, self.height * self.tile_height)
    }

    /// Map size in tiles (width, height)
    pub fn dimensions_in_tiles(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Size of one tile in pixels (width, height)
    pub fn tile_dimensions(&self) -> (u32, u32) {
        (self.tile_width, self.tile_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions() {
        let map = MapSource::new("town", 30, 20, 8, 8);

        assert_eq!(map.dimensions_in_pixels(), (240, 160));
        assert_eq!(map.dimensions_in_tiles(), (30, 20));
        assert_eq!(map.tile_dimensions(), (8, 8));
    }

    #[test]
    fn test_builder_keeps_order() {
        let map = MapSource::new("town", 4, 4, 8, 8)
            .with_graphics_layer("ground")
            .with_graphics_layer("roofs")
            .with_object_layer(SourceObjectLayer::new("npcs", Vec::new()))
            .with_object_layer(SourceObjectLayer::new("items", Vec::new()))
            .with_tileset(TilesetInfo::new("terrain", 64));

        assert_eq!(map.graphics_layers, vec!["ground", "roofs"]);
        assert_eq!(map.object_layers[0].path, "npcs");
        assert_eq!(map.object_layers[1].path, "items");
        assert_eq!(map.tilesets.len(), 1);
    }
}
