//! Tile references and tileset metadata

use serde::{Deserialize, Serialize};

/// A non-empty cell of a tile layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TileRef {
    /// Index of the tileset in map declaration order
    pub tileset_index: usize,
    /// Tile index local to its tileset
    pub local_id: u32,
    #[serde(default)]
    pub flip_h: bool,
    #[serde(default)]
    pub flip_v: bool,
    #[serde(default)]
    pub flip_d: bool,
}

impl TileRef {
    pub fn new(tileset_index: usize, local_id: u32) -> Self {
        Self {
            tileset_index,
            local_id,
            ..Default::default()
        }
    }

    /// Set the flip flags
    pub fn with_flips(mut self, flip_h: bool, flip_v: bool, flip_d: bool) -> Self {
        self.flip_h = flip_h;
        self.flip_v = flip_v;
        self.flip_d = flip_d;
        self
    }
}

/// A tileset referenced by a map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilesetInfo {
    /// Name used to derive the exported range identifiers
    pub name: String,
    /// Number of tiles in the tileset
    pub tile_count: u32,
}

impl TilesetInfo {
    pub fn new(name: impl Into<String>, tile_count: u32) -> Self {
        Self {
            name: name.into(),
            tile_count,
        }
    }
}
