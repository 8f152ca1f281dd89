//! Tile layers and tileset ranges
//!
//! Each tileset gets a contiguous range of tile ids, in declaration order,
//! starting at 1 so that 0 means "no tile". Tile layers are flattened into
//! row-major sequences of encoded [`MapTile`]s.

use bntmx_core::{SourceTileLayer, TileRef, TilesetInfo};
pub use bntmx_runtime::MapTile;

use crate::{check_identifiers, sanitize_identifier, CodegenError};

/// Contiguous id range reserved for one tileset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TilesetRange {
    pub name: String,
    pub first: u32,
    pub last: u32,
}

impl TilesetRange {
    pub fn contains(&self, id: u32) -> bool {
        (self.first..=self.last).contains(&id)
    }

    /// Name of the generated constant holding `first`
    pub fn identifier(&self) -> String {
        sanitize_identifier(&self.name).to_uppercase()
    }

    /// Name of the generated constant holding `last`
    pub fn last_identifier(&self) -> String {
        format!("{}_LAST", self.identifier())
    }
}

/// Assign id ranges to tilesets in declaration order
///
/// A tileset without tiles still reserves one id so ranges never overlap.
pub fn tileset_ranges(tilesets: &[TilesetInfo]) -> Vec<TilesetRange> {
    let mut first = 1;
    tilesets
        .iter()
        .map(|tileset| {
            let last = first + tileset.tile_count.max(1) - 1;
            let range = TilesetRange {
                name: tileset.name.clone(),
                first,
                last,
            };
            first = last + 1;
            range
        })
        .collect()
}

/// Fail if two tilesets generate the same constant names
pub fn check_tileset_identifiers(ranges: &[TilesetRange]) -> Result<(), CodegenError> {
    check_identifiers(
        "Tileset",
        ranges.iter().flat_map(|range| {
            [
                (range.name.as_str(), range.identifier()),
                (range.name.as_str(), range.last_identifier()),
            ]
        }),
    )
}

/// Encode a tile reference against the range of its tileset
///
/// Returns None if the tile lies outside of the range.
pub fn encode_tile(tile: &TileRef, range: &TilesetRange) -> Option<MapTile> {
    let mut value = range.first.checked_add(tile.local_id)?;
    if !range.contains(value) || value & !MapTile::ID_MASK != 0 {
        return None;
    }
    if tile.flip_h {
        value |= MapTile::FLIP_H;
    }
    if tile.flip_v {
        value |= MapTile::FLIP_V;
    }
    if tile.flip_d {
        value |= MapTile::FLIP_D;
    }
    Some(MapTile(value))
}

/// Flatten a tile layer of a `width` x `height` map
///
/// The layer must hold exactly `width * height` cells; row `i` of the map
/// occupies indices `i * width .. (i + 1) * width`.
pub fn flatten_tiles(
    layer: &SourceTileLayer,
    width: u32,
    height: u32,
    ranges: &[TilesetRange],
) -> Result<Vec<MapTile>, CodegenError> {
    let expected = width as usize * height as usize;
    if layer.tiles.len() != expected {
        return Err(CodegenError::TileLayerSize {
            layer: layer.path.clone(),
            len: layer.tiles.len(),
            width,
            height,
        });
    }

    layer
        .tiles
        .iter()
        .map(|cell| {
            let Some(tile) = cell else {
                return Ok(MapTile::EMPTY);
            };
            let range =
                ranges
                    .get(tile.tileset_index)
                    .ok_or_else(|| CodegenError::UnknownTileset {
                        layer: layer.path.clone(),
                        tileset_index: tile.tileset_index,
                    })?;
            encode_tile(tile, range).ok_or_else(|| CodegenError::TileOutOfRange {
                layer: layer.path.clone(),
                tileset: range.name.clone(),
                local_id: tile.local_id,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ranges() -> Vec<TilesetRange> {
        tileset_ranges(&[
            TilesetInfo::new("terrain", 64),
            TilesetInfo::new("props", 16),
        ])
    }

    #[test]
    fn test_tileset_ranges_are_contiguous() {
        let ranges = tileset_ranges(&[
            TilesetInfo::new("terrain", 64),
            TilesetInfo::new("props", 16),
            TilesetInfo::new("water", 4),
        ]);

        assert_eq!((ranges[0].first, ranges[0].last), (1, 64));
        assert_eq!((ranges[1].first, ranges[1].last), (65, 80));
        assert_eq!((ranges[2].first, ranges[2].last), (81, 84));
        for pair in ranges.windows(2) {
            assert_eq!(pair[1].first, pair[0].last + 1);
        }
    }

    #[test]
    fn test_empty_tileset_reserves_one_id() {
        let ranges = tileset_ranges(&[TilesetInfo::new("empty", 0), TilesetInfo::new("next", 2)]);

        assert_eq!((ranges[0].first, ranges[0].last), (1, 1));
        assert_eq!((ranges[1].first, ranges[1].last), (2, 3));
    }

    #[test]
    fn test_encode_tile() {
        let ranges = ranges();

        let tile = encode_tile(&TileRef::new(1, 3), &ranges[1]).unwrap();
        assert_eq!(tile.id(), 68);
        assert!(ranges[1].contains(tile.id()));
        assert!(!tile.flip_h());

        let flipped =
            encode_tile(&TileRef::new(0, 0).with_flips(true, false, true), &ranges[0])
                .unwrap();
        assert_eq!(flipped.id(), 1);
        assert!(flipped.flip_h());
        assert!(!flipped.flip_v());
        assert!(flipped.flip_d());
        assert_eq!(flipped.0, 1 | MapTile::FLIP_H | MapTile::FLIP_D);

        assert_eq!(encode_tile(&TileRef::new(1, 15), &ranges[1]), Some(MapTile(80)));
        assert!(encode_tile(&TileRef::new(1, 16), &ranges[1]).is_none());
        assert!(MapTile::EMPTY.is_empty());
    }

    #[test]
    fn test_flatten_is_row_major() {
        let tiles = (0..8).map(|i| Some(TileRef::new(0, i))).collect();
        let layer = SourceTileLayer::new("ground", tiles);

        let flat = flatten_tiles(&layer, 4, 2, &ranges()).unwrap();

        assert_eq!(flat.len(), 8);
        let row_0: Vec<_> = flat[0..4].iter().map(MapTile::id).collect();
        let row_1: Vec<_> = flat[4..8].iter().map(MapTile::id).collect();
        assert_eq!(row_0, vec![1, 2, 3, 4]);
        assert_eq!(row_1, vec![5, 6, 7, 8]);
    }

    #[test]
    fn test_flatten_keeps_empty_cells() {
        let layer = SourceTileLayer::new("ground", vec![None, Some(TileRef::new(1, 0))]);

        let flat = flatten_tiles(&layer, 2, 1, &ranges()).unwrap();
        assert_eq!(flat, vec![MapTile::EMPTY, MapTile(65)]);
    }

    #[test]
    fn test_flatten_rejects_wrong_length() {
        let tiles = (0..7).map(|i| Some(TileRef::new(0, i))).collect();
        let layer = SourceTileLayer::new("ground", tiles);

        let result = flatten_tiles(&layer, 4, 2, &ranges());
        assert!(matches!(
            result,
            Err(CodegenError::TileLayerSize { len: 7, width: 4, height: 2, .. })
        ));
    }

    #[test]
    fn test_flatten_rejects_unknown_tileset() {
        let layer = SourceTileLayer::new("ground", vec![Some(TileRef::new(5, 0))]);

        let result = flatten_tiles(&layer, 1, 1, &ranges());
        assert!(matches!(
            result,
            Err(CodegenError::UnknownTileset { tileset_index: 5, .. })
        ));
    }

    #[test]
    fn test_flatten_rejects_tile_outside_tileset() {
        let ranges = tileset_ranges(&[TilesetInfo::new("a", 2), TilesetInfo::new("b", 2)]);
        let layer = SourceTileLayer::new("ground", vec![Some(TileRef::new(0, 5))]);

        let result = flatten_tiles(&layer, 1, 1, &ranges);
        assert!(matches!(
            result,
            Err(CodegenError::TileOutOfRange { tileset, local_id: 5, .. }) if tileset == "a"
        ));

        let last = SourceTileLayer::new("ground", vec![Some(TileRef::new(0, 1))]);
        assert_eq!(flatten_tiles(&last, 1, 1, &ranges).unwrap(), vec![MapTile(2)]);
    }

    #[test]
    fn test_tileset_identifiers() {
        let ranges = ranges();
        assert_eq!(ranges[0].identifier(), "TERRAIN");
        assert_eq!(ranges[0].last_identifier(), "TERRAIN_LAST");
        assert!(check_tileset_identifiers(&ranges).is_ok());

        let clash = tileset_ranges(&[
            TilesetInfo::new("Secret-Door", 4),
            TilesetInfo::new("Secret_Door", 4),
        ]);
        assert!(matches!(
            check_tileset_identifiers(&clash),
            Err(CodegenError::DuplicateIdentifier { identifier, .. }) if identifier == "SECRET_DOOR"
        ));

        let suffix = tileset_ranges(&[
            TilesetInfo::new("walls", 4),
            TilesetInfo::new("walls_last", 4),
        ]);
        assert!(check_tileset_identifiers(&suffix).is_err());
    }
}
