//! TMX loading
//!
//! Reads a map with the `tiled` crate, resolves the layers named by the
//! companion descriptor, and snapshots them into a [`MapSource`].

use bntmx_core::{
    MapDescriptor, MapError, MapSource, SourceObject, SourceObjectLayer, SourceTileLayer, TileRef,
    TilesetInfo,
};
use std::path::{Path, PathBuf};
use tiled::{Layer, LayerType, Loader, Map};
use tracing::debug;

use crate::TiledError;

/// A parsed map together with its descriptor and compiler input
pub struct LoadedMap {
    pub map: Map,
    pub descriptor: MapDescriptor,
    pub source: MapSource,
}

/// Load a TMX map and the companion descriptor next to it
pub fn load_map(path: &Path) -> Result<LoadedMap, TiledError> {
    let descriptor = MapDescriptor::load_for_map(path)?;
    let map = Loader::new().load_tmx_map(path)?;

    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut source = MapSource::new(
        name,
        map.width,
        map.height,
        map.tile_width,
        map.tile_height,
    );

    for path in &descriptor.graphics {
        find_layer(&map, path)?;
        source = source.with_graphics_layer(path.clone());
    }

    for path in &descriptor.objects {
        source = source.with_object_layer(read_object_layer(&map, path)?);
    }

    for path in &descriptor.tiles {
        source = source.with_tile_layer(read_tile_layer(&map, path)?);
    }

    for tileset in map.tilesets() {
        source = source.with_tileset(TilesetInfo::new(tileset_name(tileset), tile_span(tileset)));
    }

    source.dependencies = dependencies(&map, &descriptor);

    debug!(
        "Loaded map '{}' ({}x{} tiles, {} tilesets, {} dependencies)",
        source.name,
        source.width,
        source.height,
        source.tilesets.len(),
        source.dependencies.len()
    );

    Ok(LoadedMap {
        map,
        descriptor,
        source,
    })
}

/// Resolve a `/`-separated layer path, descending through group layers
pub fn find_layer<'map>(map: &'map Map, path: &str) -> Result<Layer<'map>, MapError> {
    let not_found = || MapError::LayerNotFound(path.to_string());

    let mut names = path.split('/');
    let first = names.next().unwrap_or_default();
    let mut layer = map
        .layers()
        .find(|layer| layer.name == first)
        .ok_or_else(not_found)?;

    for name in names {
        let LayerType::Group(group) = layer.layer_type() else {
            return Err(not_found());
        };
        layer = group
            .layers()
            .find(|layer| layer.name == name)
            .ok_or_else(not_found)?;
    }

    Ok(layer)
}

fn read_object_layer(map: &Map, path: &str) -> Result<SourceObjectLayer, MapError> {
    let LayerType::Objects(layer) = find_layer(map, path)?.layer_type() else {
        return Err(MapError::WrongLayerKind {
            path: path.to_string(),
            expected: "object",
        });
    };

    let objects = layer
        .objects()
        .map(|object| {
            SourceObject::new([object.x, object.y])
                .with_name(object.name.clone())
                .with_class(object.user_type.clone())
        })
        .collect();

    Ok(SourceObjectLayer::new(path, objects))
}

fn read_tile_layer(map: &Map, path: &str) -> Result<SourceTileLayer, MapError> {
    let LayerType::Tiles(layer) = find_layer(map, path)?.layer_type() else {
        return Err(MapError::WrongLayerKind {
            path: path.to_string(),
            expected: "tile",
        });
    };

    let (Some(width), Some(height)) = (layer.width(), layer.height()) else {
        return Err(MapError::InvalidData(format!(
            "tile layer '{path}' is infinite"
        )));
    };

    let mut tiles = Vec::with_capacity((width * height) as usize);
    for y in 0..height {
        for x in 0..width {
            let tile = layer.get_tile(x as i32, y as i32).map(|tile| {
                TileRef::new(tile.tileset_index(), tile.id()).with_flips(
                    tile.flip_h,
                    tile.flip_v,
                    tile.flip_d,
                )
            });
            tiles.push(tile);
        }
    }

    Ok(SourceTileLayer::new(path, tiles))
}

fn is_external(tileset: &tiled::Tileset) -> bool {
    tileset
        .source
        .extension()
        .is_some_and(|extension| extension == "tsx")
}

/// External tilesets are named after their file, embedded ones by their name
fn tileset_name(tileset: &tiled::Tileset) -> String {
    match tileset.source.file_stem() {
        Some(stem) if is_external(tileset) => stem.to_string_lossy().into_owned(),
        _ => tileset.name.clone(),
    }
}

/// Number of ids a tileset needs
///
/// Image collection tilesets can have gaps, so their highest tile id may
/// exceed the tile count.
fn tile_span(tileset: &tiled::Tileset) -> u32 {
    tileset
        .tiles()
        .map(|(id, _)| id + 1)
        .max()
        .unwrap_or(0)
        .max(tileset.tilecount)
}

/// Every file the outputs of this map are derived from, besides the map
/// and its descriptor
fn dependencies(map: &Map, descriptor: &MapDescriptor) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for tileset in map.tilesets() {
        if is_external(tileset) {
            files.push(tileset.source.clone());
        }
        if let Some(image) = &tileset.image {
            files.push(image.source.clone());
        }
        for (_, tile) in tileset.tiles() {
            if let Some(image) = &tile.image {
                files.push(image.source.clone());
            }
        }
    }

    for path in &descriptor.graphics {
        if let Ok(layer) = find_layer(map, path) {
            collect_layer_images(layer, &mut files);
        }
    }

    files.sort();
    files.dedup();
    files
}

fn collect_layer_images(layer: Layer<'_>, files: &mut Vec<PathBuf>) {
    match layer.layer_type() {
        LayerType::Image(image_layer) => {
            if let Some(image) = &image_layer.image {
                files.push(image.source.clone());
            }
        }
        LayerType::Group(group) => {
            for child in group.layers() {
                collect_layer_images(child, files);
            }
        }
        LayerType::Tiles(_) | LayerType::Objects(_) => {}
    }
}
