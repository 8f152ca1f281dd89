//! Background composition
//!
//! Every graphics layer is drawn into its own band of a single canvas, bands
//! stacked top to bottom in descriptor order.

use bntmx_codegen::CanvasSize;
use image::{imageops, Rgba, RgbaImage};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tiled::{LayerTile, LayerType, TileLayer, Tileset};
use tracing::{debug, warn};

use crate::loader::{find_layer, LoadedMap};
use crate::TiledError;

/// Draw the graphics layers of a map into a canvas of the given size
///
/// The canvas is cleared to the map background color, or transparent black
/// when the map has none.
pub fn compose_background(
    loaded: &LoadedMap,
    canvas: &CanvasSize,
) -> Result<RgbaImage, TiledError> {
    let mut image =
        RgbaImage::from_pixel(canvas.width, canvas.height(), background_color(loaded));
    let mut images = ImageCache::default();

    for (index, path) in loaded.descriptor.graphics.iter().enumerate() {
        let layer = find_layer(&loaded.map, path)?;
        let offset = canvas.layer_offset(index as u32) as i64;
        debug!("Composing layer '{}' at offset {}", path, offset);
        draw_layer(loaded, layer, offset, &mut image, &mut images)?;
    }

    Ok(image)
}

/// Background color of a map as an RGBA pixel
pub fn background_color(loaded: &LoadedMap) -> Rgba<u8> {
    match loaded.map.background_color {
        Some(color) => Rgba([color.red, color.green, color.blue, 255]),
        None => Rgba([0, 0, 0, 0]),
    }
}

#[derive(Default)]
struct ImageCache {
    images: HashMap<PathBuf, RgbaImage>,
}

impl ImageCache {
    fn get(&mut self, path: &Path) -> Result<&RgbaImage, TiledError> {
        let image = match self.images.entry(path.to_path_buf()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(image::open(path)?.to_rgba8()),
        };
        Ok(&*image)
    }
}

fn draw_layer(
    loaded: &LoadedMap,
    layer: tiled::Layer<'_>,
    offset: i64,
    canvas: &mut RgbaImage,
    images: &mut ImageCache,
) -> Result<(), TiledError> {
    let x = layer.offset_x as i64;
    let y = layer.offset_y as i64 + offset;

    match layer.layer_type() {
        LayerType::Tiles(tiles) => draw_tiles(loaded, &tiles, x, y, canvas, images)?,
        LayerType::Image(image_layer) => {
            if let Some(image) = &image_layer.image {
                imageops::overlay(canvas, images.get(&image.source)?, x, y);
            }
        }
        LayerType::Group(group) => {
            for child in group.layers() {
                draw_layer(loaded, child, offset, canvas, images)?;
            }
        }
        LayerType::Objects(_) => {
            warn!("Skipping object layer '{}' in graphics", layer.name);
        }
    }

    Ok(())
}

fn draw_tiles(
    loaded: &LoadedMap,
    layer: &TileLayer<'_>,
    origin_x: i64,
    origin_y: i64,
    canvas: &mut RgbaImage,
    images: &mut ImageCache,
) -> Result<(), TiledError> {
    let map = &loaded.map;
    let width = layer.width().unwrap_or(0);
    let height = layer.height().unwrap_or(0);

    for y in 0..height {
        for x in 0..width {
            let Some(tile) = layer.get_tile(x as i32, y as i32) else {
                continue;
            };
            let Some(pixels) = tile_image(&tile, images)? else {
                continue;
            };

            // Tiles taller than the grid grow upwards from the bottom of their cell
            let cell_x = origin_x + (x * map.tile_width) as i64;
            let cell_y = origin_y + ((y + 1) * map.tile_height) as i64 - pixels.height() as i64;

            imageops::overlay(canvas, &pixels, cell_x, cell_y);
        }
    }

    Ok(())
}

/// Pixels of a tile with its flips applied
fn tile_image(
    tile: &LayerTile<'_>,
    images: &mut ImageCache,
) -> Result<Option<RgbaImage>, TiledError> {
    let tileset = tile.get_tileset();

    let pixels = match &tileset.image {
        Some(image) => {
            let sheet = images.get(&image.source)?;
            tile_rect(tileset, tile.id())
                .filter(|&(x, y, w, h)| x + w <= sheet.width() && y + h <= sheet.height())
                .map(|(x, y, w, h)| imageops::crop_imm(sheet, x, y, w, h).to_image())
        }
        None => match tile.get_tile().and_then(|data| data.image.clone()) {
            Some(image) => Some(images.get(&image.source)?.clone()),
            None => None,
        },
    };

    let Some(mut pixels) = pixels else {
        warn!("Tile {} has no image in tileset '{}'", tile.id(), tileset.name);
        return Ok(None);
    };

    if tile.flip_d {
        pixels = transpose(&pixels);
    }
    if tile.flip_h {
        imageops::flip_horizontal_in_place(&mut pixels);
    }
    if tile.flip_v {
        imageops::flip_vertical_in_place(&mut pixels);
    }

    Ok(Some(pixels))
}

/// Source rectangle (x, y, width, height) of a tile in its tileset sheet
fn tile_rect(tileset: &Tileset, id: u32) -> Option<(u32, u32, u32, u32)> {
    if tileset.columns == 0 {
        return None;
    }
    let column = id % tileset.columns;
    let row = id / tileset.columns;

    Some((
        tileset.margin + column * (tileset.tile_width + tileset.spacing),
        tileset.margin + row * (tileset.tile_height + tileset.spacing),
        tileset.tile_width,
        tileset.tile_height,
    ))
}

/// Mirror an image along its top-left to bottom-right diagonal
fn transpose(image: &RgbaImage) -> RgbaImage {
    let mut transposed = RgbaImage::new(image.height(), image.width());
    for (x, y, pixel) in image.enumerate_pixels() {
        transposed.put_pixel(y, x, *pixel);
    }
    transposed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{write_town, BACKGROUND, BLUE, RED};
    use crate::load_map;
    use tempfile::TempDir;

    fn town_canvas(loaded: &LoadedMap) -> CanvasSize {
        let (width, height) = loaded.source.dimensions_in_pixels();
        CanvasSize::for_map(width, height, loaded.source.graphics_layers.len() as u32)
    }

    #[test]
    fn test_canvas_dimensions() {
        let dir = TempDir::new().unwrap();
        let loaded = load_map(&write_town(dir.path())).unwrap();
        let image = compose_background(&loaded, &town_canvas(&loaded)).unwrap();

        assert_eq!(image.dimensions(), (256, 512));
    }

    #[test]
    fn test_first_layer_band() {
        let dir = TempDir::new().unwrap();
        let loaded = load_map(&write_town(dir.path())).unwrap();
        let image = compose_background(&loaded, &town_canvas(&loaded)).unwrap();

        assert_eq!(*image.get_pixel(0, 0), RED);
        assert_eq!(*image.get_pixel(8, 0), BLUE);
        assert_eq!(*image.get_pixel(0, 8), BLUE);
        // Empty cell and area outside the map keep the background color
        assert_eq!(*image.get_pixel(24, 8), BACKGROUND);
        assert_eq!(*image.get_pixel(100, 100), BACKGROUND);
    }

    #[test]
    fn test_second_layer_band() {
        let dir = TempDir::new().unwrap();
        let loaded = load_map(&write_town(dir.path())).unwrap();
        let image = compose_background(&loaded, &town_canvas(&loaded)).unwrap();

        assert_eq!(*image.get_pixel(0, 256), BACKGROUND);
        assert_eq!(*image.get_pixel(24, 256 + 8), BLUE);
    }

    #[test]
    fn test_transpose() {
        let mut image = RgbaImage::from_pixel(2, 1, RED);
        image.put_pixel(1, 0, BLUE);

        let transposed = transpose(&image);
        assert_eq!(transposed.dimensions(), (1, 2));
        assert_eq!(*transposed.get_pixel(0, 1), BLUE);
    }
}
