//! Indexed-color rasters
//!
//! Backgrounds use an 8-bit palette. Images with at most 256 distinct colors
//! keep them exactly, with the background color at index 0; larger ones are
//! reduced with NeuQuant.

use color_quant::NeuQuant;
use image::codecs::bmp::BmpEncoder;
use image::{ExtendedColorType, Rgba, RgbaImage};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::debug;

use crate::TiledError;

/// Palette size of an indexed raster
pub const MAX_COLORS: usize = 256;

/// NeuQuant sampling factor, 1 is slowest and best
const SAMPLE_FACTOR: i32 = 10;

/// An image stored as palette indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedImage {
    width: u32,
    height: u32,
    palette: Vec<[u8; 3]>,
    indices: Vec<u8>,
}

impl IndexedImage {
    /// Reduce an RGBA image to at most [`MAX_COLORS`] colors
    ///
    /// Fully transparent pixels take the background color.
    pub fn quantize(image: &RgbaImage, background: Rgba<u8>) -> Self {
        let background = [background[0], background[1], background[2]];
        let pixels: Vec<[u8; 3]> = image
            .pixels()
            .map(|&Rgba([r, g, b, a])| if a == 0 { background } else { [r, g, b] })
            .collect();

        let (palette, indices) =
            exact_palette(&pixels, background).unwrap_or_else(|| reduced_palette(&pixels));

        debug!(
            "Quantized {}x{} image to {} colors",
            image.width(),
            image.height(),
            palette.len()
        );

        Self {
            width: image.width(),
            height: image.height(),
            palette,
            indices,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn palette(&self) -> &[[u8; 3]] {
        &self.palette
    }

    /// Row-major palette indices
    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    /// Write the image as an 8-bit paletted BMP
    pub fn save_bmp(&self, path: &Path) -> Result<(), TiledError> {
        let mut writer = BufWriter::new(File::create(path)?);
        let mut encoder = BmpEncoder::new(&mut writer);
        encoder.encode_with_palette(
            &self.indices,
            self.width,
            self.height,
            ExtendedColorType::L8,
            Some(self.palette.as_slice()),
        )?;
        Ok(())
    }
}

fn exact_palette(pixels: &[[u8; 3]], background: [u8; 3]) -> Option<(Vec<[u8; 3]>, Vec<u8>)> {
    let mut palette = vec![background];
    let mut lookup = HashMap::from([(background, 0u8)]);
    let mut indices = Vec::with_capacity(pixels.len());

    for pixel in pixels {
        let index = match lookup.get(pixel) {
            Some(&index) => index,
            None => {
                if palette.len() == MAX_COLORS {
                    return None;
                }
                let index = palette.len() as u8;
                palette.push(*pixel);
                lookup.insert(*pixel, index);
                index
            }
        };
        indices.push(index);
    }

    Some((palette, indices))
}

fn reduced_palette(pixels: &[[u8; 3]]) -> (Vec<[u8; 3]>, Vec<u8>) {
    let rgba: Vec<u8> = pixels
        .iter()
        .flat_map(|&[r, g, b]| [r, g, b, 255])
        .collect();
    let quantizer = NeuQuant::new(SAMPLE_FACTOR, MAX_COLORS, &rgba);

    let palette = quantizer
        .color_map_rgb()
        .chunks_exact(3)
        .map(|color| [color[0], color[1], color[2]])
        .collect();
    let indices = rgba
        .chunks_exact(4)
        .map(|pixel| quantizer.index_of(pixel) as u8)
        .collect();

    (palette, indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{write_town, BACKGROUND, BLUE, RED};
    use crate::{compose_background, load_map};
    use bntmx_codegen::CanvasSize;
    use tempfile::TempDir;

    #[test]
    fn test_exact_palette() {
        let mut image = RgbaImage::from_pixel(4, 4, RED);
        image.put_pixel(1, 0, BLUE);
        image.put_pixel(2, 0, Rgba([9, 9, 9, 0]));

        let indexed = IndexedImage::quantize(&image, BACKGROUND);
        assert_eq!(indexed.palette(), &[[16u8, 32, 48], [255, 0, 0], [0, 0, 255]]);
        assert_eq!(&indexed.indices()[..4], &[1, 2, 0, 1]);
        assert_eq!(indexed.palette()[indexed.indices()[1] as usize], [0, 0, 255]);
    }

    #[test]
    fn test_reduced_palette() {
        let mut image = RgbaImage::new(32, 32);
        for (x, y, pixel) in image.enumerate_pixels_mut() {
            *pixel = Rgba([(x * 8) as u8, (y * 8) as u8, 128, 255]);
        }

        let indexed = IndexedImage::quantize(&image, BACKGROUND);
        assert!(indexed.palette().len() <= MAX_COLORS);
        assert_eq!(indexed.indices().len(), 32 * 32);
        assert!(indexed
            .indices()
            .iter()
            .all(|&index| (index as usize) < indexed.palette().len()));
    }

    #[test]
    fn test_save_bmp() {
        let dir = TempDir::new().unwrap();
        let loaded = load_map(&write_town(dir.path())).unwrap();
        let canvas = CanvasSize::for_map(32, 16, 2);
        let image = compose_background(&loaded, &canvas).unwrap();
        let indexed = IndexedImage::quantize(&image, crate::background_color(&loaded));

        let path = dir.path().join("town.bmp");
        indexed.save_bmp(&path).unwrap();

        let decoded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (256, 512));
        assert_eq!(decoded.get_pixel(0, 0).0, [255, 0, 0]);
        assert_eq!(decoded.get_pixel(8, 0).0, [0, 0, 255]);
        assert_eq!(decoded.get_pixel(100, 100).0, [16, 32, 48]);
    }
}
