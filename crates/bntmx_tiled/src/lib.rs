//! Tiled integration for bntmx
//!
//! - [`load_map`] reads a TMX map and its companion descriptor into a
//!   [`MapSource`](bntmx_core::MapSource)
//! - [`compose_background`] draws the graphics layers into a stacked canvas
//! - [`IndexedImage`] quantizes that canvas and writes it as a paletted BMP

pub mod compose;
pub mod loader;
pub mod quantize;

pub use compose::{background_color, compose_background};
pub use loader::{find_layer, load_map, LoadedMap};
pub use quantize::{IndexedImage, MAX_COLORS};

use bntmx_core::MapError;
use thiserror::Error;

/// Errors raised while reading maps or producing their background
#[derive(Debug, Error)]
pub enum TiledError {
    #[error("Failed to parse map: {0}")]
    ParseError(#[from] tiled::Error),

    #[error(transparent)]
    MapError(#[from] MapError),

    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
