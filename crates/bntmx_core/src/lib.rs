//! Core data structures for bntmx
//!
//! This crate provides the types shared by the map loader and the map compiler:
//! - `MapDescriptor` - The companion descriptor selecting graphics, object and tile layers
//! - `MapSource` - An immutable snapshot of a parsed map, restricted to the selected layers
//! - `SourceObject` / `MapObject` - Objects before and after identity assignment
//! - `TileRef` / `TilesetInfo` - Tile references and the tilesets they point into

mod descriptor;
mod object;
mod source;
mod tile;

pub use descriptor::MapDescriptor;
pub use object::{MapObject, SourceObject};
pub use source::{MapSource, SourceObjectLayer, SourceTileLayer};
pub use tile::{TileRef, TilesetInfo};

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or resolving map data
#[derive(Debug, Error)]
pub enum MapError {
    #[error("Companion descriptor not found: {}", .0.display())]
    MissingDescriptor(PathBuf),

    #[error("IO error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed companion descriptor {}: {source}", path.display())]
    MalformedDescriptor {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Layer not found: {0}")]
    LayerNotFound(String),

    #[error("Layer '{path}' is not a {expected} layer")]
    WrongLayerKind { path: String, expected: &'static str },

    #[error("Invalid map data: {0}")]
    InvalidData(String),
}
