//! Companion descriptor loading
//!
//! Every `<name>.tmx` map comes with a `<name>.json` descriptor listing which
//! layers are exported and in which order.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::MapError;

/// Layer selection for one map
///
/// Layer paths address layers nested in group layers with `/` separators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapDescriptor {
    /// Layers composed into the background, bottom to top
    #[serde(default)]
    pub graphics: Vec<String>,
    /// Object layers, in export order
    #[serde(default)]
    pub objects: Vec<String>,
    /// Tile layers, in export order
    #[serde(default)]
    pub tiles: Vec<String>,
}

impl MapDescriptor {
    /// Path of the companion descriptor for a map file (same base name, `.json`)
    pub fn companion_path(map_path: &Path) -> PathBuf {
        map_path.with_extension("json")
    }

    /// Load the companion descriptor of a map file
    ///
    /// A missing descriptor is reported as `MapError::MissingDescriptor`.
    pub fn load_for_map(map_path: &Path) -> Result<Self, MapError> {
        let path = Self::companion_path(map_path);
        if !path.is_file() {
            return Err(MapError::MissingDescriptor(path));
        }
        Self::load(&path)
    }

    /// Load a descriptor from a JSON file
    pub fn load(path: &Path) -> Result<Self, MapError> {
        let content = std::fs::read_to_string(path).map_err(|source| MapError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| MapError::MalformedDescriptor {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_descriptor() {
        let json = r#"{
            "graphics": ["background", "decor/front"],
            "objects": ["entities"],
            "tiles": ["collisions"]
        }"#;

        let descriptor: MapDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(descriptor.graphics, vec!["background", "decor/front"]);
        assert_eq!(descriptor.objects, vec!["entities"]);
        assert_eq!(descriptor.tiles, vec!["collisions"]);
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let descriptor: MapDescriptor = serde_json::from_str(r#"{"graphics": ["bg"]}"#).unwrap();
        assert!(descriptor.objects.is_empty());
        assert!(descriptor.tiles.is_empty());
    }

    #[test]
    fn test_companion_path() {
        let path = MapDescriptor::companion_path(Path::new("maps/level_1.tmx"));
        assert_eq!(path, PathBuf::from("maps/level_1.json"));
    }

    #[test]
    fn test_missing_descriptor() {
        let dir = tempfile::tempdir().unwrap();
        let map_path = dir.path().join("castle.tmx");

        let result = MapDescriptor::load_for_map(&map_path);
        assert!(matches!(result, Err(MapError::MissingDescriptor(_))));
    }

    #[test]
    fn test_malformed_descriptor() {
        let dir = tempfile::tempdir().unwrap();
        let map_path = dir.path().join("castle.tmx");
        std::fs::write(dir.path().join("castle.json"), "{ \"graphics\": 3 }").unwrap();

        let result = MapDescriptor::load_for_map(&map_path);
        assert!(matches!(result, Err(MapError::MalformedDescriptor { .. })));
    }
}
