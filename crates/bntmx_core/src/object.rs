//! Map objects before and after identity assignment

use serde::{Deserialize, Serialize};

/// An object as found in an object layer of the map source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceObject {
    /// Symbolic name, exported as an identifier when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Class name, empty for classless objects
    #[serde(default)]
    pub class: String,
    /// Position in pixels [x, y]
    pub position: [f32; 2],
}

impl SourceObject {
    /// Create a classless, unnamed object
    pub fn new(position: [f32; 2]) -> Self {
        Self {
            name: None,
            class: String::new(),
            position,
        }
    }

    /// Set the symbolic name, empty names are treated as no name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.name = (!name.is_empty()).then_some(name);
        self
    }

    /// Set the class name
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = class.into();
        self
    }
}

/// An object with its numeric identity
///
/// `id_value` is the object's index in the flattened object sequence of its map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapObject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub id_value: u32,
    pub class: String,
    pub position: [f32; 2],
}

impl MapObject {
    /// Give a source object its numeric identity
    pub fn new(source: &SourceObject, id_value: u32) -> Self {
        Self {
            id: source.name.clone(),
            id_value,
            class: source.class.clone(),
            position: source.position,
        }
    }
}
