//! Object catalog
//!
//! Groups the objects of each exported object layer by class, keeping the
//! source encounter order within a class.

use bntmx_core::{SourceObject, SourceObjectLayer};
use std::collections::BTreeMap;

/// The objects of one layer, grouped by class
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectLayer {
    pub path: String,
    classes: BTreeMap<String, Vec<SourceObject>>,
}

impl ObjectLayer {
    /// Group a layer's objects by class in a single pass
    pub fn from_source(layer: &SourceObjectLayer) -> Self {
        let mut classes: BTreeMap<String, Vec<SourceObject>> = BTreeMap::new();
        for object in &layer.objects {
            classes
                .entry(object.class.clone())
                .or_default()
                .push(object.clone());
        }

        Self {
            path: layer.path.clone(),
            classes,
        }
    }

    /// Objects of the given class, in encounter order (empty if the class is absent)
    pub fn objects(&self, class: &str) -> &[SourceObject] {
        self.classes.get(class).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Class names present in this layer, sorted
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    /// Total number of objects in this layer
    pub fn len(&self) -> usize {
        self.classes.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Build the catalog of every exported object layer, in export order
pub fn build_catalog(layers: &[SourceObjectLayer]) -> Vec<ObjectLayer> {
    layers.iter().map(ObjectLayer::from_source).collect()
}
