//! Object classes and identities
//!
//! Objects are flattened layer by layer, then class by class (classless
//! objects first, then classes in sorted order), then in encounter order.
//! Each object's `id_value` is its position in that sequence.

use bntmx_core::MapObject;
use std::collections::{BTreeSet, HashSet};

use crate::catalog::ObjectLayer;
use crate::{check_identifiers, sanitize_identifier, CodegenError};

/// Hands out object identities for a single map conversion
///
/// A fresh allocator is created for every map so identities always start at 0.
#[derive(Debug, Default)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the next identity
    pub fn next_id(&mut self) -> u32 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Number of identities handed out so far
    pub fn allocated(&self) -> u32 {
        self.next
    }
}

/// An enumeration entry of generated code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumEntry {
    pub name: String,
    pub value: u32,
}

impl EnumEntry {
    pub fn new(name: impl Into<String>, value: u32) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// The sorted set of object classes of a map
///
/// Ordinal 0 is always the classless `""` class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectClasses {
    names: Vec<String>,
}

impl ObjectClasses {
    /// Collect the classes of every layer
    pub fn from_layers(layers: &[ObjectLayer]) -> Self {
        let mut names: BTreeSet<String> = layers
            .iter()
            .flat_map(|layer| layer.classes().map(str::to_string))
            .collect();
        names.insert(String::new());

        Self {
            names: names.into_iter().collect(),
        }
    }

    /// Class names by ordinal
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of classes, including the classless one
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Public class enumeration, without the classless ordinal 0
    pub fn enumeration(&self) -> Vec<EnumEntry> {
        self.names
            .iter()
            .enumerate()
            .skip(1)
            .map(|(ordinal, name)| EnumEntry::new(name.clone(), ordinal as u32))
            .collect()
    }
}

/// Flatten every layer's objects and give them their identities
pub fn assign_ids(
    layers: &[ObjectLayer],
    classes: &ObjectClasses,
    ids: &mut IdAllocator,
) -> Vec<MapObject> {
    let mut objects = Vec::new();
    for layer in layers {
        for class in classes.names() {
            for source in layer.objects(class) {
                objects.push(MapObject::new(source, ids.next_id()));
            }
        }
    }
    objects
}

/// Fail if two entries of an enumeration generate the same identifier
pub fn check_enumeration(kind: &'static str, entries: &[EnumEntry]) -> Result<(), CodegenError> {
    check_identifiers(
        kind,
        entries
            .iter()
            .map(|entry| (entry.name.as_str(), sanitize_identifier(&entry.name))),
    )
}

/// Identifier enumeration for every object with a symbolic name
///
/// Names must stay distinct once turned into identifiers.
pub fn object_ids(objects: &[MapObject]) -> Result<Vec<EnumEntry>, CodegenError> {
    let mut seen = HashSet::new();
    let mut entries = Vec::new();
    for object in objects {
        let Some(id) = &object.id else {
            continue;
        };
        if !seen.insert(id.as_str()) {
            return Err(CodegenError::DuplicateObjectId(id.clone()));
        }
        entries.push(EnumEntry::new(id.clone(), object.id_value));
    }
    check_enumeration("Object id", &entries)?;
    Ok(entries)
}
