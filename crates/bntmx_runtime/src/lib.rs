//! Runtime types for maps generated by bntmx
//!
//! Generated Rust map modules store their data in `static` tables of these
//! types, so every constructor is a `const fn`. The crate has no dependencies
//! and doesn't need `std`.

#![cfg_attr(not(test), no_std)]

use core::ops::Range;

/// A map object: its position in pixels and its identity
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MapObject {
    x: f32,
    y: f32,
    id: u16,
}

impl MapObject {
    pub const fn new(x: f32, y: f32, id: u16) -> Self {
        Self { x, y, id }
    }

    /// Position in pixels (x, y)
    pub const fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    pub const fn x(&self) -> f32 {
        self.x
    }

    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Index of the object in its map, also the value of its `ObjectId`
    pub const fn id(&self) -> u16 {
        self.id
    }
}

/// An encoded tile
///
/// The low bits hold the tile id (0 for an empty cell), the top three bits
/// hold the horizontal, vertical and diagonal flip flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct MapTile(pub u32);

impl MapTile {
    pub const FLIP_H: u32 = 0x8000_0000;
    pub const FLIP_V: u32 = 0x4000_0000;
    pub const FLIP_D: u32 = 0x2000_0000;
    pub const ID_MASK: u32 = !(Self::FLIP_H | Self::FLIP_V | Self::FLIP_D);

    pub const EMPTY: MapTile = MapTile(0);

    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn id(&self) -> u32 {
        self.0 & Self::ID_MASK
    }

    pub const fn is_empty(&self) -> bool {
        self.id() == 0
    }

    pub const fn flip_h(&self) -> bool {
        self.0 & Self::FLIP_H != 0
    }

    pub const fn flip_v(&self) -> bool {
        self.0 & Self::FLIP_V != 0
    }

    pub const fn flip_d(&self) -> bool {
        self.0 & Self::FLIP_D != 0
    }
}

/// Location of the objects of one (layer, class) pair in a map's objects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct ObjectSpan {
    pub index: u16,
    pub length: u16,
}

impl ObjectSpan {
    pub const fn new(index: u16, length: u16) -> Self {
        Self { index, length }
    }

    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn range(&self) -> Range<usize> {
        self.index as usize..self.index as usize + self.length as usize
    }
}
