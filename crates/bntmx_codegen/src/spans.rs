//! Object spans
//!
//! A span locates the objects of one (layer, class) pair in the flattened
//! object sequence. Spans form a dense layer x class table.

use std::ops::Range;

use crate::catalog::ObjectLayer;
use crate::ids::ObjectClasses;

/// `(index, length)` range into the flattened objects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ObjectSpan {
    pub index: usize,
    pub length: usize,
}

impl ObjectSpan {
    pub fn new(index: usize, length: usize) -> Self {
        Self { index, length }
    }

    /// Index one past the last object of the span
    pub fn end(&self) -> usize {
        self.index + self.length
    }

    pub fn range(&self) -> Range<usize> {
        self.index..self.end()
    }
}

/// Dense table of spans, one row per object layer and one column per class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanTable {
    n_classes: usize,
    spans: Vec<ObjectSpan>,
}

impl SpanTable {
    pub fn n_layers(&self) -> usize {
        self.spans.len().checked_div(self.n_classes).unwrap_or(0)
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Span of one (layer, class ordinal) pair
    pub fn get(&self, layer: usize, class: usize) -> Option<ObjectSpan> {
        if class >= self.n_classes {
            return None;
        }
        self.layer(layer).map(|row| row[class])
    }

    /// Spans of one layer, indexed by class ordinal
    pub fn layer(&self, layer: usize) -> Option<&[ObjectSpan]> {
        if layer >= self.n_layers() {
            return None;
        }
        let start = layer * self.n_classes;
        Some(&self.spans[start..start + self.n_classes])
    }

    /// Span covering every class of one layer
    pub fn layer_span(&self, layer: usize) -> Option<ObjectSpan> {
        let row = self.layer(layer)?;
        let first = row.first()?;
        let last = row.last()?;
        Some(ObjectSpan::new(first.index, last.end() - first.index))
    }

    /// Iterate over the rows of the table
    pub fn rows(&self) -> impl Iterator<Item = &[ObjectSpan]> {
        self.spans.chunks(self.n_classes.max(1))
    }
}

/// Compute the span table following the flatten order
pub fn object_spans(layers: &[ObjectLayer], classes: &ObjectClasses) -> SpanTable {
    let mut spans = Vec::with_capacity(layers.len() * classes.len());
    let mut index = 0;
    for layer in layers {
        for class in classes.names() {
            let length = layer.objects(class).len();
            spans.push(ObjectSpan::new(index, length));
            index += length;
        }
    }

    SpanTable {
        n_classes: classes.len(),
        spans,
    }
}
