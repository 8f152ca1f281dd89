//! Rust renderer
//!
//! Produces one module per map for Rust runtimes, built with `codegen` and
//! formatted with `prettyplease`. Data lives in `static` arrays and accessors
//! `assert!` their bounds.

use codegen::Scope;

use super::{artifact_stem, Artifact, OutputDir, Renderer, Target};
use crate::ids::EnumEntry;
use crate::layout::MapLayout;
use crate::{format_code, sanitize_identifier, CodegenError};

const HEADER: &str = "// Auto-generated by bntmx from a Tiled map.
// This file is regenerated when the map changes.
// Do not edit manually - your changes will be overwritten!

";

/// Renders maps as Rust modules
#[derive(Debug, Clone, Copy, Default)]
pub struct RustRenderer;

impl RustRenderer {
    fn module_name(map_name: &str) -> String {
        format!("{}.rs", artifact_stem(map_name))
    }
}

impl Renderer for RustRenderer {
    fn target(&self) -> Target {
        Target::Rust
    }

    fn outputs(&self, map_name: &str) -> Vec<(OutputDir, String)> {
        vec![(OutputDir::Src, Self::module_name(map_name))]
    }

    fn render(&self, layout: &MapLayout) -> Result<Vec<Artifact>, CodegenError> {
        let code = generate_module(layout)?;
        Ok(vec![Artifact {
            dir: OutputDir::Src,
            file_name: Self::module_name(&layout.name),
            contents: format!("{}{}", HEADER, code),
        }])
    }
}

/// Generate the module of one map
fn generate_module(layout: &MapLayout) -> Result<String, CodegenError> {
    let mut scope = Scope::new();

    scope.import("bntmx_runtime", "MapObject");
    scope.import("bntmx_runtime", "MapTile");
    scope.import("bntmx_runtime", "ObjectSpan");

    generate_enum(&mut scope, "ObjectClass", &layout.class_enumeration());
    generate_enum(&mut scope, "ObjectId", &layout.object_ids);
    generate_tile_ids(&mut scope, layout);
    generate_constants(&mut scope, layout);
    generate_tables(&mut scope, layout);
    generate_accessors(&mut scope);

    let code = scope.to_string();
    format_code(&code)
}

/// Generate a `u16` enum with explicit discriminants
fn generate_enum(scope: &mut Scope, name: &str, entries: &[EnumEntry]) {
    scope.raw("");
    // Zero-variant enums can't have a repr
    if !entries.is_empty() {
        scope.raw("#[repr(u16)]");
    }
    scope.raw("#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]");
    scope.raw("#[allow(non_camel_case_types)]");
    scope.raw(format!("pub enum {} {{", name));
    for entry in entries {
        scope.raw(format!(
            "    {} = {},",
            sanitize_identifier(&entry.name),
            entry.value
        ));
    }
    scope.raw("}");
}

fn generate_tile_ids(scope: &mut Scope, layout: &MapLayout) {
    scope.raw("");
    scope.raw("/// First and last tile id of each tileset");
    scope.raw("pub mod tile_id {");
    for range in &layout.tilesets {
        scope.raw(format!("    pub const {}: u32 = {};", range.identifier(), range.first));
        scope.raw(format!("    pub const {}: u32 = {};", range.last_identifier(), range.last));
    }
    scope.raw("}");
}

fn generate_constants(scope: &mut Scope, layout: &MapLayout) {
    let (width_in_pixels, height_in_pixels) = layout.dimensions_in_pixels;
    let (width_in_tiles, height_in_tiles) = layout.dimensions_in_tiles;
    let (tile_width, tile_height) = layout.tile_dimensions;

    scope.raw("");
    for (name, value) in [
        ("WIDTH_IN_PIXELS", width_in_pixels),
        ("HEIGHT_IN_PIXELS", height_in_pixels),
        ("WIDTH_IN_TILES", width_in_tiles),
        ("HEIGHT_IN_TILES", height_in_tiles),
        ("TILE_WIDTH", tile_width),
        ("TILE_HEIGHT", tile_height),
    ] {
        scope.raw(format!("pub const {}: u32 = {};", name, value));
    }
    for (name, value) in [
        ("N_GRAPHICS_LAYERS", layout.n_graphics_layers),
        ("N_OBJECTS_LAYERS", layout.n_object_layers()),
        ("N_OBJECTS_CLASSES", layout.n_object_classes()),
        ("N_TILES_LAYERS", layout.n_tile_layers()),
        ("N_OBJECTS", layout.n_objects()),
        ("TILES_PER_LAYER", layout.tiles_per_layer()),
    ] {
        scope.raw(format!("pub const {}: usize = {};", name, value));
    }
}

/// Generate the data tables, never emitting an empty array
fn generate_tables(scope: &mut Scope, layout: &MapLayout) {
    let mut objects: Vec<String> = layout
        .objects
        .iter()
        .map(|object| {
            format!(
                "MapObject::new({:?}, {:?}, {})",
                object.position[0], object.position[1], object.id_value
            )
        })
        .collect();
    if objects.is_empty() {
        objects.push("MapObject::new(0.0, 0.0, 0)".to_string());
    }

    let mut spans: Vec<String> = layout
        .spans
        .rows()
        .map(|row| {
            let row: Vec<_> = row
                .iter()
                .map(|span| format!("ObjectSpan::new({}, {})", span.index, span.length))
                .collect();
            format!("[{}]", row.join(", "))
        })
        .collect();
    if spans.is_empty() {
        let row = vec!["ObjectSpan::new(0, 0)"; layout.n_object_classes()];
        spans.push(format!("[{}]", row.join(", ")));
    }

    let mut tiles: Vec<String> = layout
        .tile_layers
        .iter()
        .map(|layer| {
            let layer: Vec<_> = layer
                .iter()
                .map(|tile| format!("MapTile::new({})", tile.0))
                .collect();
            format!("[{}]", layer.join(", "))
        })
        .collect();
    let tiles_per_layer = if tiles.is_empty() || layout.tiles_per_layer() == 0 {
        tiles = vec!["[MapTile::new(0)]".to_string()];
        1
    } else {
        layout.tiles_per_layer()
    };

    scope.raw("");
    scope.raw("/// Objects by layer, then class (classless first), then map order");
    scope.raw(format!(
        "static OBJECTS: [MapObject; {}] = [{}];",
        objects.len(),
        objects.join(", ")
    ));
    scope.raw("");
    scope.raw("/// Objects of each class of each layer");
    scope.raw(format!(
        "static OBJECTS_SPANS: [[ObjectSpan; {}]; {}] = [{}];",
        layout.n_object_classes(),
        spans.len(),
        spans.join(", ")
    ));
    scope.raw("");
    scope.raw(format!(
        "static TILES: [[MapTile; {}]; {}] = [{}];",
        tiles_per_layer,
        tiles.len(),
        tiles.join(", ")
    ));
}

fn generate_accessors(scope: &mut Scope) {
    scope.raw("");
    scope.raw("/// The object with the given id");
    scope
        .new_fn("object")
        .vis("pub")
        .arg("id", "usize")
        .ret("&'static MapObject")
        .line("assert!(id < N_OBJECTS, \"Invalid object ID: {}\", id);")
        .line("&OBJECTS[id]");

    scope.raw("");
    scope.raw("/// Every object of a layer");
    scope
        .new_fn("objects")
        .vis("pub")
        .arg("objects_layer_index", "usize")
        .ret("&'static [MapObject]")
        .line(
            "assert!(objects_layer_index < N_OBJECTS_LAYERS, \"Invalid objects layer index: {}\", objects_layer_index);",
        )
        .line("let first = OBJECTS_SPANS[objects_layer_index][0];")
        .line("let last = OBJECTS_SPANS[objects_layer_index][N_OBJECTS_CLASSES - 1];")
        .line("&OBJECTS[first.index as usize..(last.index + last.length) as usize]");

    scope.raw("");
    scope.raw("/// The objects of one class of a layer");
    scope
        .new_fn("objects_of_class")
        .vis("pub")
        .arg("objects_layer_index", "usize")
        .arg("objects_class", "usize")
        .ret("&'static [MapObject]")
        .line(
            "assert!(objects_layer_index < N_OBJECTS_LAYERS, \"Invalid objects layer index: {}\", objects_layer_index);",
        )
        .line("assert!(objects_class < N_OBJECTS_CLASSES, \"Invalid objects class: {}\", objects_class);")
        .line("let span = OBJECTS_SPANS[objects_layer_index][objects_class];")
        .line("&OBJECTS[span.index as usize..(span.index + span.length) as usize]");

    scope.raw("");
    scope.raw("/// The tiles of a layer, row by row");
    scope
        .new_fn("tiles")
        .vis("pub")
        .arg("tiles_layer_index", "usize")
        .ret("&'static [MapTile]")
        .line(
            "assert!(tiles_layer_index < N_TILES_LAYERS, \"Invalid tiles layer index: {}\", tiles_layer_index);",
        )
        .line("&TILES[tiles_layer_index][..TILES_PER_LAYER]");
}
