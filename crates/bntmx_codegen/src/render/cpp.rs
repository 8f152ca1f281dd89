//! Butano C++ renderer
//!
//! Produces a header declaring the map class in `bntmx::maps` and a source
//! file holding the data tables and the bounds-checked accessors.

use bntmx_core::MapObject;

use super::{artifact_stem, Artifact, OutputDir, Renderer, Target};
use crate::ids::EnumEntry;
use crate::layout::MapLayout;
use crate::tiles::MapTile;
use crate::{sanitize_identifier, CodegenError};

const INDENT: &str = "    ";

/// Renders maps for the Butano C++ runtime
#[derive(Debug, Clone, Copy, Default)]
pub struct CppRenderer;

impl CppRenderer {
    fn header_name(map_name: &str) -> String {
        format!("{}.h", artifact_stem(map_name))
    }

    fn source_name(map_name: &str) -> String {
        format!("{}.cpp", artifact_stem(map_name))
    }
}

impl Renderer for CppRenderer {
    fn target(&self) -> Target {
        Target::Cpp
    }

    fn outputs(&self, map_name: &str) -> Vec<(OutputDir, String)> {
        vec![
            (OutputDir::Include, Self::header_name(map_name)),
            (OutputDir::Src, Self::source_name(map_name)),
        ]
    }

    fn render(&self, layout: &MapLayout) -> Result<Vec<Artifact>, CodegenError> {
        Ok(vec![
            Artifact {
                dir: OutputDir::Include,
                file_name: Self::header_name(&layout.name),
                contents: render_header(layout),
            },
            Artifact {
                dir: OutputDir::Src,
                file_name: Self::source_name(&layout.name),
                contents: render_source(layout),
            },
        ])
    }
}

/// `{a,b,c}` on one line
fn inline_array(items: &[String]) -> String {
    format!("{{{}}}", items.join(","))
}

/// One item per line, closing brace indented at `depth`
fn multiline_array(items: &[String], depth: usize) -> String {
    if items.is_empty() {
        return "{}".to_string();
    }
    let outer = INDENT.repeat(depth);
    let inner = INDENT.repeat(depth + 1);
    format!(
        "{{\n{inner}{}\n{outer}}}",
        items.join(&format!(",\n{inner}"))
    )
}

fn enum_entries(entries: &[EnumEntry]) -> Vec<String> {
    entries
        .iter()
        .map(|entry| format!("{}={}", sanitize_identifier(&entry.name), entry.value))
        .collect()
}

fn tile_id_entries(layout: &MapLayout) -> Vec<String> {
    let mut entries = Vec::new();
    for range in &layout.tilesets {
        entries.push(format!("{}={}", range.identifier(), range.first));
        entries.push(format!("{}={}", range.last_identifier(), range.last));
    }
    entries
}

fn cpp_object(object: &MapObject) -> String {
    format!(
        "bntmx::map_object(bn::fixed_point({}, {}), {})",
        object.position[0], object.position[1], object.id_value
    )
}

fn cpp_tile(tile: &MapTile) -> String {
    format!("bntmx::map_tile({})", tile.0)
}

fn render_header(layout: &MapLayout) -> String {
    let class_name = sanitize_identifier(&layout.name);
    let (width_in_pixels, height_in_pixels) = layout.dimensions_in_pixels;
    let (width_in_tiles, height_in_tiles) = layout.dimensions_in_tiles;
    let (tile_width, tile_height) = layout.tile_dimensions;

    format!(
        r#"#ifndef {guard}
#define {guard}

#include "bntmx_map.h"

#include <bn_regular_bg_items_{map_name}.h>

namespace bntmx::maps
{{
    class {class_name} : public map
    {{
        public:
            enum object_class {object_classes};

            enum object_id {object_ids};

            enum tile_id {tile_ids};

            constexpr {class_name}()
            {{
            }}

            constexpr ~{class_name}()
            {{
            }}

            constexpr bn::size dimensions_in_pixels() const
            {{
                return bn::size({width_in_pixels}, {height_in_pixels});
            }}

            constexpr bn::size dimensions_in_tiles() const
            {{
                return bn::size({width_in_tiles}, {height_in_tiles});
            }}

            constexpr bn::size tile_dimensions() const
            {{
                return bn::size({tile_width}, {tile_height});
            }}

            constexpr int width_in_pixels() const
            {{
                return {width_in_pixels};
            }}

            constexpr int height_in_pixels() const
            {{
                return {height_in_pixels};
            }}

            constexpr int width_in_tiles() const
            {{
                return {width_in_tiles};
            }}

            constexpr int height_in_tiles() const
            {{
                return {height_in_tiles};
            }}

            constexpr int tile_width() const
            {{
                return {tile_width};
            }}

            constexpr int tile_height() const
            {{
                return {tile_height};
            }}

            constexpr int n_graphics_layers() const
            {{
                return {n_graphics_layers};
            }}

            constexpr int n_objects_layers() const
            {{
                return {n_objects_layers};
            }}

            constexpr int n_tiles_layers() const
            {{
                return {n_tiles_layers};
            }}

            constexpr bn::regular_bg_item regular_bg_item() const
            {{
                return bn::regular_bg_items::{map_name};
            }}

            const bntmx::map_object object(int id) const;
            const bn::span<const bntmx::map_object> objects(int objects_layer_index) const;
            const bn::span<const bntmx::map_object> objects(int objects_layer_index, int objects_class) const;
            const bn::span<const bntmx::map_tile> tiles(int tiles_layer_index) const;
    }};
}}

#endif
"#,
        guard = format!("BNTMX_MAPS_{}_H", class_name.to_uppercase()),
        map_name = layout.name,
        class_name = class_name,
        object_classes = multiline_array(&enum_entries(&layout.class_enumeration()), 3),
        object_ids = multiline_array(&enum_entries(&layout.object_ids), 3),
        tile_ids = multiline_array(&tile_id_entries(layout), 3),
        width_in_pixels = width_in_pixels,
        height_in_pixels = height_in_pixels,
        width_in_tiles = width_in_tiles,
        height_in_tiles = height_in_tiles,
        tile_width = tile_width,
        tile_height = tile_height,
        n_graphics_layers = layout.n_graphics_layers,
        n_objects_layers = layout.n_object_layers(),
        n_tiles_layers = layout.n_tile_layers(),
    )
}

/// Objects table, with a placeholder element when the map has no objects
fn objects_table(layout: &MapLayout) -> String {
    if layout.objects.is_empty() {
        return "{bntmx::map_object(bn::fixed_point(0, 0), 0)}".to_string();
    }
    let objects: Vec<_> = layout.objects.iter().map(cpp_object).collect();
    multiline_array(&objects, 1)
}

/// Span table rows, with a zeroed row when the map has no object layers
fn spans_table(layout: &MapLayout) -> (usize, String) {
    let mut rows: Vec<String> = layout
        .spans
        .rows()
        .map(|row| {
            let spans: Vec<_> = row
                .iter()
                .map(|span| inline_array(&[span.index.to_string(), span.length.to_string()]))
                .collect();
            multiline_array(&spans, 2)
        })
        .collect();
    if rows.is_empty() {
        let zeroes = vec!["{0,0}".to_string(); layout.n_object_classes()];
        rows.push(multiline_array(&zeroes, 2));
    }
    (rows.len(), multiline_array(&rows, 1))
}

/// Tile table, one map row per line, with a single empty tile when there is nothing to store
fn tiles_table(layout: &MapLayout) -> (usize, usize, String) {
    let size = layout.tiles_per_layer();
    let width = (layout.dimensions_in_tiles.0 as usize).max(1);
    if layout.tile_layers.is_empty() || size == 0 {
        return (1, 1, "{{bntmx::map_tile(0)}}".to_string());
    }

    let layers: Vec<_> = layout
        .tile_layers
        .iter()
        .map(|tiles| {
            let rows: Vec<_> = tiles
                .chunks(width)
                .map(|row| row.iter().map(cpp_tile).collect::<Vec<_>>().join(","))
                .collect();
            multiline_array(&rows, 2)
        })
        .collect();
    (layers.len(), size, multiline_array(&layers, 1))
}

fn render_source(layout: &MapLayout) -> String {
    let class_name = sanitize_identifier(&layout.name);
    let (n_spans_layers, objects_spans) = spans_table(layout);
    let (n_tiles_rows, tiles_size, tiles) = tiles_table(layout);

    format!(
        r#"#include "{header_name}"

#include <bn_assert.h>

namespace bntmx::maps
{{
    // Objects are grouped by layer, then by class with classless objects
    // first, then kept in map order. Object IDs follow this order, so an ID
    // is also an index in this array.
    static constexpr bntmx::map_object _objects[] = {objects};

    // Index and length of the objects of each class of each layer.
    static constexpr struct {{uint16_t index; uint16_t length;}} _objects_spans[{n_spans_layers}][{n_objects_classes}] = {objects_spans};

    static constexpr bntmx::map_tile _tiles[{n_tiles_rows}][{tiles_size}] = {tiles};

    const bntmx::map_object {class_name}::object(int id) const
    {{
        BN_ASSERT(id >= 0 && id < {n_objects}, "Invalid object ID: ", id);
        return _objects[id];
    }}

    const bn::span<const bntmx::map_object> {class_name}::objects(int objects_layer_index) const
    {{
        BN_ASSERT(objects_layer_index >= 0 && objects_layer_index < {n_objects_layers}, "Invalid objects layer index: ", objects_layer_index);
        const auto& first = _objects_spans[objects_layer_index][0];
        const auto& last = _objects_spans[objects_layer_index][{last_class}];
        return bn::span<const bntmx::map_object>(_objects + first.index, last.index + last.length - first.index);
    }}

    const bn::span<const bntmx::map_object> {class_name}::objects(int objects_layer_index, int objects_class) const
    {{
        BN_ASSERT(objects_layer_index >= 0 && objects_layer_index < {n_objects_layers}, "Invalid objects layer index: ", objects_layer_index);
        BN_ASSERT(objects_class >= 0 && objects_class < {n_objects_classes}, "Invalid objects class: ", objects_class);
        const auto& span = _objects_spans[objects_layer_index][objects_class];
        return bn::span<const bntmx::map_object>(_objects + span.index, span.length);
    }}

    const bn::span<const bntmx::map_tile> {class_name}::tiles(int tiles_layer_index) const
    {{
        BN_ASSERT(tiles_layer_index >= 0 && tiles_layer_index < {n_tiles_layers}, "Invalid tiles layer index: ", tiles_layer_index);
        return bn::span<const bntmx::map_tile>(_tiles[tiles_layer_index], {size});
    }}
}}
"#,
        header_name = CppRenderer::header_name(&layout.name),
        class_name = class_name,
        objects = objects_table(layout),
        n_spans_layers = n_spans_layers,
        n_objects_classes = layout.n_object_classes(),
        objects_spans = objects_spans,
        n_tiles_rows = n_tiles_rows,
        tiles_size = tiles_size,
        tiles = tiles,
        n_objects = layout.n_objects(),
        n_objects_layers = layout.n_object_layers(),
        last_class = layout.n_object_classes() - 1,
        n_tiles_layers = layout.n_tile_layers(),
        size = layout.tiles_per_layer(),
    )
}
