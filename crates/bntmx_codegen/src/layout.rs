//! Map layout
//!
//! The structured model every renderer serializes: dimensions, enumerations,
//! the flattened objects with their span table, and the flattened tile layers.

use bntmx_core::{MapObject, MapSource};
use tracing::debug;

use crate::canvas::CanvasSize;
use crate::catalog::build_catalog;
use crate::ids::{assign_ids, check_enumeration, object_ids, EnumEntry, IdAllocator, ObjectClasses};
use crate::spans::{object_spans, SpanTable};
use crate::tiles::{
    check_tileset_identifiers, flatten_tiles, tileset_ranges, MapTile, TilesetRange,
};
use crate::CodegenError;

/// Normalized layout of one map
#[derive(Debug, Clone, PartialEq)]
pub struct MapLayout {
    /// Base name of the map, used to name every artifact
    pub name: String,
    pub dimensions_in_pixels: (u32, u32),
    pub dimensions_in_tiles: (u32, u32),
    pub tile_dimensions: (u32, u32),
    pub n_graphics_layers: usize,
    pub object_classes: ObjectClasses,
    /// Named objects and their `id_value`
    pub object_ids: Vec<EnumEntry>,
    pub tilesets: Vec<TilesetRange>,
    /// Objects in flatten order, `objects[i].id_value == i`
    pub objects: Vec<MapObject>,
    pub spans: SpanTable,
    /// One row-major sequence per exported tile layer
    pub tile_layers: Vec<Vec<MapTile>>,
    pub canvas: CanvasSize,
}

impl MapLayout {
    pub fn n_object_layers(&self) -> usize {
        self.spans.n_layers()
    }

    pub fn n_object_classes(&self) -> usize {
        self.object_classes.len()
    }

    pub fn n_tile_layers(&self) -> usize {
        self.tile_layers.len()
    }

    pub fn n_objects(&self) -> usize {
        self.objects.len()
    }

    /// Number of tiles in each tile layer
    pub fn tiles_per_layer(&self) -> usize {
        let (width, height) = self.dimensions_in_tiles;
        width as usize * height as usize
    }

    /// Public class enumeration, without the classless class
    pub fn class_enumeration(&self) -> Vec<EnumEntry> {
        self.object_classes.enumeration()
    }

    /// The object with the given identity
    pub fn object(&self, id: usize) -> Option<&MapObject> {
        self.objects.get(id)
    }

    /// Every object of an object layer, all classes included
    pub fn objects(&self, layer: usize) -> Option<&[MapObject]> {
        let span = self.spans.layer_span(layer)?;
        self.objects.get(span.range())
    }

    /// The objects of one class of an object layer
    pub fn objects_of_class(&self, layer: usize, class: usize) -> Option<&[MapObject]> {
        let span = self.spans.get(layer, class)?;
        self.objects.get(span.range())
    }

    /// The flattened tiles of a tile layer
    pub fn tiles(&self, layer: usize) -> Option<&[MapTile]> {
        self.tile_layers.get(layer).map(Vec::as_slice)
    }
}

/// Compile a map source into its layout
///
/// Identities are allocated from a fresh [`IdAllocator`], so compiling the
/// same source twice yields the same layout.
pub fn compile(source: &MapSource) -> Result<MapLayout, CodegenError> {
    if source.graphics_layers.is_empty() {
        return Err(CodegenError::InvalidMap(format!(
            "map '{}' has no graphics layers",
            source.name
        )));
    }

    let catalog = build_catalog(&source.object_layers);
    let object_classes = ObjectClasses::from_layers(&catalog);
    check_enumeration("Object class", &object_classes.enumeration())?;

    let mut ids = IdAllocator::new();
    let objects = assign_ids(&catalog, &object_classes, &mut ids);
    if ids.allocated() > u32::from(u16::MAX) {
        return Err(CodegenError::TooManyObjects(objects.len()));
    }
    let object_ids = object_ids(&objects)?;
    let spans = object_spans(&catalog, &object_classes);

    let tilesets = tileset_ranges(&source.tilesets);
    check_tileset_identifiers(&tilesets)?;
    let (width, height) = source.dimensions_in_tiles();
    let tile_layers = source
        .tile_layers
        .iter()
        .map(|layer| flatten_tiles(layer, width, height, &tilesets))
        .collect::<Result<Vec<_>, _>>()?;

    let (width_in_pixels, height_in_pixels) = source.dimensions_in_pixels();
    let canvas = CanvasSize::for_map(
        width_in_pixels,
        height_in_pixels,
        source.graphics_layers.len() as u32,
    );

    debug!(
        "Compiled map '{}': {} objects in {} classes, {} tile layers",
        source.name,
        objects.len(),
        object_classes.len(),
        tile_layers.len()
    );

    Ok(MapLayout {
        name: source.name.clone(),
        dimensions_in_pixels: (width_in_pixels, height_in_pixels),
        dimensions_in_tiles: (width, height),
        tile_dimensions: source.tile_dimensions(),
        n_graphics_layers: source.graphics_layers.len(),
        object_classes,
        object_ids,
        tilesets,
        objects,
        spans,
        tile_layers,
        canvas,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use bntmx_core::{SourceObject, SourceObjectLayer, SourceTileLayer, TileRef, TilesetInfo};

    /// A small two-layer map used by the renderer tests too
    pub(crate) fn sample_source() -> MapSource {
        MapSource::new("castle", 4, 2, 8, 8)
            .with_graphics_layer("ground")
            .with_graphics_layer("roofs")
            .with_tileset(TilesetInfo::new("walls", 16))
            .with_tileset(TilesetInfo::new("floor", 8))
            .with_object_layer(SourceObjectLayer::new(
                "npcs",
                vec![
                    SourceObject::new([16.0, 8.0]).with_name("guard").with_class("Npc"),
                    SourceObject::new([0.0, 0.0]).with_name("spawn"),
                    SourceObject::new([24.5, 4.0]).with_class("Enemy"),
                ],
            ))
            .with_object_layer(SourceObjectLayer::new(
                "items",
                vec![SourceObject::new([8.0, 8.0]).with_name("key").with_class("Item")],
            ))
            .with_tile_layer(SourceTileLayer::new(
                "collisions",
                (0..8)
                    .map(|i| (i % 3 != 0).then(|| TileRef::new(i as usize % 2, i)))
                    .collect(),
            ))
    }

    #[test]
    fn test_compile_sample() {
        let layout = compile(&sample_source()).unwrap();

        assert_eq!(layout.name, "castle");
        assert_eq!(layout.dimensions_in_pixels, (32, 16));
        assert_eq!(layout.dimensions_in_tiles, (4, 2));
        assert_eq!(layout.n_graphics_layers, 2);
        assert_eq!(layout.n_object_layers(), 2);
        assert_eq!(layout.n_object_classes(), 4);
        assert_eq!(layout.n_tile_layers(), 1);
        assert_eq!(layout.n_objects(), 4);
        assert_eq!(
            layout.class_enumeration(),
            vec![
                EnumEntry::new("Enemy", 1),
                EnumEntry::new("Item", 2),
                EnumEntry::new("Npc", 3),
            ]
        );
        assert_eq!(
            layout.object_ids,
            vec![
                EnumEntry::new("spawn", 0),
                EnumEntry::new("guard", 2),
                EnumEntry::new("key", 3),
            ]
        );
    }

    #[test]
    fn test_single_classless_and_enemy() {
        let source = MapSource::new("field", 1, 1, 8, 8)
            .with_graphics_layer("bg")
            .with_object_layer(SourceObjectLayer::new(
                "objects",
                vec![
                    SourceObject::new([0.0, 0.0]),
                    SourceObject::new([8.0, 0.0]).with_class("Enemy"),
                ],
            ));

        let layout = compile(&source).unwrap();

        assert_eq!(layout.class_enumeration(), vec![EnumEntry::new("Enemy", 1)]);
        assert_eq!(layout.n_objects(), 2);
        let row = layout.spans.layer(0).unwrap();
        assert_eq!((row[0].index, row[0].length), (0, 1));
        assert_eq!((row[1].index, row[1].length), (1, 1));
    }

    #[test]
    fn test_accessors() {
        let layout = compile(&sample_source()).unwrap();

        assert_eq!(layout.object(2).unwrap().id.as_deref(), Some("guard"));
        assert!(layout.object(4).is_none());

        assert_eq!(layout.objects(0).unwrap().len(), 3);
        assert_eq!(layout.objects(1).unwrap().len(), 1);
        assert!(layout.objects(2).is_none());

        let enemies = layout.objects_of_class(0, 1).unwrap();
        assert_eq!(enemies.len(), 1);
        assert_eq!(enemies[0].class, "Enemy");
        assert!(layout.objects_of_class(1, 1).unwrap().is_empty());
        assert!(layout.objects_of_class(0, 4).is_none());

        assert_eq!(layout.tiles(0).unwrap().len(), layout.tiles_per_layer());
        assert!(layout.tiles(1).is_none());
    }

    #[test]
    fn test_identities_restart_for_each_compile() {
        let source = sample_source();

        let first = compile(&source).unwrap();
        let second = compile(&source).unwrap();

        assert_eq!(first, second);
        let ids: Vec<_> = second.objects.iter().map(|o| o.id_value).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_canvas() {
        let source = MapSource::new("big", 30, 20, 10, 13)
            .with_graphics_layer("a")
            .with_graphics_layer("b");

        let layout = compile(&source).unwrap();

        assert_eq!(layout.dimensions_in_pixels, (300, 260));
        assert_eq!(layout.canvas.width, 512);
        assert_eq!(layout.canvas.layer_height, 512);
        assert_eq!(layout.canvas.height(), 1024);
    }

    #[test]
    fn test_tile_layer_size_mismatch() {
        let source = MapSource::new("broken", 4, 2, 8, 8)
            .with_graphics_layer("bg")
            .with_tileset(TilesetInfo::new("walls", 16))
            .with_tile_layer(SourceTileLayer::new(
                "collisions",
                (0..7).map(|i| Some(TileRef::new(0, i))).collect(),
            ));

        assert!(matches!(
            compile(&source),
            Err(CodegenError::TileLayerSize { .. })
        ));
    }

    #[test]
    fn test_names_clashing_after_sanitizing() {
        let doors = |names: [&str; 2], classes: [&str; 2]| {
            MapSource::new("doors", 1, 1, 8, 8)
                .with_graphics_layer("bg")
                .with_object_layer(SourceObjectLayer::new(
                    "objects",
                    names
                        .iter()
                        .zip(classes)
                        .map(|(name, class)| {
                            SourceObject::new([0.0, 0.0]).with_name(*name).with_class(class)
                        })
                        .collect(),
                ))
        };

        assert!(compile(&doors(["door-1", "door-2"], ["Door", "Door"])).is_ok());
        assert!(matches!(
            compile(&doors(["door-1", "door_1"], ["Door", "Door"])),
            Err(CodegenError::DuplicateIdentifier { kind: "Object id", .. })
        ));
        assert!(matches!(
            compile(&doors(["a", "b"], ["Secret-Door", "Secret_Door"])),
            Err(CodegenError::DuplicateIdentifier { kind: "Object class", .. })
        ));

        let tilesets = MapSource::new("tiles", 1, 1, 8, 8)
            .with_graphics_layer("bg")
            .with_tileset(TilesetInfo::new("Secret-Door", 4))
            .with_tileset(TilesetInfo::new("Secret_Door", 4));
        assert!(matches!(
            compile(&tilesets),
            Err(CodegenError::DuplicateIdentifier { kind: "Tileset", .. })
        ));
    }

    #[test]
    fn test_tile_outside_of_its_tileset() {
        let source = MapSource::new("spill", 1, 1, 8, 8)
            .with_graphics_layer("bg")
            .with_tileset(TilesetInfo::new("a", 2))
            .with_tileset(TilesetInfo::new("b", 2))
            .with_tile_layer(SourceTileLayer::new("ground", vec![Some(TileRef::new(0, 5))]));

        assert!(matches!(
            compile(&source),
            Err(CodegenError::TileOutOfRange { local_id: 5, .. })
        ));
    }

    #[test]
    fn test_no_graphics_layers() {
        let source = MapSource::new("blank", 1, 1, 8, 8);
        assert!(matches!(compile(&source), Err(CodegenError::InvalidMap(_))));
    }
}
