//! Rust map modules generated by bntmx at build time
//!
//! Building this crate type-checks the generated code against
//! `bntmx_runtime`; its tests exercise the generated accessors.

pub mod castle {
    include!(concat!(env!("OUT_DIR"), "/src/bntmx_maps_castle.rs"));
}

pub mod keywords {
    include!(concat!(env!("OUT_DIR"), "/src/bntmx_maps_keywords.rs"));
}

pub mod void {
    include!(concat!(env!("OUT_DIR"), "/src/bntmx_maps_void.rs"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use bntmx_runtime::MapTile;

    #[test]
    fn test_castle_constants() {
        assert_eq!(castle::WIDTH_IN_PIXELS, 32);
        assert_eq!(castle::HEIGHT_IN_TILES, 2);
        assert_eq!(castle::N_GRAPHICS_LAYERS, 2);
        assert_eq!(castle::N_OBJECTS_LAYERS, 2);
        assert_eq!(castle::N_OBJECTS_CLASSES, 4);
        assert_eq!(castle::N_OBJECTS, 4);
        assert_eq!(castle::tile_id::WALLS, 1);
        assert_eq!(castle::tile_id::FLOOR_LAST, 24);
    }

    #[test]
    fn test_castle_objects() {
        let guard = castle::object(castle::ObjectId::guard as usize);
        assert_eq!(guard.position(), (16.0, 8.0));
        assert_eq!(guard.id(), castle::ObjectId::guard as u16);

        assert_eq!(castle::objects(0).len(), 3);
        assert_eq!(castle::objects(1).len(), 1);
        assert_eq!(castle::objects(1)[0].id(), castle::ObjectId::key as u16);

        let enemies = castle::objects_of_class(0, castle::ObjectClass::Enemy as usize);
        assert_eq!(enemies.len(), 1);
        assert_eq!(enemies[0].position(), (24.5, 4.0));
        assert!(castle::objects_of_class(1, castle::ObjectClass::Npc as usize).is_empty());
    }

    #[test]
    fn test_castle_tiles() {
        let tiles = castle::tiles(0);
        assert_eq!(tiles.len(), castle::TILES_PER_LAYER);
        assert!(tiles[0].is_empty());
        assert_eq!(tiles[1], MapTile::new(castle::tile_id::FLOOR + 1));
        assert_eq!(tiles[2].id(), 3);
        assert!(tiles[2].flip_h());
        assert_eq!(tiles[7].id(), castle::tile_id::FLOOR_LAST);
    }

    #[test]
    #[should_panic(expected = "Invalid object ID")]
    fn test_object_out_of_range() {
        castle::object(castle::N_OBJECTS);
    }

    #[test]
    #[should_panic(expected = "Invalid objects class")]
    fn test_class_out_of_range() {
        castle::objects_of_class(0, castle::N_OBJECTS_CLASSES);
    }

    #[test]
    #[should_panic(expected = "Invalid tiles layer index")]
    fn test_tiles_layer_out_of_range() {
        castle::tiles(1);
    }

    #[test]
    fn test_reserved_names() {
        assert_eq!(keywords::ObjectClass::Self_ as u16, 1);
        assert_eq!(keywords::ObjectClass::class_ as u16, 2);
        assert_eq!(keywords::ObjectId::type_ as u16, 0);
        assert_eq!(keywords::ObjectId::door_1 as u16, 1);
        assert_eq!(keywords::tile_id::SELF_, 1);
    }

    #[test]
    fn test_void_map() {
        assert_eq!(void::N_OBJECTS, 0);
        assert_eq!(void::N_OBJECTS_LAYERS, 0);
        assert_eq!(void::N_TILES_LAYERS, 0);
    }

    #[test]
    #[should_panic(expected = "Invalid objects layer index")]
    fn test_void_has_no_object_layers() {
        void::objects(0);
    }
}
