//! Build script for bntmx_maps_check
//!
//! Generates the Rust modules of a few maps into `OUT_DIR`.

use bntmx_codegen::{compile, generate_map, renderer_for, CodegenConfig, Target};
use bntmx_core::{
    MapSource, SourceObject, SourceObjectLayer, SourceTileLayer, TileRef, TilesetInfo,
};
use std::error::Error;
use std::path::PathBuf;

fn castle() -> MapSource {
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
            vec![
                None,
                Some(TileRef::new(1, 1)),
                Some(TileRef::new(0, 2).with_flips(true, false, false)),
                None,
                Some(TileRef::new(0, 4)),
                Some(TileRef::new(1, 5)),
                None,
                Some(TileRef::new(1, 7)),
            ],
        ))
}

/// Names that are reserved words in generated code
fn keywords() -> MapSource {
    MapSource::new("keywords", 1, 1, 8, 8)
        .with_graphics_layer("bg")
        .with_tileset(TilesetInfo::new("self", 1))
        .with_object_layer(SourceObjectLayer::new(
            "objects",
            vec![
                SourceObject::new([0.0, 0.0]).with_name("type").with_class("Self"),
                SourceObject::new([8.0, 0.0]).with_name("door-1").with_class("class"),
            ],
        ))
}

/// No objects, no tiles
fn void() -> MapSource {
    MapSource::new("void", 0, 0, 8, 8).with_graphics_layer("bg")
}

fn main() -> Result<(), Box<dyn Error>> {
    println!("cargo:rerun-if-changed=build.rs");

    let config =
        CodegenConfig::new(PathBuf::from(std::env::var("OUT_DIR")?)).with_target(Target::Rust);
    let renderer = renderer_for(config.target);

    for source in [castle(), keywords(), void()] {
        let layout = compile(&source)?;
        generate_map(&layout, renderer.as_ref(), &config)?;
    }

    Ok(())
}
