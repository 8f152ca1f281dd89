//! bntmx_codegen - Map compiler for bntmx
//!
//! Turns a [`MapSource`](bntmx_core::MapSource) into a [`MapLayout`], the
//! normalized description of everything a runtime without file loading needs:
//!
//! - **Object catalog** - objects grouped per layer and class
//! - **Identities** - the sorted class set and the flatten order fixing every object's `id_value`
//! - **Spans** - per layer and class `(index, length)` ranges into the flattened objects
//! - **Tiles** - row-major tile layers and tileset id ranges
//! - **Canvas** - background size rounded to hardware blocks, layers stacked vertically
//!
//! The layout is then rendered by a [`Renderer`] for a target language and
//! written out by [`generate_map`].
//!
//! # Example
//!
//! ```rust,ignore
//! use bntmx_codegen::{compile, generate_map, renderer_for, CodegenConfig, Target};
//!
//! let layout = compile(&map_source)?;
//! let config = CodegenConfig::new("build").with_target(Target::Cpp);
//! let renderer = renderer_for(config.target);
//! generate_map(&layout, renderer.as_ref(), &config)?;
//! ```

pub mod background;
pub mod canvas;
pub mod catalog;
pub mod generator;
pub mod ids;
pub mod layout;
pub mod render;
pub mod spans;
pub mod tiles;

pub use background::BackgroundDescriptor;
pub use canvas::{round_to_block, CanvasSize, BLOCK_SIZE};
pub use generator::{generate_map, output_paths, CodegenConfig, CodegenResult};
pub use ids::{EnumEntry, IdAllocator, ObjectClasses};
pub use layout::{compile, MapLayout};
pub use render::{renderer_for, Artifact, OutputDir, Renderer, Target};
pub use spans::{ObjectSpan, SpanTable};
pub use tiles::{MapTile, TilesetRange};

use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur while compiling a map or writing its artifacts
#[derive(Debug, Error)]
pub enum CodegenError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Tile layer '{layer}' has {len} tiles, expected {width}x{height}")]
    TileLayerSize {
        layer: String,
        len: usize,
        width: u32,
        height: u32,
    },

    #[error("Tile layer '{layer}' references unknown tileset {tileset_index}")]
    UnknownTileset { layer: String, tileset_index: usize },

    #[error("Tile layer '{layer}' references tile {local_id} outside of tileset '{tileset}'")]
    TileOutOfRange {
        layer: String,
        tileset: String,
        local_id: u32,
    },

    #[error("Map has {0} objects, spans can address at most {max}", max = u16::MAX)]
    TooManyObjects(usize),

    #[error("Object id '{0}' is used by more than one object")]
    DuplicateObjectId(String),

    #[error("{kind} names '{first}' and '{second}' both generate identifier '{identifier}'")]
    DuplicateIdentifier {
        kind: &'static str,
        first: String,
        second: String,
        identifier: String,
    },

    #[error("Invalid map: {0}")]
    InvalidMap(String),

    #[error("Failed to serialize background descriptor: {0}")]
    SerializeError(#[from] serde_json::Error),

    #[error("Failed to write generated code: {0}")]
    WriteError(#[from] std::fmt::Error),

    #[error("Failed to parse generated code: {0}")]
    ParseError(String),
}

/// Words that can't be used as identifiers in generated C++ or Rust
const RESERVED_WORDS: &[&str] = &[
    // Shared
    "_", "break", "const", "continue", "do", "else", "enum", "extern", "false", "for", "if",
    "return", "static", "struct", "true", "try", "virtual", "while",
    // Rust
    "Self", "abstract", "as", "async", "await", "become", "box", "crate", "dyn", "final", "fn",
    "gen", "impl", "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override",
    "priv", "pub", "ref", "self", "super", "trait", "type", "typeof", "unsafe", "unsized", "use",
    "where", "yield",
    // C++
    "alignas", "alignof", "and", "and_eq", "asm", "auto", "bitand", "bitor", "bool", "case",
    "catch", "char", "char8_t", "char16_t", "char32_t", "class", "co_await", "co_return",
    "co_yield", "compl", "concept", "consteval", "constexpr", "constinit", "const_cast",
    "decltype", "default", "delete", "double", "dynamic_cast", "explicit", "export", "float",
    "friend", "goto", "inline", "int", "long", "mutable", "namespace", "new", "noexcept", "not",
    "not_eq", "nullptr", "operator", "or", "or_eq", "private", "protected", "public", "register",
    "reinterpret_cast", "requires", "short", "signed", "sizeof", "static_assert", "static_cast",
    "switch", "template", "this", "thread_local", "throw", "typedef", "typeid", "typename",
    "union", "unsigned", "using", "void", "volatile", "wchar_t", "xor", "xor_eq",
];

/// Turn a name from map data into a valid C++ and Rust identifier
///
/// Characters other than ASCII letters, digits and `_` become `_`, and a
/// leading digit gets a `_` prefix. Reserved words get a `_` suffix.
pub fn sanitize_identifier(name: &str) -> String {
    let mut result: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if result.is_empty() || result.starts_with(|c: char| c.is_ascii_digit()) {
        result.insert(0, '_');
    }
    if RESERVED_WORDS.contains(&result.as_str()) {
        result.push('_');
    }
    result
}

/// Fail if two names generate the same identifier
///
/// Takes `(name, identifier)` pairs, where the identifier is the form the
/// name is emitted in.
pub fn check_identifiers<'a>(
    kind: &'static str,
    identifiers: impl IntoIterator<Item = (&'a str, String)>,
) -> Result<(), CodegenError> {
    let mut seen: HashMap<String, &str> = HashMap::new();
    for (name, identifier) in identifiers {
        if let Some(first) = seen.get(&identifier) {
            return Err(CodegenError::DuplicateIdentifier {
                kind,
                first: first.to_string(),
                second: name.to_string(),
                identifier,
            });
        }
        seen.insert(identifier, name);
    }
    Ok(())
}
