//! bntmx - Tiled map compiler for Butano games
//!
//! Converts every `*.tmx` map found in a set of directories into:
//! - `graphics/<name>.bmp` - the stacked background, 8-bit indexed
//! - `graphics/<name>.json` - the background descriptor
//! - generated sources describing objects and tiles of the map
//!
//! Maps whose outputs are newer than all of their inputs are skipped.

pub mod batch;
pub mod config;
pub mod stale;

pub use batch::{convert_map, find_maps, run, BatchOptions, BatchReport, MapOutcome, MapReport};
pub use config::BuildConfig;
pub use stale::is_up_to_date;
