//! Artifact rendering
//!
//! A [`Renderer`] turns a [`MapLayout`] into the source files of one target
//! language. Renderers only format; every index and count they print comes
//! from the layout.

mod cpp;
mod rust;

pub use cpp::CppRenderer;
pub use rust::RustRenderer;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::layout::MapLayout;
use crate::CodegenError;

/// Target language of the generated code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// Butano C++ header and source
    #[default]
    Cpp,
    /// Rust module
    Rust,
}

impl FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cpp" | "c++" => Ok(Target::Cpp),
            "rust" | "rs" => Ok(Target::Rust),
            _ => Err(format!("Unknown target: {}", s)),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Cpp => write!(f, "cpp"),
            Target::Rust => write!(f, "rust"),
        }
    }
}

/// Subdirectory of the build directory an artifact is written to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputDir {
    Graphics,
    Include,
    Src,
}

impl OutputDir {
    pub const ALL: [OutputDir; 3] = [OutputDir::Graphics, OutputDir::Include, OutputDir::Src];

    pub fn dir_name(&self) -> &'static str {
        match self {
            OutputDir::Graphics => "graphics",
            OutputDir::Include => "include",
            OutputDir::Src => "src",
        }
    }

    /// Full path of this directory under a build directory
    pub fn path(&self, build_dir: &Path) -> PathBuf {
        build_dir.join(self.dir_name())
    }
}

/// A rendered file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub dir: OutputDir,
    pub file_name: String,
    pub contents: String,
}

/// Renders map layouts for one target language
pub trait Renderer {
    fn target(&self) -> Target;

    /// Files `render` produces for the named map, as (directory, file name)
    fn outputs(&self, map_name: &str) -> Vec<(OutputDir, String)>;

    fn render(&self, layout: &MapLayout) -> Result<Vec<Artifact>, CodegenError>;
}

/// Get the renderer of a target
pub fn renderer_for(target: Target) -> Box<dyn Renderer + Send + Sync> {
    match target {
        Target::Cpp => Box::new(CppRenderer),
        Target::Rust => Box::new(RustRenderer),
    }
}

/// Base name shared by every generated source file of a map
pub fn artifact_stem(map_name: &str) -> String {
    format!("bntmx_maps_{}", map_name)
}
