//! Artifact generation
//!
//! Writes the background descriptor and the rendered sources of a compiled
//! map into a build directory laid out as `graphics/`, `include/` and `src/`.

use std::fs;
use std::path::PathBuf;
use tracing::debug;

use crate::background::BackgroundDescriptor;
use crate::layout::MapLayout;
use crate::render::{OutputDir, Renderer, Target};
use crate::CodegenError;

/// Configuration for code generation
#[derive(Debug, Clone)]
pub struct CodegenConfig {
    /// Build directory receiving `graphics/`, `include/` and `src/`
    pub build_dir: PathBuf,

    /// Target language of the generated sources
    pub target: Target,
}

impl CodegenConfig {
    /// Create a new config generating C++ into `build_dir`
    pub fn new(build_dir: impl Into<PathBuf>) -> Self {
        Self {
            build_dir: build_dir.into(),
            target: Target::default(),
        }
    }

    /// Set the target language
    pub fn with_target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    /// Path of a file in one of the output directories
    pub fn output_path(&self, dir: OutputDir, file_name: &str) -> PathBuf {
        dir.path(&self.build_dir).join(file_name)
    }

    /// Path of the background image of a map
    pub fn image_path(&self, map_name: &str) -> PathBuf {
        self.output_path(OutputDir::Graphics, &format!("{}.bmp", map_name))
    }

    /// Path of the background descriptor of a map
    pub fn background_descriptor_path(&self, map_name: &str) -> PathBuf {
        self.output_path(OutputDir::Graphics, &format!("{}.json", map_name))
    }

    /// Create the output directories if they don't exist
    pub fn create_dirs(&self) -> Result<(), CodegenError> {
        for dir in OutputDir::ALL {
            fs::create_dir_all(dir.path(&self.build_dir))?;
        }
        Ok(())
    }
}

impl Default for CodegenConfig {
    fn default() -> Self {
        Self::new("build")
    }
}

/// Result of code generation
#[derive(Debug, Clone, Default)]
pub struct CodegenResult {
    /// Files that were generated
    pub generated_files: Vec<PathBuf>,
}

impl CodegenResult {
    fn add_file(&mut self, path: PathBuf) {
        debug!("Wrote {}", path.display());
        self.generated_files.push(path);
    }
}

/// Every file produced for a map: image, background descriptor and sources
pub fn output_paths(
    map_name: &str,
    renderer: &dyn Renderer,
    config: &CodegenConfig,
) -> Vec<PathBuf> {
    let mut paths = vec![
        config.image_path(map_name),
        config.background_descriptor_path(map_name),
    ];
    paths.extend(
        renderer
            .outputs(map_name)
            .into_iter()
            .map(|(dir, file_name)| config.output_path(dir, &file_name)),
    );
    paths
}

/// Write the background descriptor and rendered sources of a map
///
/// The background image itself is written by the image composer.
pub fn generate_map(
    layout: &MapLayout,
    renderer: &dyn Renderer,
    config: &CodegenConfig,
) -> Result<CodegenResult, CodegenError> {
    let mut result = CodegenResult::default();

    config.create_dirs()?;

    let descriptor = BackgroundDescriptor::for_layout(layout);
    let path = config.background_descriptor_path(&layout.name);
    fs::write(&path, descriptor.to_json()?)?;
    result.add_file(path);

    for artifact in renderer.render(layout)? {
        let path = config.output_path(artifact.dir, &artifact.file_name);
        fs::write(&path, &artifact.contents)?;
        result.add_file(path);
    }

    Ok(result)
}
