//! Batch conversion
//!
//! Every map is converted independently: a failing map is reported and the
//! remaining maps are still converted.

use anyhow::{anyhow, Context, Result};
use bntmx_codegen::{compile, generate_map, output_paths, renderer_for, CodegenConfig, Target};
use bntmx_core::MapDescriptor;
use bntmx_tiled::{background_color, compose_background, load_map, IndexedImage};
use rayon::prelude::*;
use std::collections::HashMap;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use crate::stale::is_up_to_date;

/// What to convert and where
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub build_dir: PathBuf,
    pub maps_dirs: Vec<PathBuf>,
    pub target: Target,
    /// Maps converted concurrently, 1 converts sequentially
    pub jobs: usize,
    /// Convert maps even when their outputs are up to date
    pub force: bool,
}

impl BatchOptions {
    pub fn new(build_dir: impl Into<PathBuf>, maps_dirs: Vec<PathBuf>) -> Self {
        Self {
            build_dir: build_dir.into(),
            maps_dirs,
            target: Target::default(),
            jobs: 1,
            force: false,
        }
    }

    pub fn with_target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    fn codegen_config(&self) -> CodegenConfig {
        CodegenConfig::new(&self.build_dir).with_target(self.target)
    }
}

/// Result of a single map conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapOutcome {
    /// Outputs were written
    Converted(Vec<PathBuf>),
    /// Outputs were newer than every input
    UpToDate,
}

#[derive(Debug)]
pub struct MapReport {
    pub map: PathBuf,
    pub outcome: Result<MapOutcome>,
}

/// Per-map results, in the order the maps were found
#[derive(Debug, Default)]
pub struct BatchReport {
    pub maps: Vec<MapReport>,
}

impl BatchReport {
    pub fn converted(&self) -> usize {
        self.count(|outcome| matches!(outcome, Ok(MapOutcome::Converted(_))))
    }

    pub fn up_to_date(&self) -> usize {
        self.count(|outcome| matches!(outcome, Ok(MapOutcome::UpToDate)))
    }

    pub fn failed(&self) -> usize {
        self.count(Result::is_err)
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    fn count(&self, predicate: impl Fn(&Result<MapOutcome>) -> bool) -> usize {
        self.maps
            .iter()
            .filter(|report| predicate(&report.outcome))
            .count()
    }
}

/// `*.tmx` files directly inside `dir`, sorted by file name
pub fn find_maps(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read maps directory {}", dir.display()))?;

    let mut maps = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|extension| extension == "tmx") {
            maps.push(path);
        }
    }
    maps.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(maps)
}

/// Convert one map, unless its outputs are up to date and `force` is unset
pub fn convert_map(map_path: &Path, config: &CodegenConfig, force: bool) -> Result<MapOutcome> {
    let loaded = load_map(map_path)
        .with_context(|| format!("Failed to load map {}", map_path.display()))?;
    let name = loaded.source.name.clone();
    let renderer = renderer_for(config.target);

    let mut inputs = vec![
        map_path.to_path_buf(),
        MapDescriptor::companion_path(map_path),
    ];
    inputs.extend(loaded.source.dependencies.iter().cloned());
    let outputs = output_paths(&name, renderer.as_ref(), config);

    if !force && is_up_to_date(&inputs, &outputs) {
        return Ok(MapOutcome::UpToDate);
    }

    let layout =
        compile(&loaded.source).with_context(|| format!("Failed to compile map '{}'", name))?;

    let image = compose_background(&loaded, &layout.canvas)
        .with_context(|| format!("Failed to compose background of '{}'", name))?;
    let indexed = IndexedImage::quantize(&image, background_color(&loaded));

    config.create_dirs()?;
    let image_path = config.image_path(&name);
    indexed
        .save_bmp(&image_path)
        .with_context(|| format!("Failed to write {}", image_path.display()))?;

    let result = generate_map(&layout, renderer.as_ref(), config)
        .with_context(|| format!("Failed to generate sources of '{}'", name))?;

    let mut files = vec![image_path];
    files.extend(result.generated_files);
    Ok(MapOutcome::Converted(files))
}

/// Maps sharing a file name with another map, by file stem
///
/// Outputs are named after the file stem, so such maps would overwrite each
/// other's outputs.
fn shared_names(maps: &[PathBuf]) -> HashMap<&OsStr, Vec<&Path>> {
    let mut by_name: HashMap<&OsStr, Vec<&Path>> = HashMap::new();
    for map in maps {
        if let Some(stem) = map.file_stem() {
            by_name.entry(stem).or_default().push(map);
        }
    }
    by_name.retain(|_, paths| paths.len() > 1);
    by_name
}

/// Convert every map of every maps directory
///
/// Only an unreadable maps directory or a thread pool failure aborts the
/// batch; map failures are collected in the report. Maps sharing a name
/// are all reported as failed and left unconverted.
pub fn run(options: &BatchOptions) -> Result<BatchReport> {
    let mut maps = Vec::new();
    for dir in &options.maps_dirs {
        maps.extend(find_maps(dir)?);
    }
    info!("Found {} maps", maps.len());

    let shared = shared_names(&maps);
    let config = options.codegen_config();
    let convert = |map: &PathBuf| match map.file_stem().and_then(|stem| shared.get(stem)) {
        Some(paths) => name_conflict(map, paths),
        None => convert_and_log(map, &config, options.force),
    };

    let reports: Vec<MapReport> = if options.jobs > 1 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(options.jobs)
            .build()
            .context("Failed to create thread pool")?;
        pool.install(|| maps.par_iter().map(convert).collect())
    } else {
        maps.iter().map(convert).collect()
    };

    Ok(BatchReport { maps: reports })
}

fn name_conflict(map: &Path, paths: &[&Path]) -> MapReport {
    let others: Vec<String> = paths
        .iter()
        .filter(|path| **path != map)
        .map(|path| path.display().to_string())
        .collect();
    let e = anyhow!(
        "Map {} has the same name as {}",
        map.display(),
        others.join(", ")
    );
    error!("{:#}", e);
    MapReport {
        map: map.to_path_buf(),
        outcome: Err(e),
    }
}

fn convert_and_log(map: &Path, config: &CodegenConfig, force: bool) -> MapReport {
    let outcome = convert_map(map, config, force);
    match &outcome {
        Ok(MapOutcome::Converted(files)) => {
            info!("Converted {} ({} files)", map.display(), files.len())
        }
        Ok(MapOutcome::UpToDate) => debug!("{} is up to date", map.display()),
        Err(e) => error!("{:#}", e),
    }
    MapReport {
        map: map.to_path_buf(),
        outcome,
    }
}
