//! Build configuration
//!
//! Settings come from an optional `bntmx.toml`:
//!
//! ```toml
//! target = "rust"
//! jobs = 4
//! ```
//!
//! Command line flags override the file.

use anyhow::{Context, Result};
use bntmx_codegen::Target;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Name of the configuration file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "bntmx.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Language of the generated sources
    pub target: Target,
    /// Maps converted concurrently
    pub jobs: usize,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            target: Target::default(),
            jobs: 1,
        }
    }
}

impl BuildConfig {
    /// Read a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        debug!("Loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Read `path` if given, else `bntmx.toml` when present, else defaults
    pub fn discover(path: Option<&Path>) -> Result<Self> {
        let default_path = Path::new(CONFIG_FILE_NAME);
        match path {
            Some(path) => Self::load(path),
            None if default_path.is_file() => Self::load(default_path),
            None => Ok(Self::default()),
        }
    }

    /// Apply command line overrides
    pub fn with_overrides(mut self, target: Option<Target>, jobs: Option<usize>) -> Self {
        if let Some(target) = target {
            self.target = target;
        }
        if let Some(jobs) = jobs {
            self.jobs = jobs;
        }
        self.jobs = self.jobs.max(1);
        self
    }
}
