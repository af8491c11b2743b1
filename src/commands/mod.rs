// src/commands/mod.rs
//! Command handlers for the debcook CLI

mod detect;
mod recipes;
mod render;
mod select;
mod vendor;

pub use detect::cmd_detect;
pub use recipes::cmd_recipes;
pub use render::{cmd_render, RenderOptions};
pub use select::cmd_select;
pub use vendor::{cmd_vendor, VendorOptions};

use anyhow::{Context, Result};
use debcook::{Config, Detection, Registry, TraitDetector, TraitSet};
use std::path::{Path, PathBuf};

/// Built-in recipes, then the config's recipe files, then the command line's
pub(crate) fn load_registry(config: &Config, extra: &[PathBuf]) -> Result<Registry> {
    let files: Vec<&PathBuf> = config.recipes.iter().chain(extra.iter()).collect();
    Registry::with_files(&files).context("Failed to load recipe files")
}

/// Detect a single project with the configured skip list
pub(crate) fn detect_project(config: &Config, path: &Path) -> Result<Detection> {
    TraitDetector::new()
        .detect_path(path, &config.detect.skip_dirs)
        .with_context(|| format!("Failed to inspect project: {}", path.display()))
}

/// Parse an operator-supplied trait list
pub(crate) fn parse_traits(list: &str) -> Result<TraitSet> {
    TraitSet::parse_list(list).with_context(|| format!("Invalid trait list: {}", list))
}
