// src/commands/vendor.rs

//! Vendor command - build the offline dependency bundle

use super::detect_project;
use anyhow::{Context, Result};
use debcook::vendor::Lockfile;
use debcook::{Config, VendorBundle, VendorFilter};
use std::path::{Path, PathBuf};

pub struct VendorOptions {
    pub vendor_dir: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub target: Option<String>,
    pub version: Option<String>,
}

pub fn cmd_vendor(config: &Config, path: &Path, options: &VendorOptions) -> Result<()> {
    let detection = detect_project(config, path)?;
    if !detection.has_lockfile {
        anyhow::bail!(
            "{} has no Cargo.lock; run `cargo generate-lockfile` first",
            path.display()
        );
    }

    let lockfile_path = path.join("Cargo.lock");
    let lockfile = Lockfile::load(&lockfile_path)
        .with_context(|| format!("Failed to read {}", lockfile_path.display()))?;

    let vendor_dir = options
        .vendor_dir
        .clone()
        .unwrap_or_else(|| path.join("vendor"));
    let target = options.target.as_deref().unwrap_or(&config.host_rust_type);
    let filter = VendorFilter::for_target(target, &config.vendor.exclude);
    let version = options.version.as_deref().unwrap_or(&detection.version);

    let bundle = VendorBundle::create(
        &detection.name,
        version,
        &lockfile,
        &vendor_dir,
        &options.output_dir,
        &filter,
    )?;

    println!("Created vendor bundle: {}", bundle.path.display());
    println!("  Target: {}", bundle.manifest.target);
    println!("  Crates: {}", bundle.manifest.crates.len());
    if !bundle.manifest.excluded.is_empty() {
        println!("  Excluded: {}", bundle.manifest.excluded.join(", "));
    }
    println!("  SHA-256: {}", bundle.sha256);

    Ok(())
}
