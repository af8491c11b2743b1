// src/commands/detect.rs

//! Detect command - report packaging traits

use anyhow::{bail, Result};
use debcook::{Config, Detection, TraitDetector};
use std::path::{Path, PathBuf};
use tracing::error;

/// Detect traits for each project, in parallel
///
/// Every project is reported even if another one fails; the command fails
/// afterwards if any did.
pub fn cmd_detect(config: &Config, paths: &[PathBuf], json: bool) -> Result<()> {
    let results = TraitDetector::new().detect_batch(paths, &config.detect.skip_dirs);

    let mut failures = 0;
    let mut detections = Vec::new();
    for (path, result) in results {
        match result {
            Ok(detection) => detections.push((path, detection)),
            Err(e) => {
                error!("{}: {}", path.display(), e);
                failures += 1;
            }
        }
    }

    if json {
        let report: Vec<&Detection> = detections.iter().map(|(_, d)| d).collect();
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for (path, detection) in &detections {
            print_detection(path, detection);
        }
    }

    if failures > 0 {
        bail!("{} of {} project(s) could not be inspected", failures, paths.len());
    }
    Ok(())
}

fn print_detection(path: &Path, detection: &Detection) {
    println!("{} ({})", path.display(), detection.name);
    println!("  Version: {}", detection.version);
    println!("  Build system: {}", detection.build_system);
    println!(
        "  Lockfile: {}",
        if detection.has_lockfile { "yes" } else { "no" }
    );

    if detection.traits.is_empty() {
        println!("  Traits: none (plain single-binary package)");
    } else {
        println!("  Traits:");
        for (t, reasons) in &detection.evidence {
            println!("    {}", t);
            for reason in reasons {
                println!("      - {}", reason);
            }
        }
    }
    println!();
}
