// src/commands/render.rs

//! Render command - produce debian/rules for a project

use super::{detect_project, load_registry, parse_traits};
use anyhow::{Context, Result};
use debcook::{render_rules, select, Config, Parameters};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Operator overrides for the render command
#[derive(Debug, Default)]
pub struct RenderOptions {
    pub crate_name: Option<String>,
    pub version: Option<String>,
    pub host_triple: Option<String>,
    pub multiarch: Option<String>,
    pub destdir: Option<String>,
    pub traits: Option<String>,
    pub assignments: Vec<String>,
    pub recipes: Vec<PathBuf>,
    pub output: Option<PathBuf>,
}

pub fn cmd_render(config: &Config, path: &Path, options: &RenderOptions) -> Result<()> {
    let registry = load_registry(config, &options.recipes)?;
    let detection = detect_project(config, path)?;

    let traits = match &options.traits {
        Some(list) => parse_traits(list)?,
        None => detection.traits.clone(),
    };
    let selection = select(&registry, &traits)?;

    let crate_name = options.crate_name.as_deref().unwrap_or(&detection.name);
    let version = options.version.as_deref().unwrap_or(&detection.version);

    let mut params = Parameters::for_crate(crate_name, version)
        .with_host(
            options
                .host_triple
                .as_deref()
                .unwrap_or(&config.host_rust_type),
            options
                .multiarch
                .as_deref()
                .unwrap_or(&config.host_multiarch),
        )
        .with("CARGO_HOME", &config.cargo_home);
    if let Some(destdir) = &options.destdir {
        params = params.with_destdir(destdir);
    }
    for assignment in &options.assignments {
        params.set_assignment(assignment)?;
    }
    params.extend_defaults(&detection.suggested);
    for (key, value) in params.iter() {
        debug!("{} = {}", key, value);
    }

    let rules = render_rules(&selection, &params)?;

    match &options.output {
        Some(output) => {
            fs::write(output, &rules)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            make_executable(output)?;
            info!("Wrote {}", output.display());
            println!(
                "Rendered {} fragment(s) for {} {} to {}",
                selection.fragments.len(),
                crate_name,
                version,
                output.display()
            );
        }
        None => print!("{}", rules),
    }

    Ok(())
}

/// debian/rules must be executable
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(perms.mode() | 0o755);
    fs::set_permissions(path, perms)
        .with_context(|| format!("Failed to set permissions on {}", path.display()))
}
