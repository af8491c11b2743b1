// src/detect.rs

//! Trait detection
//!
//! Each trait has its own rule and no rule looks at another rule's result,
//! so the rules can run in any order. A project matching nothing yields the
//! empty set: a plain single-binary Cargo project. Absence of evidence is a
//! negative detection, never an error.

use crate::error::Result;
use crate::project::{BuildSystem, Project, Trait, TraitSet};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Crates whose presence means the project is loaded by another runtime
const EXTENSION_CRATES: &[&str] = &["pyo3", "napi", "rutie", "magnus", "rustler"];

/// Crates that embed web assets into the binary
const ASSET_EMBED_CRATES: &[&str] = &["rust-embed", "include_dir", "static-files"];

/// Features that switch a `-sys` dependency to its bundled C sources
const VENDORING_FEATURES: &[&str] = &["vendored", "bundled", "static"];

/// Directories conventionally holding copied third-party sources
const NATIVE_VENDOR_DIRS: &[&str] = &["vendor", "third_party", "third-party", "deps"];

const NATIVE_SOURCE_EXTENSIONS: &[&str] = &["c", "cc", "cpp", "cxx", "h", "hpp"];

/// Result of running detection on one project
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Detection {
    pub name: String,
    pub version: String,
    pub build_system: BuildSystem,
    pub has_lockfile: bool,
    pub traits: TraitSet,
    /// Human-readable reasons for each detected trait
    pub evidence: BTreeMap<Trait, Vec<String>>,
    /// Recipe parameter values inferred from the tree
    pub suggested: BTreeMap<String, String>,
}

impl Detection {
    /// First piece of evidence recorded for a trait
    pub fn first_evidence(&self, t: Trait) -> Option<&str> {
        self.evidence
            .get(&t)
            .and_then(|e| e.first())
            .map(String::as_str)
    }
}

/// Rule-based trait detector
///
/// Zero-sized; every rule is a pure function of the loaded [`Project`].
#[derive(Debug, Default, Clone, Copy)]
pub struct TraitDetector;

impl TraitDetector {
    pub fn new() -> Self {
        Self
    }

    /// Detect all traits of a loaded project
    pub fn detect(&self, project: &Project) -> Detection {
        let mut traits = TraitSet::new();
        let mut evidence = BTreeMap::new();

        for &t in Trait::all() {
            let found = Self::rule(t)(project);
            if !found.is_empty() {
                debug!("{}: {} ({})", project.name, t, found.join("; "));
                traits.insert(t);
                evidence.insert(t, found);
            }
        }

        info!("Detected traits for {}: {{{}}}", project.name, traits);

        Detection {
            name: project.name.clone(),
            version: project.version.clone(),
            build_system: project.build_system,
            has_lockfile: project.has_lockfile,
            suggested: suggest_parameters(project, &traits),
            traits,
            evidence,
        }
    }

    /// Load a project from disk and detect its traits
    pub fn detect_path(&self, root: &Path, skip_dirs: &[String]) -> Result<Detection> {
        let project = Project::load_with(root, skip_dirs)?;
        Ok(self.detect(&project))
    }

    /// Detect a batch of independent projects in parallel.
    ///
    /// Results are returned in input order.
    pub fn detect_batch(
        &self,
        roots: &[PathBuf],
        skip_dirs: &[String],
    ) -> Vec<(PathBuf, Result<Detection>)> {
        roots
            .par_iter()
            .map(|root| (root.clone(), self.detect_path(root, skip_dirs)))
            .collect()
    }

    fn rule(t: Trait) -> fn(&Project) -> Vec<String> {
        match t {
            Trait::UsesAlternateBuildSystem => detect_alternate_build_system,
            Trait::ProducesSharedLibrary => detect_shared_library,
            Trait::IsWorkspace => detect_workspace,
            Trait::BundlesWebAssets => detect_web_assets,
            Trait::VendorsNativeLibrary => detect_vendored_native,
            Trait::HostsLanguageExtension => detect_language_extension,
        }
    }
}

fn relative(project: &Project, path: &Path) -> String {
    path.strip_prefix(&project.root)
        .unwrap_or(path)
        .display()
        .to_string()
}

fn detect_alternate_build_system(project: &Project) -> Vec<String> {
    match project.build_system {
        BuildSystem::Cargo => Vec::new(),
        other => vec![format!("built with {}", other)],
    }
}

fn detect_shared_library(project: &Project) -> Vec<String> {
    project
        .packages()
        .filter(|m| m.is_shared_library())
        .map(|m| {
            format!(
                "{}: crate-type [{}]",
                relative(project, &m.path),
                m.crate_types.join(", ")
            )
        })
        .collect()
}

fn detect_workspace(project: &Project) -> Vec<String> {
    project
        .root_manifest()
        .filter(|m| m.is_workspace_root())
        .and_then(|m| m.workspace_members.as_ref())
        .map(|members| vec![format!("workspace members: {}", members.join(", "))])
        .unwrap_or_default()
}

fn detect_web_assets(project: &Project) -> Vec<String> {
    let mut found: Vec<String> = project
        .files
        .iter()
        .filter(|p| p.file_name().is_some_and(|n| n == "package.json"))
        .map(|p| p.display().to_string())
        .collect();

    for manifest in &project.manifests {
        for krate in ASSET_EMBED_CRATES {
            if manifest.depends_on(krate) {
                found.push(format!(
                    "{}: depends on {}",
                    relative(project, &manifest.path),
                    krate
                ));
            }
        }
    }
    found
}

fn detect_vendored_native(project: &Project) -> Vec<String> {
    let mut found = Vec::new();

    for manifest in &project.manifests {
        let rel = relative(project, &manifest.path);

        let is_sys_crate = manifest
            .name
            .as_deref()
            .is_some_and(|n| n.ends_with("-sys"));
        if is_sys_crate && manifest.links.is_some() && manifest.has_build_script {
            let dir = manifest.dir();
            let bundles_sources = project
                .files
                .iter()
                .any(|f| is_native_source(f) && owning_dir(project, f) == Some(dir));
            if bundles_sources {
                found.push(format!("{}: -sys crate building bundled sources", rel));
            }
        }

        for dep in &manifest.dependencies {
            if let Some(feature) = dep
                .features
                .iter()
                .find(|f| VENDORING_FEATURES.contains(&f.as_str()))
            {
                found.push(format!("{}: {} with feature '{}'", rel, dep.name, feature));
            }
        }
    }

    for dir in NATIVE_VENDOR_DIRS {
        if let Some(source) = project.files_under(dir).find(|f| is_native_source(f)) {
            found.push(format!("native sources in {}", source.display()));
        }
    }

    found
}

/// Directory of the innermost manifest containing `file`
fn owning_dir<'p>(project: &'p Project, file: &Path) -> Option<&'p Path> {
    let file = project.root.join(file);
    project
        .manifests
        .iter()
        .map(|m| m.dir())
        .filter(|dir| file.starts_with(dir))
        .max_by_key(|dir| dir.components().count())
}

fn detect_language_extension(project: &Project) -> Vec<String> {
    let mut found = Vec::new();

    for manifest in &project.manifests {
        for krate in EXTENSION_CRATES {
            if manifest.depends_on(krate) {
                found.push(format!(
                    "{}: depends on {}",
                    relative(project, &manifest.path),
                    krate
                ));
            }
        }
    }

    if project.build_system == BuildSystem::Maturin {
        found.push("pyproject.toml: maturin build backend".to_string());
    }

    found
}

/// Parameter values the tree itself answers
fn suggest_parameters(project: &Project, traits: &TraitSet) -> BTreeMap<String, String> {
    let mut suggested = BTreeMap::new();
    suggested.insert(
        "BUILDSYSTEM".to_string(),
        project.build_system.debhelper_name().to_string(),
    );

    if traits.contains(Trait::BundlesWebAssets) {
        let asset_dir = project
            .files
            .iter()
            .find(|p| p.file_name().is_some_and(|n| n == "package.json"))
            .and_then(|p| p.parent())
            .map(|dir| {
                if dir.as_os_str().is_empty() {
                    ".".to_string()
                } else {
                    dir.display().to_string()
                }
            });
        if let Some(dir) = asset_dir {
            suggested.insert("ASSET_DIR".to_string(), dir);
        }
    }

    if traits.contains(Trait::VendorsNativeLibrary) {
        let vendored = NATIVE_VENDOR_DIRS.iter().find_map(|dir| {
            project
                .files_under(dir)
                .find(|f| is_native_source(f))
                .map(|f| f.components().take(2).collect::<PathBuf>())
        });
        if let Some(dir) = vendored {
            suggested.insert("NATIVE_VENDOR_DIR".to_string(), dir.display().to_string());
        }
    }

    if traits.contains(Trait::HostsLanguageExtension) {
        let module = project.name.replace('-', "_");
        suggested.insert("PYBUILD_NAME".to_string(), module.clone());
        suggested.insert("PYBUILD_DIR".to_string(), module);
    }

    suggested
}

fn is_native_source(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| NATIVE_SOURCE_EXTENSIONS.contains(&e))
}
