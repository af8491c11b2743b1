// src/project/mod.rs

//! Upstream project model
//!
//! A [`Project`] is a read-only snapshot of an upstream source tree taken
//! once at load time: the declared build system, the parsed Cargo manifests,
//! whether a lockfile is present, and an index of relative file paths.
//! Trait detection works entirely from this snapshot, so detecting twice on
//! an unmodified tree always yields the same result.

mod manifest;
mod traits;

pub use manifest::{Dependency, Manifest};
pub use traits::{Trait, TraitSet};

use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Directories never descended into when indexing a project
pub const DEFAULT_SKIP_DIRS: &[&str] = &["target", ".git", "node_modules", ".cargo", "debian"];

/// The build system a project declares at its root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildSystem {
    Cargo,
    Make,
    Meson,
    CMake,
    /// Python package built through maturin
    Maturin,
    /// Python package built through setuptools-rust
    Setuptools,
}

impl BuildSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cargo => "cargo",
            Self::Make => "make",
            Self::Meson => "meson",
            Self::CMake => "cmake",
            Self::Maturin => "maturin",
            Self::Setuptools => "setuptools",
        }
    }

    /// Name of the matching debhelper build system
    pub fn debhelper_name(&self) -> &'static str {
        match self {
            Self::Cargo => "cargo",
            Self::Make => "makefile",
            Self::Meson => "meson",
            Self::CMake => "cmake",
            Self::Maturin | Self::Setuptools => "pybuild",
        }
    }

    /// Determine the build system from the files at a project root.
    ///
    /// Order matters: a Python package or meson project commonly carries a
    /// `Cargo.toml` as well, and the outer build system is the one that
    /// drives the build.
    fn resolve(root: &Path, pyproject: Option<&str>) -> Option<Self> {
        if pyproject.is_some_and(uses_maturin_backend) {
            return Some(Self::Maturin);
        }
        if root.join("meson.build").is_file() {
            return Some(Self::Meson);
        }
        if root.join("CMakeLists.txt").is_file() {
            return Some(Self::CMake);
        }
        if root.join("Makefile").is_file() || root.join("GNUmakefile").is_file() {
            return Some(Self::Make);
        }
        if root.join("setup.py").is_file() {
            return Some(Self::Setuptools);
        }
        if root.join("Cargo.toml").is_file() {
            return Some(Self::Cargo);
        }
        None
    }
}

impl fmt::Display for BuildSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Does a `pyproject.toml` select the maturin build backend?
pub(crate) fn uses_maturin_backend(pyproject: &str) -> bool {
    let Ok(value) = pyproject.parse::<toml::Table>() else {
        return false;
    };
    value
        .get("build-system")
        .and_then(|b| b.get("build-backend"))
        .and_then(|b| b.as_str())
        .is_some_and(|backend| backend.starts_with("maturin"))
}

/// Snapshot of an upstream source tree
#[derive(Debug, Clone)]
pub struct Project {
    /// Root of the tree
    pub root: PathBuf,
    /// Build system declared at the root
    pub build_system: BuildSystem,
    /// `Cargo.lock` present at the root
    pub has_lockfile: bool,
    /// Package name
    pub name: String,
    /// Package version
    pub version: String,
    /// Every Cargo manifest in the tree, root first
    pub manifests: Vec<Manifest>,
    /// Root `pyproject.toml`, if any
    pub pyproject: Option<String>,
    /// Relative paths of all indexed files, sorted
    pub files: Vec<PathBuf>,
}

impl Project {
    /// Load a project using the default skip list
    pub fn load(root: &Path) -> Result<Self> {
        Self::load_with(root, DEFAULT_SKIP_DIRS)
    }

    /// Load a project, never descending into directories named in `skip_dirs`
    pub fn load_with<S: AsRef<str>>(root: &Path, skip_dirs: &[S]) -> Result<Self> {
        if !root.is_dir() {
            return Err(Error::NotAProject(root.to_path_buf()));
        }

        let files = index_files(root, skip_dirs);
        debug!("Indexed {} files under {}", files.len(), root.display());

        let pyproject = std::fs::read_to_string(root.join("pyproject.toml")).ok();

        let mut manifests = Vec::new();
        for rel in files
            .iter()
            .filter(|p| p.ends_with("Cargo.toml") && !p.starts_with("vendor"))
        {
            match Manifest::load(&root.join(rel)) {
                Ok(manifest) => manifests.push(manifest),
                // A broken root manifest is fatal, nested ones are often fixtures
                Err(e) if rel.as_path() == Path::new("Cargo.toml") => return Err(e),
                Err(e) => warn!("Skipping {}: {}", rel.display(), e),
            }
        }
        // Root manifest first, the rest in path order
        manifests.sort_by_key(|m| m.path != root.join("Cargo.toml"));

        let build_system = match BuildSystem::resolve(root, pyproject.as_deref()) {
            Some(bs) => bs,
            None if !manifests.is_empty() => BuildSystem::Cargo,
            None => return Err(Error::NotAProject(root.to_path_buf())),
        };
        if manifests.is_empty() {
            warn!(
                "{} has no Cargo.toml; packaging as a {} project",
                root.display(),
                build_system
            );
        }

        let (name, version) = package_identity(root, &manifests);

        Ok(Self {
            root: root.to_path_buf(),
            build_system,
            has_lockfile: root.join("Cargo.lock").is_file(),
            name,
            version,
            manifests,
            pyproject,
            files,
        })
    }

    /// The manifest at the project root, if any
    pub fn root_manifest(&self) -> Option<&Manifest> {
        self.manifests
            .first()
            .filter(|m| m.path == self.root.join("Cargo.toml"))
    }

    /// Manifests that describe actual packages (not virtual roots)
    pub fn packages(&self) -> impl Iterator<Item = &Manifest> {
        self.manifests.iter().filter(|m| m.name.is_some())
    }

    /// Indexed files below a top-level directory
    pub fn files_under<'a>(&'a self, dir: &'a str) -> impl Iterator<Item = &'a PathBuf> + 'a {
        self.files.iter().filter(move |p| p.starts_with(dir))
    }
}

fn index_files<S: AsRef<str>>(root: &Path, skip_dirs: &[S]) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || !entry.file_type().is_dir()
                || !(skip_dirs
                    .iter()
                    .any(|skip| entry.file_name() == skip.as_ref())
                    || is_vendored_crate(entry.path()))
        })
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.path().strip_prefix(root).ok().map(Path::to_path_buf))
        .collect();
    files.sort();
    files
}

/// A crate copied in by `cargo vendor` carries `.cargo-checksum.json`.
/// Its sources belong to a dependency, not to the project.
fn is_vendored_crate(dir: &Path) -> bool {
    dir.join(".cargo-checksum.json").is_file()
}

/// Work out the package name and version.
///
/// A regular package uses its own `[package]`. A virtual workspace uses the
/// first member that declares a name, with the version from
/// `[workspace.package]` when members inherit it. Falls back to the
/// directory name and `0.0.0`.
fn package_identity(root: &Path, manifests: &[Manifest]) -> (String, String) {
    let root_manifest = manifests
        .first()
        .filter(|m| m.path == root.join("Cargo.toml"));
    let workspace_version = root_manifest.and_then(|m| m.workspace_version.clone());

    let named = root_manifest
        .filter(|m| m.name.is_some())
        .or_else(|| manifests.iter().find(|m| m.name.is_some()));

    let fallback_name = root
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    let name = named
        .and_then(|m| m.name.clone())
        .unwrap_or(fallback_name);
    let version = named
        .and_then(|m| m.version.clone())
        .or(workspace_version)
        .unwrap_or_else(|| "0.0.0".to_string());

    (name, version)
}
