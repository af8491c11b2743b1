// src/project/manifest.rs

//! Cargo manifest reading
//!
//! Only the handful of keys that matter for packaging are extracted.
//! Everything else in `Cargo.toml` is ignored.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Raw manifest layout, deserialized leniently
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RawManifest {
    #[serde(default)]
    package: Option<RawPackage>,
    #[serde(default)]
    workspace: Option<RawWorkspace>,
    #[serde(default)]
    lib: Option<RawLib>,
    #[serde(default)]
    dependencies: BTreeMap<String, toml::Value>,
    #[serde(default)]
    build_dependencies: BTreeMap<String, toml::Value>,
    #[serde(default)]
    target: BTreeMap<String, RawTarget>,
}

#[derive(Debug, Default, Deserialize)]
struct RawPackage {
    name: Option<String>,
    version: Option<toml::Value>,
    links: Option<String>,
    build: Option<toml::Value>,
}

#[derive(Debug, Default, Deserialize)]
struct RawWorkspace {
    #[serde(default)]
    members: Vec<String>,
    #[serde(default)]
    package: Option<RawWorkspacePackage>,
}

#[derive(Debug, Default, Deserialize)]
struct RawWorkspacePackage {
    version: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RawLib {
    #[serde(default)]
    crate_type: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawTarget {
    #[serde(default)]
    dependencies: BTreeMap<String, toml::Value>,
}

/// A dependency as declared in a manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    /// Name of the crate on the registry (honours `package = "..."` renames)
    pub name: String,
    /// Features explicitly enabled
    pub features: Vec<String>,
}

/// The packaging-relevant view of one `Cargo.toml`
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    /// Path of the manifest file
    pub path: PathBuf,
    /// `[package] name`, absent for virtual workspace roots
    pub name: Option<String>,
    /// Literal `[package] version`; `None` when inherited or absent
    pub version: Option<String>,
    /// Version inherited by members from `[workspace.package]`
    pub workspace_version: Option<String>,
    /// `[workspace] members`, if this manifest declares a workspace
    pub workspace_members: Option<Vec<String>>,
    /// `[lib] crate-type`
    pub crate_types: Vec<String>,
    /// `[package] links`
    pub links: Option<String>,
    /// Package has a build script
    pub has_build_script: bool,
    /// Normal, build and target-specific dependencies
    pub dependencies: Vec<Dependency>,
}

impl Manifest {
    /// Parse a manifest from its TOML text
    pub fn parse(path: &Path, content: &str) -> Result<Self> {
        let raw: RawManifest = toml::from_str(content).map_err(|e| Error::Manifest {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let package = raw.package.unwrap_or_default();
        let version = match package.version {
            Some(toml::Value::String(v)) => Some(v),
            _ => None,
        };

        let has_build_script = match package.build {
            Some(toml::Value::Boolean(enabled)) => enabled,
            Some(toml::Value::String(_)) => true,
            _ => path.parent().is_some_and(|dir| dir.join("build.rs").is_file()),
        };

        let mut dependencies = Vec::new();
        let target_deps = raw.target.values().flat_map(|t| t.dependencies.iter());
        for (key, value) in raw
            .dependencies
            .iter()
            .chain(raw.build_dependencies.iter())
            .chain(target_deps)
        {
            dependencies.push(parse_dependency(key, value));
        }

        let (workspace_members, workspace_version) = match raw.workspace {
            Some(ws) => (Some(ws.members), ws.package.and_then(|p| p.version)),
            None => (None, None),
        };

        Ok(Self {
            path: path.to_path_buf(),
            name: package.name,
            version,
            workspace_version,
            workspace_members,
            crate_types: raw.lib.map(|l| l.crate_type).unwrap_or_default(),
            links: package.links,
            has_build_script,
            dependencies,
        })
    }

    /// Read and parse a manifest file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(path, &content)
    }

    /// Directory containing the manifest
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }

    /// Does this manifest declare a non-empty workspace?
    pub fn is_workspace_root(&self) -> bool {
        self.workspace_members
            .as_ref()
            .is_some_and(|members| !members.is_empty())
    }

    /// Does the library target produce a shared object?
    pub fn is_shared_library(&self) -> bool {
        self.crate_types
            .iter()
            .any(|t| t == "cdylib" || t == "dylib")
    }

    /// Look up a dependency by registry name
    pub fn dependency(&self, name: &str) -> Option<&Dependency> {
        self.dependencies.iter().find(|d| d.name == name)
    }

    pub fn depends_on(&self, name: &str) -> bool {
        self.dependency(name).is_some()
    }
}

fn parse_dependency(key: &str, value: &toml::Value) -> Dependency {
    let table = value.as_table();
    let name = table
        .and_then(|t| t.get("package"))
        .and_then(|v| v.as_str())
        .unwrap_or(key)
        .to_string();
    let features = table
        .and_then(|t| t.get("features"))
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|f| f.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();

    Dependency { name, features }
}
