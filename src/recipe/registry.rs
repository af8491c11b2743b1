// src/recipe/registry.rs

//! Recipe fragment registry
//!
//! Holds fragments in registration order. Registration order is the
//! tie-break between fragments of the same kind that write the same target:
//! the later one wins.

use crate::error::{Error, Result};
use crate::project::{Trait, TraitSet};
use crate::recipe::format::{Fragment, FragmentKind, RecipeFile, RuleTarget};
use std::path::Path;
use tracing::{debug, info};

/// Id of the fragment used when a project has no traits
pub const DEFAULT_FRAGMENT: &str = "cargo-binary";

#[derive(Debug, Clone, Default)]
pub struct Registry {
    fragments: Vec<Fragment>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in fragment catalogue
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for fragment in builtin_fragments() {
            registry.register(fragment);
        }
        registry
    }

    /// Built-in catalogue plus the fragments from each recipe file, in order
    pub fn with_files<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let mut registry = Self::builtin();
        for path in paths {
            registry.load_file(path.as_ref())?;
        }
        Ok(registry)
    }

    /// Register a fragment.
    ///
    /// A fragment whose id is already registered replaces the old one in
    /// place and keeps its registration position.
    pub fn register(&mut self, fragment: Fragment) {
        match self.fragments.iter_mut().find(|f| f.id == fragment.id) {
            Some(existing) => {
                debug!("Replacing fragment '{}'", fragment.id);
                *existing = fragment;
            }
            None => self.fragments.push(fragment),
        }
    }

    /// Register every fragment from a TOML recipe file
    pub fn load_file(&mut self, path: &Path) -> Result<usize> {
        let content = std::fs::read_to_string(path)?;
        let count = self.load_str(&content).map_err(|message| Error::Recipe {
            path: path.to_path_buf(),
            message,
        })?;
        info!("Loaded {} fragment(s) from {}", count, path.display());
        Ok(count)
    }

    fn load_str(&mut self, content: &str) -> std::result::Result<usize, String> {
        let file: RecipeFile = toml::from_str(content).map_err(|e| e.to_string())?;
        for fragment in &file.fragments {
            validate_fragment(fragment)?;
        }
        let count = file.fragments.len();
        for fragment in file.fragments {
            self.register(fragment);
        }
        Ok(count)
    }

    pub fn get(&self, id: &str) -> Option<&Fragment> {
        self.fragments.iter().find(|f| f.id == id)
    }

    /// Registration position of a fragment
    pub fn position(&self, id: &str) -> Option<usize> {
        self.fragments.iter().position(|f| f.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Fragment> {
        self.fragments.iter()
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

fn validate_fragment(fragment: &Fragment) -> std::result::Result<(), String> {
    if fragment.id.trim().is_empty() {
        return Err("fragment id cannot be empty".to_string());
    }
    if fragment.template.trim().is_empty() {
        return Err(format!("fragment '{}' has an empty template", fragment.id));
    }
    if let Some(target) = fragment.target {
        let header = format!("{}:", target.rule_name());
        if !fragment.template.contains(&header) {
            return Err(format!(
                "fragment '{}' targets {} but its template has no '{}' rule",
                fragment.id, target, header
            ));
        }
    }
    Ok(())
}

fn builtin_fragments() -> Vec<Fragment> {
    use Trait::*;

    let all = TraitSet::full();

    vec![
        Fragment::new(
            DEFAULT_FRAGMENT,
            TraitSet::new(),
            Some(RuleTarget::Install),
            FragmentKind::Default,
        )
        .with_coexists(all.clone())
        .with_summary("Install the single binary of a plain Cargo package")
        .with_template(concat!(
            "override_dh_auto_install:\n",
            "\tcargo install --offline --locked --path . --target %(DEB_HOST_RUST_TYPE)s --root %(DESTDIR)s/usr\n",
            "\trm -f %(DESTDIR)s/usr/.crates.toml %(DESTDIR)s/usr/.crates2.json\n",
        )),
        Fragment::new(
            "alternate-build-system",
            TraitSet::from([UsesAlternateBuildSystem]),
            Some(RuleTarget::Sequencer),
            FragmentKind::Environment,
        )
        .with_coexists(all.clone())
        .with_summary("Drive the build through the upstream build system instead of Cargo")
        .with_template(concat!("%:\n", "\tdh $@ --buildsystem=%(BUILDSYSTEM)s\n")),
        Fragment::new(
            "vendored-native",
            TraitSet::from([VendorsNativeLibrary]),
            Some(RuleTarget::Configure),
            FragmentKind::Environment,
        )
        .with_coexists(all)
        .with_summary("Drop bundled C sources and link the system library through pkg-config")
        .with_template(concat!(
            "export PKG_CONFIG_ALLOW_CROSS = 1\n",
            "\n",
            "override_dh_auto_configure:\n",
            "\trm -rf %(NATIVE_VENDOR_DIR)s\n",
            "\tdh_auto_configure\n",
        )),
        Fragment::new(
            "workspace-binary",
            TraitSet::from([IsWorkspace]),
            Some(RuleTarget::Install),
            FragmentKind::Binary,
        )
        .with_coexists(TraitSet::from([
            ProducesSharedLibrary,
            BundlesWebAssets,
            HostsLanguageExtension,
        ]))
        .with_summary("Install one binary built from a workspace member")
        .with_template(concat!(
            "override_dh_auto_install:\n",
            "\tinstall -D -m 0755 target/%(DEB_HOST_RUST_TYPE)s/release/%(CRATE)s %(DESTDIR)s/usr/bin/%(CRATE)s\n",
        )),
        Fragment::new(
            "workspace-build",
            TraitSet::from([IsWorkspace]),
            Some(RuleTarget::Build),
            FragmentKind::Binary,
        )
        .with_coexists(TraitSet::from([
            ProducesSharedLibrary,
            BundlesWebAssets,
            HostsLanguageExtension,
        ]))
        .with_summary("Build every workspace member offline")
        .with_template(concat!(
            "override_dh_auto_build:\n",
            "\tcargo build --release --offline --locked --workspace --target %(DEB_HOST_RUST_TYPE)s\n",
        )),
        Fragment::new(
            "shared-library",
            TraitSet::from([ProducesSharedLibrary]),
            Some(RuleTarget::Install),
            FragmentKind::Library,
        )
        .with_coexists(TraitSet::from([IsWorkspace, BundlesWebAssets, HostsLanguageExtension]))
        .with_summary("Install a cdylib into the multiarch library directory")
        .with_template(concat!(
            "override_dh_auto_install:\n",
            "\tinstall -D -m 0644 target/%(DEB_HOST_RUST_TYPE)s/release/lib%(LIB_NAME)s.so %(DESTDIR)s/usr/lib/%(DEB_HOST_MULTIARCH)s/lib%(LIB_NAME)s.so\n",
        )),
        Fragment::new(
            "web-assets",
            TraitSet::from([BundlesWebAssets]),
            Some(RuleTarget::Build),
            FragmentKind::Binary,
        )
        .with_coexists(TraitSet::from([ProducesSharedLibrary]))
        .with_summary("Build bundled web assets offline before compiling")
        .with_template(concat!(
            "override_dh_auto_build:\n",
            "\tcd %(ASSET_DIR)s && npm ci --offline && npm run build\n",
            "\tdh_auto_build\n",
        )),
        Fragment::new(
            "workspace-web-build",
            TraitSet::from([IsWorkspace, BundlesWebAssets]),
            Some(RuleTarget::Build),
            FragmentKind::Binary,
        )
        .with_summary("Build web assets, then every workspace member offline")
        .with_template(concat!(
            "override_dh_auto_build:\n",
            "\tcd %(ASSET_DIR)s && npm ci --offline && npm run build\n",
            "\tcargo build --release --offline --locked --workspace --target %(DEB_HOST_RUST_TYPE)s\n",
        )),
        Fragment::new(
            "python-extension",
            TraitSet::from([HostsLanguageExtension]),
            Some(RuleTarget::Install),
            FragmentKind::Extension,
        )
        .with_coexists(TraitSet::from([IsWorkspace, ProducesSharedLibrary]))
        .with_summary("Install a Python extension module next to its pure-Python package")
        .with_template(concat!(
            "override_dh_auto_install:\n",
            "\tdh_auto_install --buildsystem=pybuild\n",
            "\tinstall -D -m 0644 target/%(DEB_HOST_RUST_TYPE)s/release/lib%(LIB_NAME)s.so %(DESTDIR)s/usr/lib/python3/dist-packages/%(PYBUILD_DIR)s/%(LIB_NAME)s.so\n",
        )),
        Fragment::new(
            "python-extension-env",
            TraitSet::from([HostsLanguageExtension]),
            None,
            FragmentKind::Extension,
        )
        .with_coexists(TraitSet::from([IsWorkspace, ProducesSharedLibrary]))
        .with_summary("Name the Python module for pybuild")
        .with_template(concat!(
            "export PYBUILD_NAME = %(PYBUILD_NAME)s\n",
            "export PYBUILD_DIR = %(PYBUILD_DIR)s\n",
        )),
    ]
}
