// src/config.rs

//! Operator configuration
//!
//! Configuration is optional. Lookup order is an explicit `--config` path,
//! then `debcook.toml` in the current directory, then built-in defaults.
//! Host parameters can be overridden from the environment with the same
//! variable names dpkg-architecture exports.
//!
//! ```toml
//! host_rust_type = "aarch64-unknown-linux-gnu"
//! host_multiarch = "aarch64-linux-gnu"
//! recipes = ["/etc/debcook/recipes.d/wasm.toml"]
//!
//! [detect]
//! skip_dirs = ["target", ".git", "node_modules", "fixtures"]
//!
//! [vendor]
//! exclude = ["winapi", "windows"]
//! ```

use crate::error::{Error, Result};
use crate::project::DEFAULT_SKIP_DIRS;
use crate::recipe::DEFAULT_CARGO_HOME;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "debcook.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rust target triple of the host (`DEB_HOST_RUST_TYPE`)
    pub host_rust_type: String,
    /// Debian multiarch tuple of the host (`DEB_HOST_MULTIARCH`)
    pub host_multiarch: String,
    /// Cargo home used during the package build
    pub cargo_home: String,
    /// Extra recipe files registered after the built-in catalogue
    pub recipes: Vec<PathBuf>,
    pub detect: DetectConfig,
    pub vendor: VendorConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host_rust_type: "x86_64-unknown-linux-gnu".to_string(),
            host_multiarch: "x86_64-linux-gnu".to_string(),
            cargo_home: DEFAULT_CARGO_HOME.to_string(),
            recipes: Vec::new(),
            detect: DetectConfig::default(),
            vendor: VendorConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectConfig {
    /// Directory names never descended into
    pub skip_dirs: Vec<String>,
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            skip_dirs: DEFAULT_SKIP_DIRS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VendorConfig {
    /// Crate name prefixes that only build for non-Linux platforms
    pub exclude: Vec<String>,
}

impl Default for VendorConfig {
    fn default() -> Self {
        Self {
            exclude: [
                "winapi",
                "windows",
                "windows-sys",
                "windows_",
                "wasi",
                "web-sys",
                "js-sys",
                "core-foundation",
                "security-framework",
                "hermit-abi",
                "redox_",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

impl Config {
    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load configuration from an explicit path, the working directory, or defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => {
                let content = std::fs::read_to_string(p).map_err(|e| {
                    Error::Config(format!("cannot read {}: {}", p.display(), e))
                })?;
                Self::parse(&content)?
            }
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                debug!("Using {}", DEFAULT_CONFIG_FILE);
                Self::parse(&std::fs::read_to_string(DEFAULT_CONFIG_FILE)?)?
            }
            None => Self::default(),
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply environment overrides through a lookup function
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("DEB_HOST_RUST_TYPE").filter(|v| !v.is_empty()) {
            self.host_rust_type = v;
        }
        if let Some(v) = lookup("DEB_HOST_MULTIARCH").filter(|v| !v.is_empty()) {
            self.host_multiarch = v;
        }
    }
}
