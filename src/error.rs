// src/error.rs

//! Error types for debcook
//!
//! Two failure kinds are meant for the operator: an unsupported trait
//! combination and a missing template parameter. Both are deterministic and
//! never retried. The remaining variants cover reading the project tree,
//! configuration and vendor bundles.

use std::path::PathBuf;
use thiserror::Error;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// No known recipe covers the detected trait set
    #[error("unsupported trait combination {{{traits}}}: {reason}")]
    UnsupportedCombination { traits: String, reason: String },

    /// A template placeholder has no supplied value
    #[error("missing parameter {placeholder} required by fragment '{fragment}'")]
    MissingParameter {
        fragment: String,
        placeholder: String,
    },

    /// Path contains nothing that looks like a buildable project
    #[error("not a project: no build system found under {0}")]
    NotAProject(PathBuf),

    /// Cargo manifest could not be read or understood
    #[error("invalid manifest {path}: {message}")]
    Manifest { path: PathBuf, message: String },

    /// Trait name not in the closed enumeration
    #[error("unknown trait: {0}")]
    UnknownTrait(String),

    /// Recipe file is malformed
    #[error("invalid recipe file {path}: {message}")]
    Recipe { path: PathBuf, message: String },

    /// Configuration problem
    #[error("configuration error: {0}")]
    Config(String),

    /// Vendor bundles are immutable once written
    #[error("vendor bundle already exists: {0}")]
    BundleExists(PathBuf),

    /// Vendor bundle creation failed
    #[error("vendor error: {0}")]
    Vendor(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// True for the two failure kinds the operator resolves by hand
    pub fn is_operator_facing(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedCombination { .. } | Self::MissingParameter { .. }
        )
    }
}
