// src/lib.rs

//! debcook - Debian packaging recipes for Rust projects
//!
//! Turns an upstream Rust source tree into `debian/rules` text by running a
//! strictly linear pipeline:
//!
//! - **Detect**: inspect the tree and report which packaging traits apply
//!   (workspace, shared library, web assets, vendored C code, language
//!   extension, non-Cargo build system)
//! - **Select**: pick the recipe fragments covering that trait set, or fail
//!   with an unsupported combination
//! - **Render**: fill the fragments with crate name, version, host triple and
//!   install path
//!
//! Alongside the pipeline, [`vendor`] builds the immutable offline snapshot
//! of pinned dependency sources the package builds against.
//!
//! Every stage is a pure function of its inputs. Nothing is cached between
//! runs and nothing talks to the network.

pub mod config;
pub mod detect;
mod error;
pub mod project;
pub mod recipe;
pub mod vendor;

pub use config::Config;
pub use detect::{Detection, TraitDetector};
pub use error::{Error, Result};
pub use project::{BuildSystem, Project, Trait, TraitSet};
pub use recipe::{render, render_rules, select, Fragment, Parameters, Registry, Selection};
pub use vendor::{VendorBundle, VendorFilter};
