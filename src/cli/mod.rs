// src/cli/mod.rs
//! CLI definitions for debcook
//!
//! This module contains the command-line interface definitions using clap.
//! The command implementations are in the `commands` module.
//!
//! Pipeline commands:
//! - `detect` - Report the packaging traits of one or more projects
//! - `select` - Show which recipe fragments a project or trait set gets
//! - `render` - Produce `debian/rules` for a project
//!
//! Supporting commands:
//! - `recipes` - List the recipe catalogue
//! - `vendor` - Create the offline vendor bundle for a package version

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "debcook")]
#[command(author = "debcook Contributors")]
#[command(version)]
#[command(about = "Detect, select and render Debian packaging recipes for Rust projects", long_about = None)]
pub struct Cli {
    /// Configuration file (default: ./debcook.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Report the packaging traits of one or more project trees
    Detect {
        /// Project roots
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show the recipe fragments selected for a project or trait list
    Select {
        /// Project root to detect traits from
        #[arg(required_unless_present = "traits", conflicts_with = "traits")]
        path: Option<PathBuf>,

        /// Comma-separated traits instead of detecting them
        #[arg(short, long)]
        traits: Option<String>,

        /// Additional recipe files
        #[arg(long)]
        recipes: Vec<PathBuf>,
    },

    /// Render debian/rules for a project
    Render {
        /// Project root
        path: PathBuf,

        /// Crate name (default: detected package name)
        #[arg(long)]
        crate_name: Option<String>,

        /// Upstream version (default: detected package version)
        #[arg(long)]
        version: Option<String>,

        /// Rust host triple (default: config or DEB_HOST_RUST_TYPE)
        #[arg(long)]
        host_triple: Option<String>,

        /// Debian multiarch tuple (default: config or DEB_HOST_MULTIARCH)
        #[arg(long)]
        multiarch: Option<String>,

        /// Install path (default: debian/<package>)
        #[arg(long)]
        destdir: Option<String>,

        /// Use these traits instead of detecting them
        #[arg(short, long)]
        traits: Option<String>,

        /// Extra template parameter, repeatable
        #[arg(long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,

        /// Additional recipe files
        #[arg(long)]
        recipes: Vec<PathBuf>,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the recipe fragment catalogue
    Recipes {
        /// Additional recipe files
        #[arg(long)]
        recipes: Vec<PathBuf>,

        /// Print each fragment's template
        #[arg(long)]
        templates: bool,
    },

    /// Create the vendor bundle for a package version
    Vendor {
        /// Project root (must contain Cargo.lock)
        path: PathBuf,

        /// Output of `cargo vendor` (default: <path>/vendor)
        #[arg(long)]
        vendor_dir: Option<PathBuf>,

        /// Directory the bundle is written to
        #[arg(short, long, default_value = "..")]
        output_dir: PathBuf,

        /// Target triple to filter for (default: host triple)
        #[arg(long)]
        target: Option<String>,

        /// Override the package version
        #[arg(long)]
        version: Option<String>,
    },
}
