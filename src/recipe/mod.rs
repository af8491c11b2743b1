// src/recipe/mod.rs

//! Packaging recipes
//!
//! A recipe is assembled from fragments: small `debian/rules` templates
//! keyed by the traits they handle. The pipeline per project is
//!
//! 1. **Select** fragments for the detected trait set ([`select`])
//! 2. **Render** each fragment with the operator's parameters ([`render`])
//! 3. **Assemble** the rendered text into `debian/rules` ([`render_rules`])
//!
//! # Example Fragment
//!
//! ```text
//! override_dh_auto_install:
//!     install -D -m 0755 target/%(DEB_HOST_RUST_TYPE)s/release/%(CRATE)s %(DESTDIR)s/usr/bin/%(CRATE)s
//! ```
//!
//! # Precedence
//!
//! | Kind | Typical fragments |
//! |------|-------------------|
//! | `default` | `cargo-binary` |
//! | `environment` | `alternate-build-system`, `vendored-native` |
//! | `binary` | `workspace-binary`, `workspace-build`, `web-assets`, `workspace-web-build` |
//! | `library` | `shared-library` |
//! | `extension` | `python-extension`, `python-extension-env` |
//!
//! Later kinds override earlier ones on the same rule target.

mod format;
mod registry;
mod render;
mod rules;
mod select;

pub use format::{Fragment, FragmentKind, RecipeFile, RuleTarget};
pub use registry::{Registry, DEFAULT_FRAGMENT};
pub use render::{render, render_template, Parameters, DEFAULT_CARGO_HOME};
pub use rules::render_rules;
pub use select::{select, Override, Selection};
