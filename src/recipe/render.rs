// src/recipe/render.rs

//! Fragment rendering
//!
//! Rendering is a pure string transformation: every `%(NAME)s` placeholder
//! is replaced by its parameter value and `%%` becomes a literal `%`.
//! Nothing touches the filesystem or the network.

use crate::error::{Error, Result};
use crate::recipe::format::{Fragment, PLACEHOLDER};
use std::collections::BTreeMap;

/// Default Cargo home inside the package build tree
pub const DEFAULT_CARGO_HOME: &str = "$(CURDIR)/debian/cargo_home";

/// Parameter mapping supplied to the renderer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameters {
    values: BTreeMap<String, String>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameters for a crate.
    ///
    /// Sets `CRATE` and `VERSION`, and derives `LIB_NAME` (the file stem
    /// Cargo gives the library), `PACKAGE` (a Debian-legal binary package
    /// name), `DESTDIR` (`debian/<PACKAGE>`) and `CARGO_HOME`.
    pub fn for_crate(name: &str, version: &str) -> Self {
        let package = name.replace('_', "-").to_lowercase();
        let mut params = Self::new();
        params.set("CRATE", name);
        params.set("VERSION", version);
        params.set("LIB_NAME", &name.replace('-', "_"));
        params.set("DESTDIR", &format!("debian/{}", package));
        params.set("PACKAGE", &package);
        params.set("CARGO_HOME", DEFAULT_CARGO_HOME);
        params
    }

    /// Set the host Rust triple and Debian multiarch tuple
    pub fn with_host(mut self, rust_type: &str, multiarch: &str) -> Self {
        self.set("DEB_HOST_RUST_TYPE", rust_type);
        self.set("DEB_HOST_MULTIARCH", multiarch);
        self
    }

    /// Set the install path
    pub fn with_destdir(mut self, destdir: &str) -> Self {
        self.set("DESTDIR", destdir);
        self
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.set(key, value);
        self
    }

    /// Set a parameter, replacing any previous value
    pub fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    /// Set a parameter only if it has no value yet
    pub fn set_default(&mut self, key: &str, value: &str) {
        self.values
            .entry(key.to_string())
            .or_insert_with(|| value.to_string());
    }

    /// Fill in suggested values without overriding anything already set
    pub fn extend_defaults<'a, I>(&mut self, suggestions: I)
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        for (key, value) in suggestions {
            self.set_default(key, value);
        }
    }

    /// Parse an operator assignment such as `ASSET_DIR=web`
    pub fn set_assignment(&mut self, assignment: &str) -> Result<()> {
        match assignment.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                self.set(key.trim(), value);
                Ok(())
            }
            _ => Err(Error::Config(format!(
                "expected KEY=VALUE, got '{}'",
                assignment
            ))),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.values.iter()
    }
}

/// Render a fragment with the given parameters.
///
/// Fails with [`Error::MissingParameter`] naming the first placeholder, in
/// template order, that has no value.
pub fn render(fragment: &Fragment, params: &Parameters) -> Result<String> {
    render_template(&fragment.id, &fragment.template, params)
}

/// Render raw template text; `origin` names the template in errors
pub fn render_template(origin: &str, template: &str, params: &Parameters) -> Result<String> {
    let mut output = String::with_capacity(template.len());
    let mut last = 0;

    for cap in PLACEHOLDER.captures_iter(template) {
        let whole = cap.get(0).expect("capture group 0 always matches");
        output.push_str(&template[last..whole.start()]);

        match cap.get(1) {
            Some(name) => {
                let value = params.get(name.as_str()).ok_or_else(|| Error::MissingParameter {
                    fragment: origin.to_string(),
                    placeholder: name.as_str().to_string(),
                })?;
                output.push_str(value);
            }
            None => output.push('%'),
        }
        last = whole.end();
    }

    output.push_str(&template[last..]);
    Ok(output)
}
