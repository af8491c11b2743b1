// src/recipe/format.rs

//! Recipe fragment definitions
//!
//! A fragment is a small piece of `debian/rules` text keyed by the project
//! traits it handles. Extra fragments can be supplied as TOML files:
//!
//! ```toml
//! [[fragment]]
//! id = "node-addon"
//! key = ["hosts-language-extension"]
//! target = "install"
//! kind = "extension"
//! coexists = ["produces-shared-library"]
//! summary = "Install a Node.js native addon"
//! template = """
//! override_dh_auto_install:
//! \tinstall -D -m 0644 target/%(DEB_HOST_RUST_TYPE)s/release/lib%(LIB_NAME)s.so %(DESTDIR)s/usr/lib/nodejs/%(LIB_NAME)s.node
//! """
//! ```

use crate::project::TraitSet;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Matches a `%%` escape or a `%(NAME)s` placeholder
pub(crate) static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"%%|%\(([A-Za-z_][A-Za-z0-9_]*)\)s").expect("placeholder pattern is valid")
});

/// The `debian/rules` target a fragment writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleTarget {
    /// The `%:` catch-all rule that invokes `dh`
    Sequencer,
    Configure,
    Build,
    Test,
    Install,
    Clean,
}

impl RuleTarget {
    /// Name of the make target as it appears in `debian/rules`
    pub fn rule_name(&self) -> &'static str {
        match self {
            Self::Sequencer => "%",
            Self::Configure => "override_dh_auto_configure",
            Self::Build => "override_dh_auto_build",
            Self::Test => "override_dh_auto_test",
            Self::Install => "override_dh_auto_install",
            Self::Clean => "override_dh_auto_clean",
        }
    }
}

impl fmt::Display for RuleTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.rule_name())
    }
}

/// Precedence class of a fragment, lowest first.
///
/// When two selected fragments write the same target, the one applied later
/// wins, and fragments are applied in this order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum FragmentKind {
    /// Fallback for projects with no traits
    Default,
    /// Environment and configure tweaks that compose with anything
    #[default]
    Environment,
    /// Binary install and build layouts
    Binary,
    /// Plain library installs
    Library,
    /// Language-extension bindings
    Extension,
}

impl FragmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Environment => "environment",
            Self::Binary => "binary",
            Self::Library => "library",
            Self::Extension => "extension",
        }
    }
}

/// A reusable `debian/rules` template selected by project traits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    /// Unique registry key
    pub id: String,

    /// Traits the fragment requires; selected when all are present
    #[serde(default)]
    pub key: TraitSet,

    /// Rule written by the fragment; `None` for top-level assignments only
    #[serde(default)]
    pub target: Option<RuleTarget>,

    #[serde(default)]
    pub kind: FragmentKind,

    /// Layout traits this fragment is known to work alongside
    #[serde(default)]
    pub coexists: TraitSet,

    #[serde(default)]
    pub summary: String,

    /// Template text using `%(NAME)s` placeholders
    pub template: String,
}

impl Fragment {
    pub fn new(id: &str, key: TraitSet, target: Option<RuleTarget>, kind: FragmentKind) -> Self {
        Self {
            id: id.to_string(),
            key,
            target,
            kind,
            coexists: TraitSet::new(),
            summary: String::new(),
            template: String::new(),
        }
    }

    pub fn with_coexists(mut self, coexists: TraitSet) -> Self {
        self.coexists = coexists;
        self
    }

    pub fn with_summary(mut self, summary: &str) -> Self {
        self.summary = summary.to_string();
        self
    }

    pub fn with_template(mut self, template: &str) -> Self {
        self.template = template.to_string();
        self
    }

    /// Placeholders declared by the template, in order of first use
    pub fn placeholders(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for cap in PLACEHOLDER.captures_iter(&self.template) {
            if let Some(name) = cap.get(1) {
                if !names.iter().any(|n| n == name.as_str()) {
                    names.push(name.as_str().to_string());
                }
            }
        }
        names
    }

    /// Traits this fragment can be selected together with
    pub fn known_traits(&self) -> TraitSet {
        self.key.union(&self.coexists)
    }
}

/// On-disk layout of a recipe file
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RecipeFile {
    #[serde(default, rename = "fragment")]
    pub fragments: Vec<Fragment>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::Trait;

    #[test]
    fn test_placeholders_in_order_without_duplicates() {
        let f = Fragment::new("x", TraitSet::new(), None, FragmentKind::Environment)
            .with_template("%(B)s %(A)s %(B)s 100%% %(not valid)s %(C_1)s");
        assert_eq!(f.placeholders(), vec!["B", "A", "C_1"]);
    }

    #[test]
    fn test_escaped_percent_is_not_a_placeholder() {
        let f = Fragment::new("x", TraitSet::new(), None, FragmentKind::Environment)
            .with_template("printf '%%(HOME)s'");
        assert!(f.placeholders().is_empty());
    }

    #[test]
    fn test_kind_ordering() {
        assert!(FragmentKind::Extension > FragmentKind::Library);
        assert!(FragmentKind::Library > FragmentKind::Binary);
        assert!(FragmentKind::Binary > FragmentKind::Environment);
        assert!(FragmentKind::Environment > FragmentKind::Default);
    }

    #[test]
    fn test_parse_recipe_file() {
        let file: RecipeFile = toml::from_str(
            r#"
[[fragment]]
id = "node-addon"
key = ["hosts-language-extension"]
target = "install"
kind = "extension"
coexists = ["produces-shared-library"]
template = "override_dh_auto_install:\n\tinstall lib%(LIB_NAME)s.so\n"
"#,
        )
        .unwrap();
        let f = &file.fragments[0];
        assert_eq!(f.target, Some(RuleTarget::Install));
        assert_eq!(f.kind, FragmentKind::Extension);
        assert!(f.key.contains(Trait::HostsLanguageExtension));
        assert_eq!(f.placeholders(), vec!["LIB_NAME"]);
        assert!(f.known_traits().contains(Trait::ProducesSharedLibrary));
    }

    #[test]
    fn test_rule_names() {
        assert_eq!(RuleTarget::Sequencer.rule_name(), "%");
        assert_eq!(RuleTarget::Install.to_string(), "override_dh_auto_install");
    }
}
