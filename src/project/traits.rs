// src/project/traits.rs

//! Packaging traits of an upstream project
//!
//! The enumeration is closed. New packaging situations are handled by
//! registering recipe fragments, not by adding traits at runtime.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A boolean-valued characteristic of a project relevant to packaging
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Trait {
    /// Built by something other than plain Cargo (meson, make, maturin, ...)
    UsesAlternateBuildSystem,
    /// At least one crate is a `cdylib` or `dylib`
    ProducesSharedLibrary,
    /// Root manifest declares a Cargo workspace
    IsWorkspace,
    /// Ships JavaScript/CSS assets built or embedded at build time
    BundlesWebAssets,
    /// Carries a copy of a C/C++ library instead of linking the system one
    VendorsNativeLibrary,
    /// Builds a module loaded by another language runtime (Python, Node, ...)
    HostsLanguageExtension,
}

impl Trait {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UsesAlternateBuildSystem => "uses-alternate-build-system",
            Self::ProducesSharedLibrary => "produces-shared-library",
            Self::IsWorkspace => "is-workspace",
            Self::BundlesWebAssets => "bundles-web-assets",
            Self::VendorsNativeLibrary => "vendors-native-library",
            Self::HostsLanguageExtension => "hosts-language-extension",
        }
    }

    /// Parse a trait from its kebab-case name
    pub fn parse(s: &str) -> Option<Self> {
        Self::all().iter().copied().find(|t| t.as_str() == s)
    }

    /// Return all traits in declaration order
    pub fn all() -> &'static [Trait] {
        &[
            Self::UsesAlternateBuildSystem,
            Self::ProducesSharedLibrary,
            Self::IsWorkspace,
            Self::BundlesWebAssets,
            Self::VendorsNativeLibrary,
            Self::HostsLanguageExtension,
        ]
    }

    /// Layout traits change which artifacts get installed and where.
    ///
    /// Non-layout traits only touch the environment or configure step and
    /// compose with anything.
    pub fn is_layout(&self) -> bool {
        !matches!(
            self,
            Self::UsesAlternateBuildSystem | Self::VendorsNativeLibrary
        )
    }
}

impl fmt::Display for Trait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Trait {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s.trim()).ok_or_else(|| Error::UnknownTrait(s.to_string()))
    }
}

/// Ordered set of traits
///
/// Backed by a `BTreeSet` so iteration and display order never depend on
/// detection order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraitSet(BTreeSet<Trait>);

impl TraitSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every trait in the enumeration
    pub fn full() -> Self {
        Trait::all().iter().copied().collect()
    }

    pub fn insert(&mut self, t: Trait) -> bool {
        self.0.insert(t)
    }

    pub fn contains(&self, t: Trait) -> bool {
        self.0.contains(&t)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Trait> + '_ {
        self.0.iter().copied()
    }

    pub fn is_subset(&self, other: &TraitSet) -> bool {
        self.0.is_subset(&other.0)
    }

    pub fn union(&self, other: &TraitSet) -> TraitSet {
        self.0.union(&other.0).copied().collect()
    }

    /// Only the layout traits of this set
    pub fn layout(&self) -> TraitSet {
        self.iter().filter(Trait::is_layout).collect()
    }

    /// Parse a comma-separated list such as `is-workspace,produces-shared-library`
    pub fn parse_list(s: &str) -> Result<Self> {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(Trait::from_str)
            .collect()
    }
}

impl fmt::Display for TraitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(|t| t.as_str()).collect();
        f.write_str(&names.join(", "))
    }
}

impl FromIterator<Trait> for TraitSet {
    fn from_iter<I: IntoIterator<Item = Trait>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[Trait; N]> for TraitSet {
    fn from(traits: [Trait; N]) -> Self {
        traits.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trait_roundtrip_names() {
        for t in Trait::all() {
            assert_eq!(Trait::parse(t.as_str()), Some(*t));
        }
        assert_eq!(Trait::parse("is_workspace"), None);
    }

    #[test]
    fn test_layout_traits() {
        assert!(Trait::IsWorkspace.is_layout());
        assert!(Trait::HostsLanguageExtension.is_layout());
        assert!(!Trait::VendorsNativeLibrary.is_layout());
        assert!(!Trait::UsesAlternateBuildSystem.is_layout());
    }

    #[test]
    fn test_parse_list() {
        let set = TraitSet::parse_list("is-workspace, produces-shared-library,").unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.contains(Trait::IsWorkspace));
        assert!(set.contains(Trait::ProducesSharedLibrary));

        assert!(TraitSet::parse_list("").unwrap().is_empty());
        assert!(matches!(
            TraitSet::parse_list("is-workspace,gui"),
            Err(Error::UnknownTrait(name)) if name == "gui"
        ));
    }

    #[test]
    fn test_display_is_ordered() {
        let a = TraitSet::from([Trait::HostsLanguageExtension, Trait::IsWorkspace]);
        let b = TraitSet::from([Trait::IsWorkspace, Trait::HostsLanguageExtension]);
        assert_eq!(a.to_string(), b.to_string());
        assert_eq!(a.to_string(), "is-workspace, hosts-language-extension");
    }

    #[test]
    fn test_layout_subset() {
        let set = TraitSet::from([
            Trait::VendorsNativeLibrary,
            Trait::IsWorkspace,
            Trait::UsesAlternateBuildSystem,
        ]);
        assert_eq!(set.layout(), TraitSet::from([Trait::IsWorkspace]));
    }
}
