// src/recipe/select.rs

//! Recipe selection
//!
//! Maps a trait set to the ordered list of fragments to apply. A fragment is
//! a candidate when all of its key traits are present. Candidates are applied
//! in `(kind, registration order)`; when two write the same rule target the
//! later one replaces the earlier, so extension bindings override library
//! installs, which override binary layouts, which override the default.

use crate::error::{Error, Result};
use crate::project::TraitSet;
use crate::recipe::format::{Fragment, RuleTarget};
use crate::recipe::registry::Registry;
use std::collections::BTreeMap;
use tracing::debug;

/// A fragment that lost its rule target to a higher-precedence fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Override {
    pub target: RuleTarget,
    pub replaced: String,
    pub by: String,
}

/// Ordered fragments chosen for a trait set
#[derive(Debug, Clone)]
pub struct Selection<'r> {
    pub traits: TraitSet,
    pub fragments: Vec<&'r Fragment>,
    pub overridden: Vec<Override>,
}

impl Selection<'_> {
    pub fn ids(&self) -> Vec<&str> {
        self.fragments.iter().map(|f| f.id.as_str()).collect()
    }

    /// Fragment that owns a rule target, if any
    pub fn owner(&self, target: RuleTarget) -> Option<&Fragment> {
        self.fragments
            .iter()
            .copied()
            .find(|f| f.target == Some(target))
    }
}

/// Select fragments for a trait set.
///
/// Fails with [`Error::UnsupportedCombination`] when a trait has no fragment
/// at all, or when a selected fragment is not known to work alongside one
/// of the other layout traits present. Never approximates.
pub fn select<'r>(registry: &'r Registry, traits: &TraitSet) -> Result<Selection<'r>> {
    let mut candidates: Vec<(usize, &'r Fragment)> = registry
        .iter()
        .enumerate()
        .filter(|(_, f)| f.key.is_subset(traits))
        .collect();
    candidates.sort_by_key(|(index, f)| (f.kind, *index));

    let unsupported = |reason: String| Error::UnsupportedCombination {
        traits: traits.to_string(),
        reason,
    };

    for t in traits.iter() {
        if !candidates.iter().any(|(_, f)| f.key.contains(t)) {
            return Err(unsupported(format!("no recipe handles {}", t)));
        }
    }

    let mut kept: Vec<Option<&'r Fragment>> = Vec::with_capacity(candidates.len());
    let mut owners: BTreeMap<RuleTarget, usize> = BTreeMap::new();
    let mut overridden = Vec::new();

    for (_, fragment) in candidates {
        if let Some(target) = fragment.target {
            if let Some(previous) = owners.insert(target, kept.len()) {
                if let Some(replaced) = kept[previous].take() {
                    debug!("{}: '{}' overrides '{}'", target, fragment.id, replaced.id);
                    overridden.push(Override {
                        target,
                        replaced: replaced.id.clone(),
                        by: fragment.id.clone(),
                    });
                }
            }
        }
        kept.push(Some(fragment));
    }

    let fragments: Vec<&'r Fragment> = kept.into_iter().flatten().collect();

    // Overridden fragments never reach the rules file, so only the
    // survivors have to know the other layout traits
    let layout = traits.layout();
    for fragment in &fragments {
        let known = fragment.known_traits();
        if !layout.is_subset(&known) {
            let unknown: TraitSet = layout.iter().filter(|t| !known.contains(*t)).collect();
            return Err(unsupported(format!(
                "recipe '{}' is not known to work with {}",
                fragment.id, unknown
            )));
        }
    }
    debug!(
        "Selected for {{{}}}: {}",
        traits,
        fragments
            .iter()
            .map(|f| f.id.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    Ok(Selection {
        traits: traits.clone(),
        fragments,
        overridden,
    })
}
