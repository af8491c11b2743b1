// src/recipe/rules.rs

//! `debian/rules` assembly
//!
//! Wraps the rendered fragments of a selection in the standard preamble:
//! architecture includes, the offline Cargo environment, and the `dh`
//! sequencer unless a fragment provides its own.

use crate::error::Result;
use crate::recipe::format::RuleTarget;
use crate::recipe::render::{render, render_template, Parameters};
use crate::recipe::select::Selection;

const RULES_HEADER: &str = concat!(
    "#!/usr/bin/make -f\n",
    "# debian/rules for %(CRATE)s %(VERSION)s, generated by debcook\n",
    "\n",
    "include /usr/share/dpkg/architecture.mk\n",
    "include /usr/share/rustc/architecture.mk\n",
    "\n",
    "export CARGO_HOME = %(CARGO_HOME)s\n",
    "export CARGO_NET_OFFLINE = true\n",
    "export DEB_CARGO_CRATE = %(CRATE)s_%(VERSION)s\n",
);

const DEFAULT_SEQUENCER: &str = concat!("%%:\n", "\tdh $@ --buildsystem=cargo\n");

/// Render a complete `debian/rules` file for a selection
pub fn render_rules(selection: &Selection<'_>, params: &Parameters) -> Result<String> {
    let mut sections = vec![render_template("rules-header", RULES_HEADER, params)?];

    // Assignments first so every rule sees them
    let (assignments, rules): (Vec<_>, Vec<_>) = selection
        .fragments
        .iter()
        .partition(|f| f.target.is_none());

    for fragment in assignments.into_iter().chain(rules) {
        sections.push(render(fragment, params)?);
    }

    if selection.owner(RuleTarget::Sequencer).is_none() {
        sections.push(render_template("rules-sequencer", DEFAULT_SEQUENCER, params)?);
    }

    let mut rules = sections
        .iter()
        .map(|s| s.trim_end())
        .collect::<Vec<_>>()
        .join("\n\n");
    rules.push('\n');
    Ok(rules)
}
