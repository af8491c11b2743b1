// src/commands/select.rs

//! Select command - show which fragments a trait set gets

use super::{detect_project, load_registry, parse_traits};
use anyhow::Result;
use debcook::{select, Config};
use std::path::{Path, PathBuf};

pub fn cmd_select(
    config: &Config,
    path: Option<&Path>,
    traits: Option<&str>,
    recipes: &[PathBuf],
) -> Result<()> {
    let registry = load_registry(config, recipes)?;

    let traits = match (traits, path) {
        (Some(list), _) => parse_traits(list)?,
        (None, Some(path)) => detect_project(config, path)?.traits,
        (None, None) => anyhow::bail!("Either a project path or --traits is required"),
    };

    let selection = select(&registry, &traits)?;

    if traits.is_empty() {
        println!("Traits: none");
    } else {
        println!("Traits: {}", traits);
    }
    println!("Fragments:");
    for fragment in &selection.fragments {
        let target = fragment
            .target
            .map(|t| t.rule_name().to_string())
            .unwrap_or_else(|| "(assignments)".to_string());
        println!("  {:<24} {:<30} {}", fragment.id, target, fragment.summary);
    }

    if !selection.overridden.is_empty() {
        println!("Overridden:");
        for o in &selection.overridden {
            println!("  {} replaced by {} on {}", o.replaced, o.by, o.target);
        }
    }

    Ok(())
}
