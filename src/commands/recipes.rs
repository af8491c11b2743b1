// src/commands/recipes.rs

//! Recipes command - list the fragment catalogue

use super::load_registry;
use anyhow::Result;
use debcook::Config;
use std::path::PathBuf;

pub fn cmd_recipes(config: &Config, recipes: &[PathBuf], templates: bool) -> Result<()> {
    let registry = load_registry(config, recipes)?;

    println!("{} recipe fragment(s):", registry.len());
    for fragment in registry.iter() {
        let key = if fragment.key.is_empty() {
            "(default)".to_string()
        } else {
            fragment.key.to_string()
        };
        let target = fragment
            .target
            .map(|t| t.to_string())
            .unwrap_or_else(|| "-".to_string());

        println!(
            "  {:<24} {:<10} {:<10} {}",
            fragment.id,
            fragment.kind.as_str(),
            target,
            key
        );
        if !fragment.summary.is_empty() {
            println!("      {}", fragment.summary);
        }

        let placeholders = fragment.placeholders();
        if !placeholders.is_empty() {
            println!("      Parameters: {}", placeholders.join(", "));
        }

        if templates {
            println!();
            for line in fragment.template.lines() {
                println!("      | {}", line);
            }
            println!();
        }
    }

    Ok(())
}
