use super::load_catalog;
use anyhow::Result;
use modforge::{Category, Config, ProjectConfig};
use std::env;

pub fn run(category: Option<String>) -> Result<()> {
    let current_dir = env::current_dir()?;
    let config = Config::load()?;
    let catalog = load_catalog(&config)?;

    if catalog.is_empty() {
        println!("No plugins found.");
        println!();
        println!("Plugin manifests are loaded from:");
        for dir in config.catalog_dirs() {
            println!("  {}", dir.display());
        }
        return Ok(());
    }

    // Mark installed plugins when run inside a project
    let project = ProjectConfig::load(&current_dir).ok();

    let categories: Vec<Category> = match category {
        Some(c) => vec![c.parse::<Category>()?],
        None => catalog.categories().into_iter().collect(),
    };

    for category in categories {
        let mut plugins = catalog.by_category(category);
        if plugins.is_empty() {
            continue;
        }
        plugins.sort_by(|a, b| a.name.cmp(&b.name));

        println!("{}:", category);
        for manifest in plugins {
            let installed = project
                .as_ref()
                .is_some_and(|p| p.is_enabled(&manifest.name));
            let targets: Vec<String> = manifest
                .supported_targets
                .iter()
                .map(|t| t.to_string())
                .collect();

            println!(
                "  {} {}  [{}]",
                if installed { "✓" } else { " " },
                manifest.name,
                targets.join(", ")
            );
            if let Some(description) = &manifest.description {
                println!("      {}", description);
            }
            if !manifest.dependencies.is_empty() {
                println!("      requires: {}", manifest.dependencies.join(", "));
            }
            if !manifest.conflicts.is_empty() {
                println!("      conflicts: {}", manifest.conflicts.join(", "));
            }
        }
        println!();
    }

    println!("Total: {} plugins", catalog.count());

    Ok(())
}
