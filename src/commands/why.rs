use super::{load_catalog, load_project, manager_for};
use anyhow::Result;
use modforge::Config;
use std::env;

pub fn run(plugin: String) -> Result<()> {
    let current_dir = env::current_dir()?;

    println!("Searching for why {} is installed...", plugin);
    println!();

    let Some(project) = load_project(&current_dir)? else {
        return Ok(());
    };
    let config = Config::load()?;
    let catalog = load_catalog(&config)?;
    let manager = manager_for(&catalog, project, &config);

    if !manager.is_installed(&plugin) {
        println!("✗ Plugin '{}' is not installed", plugin);
        println!();
        return Ok(());
    }

    let dependents = manager.get_dependents(&plugin);
    if dependents.is_empty() {
        println!("{} was added directly (no installed plugin requires it)", plugin);
    } else {
        println!("{} is required by:", plugin);
        for name in &dependents {
            println!("  ← {}", name);
        }
    }
    println!();

    let tree = manager.dependency_tree(&plugin);
    if tree.is_empty() {
        println!("{} has no dependencies", plugin);
    } else {
        println!("{} requires:", plugin);
        for name in &tree {
            let marker = if manager.is_installed(name) { "✓" } else { "✗" };
            println!("  {} {}", marker, name);
        }
    }
    println!();

    Ok(())
}
