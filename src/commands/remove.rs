use super::{load_catalog, load_project, manager_for, print_suggestions};
use anyhow::Result;
use modforge::{Config, Error};
use std::env;

pub fn run(plugin: String, dry_run: bool) -> Result<()> {
    let current_dir = env::current_dir()?;

    if dry_run {
        println!("[DRY RUN] Would remove {}...", plugin);
    } else {
        println!("Removing {}...", plugin);
    }
    println!();

    let Some(project) = load_project(&current_dir)? else {
        return Ok(());
    };
    let config = Config::load()?;
    let catalog = load_catalog(&config)?;
    let mut manager = manager_for(&catalog, project, &config);

    let validation = manager.validate_remove(&plugin);
    for err in &validation.errors {
        match err {
            Error::PluginNotFound(_) => {
                println!("✗ Plugin '{}' not found in the catalog", plugin);
                println!();
                print_suggestions(&catalog, &plugin);
            }
            Error::NotInstalled(_) => {
                println!("⚠ Plugin '{}' is not installed", plugin);
                println!();
                println!("Currently installed plugins:");
                for name in manager.installed() {
                    println!("  - {}", name);
                }
                println!();
            }
            Error::HasDependents { dependents, .. } => {
                println!("✗ {} is required by:", plugin);
                for name in dependents {
                    println!("  - {}", name);
                }
                println!();
                println!("Remove these plugins first, for example:");
                println!("  modforge remove {}", dependents[0]);
                println!();
            }
            _ => {}
        }
    }

    manager.remove(&plugin)?;

    if dry_run {
        println!("✓ {} can be removed", plugin);
        println!("[DRY RUN] No changes written");
        println!();
        return Ok(());
    }

    let path = manager.into_config().save(&current_dir)?;
    println!("✓ Removed {} from {}", plugin, path.display());
    println!();

    Ok(())
}
