use super::{load_catalog, load_project};
use anyhow::Result;
use modforge::Config;
use std::env;

pub fn run() -> Result<()> {
    let current_dir = env::current_dir()?;

    let Some(project) = load_project(&current_dir)? else {
        return Ok(());
    };
    let config = Config::load()?;
    let catalog = load_catalog(&config)?;

    println!("{} ({})", project.project_name, project.target);
    println!();

    if project.modules.is_empty() {
        println!("No plugins installed.");
        println!();
        println!("Add plugins with: modforge add <plugin>");
        return Ok(());
    }

    let mut enabled = 0;
    for (name, entry) in &project.modules {
        let category = catalog
            .get(name)
            .map(|m| m.category.to_string())
            .unwrap_or_else(|| "unknown".to_string());

        if entry.enabled {
            enabled += 1;
            print!("  {} [{}]", name, category);
        } else {
            print!("  {} [{}] (disabled)", name, category);
        }
        if !entry.options.is_empty() {
            let keys: Vec<&str> = entry.options.keys().map(String::as_str).collect();
            print!("  options: {}", keys.join(", "));
        }
        println!();
    }
    println!();

    println!(
        "Total: {} plugin{} enabled",
        enabled,
        if enabled == 1 { "" } else { "s" }
    );

    Ok(())
}
