pub mod add;
pub mod catalog;
pub mod check;
pub mod config;
pub mod init;
pub mod integrations;
pub mod list;
pub mod remove;
pub mod why;

use anyhow::{Context, Result};
use modforge::{Catalog, Config, Manager, ProjectConfig, RuleEngine};
use std::path::Path;
use tracing::debug;

/// Build the plugin catalog from every configured catalog directory
pub fn load_catalog(config: &Config) -> Result<Catalog> {
    let mut catalog = Catalog::new();
    for dir in config.catalog_dirs() {
        let loaded = catalog
            .load_dir(&dir)
            .with_context(|| format!("Failed to load plugins from {}", dir.display()))?;
        debug!("Loaded {} plugins from {}", loaded, dir.display());
    }
    Ok(catalog)
}

/// Rule engine from the configured rule file, the built-in table, or nothing
pub fn load_rules(config: &Config) -> Result<RuleEngine> {
    if let Some(path) = config.rules_file() {
        return RuleEngine::load(&path)
            .with_context(|| format!("Failed to load rules from {}", path.display()));
    }
    if config.rules.use_default_rules {
        Ok(RuleEngine::with_default_rules())
    } else {
        Ok(RuleEngine::new(Vec::new())?)
    }
}

/// Manager configured with the user's resolver settings
pub fn manager_for<'a>(catalog: &'a Catalog, project: ProjectConfig, config: &Config) -> Manager<'a> {
    Manager::new(catalog, project)
        .with_dependency_policy(config.resolver.dependency_policy())
        .with_conflict_policy(config.resolver.conflict_policy)
}

/// Load the project in `dir`, printing a hint when there is none
pub fn load_project(dir: &Path) -> Result<Option<ProjectConfig>> {
    if !ProjectConfig::exists(dir) {
        println!("✗ No modforge.toml found in current directory");
        println!();
        println!("Run 'modforge init' first to initialize the project.");
        return Ok(None);
    }
    Ok(Some(ProjectConfig::load(dir)?))
}

/// Print "did you mean" suggestions for an unknown plugin name
pub fn print_suggestions(catalog: &Catalog, name: &str) {
    let similar = catalog.suggest(name);
    if !similar.is_empty() {
        println!("Did you mean one of these?");
        for s in similar {
            println!("  {}", s);
        }
        println!();
    }
    println!("Browse available plugins: modforge catalog");
    println!();
}
