use anyhow::Result;
use modforge::Config;

pub fn run_show() -> Result<()> {
    let config = Config::load()?;
    let config_path = Config::default_path()?;

    println!();
    println!("  📁 Config file: {}", config_path.display());
    println!();

    println!("┌─ Catalog ─");
    for dir in config.catalog_dirs() {
        println!("│  {}", dir.display());
    }
    println!("└─");
    println!();

    println!("┌─ Resolver ─");
    println!(
        "│  Auto-install dependencies:  {}",
        format_bool(config.resolver.auto_install_dependencies)
    );
    println!(
        "│  Conflict policy:            {:?}",
        config.resolver.conflict_policy
    );
    println!("└─");
    println!();

    println!("┌─ Rules ─");
    println!(
        "│  Built-in rules:  {}",
        format_bool(config.rules.use_default_rules)
    );
    if let Some(file) = config.rules_file() {
        println!("│  Rule file:       {}", file.display());
    }
    println!("└─");
    println!();

    println!("┌─ New projects ─");
    println!("│  Default target:  {}", config.project.default_target);
    println!("│  Config format:   {}", config.project.config_format);
    println!("└─");
    println!();

    println!("💡 Change settings with: modforge config set <key> <value>");
    println!();

    Ok(())
}

pub fn run_set(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load()?;
    config.set(key, value)?;
    config.save()?;

    println!("✓ Set {} = {}", key, value);
    Ok(())
}

fn format_bool(value: bool) -> &'static str {
    if value {
        "✓ enabled"
    } else {
        "✗ disabled"
    }
}
