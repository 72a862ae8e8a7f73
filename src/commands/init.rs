use anyhow::Result;
use modforge::{Config, ProjectConfig, Target, CONFIG_FILE_JSON, CONFIG_FILE_TOML};
use std::env;

pub fn run(name: Option<String>, target: Option<String>, json: bool) -> Result<()> {
    let current_dir = env::current_dir()?;

    if let Some(existing) = ProjectConfig::find(&current_dir) {
        println!("✓ {} already exists in this directory", existing.display());
        println!();
        println!("To reinitialize, delete it and run 'modforge init' again.");
        return Ok(());
    }

    println!("Initializing modforge project...");
    println!();

    let config = Config::load()?;

    let project_name = name.unwrap_or_else(|| {
        current_dir
            .file_name()
            .and_then(|s| s.to_str())
            .map(|s| s.to_string())
            .unwrap_or_else(|| "my-app".to_string())
    });
    let target: Target = match target {
        Some(t) => t.parse()?,
        None => config.project.default_target,
    };

    let project = ProjectConfig::new(project_name, target);
    project.validate()?;

    let filename = if json || config.project.config_format == "json" {
        CONFIG_FILE_JSON
    } else {
        CONFIG_FILE_TOML
    };
    project.save_to(current_dir.join(filename))?;

    println!("  Project: {}", project.project_name);
    println!("  Target:  {}", project.target);
    println!();
    println!("✓ Created {}", filename);
    println!();
    println!("Next steps:");
    println!("  • Browse plugins: modforge catalog");
    println!("  • Add a plugin: modforge add <plugin>");
    println!();

    Ok(())
}
