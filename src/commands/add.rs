use super::{load_catalog, load_project, load_rules, manager_for, print_suggestions};
use anyhow::{bail, Result};
use modforge::{prepare_options, Config, DependencyPolicy, Error, IntegrationPlan, Options};
use serde_json::Value;
use std::env;

pub fn run(plugin: String, raw_options: Vec<String>, strict: bool, dry_run: bool) -> Result<()> {
    let current_dir = env::current_dir()?;

    if dry_run {
        println!("[DRY RUN] Would add {}...", plugin);
    } else {
        println!("Adding {}...", plugin);
    }
    println!();

    let Some(project) = load_project(&current_dir)? else {
        return Ok(());
    };
    let config = Config::load()?;
    let catalog = load_catalog(&config)?;
    let rules = load_rules(&config)?;

    let Some(manifest) = catalog.get(&plugin) else {
        println!("✗ Plugin '{}' not found in the catalog", plugin);
        println!();
        print_suggestions(&catalog, &plugin);
        return Err(Error::PluginNotFound(plugin).into());
    };

    let options = prepare_options(manifest, parse_options(&raw_options)?)?;

    let mut manager = manager_for(&catalog, project, &config);
    if strict {
        manager = manager.with_dependency_policy(DependencyPolicy::Strict);
    }

    let validation = manager.validate_add(&plugin);
    if !validation.valid {
        println!("✗ Cannot add {}:", plugin);
        for err in &validation.errors {
            println!("  • {}", err);
        }
        println!();
        for err in &validation.errors {
            print_hint(err);
        }
    }

    let installed_deps = manager.add(&plugin, options)?;

    if !installed_deps.is_empty() {
        println!("  Dependencies:");
        for dep in &installed_deps {
            println!("    + {}", dep);
        }
    }
    println!("  + {}", plugin);
    println!();

    let existing: Vec<String> = manager
        .installed()
        .into_iter()
        .filter(|name| *name != plugin)
        .collect();
    let plan = IntegrationPlan::for_new_plugin(&catalog, &rules, &plugin, &existing);
    if !plan.is_empty() {
        println!("  Integrations:");
        for m in &plan.rules {
            println!(
                "    ⚡ {} ({} + {}) → {}",
                m.rule.id, m.plugins.0, m.plugins.1, m.rule.action
            );
        }
        for integration in &plan.integrations {
            println!(
                "    ⚡ {} → {} ({:?}, {} file{})",
                integration.source,
                integration.spec.target,
                integration.spec.kind,
                integration.spec.files.len(),
                if integration.spec.files.len() == 1 { "" } else { "s" }
            );
        }
        println!();
    }

    if dry_run {
        println!("[DRY RUN] No changes written");
        println!();
        return Ok(());
    }

    let path = manager.into_config().save(&current_dir)?;
    println!("✓ Added {} to {}", plugin, path.display());
    println!();

    Ok(())
}

/// Parse `key=value` pairs; values that are valid JSON keep their type
fn parse_options(raw: &[String]) -> Result<Options> {
    let mut options = Options::new();
    for pair in raw {
        let Some((key, value)) = pair.split_once('=') else {
            bail!("Invalid option '{}': expected key=value", pair);
        };
        let key = key.trim();
        if key.is_empty() {
            bail!("Invalid option '{}': key is empty", pair);
        }
        let value = serde_json::from_str::<Value>(value)
            .unwrap_or_else(|_| Value::String(value.to_string()));
        if value.is_null() {
            bail!(
                "Invalid option '{}': null is not a value, leave the option out instead",
                pair
            );
        }
        options.insert(key.to_string(), value);
    }
    Ok(options)
}

fn print_hint(err: &Error) {
    match err {
        Error::Conflict { conflicts, .. } => {
            println!("Hint: remove the conflicting plugin(s) first:");
            for name in conflicts {
                println!("  modforge remove {}", name);
            }
            println!();
        }
        Error::DependencyMissing { missing, .. } => {
            println!("Hint: add the missing dependencies first, or drop --strict:");
            for name in missing {
                println!("  modforge add {}", name);
            }
            println!();
        }
        Error::TargetNotSupported { .. } => {
            println!("Hint: pick a plugin that supports this project's target.");
            println!();
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_options_types() {
        let options = parse_options(&[
            "provider=postgresql".to_string(),
            "port=5432".to_string(),
            "ssl=true".to_string(),
            "url=postgres://localhost:5432/app".to_string(),
        ])
        .unwrap();

        assert_eq!(options["provider"], json!("postgresql"));
        assert_eq!(options["port"], json!(5432));
        assert_eq!(options["ssl"], json!(true));
        assert_eq!(options["url"], json!("postgres://localhost:5432/app"));
    }

    #[test]
    fn test_parse_options_rejects_missing_equals() {
        assert!(parse_options(&["provider".to_string()]).is_err());
        assert!(parse_options(&["=x".to_string()]).is_err());
    }

    #[test]
    fn test_parse_options_rejects_null() {
        let err = parse_options(&["url=null".to_string()]).unwrap_err();
        assert!(err.to_string().contains("url=null"));

        // quoted "null" stays a string
        let options = parse_options(&["url=\"null\"".to_string()]).unwrap();
        assert_eq!(options["url"], json!("null"));
    }
}
